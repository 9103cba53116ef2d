//! Plugin manifest for rcload.
//!
//! A script declares plugins between `plug#begin` and `plug#end`; this crate
//! models those declarations and resolves each one independently, so a
//! single broken entry never keeps the rest from loading.

mod entry;
mod resolver;

use std::path::PathBuf;

pub use entry::{Manifest, Pin, PlugOptions, PluginEntry, PluginSource};
pub use resolver::{DirResolver, MANIFEST_FILE, ManifestReport, PluginInfo, PluginResolver, ResolvedPlugin, resolve_manifest};

/// Errors resolving a single plugin entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PluginError {
	#[error("invalid plugin locator '{0}'")]
	InvalidLocator(String),

	#[error("plugin '{name}' is not installed (expected {})", path.display())]
	NotInstalled { name: String, path: PathBuf },

	#[error("plugin '{name}' has a malformed manifest: {message}")]
	Manifest { name: String, message: String },

	#[error("failed to read plugin '{name}': {message}")]
	Io { name: String, message: String },
}
