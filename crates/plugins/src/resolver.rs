//! Plugin resolution.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Manifest, PluginEntry, PluginError, PluginSource};

#[cfg(test)]
mod tests;

/// File describing what an installed plugin contributes.
pub const MANIFEST_FILE: &str = "plugin.toml";

/// Contributions declared by a plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PluginInfo {
	/// Ex-commands the plugin defines.
	pub commands: Vec<String>,
	/// `<Plug>(name)` mappings the plugin defines, without the wrapper.
	pub mappings: Vec<String>,
	pub colorschemes: Vec<String>,
	/// File-name glob to file type detections the plugin adds.
	pub filetypes: BTreeMap<String, String>,
}

impl PluginInfo {
	/// Adds every name from `other` not already present.
	fn absorb(&mut self, other: PluginInfo) {
		fn extend(into: &mut Vec<String>, from: Vec<String>) {
			for item in from {
				if !into.contains(&item) {
					into.push(item);
				}
			}
		}
		extend(&mut self.commands, other.commands);
		extend(&mut self.mappings, other.mappings);
		extend(&mut self.colorschemes, other.colorschemes);
		for (glob, filetype) in other.filetypes {
			self.filetypes.entry(glob).or_insert(filetype);
		}
	}
}

/// A plugin found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlugin {
	pub name: String,
	/// Runtime directory (after applying `'rtp'`).
	pub path: PathBuf,
	pub info: PluginInfo,
}

/// Locates and reads a declared plugin.
pub trait PluginResolver {
	fn resolve(&self, entry: &PluginEntry) -> Result<ResolvedPlugin, PluginError>;
}

impl<F> PluginResolver for F
where
	F: Fn(&PluginEntry) -> Result<ResolvedPlugin, PluginError>,
{
	fn resolve(&self, entry: &PluginEntry) -> Result<ResolvedPlugin, PluginError> {
		self(entry)
	}
}

/// Resolves plugins installed as `<root>/<name>`.
///
/// Local plugins are read from their own path. Contributions come from
/// [`MANIFEST_FILE`] when present, plus any `colors/*.vim` scheme files.
#[derive(Debug, Clone)]
pub struct DirResolver {
	root: PathBuf,
}

impl DirResolver {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Install location of `entry`.
	pub fn install_dir(&self, entry: &PluginEntry) -> PathBuf {
		match &entry.source {
			PluginSource::Local(path) => path.clone(),
			_ => self.root.join(entry.name()),
		}
	}
}

impl PluginResolver for DirResolver {
	fn resolve(&self, entry: &PluginEntry) -> Result<ResolvedPlugin, PluginError> {
		let name = entry.name();
		let base = self.install_dir(entry);
		if !base.is_dir() {
			return Err(PluginError::NotInstalled { name, path: base });
		}

		let path = match &entry.options.rtp {
			Some(sub) => base.join(sub),
			None => base,
		};
		if !path.is_dir() {
			return Err(PluginError::NotInstalled { name, path });
		}

		let mut info = read_info(&name, &path.join(MANIFEST_FILE))?;
		info.absorb(PluginInfo {
			colorschemes: scan_colors(&name, &path.join("colors"))?,
			..PluginInfo::default()
		});

		Ok(ResolvedPlugin { name, path, info })
	}
}

fn read_info(name: &str, file: &Path) -> Result<PluginInfo, PluginError> {
	let text = match fs::read_to_string(file) {
		Ok(text) => text,
		Err(e) if e.kind() == ErrorKind::NotFound => return Ok(PluginInfo::default()),
		Err(e) => {
			return Err(PluginError::Io {
				name: name.to_string(),
				message: e.to_string(),
			});
		}
	};

	toml::from_str(&text).map_err(|e| PluginError::Manifest {
		name: name.to_string(),
		message: e.message().to_string(),
	})
}

fn scan_colors(name: &str, dir: &Path) -> Result<Vec<String>, PluginError> {
	let entries = match fs::read_dir(dir) {
		Ok(entries) => entries,
		Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
		Err(e) => {
			return Err(PluginError::Io {
				name: name.to_string(),
				message: e.to_string(),
			});
		}
	};

	let mut schemes: Vec<String> = entries
		.filter_map(Result::ok)
		.map(|e| e.path())
		.filter(|p| p.extension().is_some_and(|ext| ext == "vim"))
		.filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
		.collect();
	schemes.sort();
	Ok(schemes)
}

/// Outcome of resolving every entry of a [`Manifest`].
#[derive(Debug, Clone, Default)]
pub struct ManifestReport {
	/// Resolved plugins in declaration order.
	pub loaded: Vec<(PluginEntry, ResolvedPlugin)>,
	/// Entries that failed, in declaration order.
	pub failed: Vec<(PluginEntry, PluginError)>,
}

impl ManifestReport {
	pub fn is_loaded(&self, name: &str) -> bool {
		self.loaded.iter().any(|(_, p)| p.name == name)
	}

	pub fn failure(&self, name: &str) -> Option<&PluginError> {
		self.failed.iter().find(|(e, _)| e.name() == name).map(|(_, err)| err)
	}

	/// Appends the results of a later manifest block.
	pub fn extend(&mut self, other: ManifestReport) {
		self.loaded.extend(other.loaded);
		self.failed.extend(other.failed);
	}
}

/// Resolves each entry independently; failures are collected, not propagated.
pub fn resolve_manifest(manifest: &Manifest, resolver: &dyn PluginResolver) -> ManifestReport {
	let mut report = ManifestReport::default();
	for entry in manifest.entries() {
		match resolver.resolve(entry) {
			Ok(plugin) => {
				tracing::debug!(domain = "plugins", plugin = %plugin.name, path = %plugin.path.display(), "plugin resolved");
				report.loaded.push((entry.clone(), plugin));
			}
			Err(error) => {
				tracing::warn!(domain = "plugins", plugin = %entry.name(), %error, "plugin failed to resolve");
				report.failed.push((entry.clone(), error));
			}
		}
	}
	report
}
