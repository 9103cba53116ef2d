//! Tool settings (`rcload.toml`).
//!
//! These configure the tool itself, not the editor: where the startup
//! script lives, where plugins are installed, and how strict the loader is.
//!
//! ```toml
//! [paths]
//! rc = "~/.vimrc"
//! plugin_dir = "~/.vim/plugged"
//!
//! [loader]
//! strict = true
//!
//! [terminal]
//! term = "screen-256color"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Environment variable overriding the settings path.
pub const SETTINGS_ENV: &str = "RCLOAD_CONFIG";

/// Errors that can occur when loading settings.
#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("failed to read {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid settings in {path}: {message}")]
	Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
	pub paths: PathSettings,
	pub loader: LoaderSettings,
	pub terminal: TerminalSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathSettings {
	/// Startup script; `~/.vimrc` when unset.
	pub rc: Option<String>,
	/// Plugin install directory, overriding `plug#begin()`.
	pub plugin_dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderSettings {
	/// Error diagnostics make the run fail.
	pub strict: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TerminalSettings {
	/// Overrides `$TERM`.
	pub term: Option<String>,
}

impl Settings {
	/// `$RCLOAD_CONFIG`, else `<config dir>/rcload/rcload.toml`.
	pub fn default_path() -> Option<PathBuf> {
		if let Some(path) = std::env::var_os(SETTINGS_ENV).filter(|p| !p.is_empty()) {
			return Some(PathBuf::from(path));
		}
		dirs::config_dir().map(|dir| dir.join("rcload").join("rcload.toml"))
	}

	pub fn from_toml(text: &str, path: &Path) -> Result<Self, SettingsError> {
		toml::from_str(text).map_err(|e| SettingsError::Parse {
			path: path.to_path_buf(),
			message: e.message().to_string(),
		})
	}

	pub fn load(path: &Path) -> Result<Self, SettingsError> {
		let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		let settings = Self::from_toml(&text, path)?;
		tracing::debug!(domain = "settings", path = %path.display(), "loaded settings");
		Ok(settings)
	}

	/// Loads the default settings file; a missing file yields the defaults.
	pub fn load_default() -> Result<Self, SettingsError> {
		match Self::default_path() {
			Some(path) if path.exists() => Self::load(&path),
			_ => Ok(Self::default()),
		}
	}

	/// Startup script path with `~` expanded.
	pub fn rc_path(&self) -> PathBuf {
		match &self.paths.rc {
			Some(rc) => expand_home(rc),
			None => expand_home("~/.vimrc"),
		}
	}

	pub fn plugin_dir(&self) -> Option<PathBuf> {
		self.paths.plugin_dir.as_deref().map(expand_home)
	}
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
	let rest = match path {
		"~" => "",
		_ => match path.strip_prefix("~/") {
			Some(rest) => rest,
			None => return PathBuf::from(path),
		},
	};
	match dirs::home_dir() {
		Some(home) if rest.is_empty() => home,
		Some(home) => home.join(rest),
		None => PathBuf::from(path),
	}
}
