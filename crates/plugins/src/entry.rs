use std::path::PathBuf;

use crate::PluginError;

/// Where a plugin comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginSource {
	/// `owner/repo` shorthand for a GitHub repository.
	GitHub { owner: String, repo: String },
	/// Any other git URL (`https://...`, `git@host:path`).
	Git(String),
	/// An unmanaged local directory.
	Local(PathBuf),
}

impl PluginSource {
	/// Parses a `Plug` locator.
	pub fn parse(locator: &str) -> Result<Self, PluginError> {
		let locator = locator.trim();
		if let Some(rest) = locator.strip_prefix("~/") {
			let home = dirs::home_dir().ok_or_else(|| PluginError::InvalidLocator(locator.to_string()))?;
			return Ok(PluginSource::Local(home.join(rest)));
		}
		if locator.starts_with('/') || locator.starts_with("./") || locator.starts_with("../") {
			return Ok(PluginSource::Local(PathBuf::from(locator)));
		}
		if locator.contains("://") || locator.starts_with("git@") {
			return Ok(PluginSource::Git(locator.to_string()));
		}

		match locator.split_once('/') {
			Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') && !locator.contains(char::is_whitespace) => {
				Ok(PluginSource::GitHub {
					owner: owner.to_string(),
					repo: repo.to_string(),
				})
			}
			_ => Err(PluginError::InvalidLocator(locator.to_string())),
		}
	}

	/// Clone URL, or `None` for local plugins.
	pub fn url(&self) -> Option<String> {
		match self {
			PluginSource::GitHub { owner, repo } => Some(format!("https://github.com/{owner}/{repo}.git")),
			PluginSource::Git(url) => Some(url.clone()),
			PluginSource::Local(_) => None,
		}
	}

	/// Directory name derived from the locator's last segment.
	pub fn default_name(&self) -> String {
		let last = match self {
			PluginSource::GitHub { repo, .. } => repo.as_str(),
			PluginSource::Git(url) => url.trim_end_matches('/').rsplit(['/', ':']).next().unwrap_or(url),
			PluginSource::Local(path) => path.file_name().and_then(|n| n.to_str()).unwrap_or_default(),
		};
		last.strip_suffix(".git").unwrap_or(last).to_string()
	}
}

/// Version pin of a managed plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pin {
	Branch(String),
	Tag(String),
	Commit(String),
}

/// Per-entry options (`Plug 'x', { ... }`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlugOptions {
	pub branch: Option<String>,
	pub tag: Option<String>,
	pub commit: Option<String>,
	/// Directory name override (`'as'`).
	pub rename: Option<String>,
	/// Post-install hook (`'do'`), kept opaque.
	pub on_update: Option<String>,
	/// Commands that trigger loading (`'on'`).
	pub on_commands: Vec<String>,
	/// File types that trigger loading (`'for'`).
	pub for_filetypes: Vec<String>,
	/// Subdirectory holding the runtime files (`'rtp'`).
	pub rtp: Option<String>,
	/// Excluded from updates (`'frozen'`).
	pub frozen: bool,
}

/// One declared plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginEntry {
	pub locator: String,
	pub source: PluginSource,
	pub options: PlugOptions,
}

impl PluginEntry {
	pub fn new(locator: &str, options: PlugOptions) -> Result<Self, PluginError> {
		Ok(Self {
			locator: locator.trim().to_string(),
			source: PluginSource::parse(locator)?,
			options,
		})
	}

	/// Installed directory name: `'as'` if given, else derived from the locator.
	pub fn name(&self) -> String {
		self.options.rename.clone().unwrap_or_else(|| self.source.default_name())
	}

	/// Effective pin; a commit beats a tag beats a branch.
	pub fn pin(&self) -> Option<Pin> {
		let o = &self.options;
		o.commit
			.clone()
			.map(Pin::Commit)
			.or_else(|| o.tag.clone().map(Pin::Tag))
			.or_else(|| o.branch.clone().map(Pin::Branch))
	}

	/// Loaded on demand rather than at startup.
	pub fn is_lazy(&self) -> bool {
		!self.options.on_commands.is_empty() || !self.options.for_filetypes.is_empty()
	}
}

/// Ordered plugin declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
	/// Install directory given to `plug#begin`, if any.
	pub dir: Option<PathBuf>,
	entries: Vec<PluginEntry>,
}

impl Manifest {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends an entry. Redeclaring a name replaces the earlier entry in its original position.
	pub fn push(&mut self, entry: PluginEntry) {
		let name = entry.name();
		match self.entries.iter_mut().find(|e| e.name() == name) {
			Some(existing) => *existing = entry,
			None => self.entries.push(entry),
		}
	}

	pub fn entries(&self) -> &[PluginEntry] {
		&self.entries
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn parses_locators() {
		assert_eq!(
			PluginSource::parse("junegunn/fzf.vim").unwrap(),
			PluginSource::GitHub {
				owner: "junegunn".into(),
				repo: "fzf.vim".into()
			}
		);
		assert_eq!(
			PluginSource::parse("https://github.com/tpope/vim-fugitive.git").unwrap().default_name(),
			"vim-fugitive"
		);
		assert_eq!(PluginSource::parse("git@github.com:morhetz/gruvbox.git").unwrap().default_name(), "gruvbox");
		assert_eq!(
			PluginSource::parse("/opt/vim/local-plugin").unwrap(),
			PluginSource::Local(PathBuf::from("/opt/vim/local-plugin"))
		);
		assert!(PluginSource::parse("not a locator").is_err());
		assert!(PluginSource::parse("a/b/c").is_err());
	}

	#[test]
	fn github_url_and_name() {
		let entry = PluginEntry::new("vim-airline/vim-airline", PlugOptions::default()).unwrap();
		assert_eq!(entry.source.url().as_deref(), Some("https://github.com/vim-airline/vim-airline.git"));
		assert_eq!(entry.name(), "vim-airline");
		assert!(!entry.is_lazy());
	}

	#[test]
	fn pin_precedence() {
		let options = PlugOptions {
			branch: Some("release".into()),
			tag: Some("v1.0".into()),
			..PlugOptions::default()
		};
		let entry = PluginEntry::new("neoclide/coc.nvim", options).unwrap();
		assert_eq!(entry.pin(), Some(Pin::Tag("v1.0".into())));
	}

	#[test]
	fn rename_and_redeclaration() {
		let mut manifest = Manifest::new();
		manifest.push(PluginEntry::new("dracula/vim", PlugOptions {
			rename: Some("dracula".into()),
			..PlugOptions::default()
		})
		.unwrap());
		manifest.push(PluginEntry::new("tpope/vim-surround", PlugOptions::default()).unwrap());
		manifest.push(PluginEntry::new("dracula/vim", PlugOptions {
			rename: Some("dracula".into()),
			frozen: true,
			..PlugOptions::default()
		})
		.unwrap());

		assert_eq!(manifest.len(), 2);
		assert_eq!(manifest.entries()[0].name(), "dracula");
		assert!(manifest.entries()[0].options.frozen);
	}
}
