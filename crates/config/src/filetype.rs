//! File-type detection and deferred rules.
//!
//! A [`FileTypeRule`] comes from an `autocmd` line. Rules are stored in
//! script order and only run when a buffer with a matching file type or
//! path is activated.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use globset::{Glob, GlobSet, GlobSetBuilder};
use rcload_options::{AssignOp, OptionId};

/// Autocommand events understood by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
	FileType,
	BufRead,
	BufNewFile,
	BufWritePre,
}

impl Event {
	pub fn name(self) -> &'static str {
		match self {
			Event::FileType => "FileType",
			Event::BufRead => "BufRead",
			Event::BufNewFile => "BufNewFile",
			Event::BufWritePre => "BufWritePre",
		}
	}

	/// Whether patterns for this event are file-name globs.
	pub fn matches_paths(self) -> bool {
		self != Event::FileType
	}
}

impl fmt::Display for Event {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Event {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"filetype" => Ok(Event::FileType),
			"bufread" | "bufreadpost" => Ok(Event::BufRead),
			"bufnewfile" => Ok(Event::BufNewFile),
			"bufwritepre" | "bufwrite" => Ok(Event::BufWritePre),
			_ => Err(s.to_string()),
		}
	}
}

/// What a rule matches against.
#[derive(Debug, Clone)]
pub enum Patterns {
	/// File-type names; `*` matches any type.
	FileTypes(Vec<String>),
	/// File-name globs, tried against the full path and the file name.
	Globs { raw: Vec<String>, set: GlobSet },
}

impl Patterns {
	pub fn filetypes(names: impl IntoIterator<Item = impl Into<String>>) -> Self {
		Patterns::FileTypes(names.into_iter().map(Into::into).collect())
	}

	pub fn globs(patterns: impl IntoIterator<Item = impl Into<String>>) -> Result<Self, globset::Error> {
		let raw: Vec<String> = patterns.into_iter().map(Into::into).collect();
		let mut builder = GlobSetBuilder::new();
		for pattern in &raw {
			builder.add(Glob::new(pattern)?);
		}
		Ok(Patterns::Globs { raw, set: builder.build()? })
	}

	pub fn matches_filetype(&self, filetype: &str) -> bool {
		match self {
			Patterns::FileTypes(names) => names.iter().any(|n| n == "*" || n == filetype),
			Patterns::Globs { .. } => false,
		}
	}

	pub fn matches_path(&self, path: &Path) -> bool {
		match self {
			Patterns::Globs { set, .. } => set.is_match(path) || path.file_name().is_some_and(|name| set.is_match(name)),
			Patterns::FileTypes(_) => false,
		}
	}

	/// Matches every buffer regardless of path (`*`).
	pub fn is_wildcard(&self) -> bool {
		match self {
			Patterns::FileTypes(names) => names.iter().any(|n| n == "*"),
			Patterns::Globs { raw, .. } => raw.iter().any(|p| p == "*"),
		}
	}
}

impl fmt::Display for Patterns {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Patterns::FileTypes(names) => f.write_str(&names.join(",")),
			Patterns::Globs { raw, .. } => f.write_str(&raw.join(",")),
		}
	}
}

/// Deferred work attached to a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
	/// `setlocal` overrides, already resolved and checked against their defaults.
	Options(Vec<(OptionId, AssignOp)>),
	/// `setfiletype x` or `set filetype=x` in a detection rule.
	SetFiletype(String),
	/// `%s/\s\+$//e`
	TrimTrailingWhitespace,
	/// Any other command, resolved against the command table when it runs.
	Command { name: String, args: String },
	/// `autocmd BufWritePre <buffer> ...` nested in a `FileType` rule.
	OnWrite(Box<RuleAction>),
}

impl RuleAction {
	pub fn describe(&self) -> String {
		match self {
			RuleAction::Options(ops) => format!("{} option override(s)", ops.len()),
			RuleAction::SetFiletype(ft) => format!("setfiletype {ft}"),
			RuleAction::TrimTrailingWhitespace => "trim trailing whitespace".to_string(),
			RuleAction::Command { name, args } if args.is_empty() => format!(":{name}"),
			RuleAction::Command { name, args } => format!(":{name} {args}"),
			RuleAction::OnWrite(inner) => format!("before write: {}", inner.describe()),
		}
	}
}

/// One `autocmd` definition.
#[derive(Debug, Clone)]
pub struct FileTypeRule {
	/// Script line the rule was defined on.
	pub line: usize,
	pub group: Option<String>,
	pub event: Event,
	pub patterns: Patterns,
	pub action: RuleAction,
}

/// Built-in extension and file-name table used when detection is enabled.
const EXTENSIONS: &[(&str, &str)] = &[
	("bash", "sh"),
	("c", "c"),
	("cc", "cpp"),
	("conf", "conf"),
	("cpp", "cpp"),
	("css", "css"),
	("go", "go"),
	("h", "c"),
	("hpp", "cpp"),
	("html", "html"),
	("java", "java"),
	("js", "javascript"),
	("json", "json"),
	("lua", "lua"),
	("markdown", "markdown"),
	("md", "markdown"),
	("py", "python"),
	("rb", "ruby"),
	("rs", "rust"),
	("sh", "sh"),
	("toml", "toml"),
	("ts", "typescript"),
	("txt", "text"),
	("vim", "vim"),
	("yaml", "yaml"),
	("yml", "yaml"),
	("zsh", "zsh"),
];

const FILE_NAMES: &[(&str, &str)] = &[
	(".bashrc", "sh"),
	(".gvimrc", "vim"),
	(".vimrc", "vim"),
	(".zshrc", "zsh"),
	("COMMIT_EDITMSG", "gitcommit"),
	("Dockerfile", "dockerfile"),
	("Makefile", "make"),
	("makefile", "make"),
];

/// Detects a file type from the built-in tables.
pub fn detect_filetype(path: &Path) -> Option<&'static str> {
	let name = path.file_name()?.to_str()?;
	if let Some((_, ft)) = FILE_NAMES.iter().find(|(n, _)| *n == name) {
		return Some(*ft);
	}
	let ext = path.extension()?.to_str()?;
	EXTENSIONS.iter().find(|(e, _)| e.eq_ignore_ascii_case(ext)).map(|(_, ft)| *ft)
}

/// Removes spaces and tabs at the end of every line, keeping line endings.
pub fn trim_trailing_whitespace(text: &str) -> String {
	let mut out = String::with_capacity(text.len());
	for line in text.split_inclusive('\n') {
		let (body, ending) = match line.strip_suffix("\r\n") {
			Some(body) => (body, "\r\n"),
			None => match line.strip_suffix('\n') {
				Some(body) => (body, "\n"),
				None => (line, ""),
			},
		};
		out.push_str(body.trim_end_matches([' ', '\t']));
		out.push_str(ending);
	}
	out
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use pretty_assertions::assert_eq;

	use super::*;

	#[test]
	fn detects_by_extension_and_name() {
		assert_eq!(detect_filetype(Path::new("src/main.rs")), Some("rust"));
		assert_eq!(detect_filetype(Path::new("/tmp/Script.PY")), Some("python"));
		assert_eq!(detect_filetype(Path::new("Makefile")), Some("make"));
		assert_eq!(detect_filetype(Path::new("notes")), None);
	}

	#[test]
	fn glob_patterns_match_name_or_path() {
		let patterns = Patterns::globs(["*.md", "/etc/*.conf"]).unwrap();
		assert!(patterns.matches_path(&PathBuf::from("/home/me/README.md")));
		assert!(patterns.matches_path(&PathBuf::from("/etc/hosts.conf")));
		assert!(!patterns.matches_path(&PathBuf::from("/home/me/main.rs")));
		assert!(!patterns.matches_filetype("markdown"));
	}

	#[test]
	fn filetype_patterns() {
		let patterns = Patterns::filetypes(["python", "go"]);
		assert!(patterns.matches_filetype("go"));
		assert!(!patterns.matches_filetype("c"));
		assert!(Patterns::filetypes(["*"]).matches_filetype("c"));
	}

	#[test]
	fn parses_events() {
		assert_eq!("filetype".parse::<Event>(), Ok(Event::FileType));
		assert_eq!("BufReadPost".parse::<Event>(), Ok(Event::BufRead));
		assert!("CursorHold".parse::<Event>().is_err());
	}

	#[test]
	fn trims_each_line() {
		assert_eq!(trim_trailing_whitespace("a  \nb\t\r\n  c \nd"), "a\nb\r\n  c\nd");
		assert_eq!(trim_trailing_whitespace(""), "");
	}
}
