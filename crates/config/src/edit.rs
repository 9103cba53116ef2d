//! Idempotent edits to an rc file.

use std::path::{Path, PathBuf};

use crate::{ConfigError, Result};

/// An rc file held as lines, each keeping its own line ending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcFile {
	path: PathBuf,
	lines: Vec<String>,
}

impl RcFile {
	/// Reads `path`. A missing file is treated as empty.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let text = match std::fs::read_to_string(&path) {
			Ok(text) => text,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
			Err(e) => return Err(io_error(&path, e)),
		};
		Ok(Self::from_text(path, &text))
	}

	pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
		Self {
			path: path.into(),
			lines: text.split_inclusive('\n').map(str::to_string).collect(),
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn text(&self) -> String {
		self.lines.concat()
	}

	/// Adds `line` unless some existing line already contains it.
	///
	/// With `after_prefix`, the line goes right after the first line starting
	/// with that prefix; otherwise (or when no line has the prefix) it is
	/// appended. Returns whether the file changed.
	pub fn ensure_line_present(&mut self, line: &str, after_prefix: Option<&str>) -> bool {
		let needle = line.trim();
		if self.lines.iter().any(|existing| existing.trim().contains(needle)) {
			tracing::debug!(domain = "edit", path = %self.path.display(), line = needle, "line already present");
			return false;
		}

		let anchor = after_prefix.and_then(|prefix| self.lines.iter().position(|l| l.trim().starts_with(prefix)));
		match anchor {
			Some(idx) => {
				self.terminate(idx);
				self.lines.insert(idx + 1, with_newline(line));
			}
			None => self.append(line),
		}
		true
	}

	/// Replaces every line starting with `prefix` by `new_line`, or appends
	/// `new_line` when none does. Returns whether any line was replaced.
	pub fn replace_line_prefix(&mut self, prefix: &str, new_line: &str) -> bool {
		let mut replaced = false;
		for existing in &mut self.lines {
			if existing.trim().starts_with(prefix) {
				*existing = with_newline(new_line);
				replaced = true;
			}
		}
		if !replaced {
			self.append(new_line);
		}
		replaced
	}

	pub fn save(&self) -> Result<()> {
		std::fs::write(&self.path, self.text()).map_err(|e| io_error(&self.path, e))?;
		tracing::debug!(domain = "edit", path = %self.path.display(), lines = self.lines.len(), "saved");
		Ok(())
	}

	fn append(&mut self, line: &str) {
		if let Some(last) = self.lines.len().checked_sub(1) {
			self.terminate(last);
		}
		self.lines.push(with_newline(line));
	}

	fn terminate(&mut self, idx: usize) {
		if let Some(line) = self.lines.get_mut(idx)
			&& !line.ends_with('\n')
		{
			line.push('\n');
		}
	}
}

fn with_newline(line: &str) -> String {
	if line.ends_with('\n') { line.to_string() } else { format!("{line}\n") }
}

fn io_error(path: &Path, error: std::io::Error) -> ConfigError {
	ConfigError::Io {
		path: path.to_path_buf(),
		message: error.to_string(),
	}
}
