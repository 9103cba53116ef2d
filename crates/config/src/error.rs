//! Error and diagnostic types for script evaluation.

use std::fmt;
use std::path::PathBuf;

use rcload_keymap::InvokeError;
use rcload_keymap::parser::ParseError;
use rcload_options::OptionError;
use rcload_plugins::PluginError;
use thiserror::Error;

/// Everything that can go wrong while loading a script.
///
/// Only [`ConfigError::Io`] aborts a load; every other variant is recorded
/// as a [`Diagnostic`] and evaluation moves on to the next statement.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
	/// Error reading the script itself.
	#[error("I/O error reading {}: {message}", path.display())]
	Io { path: PathBuf, message: String },

	#[error(transparent)]
	Option(#[from] OptionError),

	/// A global-only option used where only file-type options apply.
	#[error("option '{0}' is global-only and is ignored in a file-type context")]
	ScopeMismatch(String),

	#[error("not an editor command: {0}")]
	UnknownCommand(String),

	#[error("malformed {what}: {reason}")]
	Syntax { what: &'static str, reason: String },

	#[error("invalid key sequence '{keys}': {error}")]
	Chord { keys: String, error: ParseError },

	#[error("no mapping for '{0}'")]
	NoSuchMapping(String),

	#[error("cannot find color scheme '{0}'")]
	UnknownColorscheme(String),

	#[error("'Plug' used outside of a plug#begin()/plug#end() block")]
	PlugOutsideBlock,

	#[error(transparent)]
	Plugin(#[from] PluginError),

	#[error("unknown autocommand event '{0}'")]
	UnknownEvent(String),

	#[error("invalid condition: {0}")]
	Condition(String),

	#[error("{0}")]
	Unbalanced(&'static str),

	#[error("function definitions are not evaluated; skipped '{0}'")]
	FunctionSkipped(String),

	#[error(transparent)]
	Invoke(#[from] InvokeError),
}

impl ConfigError {
	pub(crate) fn syntax(what: &'static str, reason: impl Into<String>) -> Self {
		Self::Syntax {
			what,
			reason: reason.into(),
		}
	}

	/// Severity this error is reported with.
	pub fn severity(&self) -> Severity {
		match self {
			ConfigError::ScopeMismatch(_) | ConfigError::Plugin(_) | ConfigError::Unbalanced(_) | ConfigError::FunctionSkipped(_) => {
				Severity::Warning
			}
			_ => Severity::Error,
		}
	}
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
	Warning,
	Error,
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Severity::Warning => "warning",
			Severity::Error => "error",
		})
	}
}

/// A non-fatal problem tied to a script line (1-based).
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
	pub line: usize,
	pub severity: Severity,
	pub error: ConfigError,
}

impl Diagnostic {
	pub fn new(line: usize, error: impl Into<ConfigError>) -> Self {
		let error = error.into();
		Self {
			line,
			severity: error.severity(),
			error,
		}
	}

	pub fn is_error(&self) -> bool {
		self.severity == Severity::Error
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "line {}: {}: {}", self.line, self.severity, self.error)
	}
}
