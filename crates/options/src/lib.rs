//! Option registry for rcload.
//!
//! Options are defined once by the host ([`BUILTINS`]) and looked up through
//! an [`OptionsRegistry`]. Values live in [`OptionStore`] layers (global,
//! per file type, per buffer) that an [`OptionResolver`] chains together.
//! Within one layer the last write wins.

mod builtins;
mod def;
pub mod parse;
mod registry;
mod resolver;
mod store;
mod validators;
mod value;

pub use builtins::{BUILTINS, keys};
pub use def::{OptionDef, OptionScope, OptionValidator};
pub use parse::{AssignOp, Assignment};
pub use registry::{OptionId, OptionsRegistry};
pub use resolver::OptionResolver;
pub use store::OptionStore;
pub use value::{OptionDefault, OptionType, OptionValue};

/// Errors raised while looking up, parsing or validating option values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
	#[error("unknown option: {name}{}", suggestion.as_ref().map(|s| format!(" (did you mean '{s}'?)")).unwrap_or_default())]
	UnknownOption {
		name: String,
		suggestion: Option<String>,
	},

	#[error("type mismatch for option '{option}': expected {expected}, got {got}")]
	TypeMismatch {
		option: String,
		expected: &'static str,
		got: &'static str,
	},

	#[error("invalid value for option '{option}': {reason}")]
	InvalidValue { option: String, reason: String },

	#[error("option '{0}' is not a boolean and needs a value")]
	NotBoolean(String),

	#[error("operator '{op}' is not supported for option '{option}'")]
	UnsupportedOperator { option: String, op: &'static str },

	#[error("malformed option argument: '{0}'")]
	Malformed(String),
}
