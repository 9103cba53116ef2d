//! Key binding table for rcload.
//!
//! Provides:
//! - per-mode chord -> [`Action`] bindings with replace-on-rebind semantics
//! - a [`CommandTable`] of command providers, consulted only at invocation
//! - [`TermProfile`] key-code adjustments for terminals that encode chords differently

mod commands;
mod invocation;
mod mode;
mod table;
mod term;

pub use commands::{CommandTable, HOST_COMMANDS, PLUG_COMMANDS, Provider};
pub use invocation::{Action, Invocation};
pub use mode::Mode;
pub use rcload_keymap_parser as parser;
pub use table::{Binding, KeyBindingTable};
pub use term::{TermKind, TermProfile};

/// Errors surfaced when a chord is pressed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
	#[error("no {mode} mapping for '{keys}'")]
	Unbound { mode: Mode, keys: String },

	#[error("not an editor command: {0}")]
	CommandNotFound(String),

	#[error("no plugin provides <Plug>({0})")]
	MappingNotFound(String),
}
