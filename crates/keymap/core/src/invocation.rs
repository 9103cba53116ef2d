//! Binding actions and the invocations they resolve to.

use rcload_keymap_parser::{Node, notation_seq};

use crate::commands::Provider;

/// What a binding does, as declared. External names stay unresolved here.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Action {
	/// Feed a key sequence (`nnoremap Y y$`).
	Keys(Vec<Node>),
	/// Run a host ex-command (`:nohlsearch<CR>`).
	Builtin {
		name: String,
		args: Vec<String>,
	},
	/// Run a command exposed by a plugin or the plugin manager (`:NERDTreeToggle<CR>`).
	External {
		name: String,
		args: Vec<String>,
	},
	/// Trigger a `<Plug>(name)` mapping exposed by a plugin.
	Plug(String),
}

impl Action {
	pub fn builtin(name: impl Into<String>, args: Vec<String>) -> Self {
		Self::Builtin { name: name.into(), args }
	}

	pub fn external(name: impl Into<String>, args: Vec<String>) -> Self {
		Self::External { name: name.into(), args }
	}

	/// Short description for listings and logs.
	pub fn describe(&self) -> String {
		match self {
			Self::Keys(keys) => format!("keys:{}", notation_seq(keys)),
			Self::Builtin { name, args } | Self::External { name, args } if args.is_empty() => format!(":{name}"),
			Self::Builtin { name, args } | Self::External { name, args } => format!(":{name} {}", args.join(" ")),
			Self::Plug(name) => format!("<Plug>({name})"),
		}
	}
}

/// A binding resolved against the command table at the moment it is pressed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Invocation {
	/// Feed keys back into the input queue.
	Keys { keys: Vec<Node>, recursive: bool },
	/// Run a command from the given provider.
	Command {
		name: String,
		args: Vec<String>,
		provider: Provider,
	},
	/// Run a plugin mapping.
	Plug { name: String, provider: Provider },
}

impl Invocation {
	/// Short description for tracing/logging.
	pub fn describe(&self) -> String {
		match self {
			Self::Keys { keys, recursive: true } => format!("keys:{}", notation_seq(keys)),
			Self::Keys { keys, recursive: false } => format!("keys(noremap):{}", notation_seq(keys)),
			Self::Command { name, args, provider } if args.is_empty() => format!("cmd:{name} [{provider}]"),
			Self::Command { name, args, provider } => format!("cmd:{name} {} [{provider}]", args.join(" ")),
			Self::Plug { name, provider } => format!("plug:{name} [{provider}]"),
		}
	}
}
