//! Capability table consulted when a binding is invoked.
//!
//! Bindings store command names only; the table answers "who provides this
//! command right now". Plugins add to it as they load, so a binding declared
//! before its plugin still works once the plugin is present.

use std::fmt;

use rustc_hash::FxHashMap;

/// Who supplies a command or mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Provider {
	/// The editor itself.
	Host,
	/// The plugin manager (`PlugInstall`, ...).
	PluginManager,
	/// A loaded plugin, by name.
	Plugin(String),
	/// Placeholder for a lazily loaded plugin (`'on': 'Cmd'`).
	Stub(String),
}

impl fmt::Display for Provider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Provider::Host => f.write_str("host"),
			Provider::PluginManager => f.write_str("plug"),
			Provider::Plugin(name) => f.write_str(name),
			Provider::Stub(name) => write!(f, "{name} (on demand)"),
		}
	}
}

/// Ex-commands built into the host editor.
pub const HOST_COMMANDS: &[&str] = &[
	"b", "bd", "bdelete", "bn", "bnext", "bp", "bprevious", "buffer", "call", "cclose", "cd", "cn", "cnext",
	"colorscheme", "com", "command", "copen", "cp", "cprevious", "e", "echo", "echom", "echomsg", "edit", "exe", "execute",
	"filetype", "g", "global", "h", "help", "hi", "highlight", "lcd", "let", "make", "new",
	"noh", "nohlsearch", "norm", "normal", "on", "only", "packadd", "q", "qa", "qall", "quit", "redo",
	"redraw", "registers", "ru", "runtime", "s", "scriptencoding", "set", "setf", "setfiletype", "setlocal", "sil", "silent", "so",
	"sort", "source", "sp", "split", "substitute", "syntax", "tabclose", "tabn", "tabnew", "tabnext", "tabp", "tabprevious", "term",
	"terminal", "u", "undo", "unlet", "up", "update", "v", "vnew", "vs", "vsplit", "w", "wa", "wall", "wq", "wqa", "x", "xa",
];

/// Commands the plugin manager defines once `plug#begin` has run.
pub const PLUG_COMMANDS: &[&str] = &["PlugInstall", "PlugUpdate", "PlugClean", "PlugStatus", "PlugUpgrade", "PlugDiff", "PlugSnapshot"];

/// Command and `<Plug>` mapping names mapped to their providers.
#[derive(Debug, Clone, Default)]
pub struct CommandTable {
	commands: FxHashMap<String, Provider>,
	mappings: FxHashMap<String, Provider>,
}

impl CommandTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Table seeded with [`HOST_COMMANDS`].
	pub fn with_host_commands() -> Self {
		let mut table = Self::new();
		for name in HOST_COMMANDS {
			table.register_command(*name, Provider::Host);
		}
		table
	}

	/// Adds the plugin manager's commands.
	pub fn register_plugin_manager(&mut self) {
		for name in PLUG_COMMANDS {
			self.register_command(*name, Provider::PluginManager);
		}
	}

	/// Registers a command; the latest registration wins.
	pub fn register_command(&mut self, name: impl Into<String>, provider: Provider) {
		self.commands.insert(name.into(), provider);
	}

	pub fn register_mapping(&mut self, name: impl Into<String>, provider: Provider) {
		self.mappings.insert(name.into(), provider);
	}

	pub fn command(&self, name: &str) -> Option<&Provider> {
		self.commands.get(name)
	}

	pub fn mapping(&self, name: &str) -> Option<&Provider> {
		self.mappings.get(name)
	}

	/// Command names, sorted.
	pub fn command_names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}
}
