//! Per-mode chord -> action table.

use indexmap::IndexMap;
use rcload_keymap_parser::{Node, display_seq};
use rustc_hash::FxHashMap;

use crate::{Action, CommandTable, InvokeError, Invocation, Mode, TermProfile};


/// A registered binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
	pub action: Action,
	/// `map` (true) versus `noremap` (false).
	pub recursive: bool,
	pub silent: bool,
	/// Declared with `<buffer>`.
	pub buffer_local: bool,
	/// Set when this entry exists only because the terminal encodes the
	/// declared chord differently; holds the declared chord.
	pub alias_of: Option<Vec<Node>>,
}

impl Binding {
	pub fn new(action: Action) -> Self {
		Self {
			action,
			recursive: false,
			silent: false,
			buffer_local: false,
			alias_of: None,
		}
	}

	pub fn recursive(mut self, recursive: bool) -> Self {
		self.recursive = recursive;
		self
	}

	pub fn silent(mut self, silent: bool) -> Self {
		self.silent = silent;
		self
	}

	pub fn buffer_local(mut self, buffer_local: bool) -> Self {
		self.buffer_local = buffer_local;
		self
	}
}

/// Key bindings for every mode.
///
/// Chords are unique per mode: binding an existing chord replaces it in
/// place. Modes are independent; nothing checks for conflicts across them.
#[derive(Debug, Clone, Default)]
pub struct KeyBindingTable {
	modes: FxHashMap<Mode, IndexMap<Vec<Node>, Binding>>,
	profile: TermProfile,
}

impl KeyBindingTable {
	pub fn new(profile: TermProfile) -> Self {
		Self {
			modes: FxHashMap::default(),
			profile,
		}
	}

	pub fn profile(&self) -> &TermProfile {
		&self.profile
	}

	/// Binds `keys` in `mode`, returning the binding it replaced.
	///
	/// Never fails: actions naming external commands are not checked here.
	/// Terminal aliases for the chord are registered alongside it.
	pub fn bind(&mut self, mode: Mode, keys: Vec<Node>, binding: Binding) -> Option<Binding> {
		let aliases = self.profile.aliases(&keys);
		let table = self.modes.entry(mode).or_default();

		table.retain(|_, b| b.alias_of.as_ref() != Some(&keys));
		for alias in aliases {
			let mut aliased = binding.clone();
			aliased.alias_of = Some(keys.clone());
			table.insert(alias, aliased);
		}

		tracing::debug!(domain = "keymap", %mode, keys = %display_seq(&keys), action = %binding.action.describe(), "bind");
		table.insert(keys, binding)
	}

	/// Removes the binding for `keys` and its terminal aliases.
	pub fn unbind(&mut self, mode: Mode, keys: &[Node]) -> Option<Binding> {
		let table = self.modes.get_mut(&mode)?;
		table.retain(|_, b| b.alias_of.as_deref() != Some(keys));
		table.shift_remove(keys)
	}

	pub fn get(&self, mode: Mode, keys: &[Node]) -> Option<&Binding> {
		self.modes.get(&mode)?.get(keys)
	}

	/// Declared bindings of `mode` in registration order, without terminal aliases.
	pub fn bindings(&self, mode: Mode) -> impl Iterator<Item = (&[Node], &Binding)> {
		self.modes
			.get(&mode)
			.into_iter()
			.flat_map(|table| table.iter())
			.filter(|(_, b)| b.alias_of.is_none())
			.map(|(k, b)| (k.as_slice(), b))
	}

	/// Number of declared bindings in `mode`.
	pub fn len(&self, mode: Mode) -> usize {
		self.bindings(mode).count()
	}

	pub fn is_empty(&self) -> bool {
		self.modes.values().all(IndexMap::is_empty)
	}

	/// Resolves the binding for `keys` against `commands`.
	///
	/// This is the only place external names are looked up, so a missing
	/// plugin surfaces here as [`InvokeError::CommandNotFound`].
	pub fn invoke(&self, mode: Mode, keys: &[Node], commands: &CommandTable) -> Result<Invocation, InvokeError> {
		let binding = self.get(mode, keys).ok_or_else(|| InvokeError::Unbound {
			mode,
			keys: display_seq(keys),
		})?;

		match &binding.action {
			Action::Keys(keys) => Ok(Invocation::Keys {
				keys: keys.clone(),
				recursive: binding.recursive,
			}),
			Action::Builtin { name, args } | Action::External { name, args } => {
				let provider = commands.command(name).ok_or_else(|| InvokeError::CommandNotFound(name.clone()))?;
				Ok(Invocation::Command {
					name: name.clone(),
					args: args.clone(),
					provider: provider.clone(),
				})
			}
			Action::Plug(name) => {
				let provider = commands.mapping(name).ok_or_else(|| InvokeError::MappingNotFound(name.clone()))?;
				Ok(Invocation::Plug {
					name: name.clone(),
					provider: provider.clone(),
				})
			}
		}
	}
}
