//! Lookup table over option definitions.

use rustc_hash::FxHashMap;

use crate::{BUILTINS, OptionDef, OptionError, OptionValue};

/// Dense index of an option inside its [`OptionsRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(u32);

impl OptionId {
	pub fn from_u32(id: u32) -> Self {
		Self(id)
	}

	pub fn as_u32(self) -> u32 {
		self.0
	}
}

/// The set of options the host recognizes, with their defaults.
#[derive(Debug, Clone)]
pub struct OptionsRegistry {
	defs: Vec<OptionDef>,
	by_name: FxHashMap<&'static str, OptionId>,
}

impl OptionsRegistry {
	/// Builds a registry over `defs`. Later definitions shadow earlier names.
	pub fn new(defs: impl IntoIterator<Item = OptionDef>) -> Self {
		let mut registry = Self {
			defs: Vec::new(),
			by_name: FxHashMap::default(),
		};
		for def in defs {
			let id = OptionId(registry.defs.len() as u32);
			registry.by_name.insert(def.name, id);
			if let Some(alias) = def.alias {
				registry.by_name.insert(alias, id);
			}
			registry.defs.push(def);
		}
		registry
	}

	/// Registry over the built-in option table.
	pub fn builtin() -> Self {
		Self::new(BUILTINS.iter().copied())
	}

	/// Looks an option up by long name or alias.
	pub fn get(&self, name: &str) -> Option<OptionId> {
		self.by_name.get(name).copied()
	}

	/// Like [`get`](Self::get), but reports unknown names with a suggestion.
	pub fn lookup(&self, name: &str) -> Result<OptionId, OptionError> {
		self.get(name).ok_or_else(|| OptionError::UnknownOption {
			name: name.to_string(),
			suggestion: self.suggest(name),
		})
	}

	/// Definition for `id`.
	///
	/// # Panics
	///
	/// Panics if `id` came from a different registry.
	pub fn def(&self, id: OptionId) -> &OptionDef {
		&self.defs[id.0 as usize]
	}

	/// Default value for `id`.
	pub fn default_value(&self, id: OptionId) -> OptionValue {
		self.def(id).default_value()
	}

	/// Iterates definitions in registration order.
	pub fn iter(&self) -> impl Iterator<Item = (OptionId, &OptionDef)> {
		self.defs.iter().enumerate().map(|(i, def)| (OptionId(i as u32), def))
	}

	pub fn len(&self) -> usize {
		self.defs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.defs.is_empty()
	}

	/// Checks type, membership and validator for a value bound to `id`.
	pub fn validate(&self, id: OptionId, value: &OptionValue) -> Result<(), OptionError> {
		let def = self.def(id);
		if !value.matches_type(def.value_type) {
			return Err(if value.same_kind(def.value_type) {
				OptionError::InvalidValue {
					option: def.name.to_string(),
					reason: format!("'{value}' is not one of the allowed values"),
				}
			} else {
				OptionError::TypeMismatch {
					option: def.name.to_string(),
					expected: def.value_type.name(),
					got: value.type_name(),
				}
			});
		}
		if let Some(validator) = def.validator {
			validator(value).map_err(|reason| OptionError::InvalidValue {
				option: def.name.to_string(),
				reason,
			})?;
		}
		Ok(())
	}

	/// Suggests a similar option name using fuzzy matching.
	pub fn suggest(&self, name: &str) -> Option<String> {
		self.by_name
			.keys()
			.map(|k| (strsim::levenshtein(name, k), *k))
			.filter(|(distance, _)| *distance <= 2)
			.min()
			.map(|(_, k)| self.def(self.by_name[k]).name.to_string())
	}
}

impl Default for OptionsRegistry {
	fn default() -> Self {
		Self::builtin()
	}
}
