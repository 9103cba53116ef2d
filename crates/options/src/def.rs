use crate::{OptionDefault, OptionType, OptionValue};

pub type OptionValidator = fn(&OptionValue) -> Result<(), String>;

/// Where an option may be overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionScope {
	/// One value for the whole session.
	Global,
	/// Has a global value that file-type rules and buffers may override.
	Local,
}

/// Definition of a configurable option.
#[derive(Clone, Copy)]
pub struct OptionDef {
	/// Long name (`tabstop`).
	pub name: &'static str,
	/// Short alias (`ts`).
	pub alias: Option<&'static str>,
	pub description: &'static str,
	pub value_type: OptionType,
	pub default: OptionDefault,
	pub scope: OptionScope,
	pub validator: Option<OptionValidator>,
}

impl OptionDef {
	/// Default value materialized for this option's type.
	pub fn default_value(&self) -> OptionValue {
		self.default.to_value(self.value_type)
	}

	/// Returns `true` if `name` is this option's long name or alias.
	pub fn is_named(&self, name: &str) -> bool {
		self.name == name || self.alias == Some(name)
	}
}

impl core::fmt::Debug for OptionDef {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("OptionDef")
			.field("name", &self.name)
			.field("alias", &self.alias)
			.field("scope", &self.scope)
			.finish()
	}
}
