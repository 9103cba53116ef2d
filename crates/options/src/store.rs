//! Runtime storage for option values.
//!
//! An [`OptionStore`] holds one layer of values: the global layer, one
//! file type's overrides, or a buffer's local values. Layers are combined by
//! the [`OptionResolver`](crate::OptionResolver).

use crate::{OptionError, OptionId, OptionValue, OptionsRegistry};

/// Option values indexed by dense [`OptionId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionStore {
	values: Vec<Option<OptionValue>>,
}

impl OptionStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a store sized for the given registry.
	pub fn with_capacity(reg: &OptionsRegistry) -> Self {
		Self { values: vec![None; reg.len()] }
	}

	fn ensure_len(&mut self, id: OptionId) {
		let idx = id.as_u32() as usize;
		if idx >= self.values.len() {
			self.values.resize_with(idx + 1, || None);
		}
	}

	/// Sets a value, replacing any earlier one.
	pub fn set(&mut self, id: OptionId, value: OptionValue) {
		self.ensure_len(id);
		self.values[id.as_u32() as usize] = Some(value);
	}

	/// Validates and sets a value by option name.
	pub fn set_by_name(&mut self, reg: &OptionsRegistry, name: &str, value: OptionValue) -> Result<(), OptionError> {
		let id = reg.lookup(name)?;
		reg.validate(id, &value)?;
		self.set(id, value);
		Ok(())
	}

	/// Gets a value, returning `None` if this layer does not set it.
	pub fn get(&self, id: OptionId) -> Option<&OptionValue> {
		self.values.get(id.as_u32() as usize)?.as_ref()
	}

	pub fn get_int(&self, id: OptionId) -> Option<i64> {
		self.get(id).and_then(|v| v.as_int())
	}

	pub fn get_bool(&self, id: OptionId) -> Option<bool> {
		self.get(id).and_then(|v| v.as_bool())
	}

	pub fn get_string(&self, id: OptionId) -> Option<&str> {
		self.get(id).and_then(|v| v.as_str())
	}

	pub fn remove(&mut self, id: OptionId) -> Option<OptionValue> {
		self.values.get_mut(id.as_u32() as usize)?.take()
	}

	/// Merges another store into this one; values in `other` win.
	pub fn merge(&mut self, other: &OptionStore) {
		if other.values.len() > self.values.len() {
			self.values.resize_with(other.values.len(), || None);
		}
		for (i, v) in other.values.iter().enumerate() {
			if let Some(v) = v {
				self.values[i] = Some(v.clone());
			}
		}
	}

	/// Number of options set in this store.
	pub fn len(&self) -> usize {
		self.values.iter().filter(|v| v.is_some()).count()
	}

	pub fn is_empty(&self) -> bool {
		self.values.iter().all(|v| v.is_none())
	}

	/// Iterates over all set values.
	pub fn iter(&self) -> impl Iterator<Item = (OptionId, &OptionValue)> {
		self.values
			.iter()
			.enumerate()
			.filter_map(|(i, v)| v.as_ref().map(|val| (OptionId::from_u32(i as u32), val)))
	}
}
