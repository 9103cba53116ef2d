//! Layered option resolution.
//!
//! # Resolution Order
//!
//! 1. Buffer-local values (`setlocal` while a buffer is active)
//! 2. File-type overrides (`autocmd FileType python setlocal ...`)
//! 3. Global values (top-level `set`)
//! 4. Host default from the [`OptionsRegistry`]

use crate::{OptionId, OptionStore, OptionValue, OptionsRegistry};

/// Resolves option values through a layered hierarchy.
///
/// The resolver is cheap and created per resolution; it only borrows the
/// stores it chains.
pub struct OptionResolver<'a> {
	registry: &'a OptionsRegistry,
	buffer_local: Option<&'a OptionStore>,
	filetype: Option<&'a OptionStore>,
	global: Option<&'a OptionStore>,
}

impl<'a> OptionResolver<'a> {
	/// Creates a resolver that only knows the registry defaults.
	pub fn new(registry: &'a OptionsRegistry) -> Self {
		Self {
			registry,
			buffer_local: None,
			filetype: None,
			global: None,
		}
	}

	/// Adds a buffer-local store (highest priority).
	pub fn with_buffer(mut self, store: &'a OptionStore) -> Self {
		self.buffer_local = Some(store);
		self
	}

	/// Adds a file-type store, overriding global values.
	pub fn with_filetype(mut self, store: &'a OptionStore) -> Self {
		self.filetype = Some(store);
		self
	}

	/// Adds the global store.
	pub fn with_global(mut self, store: &'a OptionStore) -> Self {
		self.global = Some(store);
		self
	}

	pub fn registry(&self) -> &'a OptionsRegistry {
		self.registry
	}

	/// Resolves `id`: buffer -> filetype -> global -> default.
	pub fn resolve(&self, id: OptionId) -> OptionValue {
		[self.buffer_local, self.filetype, self.global]
			.into_iter()
			.flatten()
			.find_map(|store| store.get(id))
			.cloned()
			.unwrap_or_else(|| self.registry.default_value(id))
	}

	/// Resolves by option name or alias; `None` for unknown names.
	pub fn resolve_name(&self, name: &str) -> Option<OptionValue> {
		self.registry.get(name).map(|id| self.resolve(id))
	}

	/// Resolves an integer option, falling back to the default on a type mismatch.
	pub fn resolve_int(&self, id: OptionId) -> i64 {
		let resolved = self.resolve(id);
		if let Some(v) = resolved.as_int() {
			return v;
		}
		self.mismatch(id, "int", &resolved);
		self.registry.default_value(id).as_int().unwrap_or_default()
	}

	/// Resolves a boolean option, falling back to the default on a type mismatch.
	pub fn resolve_bool(&self, id: OptionId) -> bool {
		let resolved = self.resolve(id);
		if let Some(v) = resolved.as_bool() {
			return v;
		}
		self.mismatch(id, "bool", &resolved);
		self.registry.default_value(id).as_bool().unwrap_or_default()
	}

	/// Resolves a string or enum option, falling back to the default on a type mismatch.
	pub fn resolve_string(&self, id: OptionId) -> String {
		let resolved = self.resolve(id);
		if let Some(v) = resolved.as_str() {
			return v.to_string();
		}
		self.mismatch(id, "string", &resolved);
		self.registry.default_value(id).as_str().map(str::to_string).unwrap_or_default()
	}

	/// All options with their resolved values, in registry order.
	pub fn snapshot(&self) -> Vec<(&'static str, OptionValue)> {
		self.registry.iter().map(|(id, def)| (def.name, self.resolve(id))).collect()
	}

	fn mismatch(&self, id: OptionId, expected: &'static str, got: &OptionValue) {
		tracing::warn!(
			domain = "options",
			name = self.registry.def(id).name,
			expected,
			got = got.type_name(),
			"option type mismatch; falling back to default",
		);
	}
}
