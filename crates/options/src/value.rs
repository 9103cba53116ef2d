use std::collections::BTreeSet;
use std::fmt;

/// Declared type of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
	Bool,
	Int,
	String,
	/// One value out of a fixed list.
	Enum(&'static [&'static str]),
	/// Comma-separated set of flags. An empty list accepts any flag.
	Set(&'static [&'static str]),
	/// Single-character flags written together (`mouse=nvi`).
	Flags(&'static str),
}

impl OptionType {
	/// Human-readable type name used in diagnostics.
	pub fn name(&self) -> &'static str {
		match self {
			OptionType::Bool => "bool",
			OptionType::Int => "int",
			OptionType::String => "string",
			OptionType::Enum(_) => "enum",
			OptionType::Set(_) => "set",
			OptionType::Flags(_) => "flags",
		}
	}
}

/// A concrete option value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
	Bool(bool),
	Int(i64),
	/// String or enum value.
	String(String),
	Set(BTreeSet<String>),
	Flags(BTreeSet<char>),
}

impl OptionValue {
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			OptionValue::Bool(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			OptionValue::Int(v) => Some(*v),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			OptionValue::String(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_set(&self) -> Option<&BTreeSet<String>> {
		match self {
			OptionValue::Set(v) => Some(v),
			_ => None,
		}
	}

	pub fn as_flags(&self) -> Option<&BTreeSet<char>> {
		match self {
			OptionValue::Flags(v) => Some(v),
			_ => None,
		}
	}

	/// Name of the value's runtime type.
	pub fn type_name(&self) -> &'static str {
		match self {
			OptionValue::Bool(_) => "bool",
			OptionValue::Int(_) => "int",
			OptionValue::String(_) => "string",
			OptionValue::Set(_) => "set",
			OptionValue::Flags(_) => "flags",
		}
	}

	/// Returns `true` if the value has the right shape for `ty`, ignoring allowed-value lists.
	pub fn same_kind(&self, ty: OptionType) -> bool {
		matches!(
			(self, ty),
			(OptionValue::Bool(_), OptionType::Bool)
				| (OptionValue::Int(_), OptionType::Int)
				| (OptionValue::String(_), OptionType::String | OptionType::Enum(_))
				| (OptionValue::Set(_), OptionType::Set(_))
				| (OptionValue::Flags(_), OptionType::Flags(_))
		)
	}

	/// Returns `true` if this value is acceptable for `ty`, including enum membership.
	pub fn matches_type(&self, ty: OptionType) -> bool {
		match (self, ty) {
			(OptionValue::Bool(_), OptionType::Bool) => true,
			(OptionValue::Int(_), OptionType::Int) => true,
			(OptionValue::String(_), OptionType::String) => true,
			(OptionValue::String(v), OptionType::Enum(allowed)) => allowed.contains(&v.as_str()),
			(OptionValue::Set(v), OptionType::Set(allowed)) => allowed.is_empty() || v.iter().all(|f| allowed.contains(&f.as_str())),
			(OptionValue::Flags(v), OptionType::Flags(allowed)) => v.iter().all(|c| allowed.contains(*c)),
			_ => false,
		}
	}
}

/// Renders the value the way it would be written after `=` in a script.
impl fmt::Display for OptionValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OptionValue::Bool(v) => write!(f, "{v}"),
			OptionValue::Int(v) => write!(f, "{v}"),
			OptionValue::String(v) => f.write_str(v),
			OptionValue::Set(v) => f.write_str(&v.iter().map(String::as_str).collect::<Vec<_>>().join(",")),
			OptionValue::Flags(v) => f.write_str(&v.iter().collect::<String>()),
		}
	}
}

/// Compile-time default of a built-in option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionDefault {
	Bool(bool),
	Int(i64),
	/// Textual default for string, enum, set and flags options.
	Text(&'static str),
}

impl OptionDefault {
	/// Materializes the default as a value of type `ty`.
	pub fn to_value(self, ty: OptionType) -> OptionValue {
		match (self, ty) {
			(OptionDefault::Bool(v), _) => OptionValue::Bool(v),
			(OptionDefault::Int(v), _) => OptionValue::Int(v),
			(OptionDefault::Text(v), OptionType::Set(_)) => OptionValue::Set(split_set(v)),
			(OptionDefault::Text(v), OptionType::Flags(_)) => OptionValue::Flags(v.chars().collect()),
			(OptionDefault::Text(v), _) => OptionValue::String(v.to_string()),
		}
	}
}

/// Splits a comma-separated flag list, dropping empty items.
pub fn split_set(value: &str) -> BTreeSet<String> {
	value
		.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(str::to_string)
		.collect()
}
