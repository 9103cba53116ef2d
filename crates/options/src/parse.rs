//! Option assignment syntax and value parsing.
//!
//! Handles the argument forms accepted by `set` and `setlocal`:
//! `name`, `noname`, `name=value`, `name:value`, `name+=flag`, `name-=flag`.

use std::collections::BTreeSet;

use crate::value::split_set;
use crate::{OptionError, OptionId, OptionType, OptionValue, OptionsRegistry};

/// What an assignment does to the option's value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOp {
	/// `name`: switch a boolean on.
	Enable,
	/// `noname`: switch a boolean off.
	Disable,
	/// `name=value`
	Assign(String),
	/// `name+=flags`: set union.
	Add(String),
	/// `name-=flags`: set difference.
	Remove(String),
}

/// One parsed `set` argument, before the name is looked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
	pub name: String,
	pub op: AssignOp,
}

impl Assignment {
	/// Parses a single, already unescaped `set` argument.
	pub fn parse(text: &str) -> Result<Self, OptionError> {
		let name_end = text.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).unwrap_or(text.len());
		let (name, rest) = text.split_at(name_end);
		if name.is_empty() {
			return Err(OptionError::Malformed(text.to_string()));
		}

		let op = if rest.is_empty() {
			AssignOp::Enable
		} else if let Some(v) = rest.strip_prefix("+=") {
			AssignOp::Add(v.to_string())
		} else if let Some(v) = rest.strip_prefix("-=") {
			AssignOp::Remove(v.to_string())
		} else if let Some(v) = rest.strip_prefix('=').or_else(|| rest.strip_prefix(':')) {
			AssignOp::Assign(v.to_string())
		} else if rest == "!" || rest.starts_with("^=") {
			return Err(OptionError::UnsupportedOperator {
				option: name.to_string(),
				op: if rest == "!" { "!" } else { "^=" },
			});
		} else {
			return Err(OptionError::Malformed(text.to_string()));
		};

		Ok(Self { name: name.to_string(), op })
	}

	/// Resolves the option name, turning `noname` into [`AssignOp::Disable`].
	pub fn resolve(&self, registry: &OptionsRegistry) -> Result<(OptionId, AssignOp), OptionError> {
		if let Some(id) = registry.get(&self.name) {
			return Ok((id, self.op.clone()));
		}

		if self.op == AssignOp::Enable {
			if let Some(id) = self.name.strip_prefix("no").and_then(|n| registry.get(n)) {
				return Ok((id, AssignOp::Disable));
			}
			if let Some(id) = self.name.strip_prefix("inv").and_then(|n| registry.get(n)) {
				return Err(OptionError::UnsupportedOperator {
					option: registry.def(id).name.to_string(),
					op: "inv",
				});
			}
		}

		registry.lookup(&self.name).map(|id| (id, self.op.clone()))
	}
}

/// Computes the value an assignment produces, given the option's current value.
///
/// The result is validated against the definition. Every operator is
/// idempotent: applying the same assignment twice yields the same value.
pub fn apply(registry: &OptionsRegistry, id: OptionId, op: &AssignOp, current: &OptionValue) -> Result<OptionValue, OptionError> {
	let def = registry.def(id);
	let invalid = |reason: String| OptionError::InvalidValue {
		option: def.name.to_string(),
		reason,
	};

	let value = match (op, def.value_type, current) {
		(AssignOp::Enable, OptionType::Bool, _) => OptionValue::Bool(true),
		(AssignOp::Disable, OptionType::Bool, _) => OptionValue::Bool(false),
		(AssignOp::Enable | AssignOp::Disable, _, _) => return Err(OptionError::NotBoolean(def.name.to_string())),
		(AssignOp::Assign(text), ty, _) => parse_value_for_type(text, ty).map_err(invalid)?,
		(AssignOp::Add(text), OptionType::Set(_), OptionValue::Set(cur)) => OptionValue::Set(cur.union(&split_set(text)).cloned().collect()),
		(AssignOp::Remove(text), OptionType::Set(_), OptionValue::Set(cur)) => {
			OptionValue::Set(cur.difference(&split_set(text)).cloned().collect())
		}
		(AssignOp::Add(text), OptionType::Flags(_), OptionValue::Flags(cur)) => OptionValue::Flags(cur.union(&flag_chars(text)).copied().collect()),
		(AssignOp::Remove(text), OptionType::Flags(_), OptionValue::Flags(cur)) => {
			OptionValue::Flags(cur.difference(&flag_chars(text)).copied().collect())
		}
		(AssignOp::Add(_), _, _) => {
			return Err(OptionError::UnsupportedOperator {
				option: def.name.to_string(),
				op: "+=",
			});
		}
		(AssignOp::Remove(_), _, _) => {
			return Err(OptionError::UnsupportedOperator {
				option: def.name.to_string(),
				op: "-=",
			});
		}
	};

	registry.validate(id, &value)?;
	Ok(value)
}

/// Parses a string value into an [`OptionValue`] for a known type.
pub fn parse_value_for_type(value: &str, ty: OptionType) -> Result<OptionValue, String> {
	match ty {
		OptionType::Bool => parse_bool(value).map(OptionValue::Bool),
		OptionType::Int => parse_int(value).map(OptionValue::Int),
		OptionType::String | OptionType::Enum(_) => Ok(OptionValue::String(value.to_string())),
		OptionType::Set(_) => Ok(OptionValue::Set(split_set(value))),
		OptionType::Flags(_) => Ok(OptionValue::Flags(flag_chars(value))),
	}
}

/// Parses a boolean value from common string representations.
pub fn parse_bool(value: &str) -> Result<bool, String> {
	match value.to_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		_ => Err(format!("invalid boolean: '{value}' (expected true/false, yes/no, on/off, 1/0)")),
	}
}

/// Parses an integer value.
pub fn parse_int(value: &str) -> Result<i64, String> {
	value.trim().parse::<i64>().map_err(|_| format!("invalid integer: '{value}'"))
}

fn flag_chars(value: &str) -> BTreeSet<char> {
	value.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests;
