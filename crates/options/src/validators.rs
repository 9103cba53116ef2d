//! Standard validators for option values.

use crate::OptionValue;

/// Validates that an integer is positive (>= 1).
pub fn positive_int(value: &OptionValue) -> Result<(), String> {
	match value {
		OptionValue::Int(n) if *n >= 1 => Ok(()),
		OptionValue::Int(n) => Err(format!("must be at least 1, got {n}")),
		_ => Err("expected integer".to_string()),
	}
}

/// Validates that an integer is zero or more.
pub fn non_negative_int(value: &OptionValue) -> Result<(), String> {
	match value {
		OptionValue::Int(n) if *n >= 0 => Ok(()),
		OptionValue::Int(n) => Err(format!("must not be negative, got {n}")),
		_ => Err("expected integer".to_string()),
	}
}

/// Validates `laststatus`, which only knows 0, 1 and 2.
pub fn status_mode(value: &OptionValue) -> Result<(), String> {
	match value {
		OptionValue::Int(0..=2) => Ok(()),
		OptionValue::Int(n) => Err(format!("must be 0, 1 or 2, got {n}")),
		_ => Err("expected integer".to_string()),
	}
}

/// Validates timeouts where -1 means "use the related option".
pub fn timeout_or_inherit(value: &OptionValue) -> Result<(), String> {
	match value {
		OptionValue::Int(n) if *n >= -1 => Ok(()),
		OptionValue::Int(n) => Err(format!("must be -1 or more, got {n}")),
		_ => Err("expected integer".to_string()),
	}
}
