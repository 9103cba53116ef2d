use std::fmt;
use std::str::FromStr;

/// Editor modes a binding can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
	Normal,
	Visual,
	OperatorPending,
	Insert,
	CommandLine,
}

impl Mode {
	pub const ALL: [Mode; 5] = [Mode::Normal, Mode::Visual, Mode::OperatorPending, Mode::Insert, Mode::CommandLine];

	pub fn name(self) -> &'static str {
		match self {
			Mode::Normal => "normal",
			Mode::Visual => "visual",
			Mode::OperatorPending => "operator-pending",
			Mode::Insert => "insert",
			Mode::CommandLine => "command-line",
		}
	}

	/// Single-letter prefix used by the map commands (`n`, `v`, `o`, `i`, `c`).
	pub fn letter(self) -> char {
		match self {
			Mode::Normal => 'n',
			Mode::Visual => 'v',
			Mode::OperatorPending => 'o',
			Mode::Insert => 'i',
			Mode::CommandLine => 'c',
		}
	}
}

impl fmt::Display for Mode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Mode {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"n" | "normal" => Ok(Mode::Normal),
			"v" | "x" | "visual" => Ok(Mode::Visual),
			"o" | "op" | "operator-pending" => Ok(Mode::OperatorPending),
			"i" | "insert" => Ok(Mode::Insert),
			"c" | "cmd" | "command" | "command-line" => Ok(Mode::CommandLine),
			_ => Err(format!("unknown mode: '{s}'")),
		}
	}
}
