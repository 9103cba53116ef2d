//! Key node types shared by both chord notations.

use std::fmt;
use std::str::FromStr;

/// Separator between modifiers and key in dash notation (`ctrl-a`).
pub const KEY_SEP: char = '-';

/// Modifier bit flags.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
	/// Control.
	Ctrl = 0b0001,
	/// Alt / Meta.
	Alt = 0b0010,
	/// Shift.
	Shift = 0b0100,
	/// Command / Super.
	Cmd = 0b1000,
}

impl Modifier {
	/// All modifiers in canonical display order.
	pub const ALL: [Modifier; 4] = [Modifier::Ctrl, Modifier::Alt, Modifier::Shift, Modifier::Cmd];

	/// Parses the single-letter form used inside `<...>` notation (`C`, `M`, `A`, `S`, `D`).
	pub fn from_abbrev(s: &str) -> Option<Self> {
		match s {
			"C" | "c" => Some(Modifier::Ctrl),
			"M" | "m" | "A" | "a" => Some(Modifier::Alt),
			"S" | "s" => Some(Modifier::Shift),
			"D" | "d" | "T" | "t" => Some(Modifier::Cmd),
			_ => None,
		}
	}

	fn abbrev(self) -> char {
		match self {
			Modifier::Ctrl => 'C',
			Modifier::Alt => 'M',
			Modifier::Shift => 'S',
			Modifier::Cmd => 'D',
		}
	}

	fn name(self) -> &'static str {
		match self {
			Modifier::Ctrl => "ctrl",
			Modifier::Alt => "alt",
			Modifier::Shift => "shift",
			Modifier::Cmd => "cmd",
		}
	}
}

impl FromStr for Modifier {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"ctrl" | "control" => Ok(Modifier::Ctrl),
			"alt" | "meta" | "opt" => Ok(Modifier::Alt),
			"shift" => Ok(Modifier::Shift),
			"cmd" | "super" => Ok(Modifier::Cmd),
			_ => Err(()),
		}
	}
}

/// A single key, without modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
	/// A printable character.
	Char(char),
	/// Function key `F1`..`F35`.
	F(u8),
	Enter,
	Esc,
	Tab,
	Backspace,
	Delete,
	Insert,
	Home,
	End,
	PageUp,
	PageDown,
	Up,
	Down,
	Left,
	Right,
	Space,
	/// Placeholder for `<leader>`, expanded when a binding is defined.
	Leader,
	/// Placeholder for `<localleader>`.
	LocalLeader,
}

impl Key {
	fn name(&self) -> Option<&'static str> {
		Some(match self {
			Key::Enter => "enter",
			Key::Esc => "esc",
			Key::Tab => "tab",
			Key::Backspace => "backspace",
			Key::Delete => "del",
			Key::Insert => "insert",
			Key::Home => "home",
			Key::End => "end",
			Key::PageUp => "pageup",
			Key::PageDown => "pagedown",
			Key::Up => "up",
			Key::Down => "down",
			Key::Left => "left",
			Key::Right => "right",
			Key::Space => "space",
			Key::Leader => "leader",
			Key::LocalLeader => "localleader",
			Key::Char(_) | Key::F(_) => return None,
		})
	}

	fn notation_name(&self) -> Option<&'static str> {
		Some(match self {
			Key::Enter => "CR",
			Key::Esc => "Esc",
			Key::Tab => "Tab",
			Key::Backspace => "BS",
			Key::Delete => "Del",
			Key::Insert => "Insert",
			Key::Home => "Home",
			Key::End => "End",
			Key::PageUp => "PageUp",
			Key::PageDown => "PageDown",
			Key::Up => "Up",
			Key::Down => "Down",
			Key::Left => "Left",
			Key::Right => "Right",
			Key::Space => "Space",
			Key::Leader => "leader",
			Key::LocalLeader => "localleader",
			Key::Char('<') => "lt",
			Key::Char('|') => "Bar",
			Key::Char('\\') => "Bslash",
			Key::Char(_) | Key::F(_) => return None,
		})
	}
}

/// Named keys, matched case-insensitively. Covers both dash and `<...>` spellings.
impl FromStr for Key {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s.to_ascii_lowercase().as_str() {
			"enter" | "cr" | "ret" | "return" => Key::Enter,
			"esc" | "escape" => Key::Esc,
			"tab" => Key::Tab,
			"backspace" | "bs" => Key::Backspace,
			"del" | "delete" => Key::Delete,
			"insert" | "ins" => Key::Insert,
			"home" => Key::Home,
			"end" => Key::End,
			"pageup" | "pgup" => Key::PageUp,
			"pagedown" | "pgdn" => Key::PageDown,
			"up" => Key::Up,
			"down" => Key::Down,
			"left" => Key::Left,
			"right" => Key::Right,
			"space" => Key::Space,
			"leader" => Key::Leader,
			"localleader" => Key::LocalLeader,
			"lt" => Key::Char('<'),
			"bar" => Key::Char('|'),
			"bslash" => Key::Char('\\'),
			_ => return Err(()),
		})
	}
}

/// A key plus its modifier bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Node {
	pub modifiers: u8,
	pub key: Key,
}

impl Node {
	pub fn new(modifiers: u8, key: Key) -> Self {
		Self { modifiers, key }
	}

	/// Returns `true` if the given modifier bit is set.
	pub fn has(&self, modifier: Modifier) -> bool {
		self.modifiers & modifier as u8 != 0
	}

	/// Returns this node with `modifier` cleared.
	pub fn without(self, modifier: Modifier) -> Self {
		Self::new(self.modifiers & !(modifier as u8), self.key)
	}

	/// Renders the node in `<...>` notation (`<C-w>`, `<CR>`, `x`).
	pub fn notation(&self) -> String {
		let key = match (self.key, self.key.notation_name()) {
			(Key::F(n), _) => format!("F{n}"),
			(_, Some(name)) => name.to_string(),
			(Key::Char(c), None) => c.to_string(),
			(_, None) => unreachable!("all non-char keys have a notation name"),
		};

		let named = !matches!(self.key, Key::Char(_)) || self.key.notation_name().is_some();
		if self.modifiers == 0 && !named {
			return key;
		}

		let mut out = String::from("<");
		for modifier in Modifier::ALL {
			if self.has(modifier) {
				out.push(modifier.abbrev());
				out.push(KEY_SEP);
			}
		}
		out.push_str(&key);
		out.push('>');
		out
	}
}

impl From<Key> for Node {
	fn from(key: Key) -> Self {
		Self::new(0, key)
	}
}

/// Dash notation: `ctrl-alt-f1`, `enter`, `a`.
impl fmt::Display for Node {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for modifier in Modifier::ALL {
			if self.has(modifier) {
				write!(f, "{}{KEY_SEP}", modifier.name())?;
			}
		}
		match (self.key, self.key.name()) {
			(Key::Char(c), _) => write!(f, "{c}"),
			(Key::F(n), _) => write!(f, "f{n}"),
			(_, Some(name)) => f.write_str(name),
			(_, None) => Ok(()),
		}
	}
}

/// Renders a sequence in dash notation, space separated.
pub fn display_seq(seq: &[Node]) -> String {
	seq.iter().map(Node::to_string).collect::<Vec<_>>().join(" ")
}

/// Renders a sequence in `<...>` notation, concatenated.
pub fn notation_seq(seq: &[Node]) -> String {
	seq.iter().map(Node::notation).collect()
}

/// Replaces `<leader>` / `<localleader>` placeholders with the given sequences.
pub fn expand_leaders(seq: &[Node], leader: &[Node], local_leader: &[Node]) -> Vec<Node> {
	let mut out = Vec::with_capacity(seq.len());
	for node in seq {
		match node.key {
			Key::Leader => out.extend_from_slice(leader),
			Key::LocalLeader => out.extend_from_slice(local_leader),
			_ => out.push(*node),
		}
	}
	out
}
