//! Terminal profile and the key-code adjustments it implies.

use rcload_keymap_parser::{Key, Modifier, Node};

/// Broad terminal families that differ in how they encode keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
	/// xterm and its descendants (`xterm-256color`, `alacritty`, `kitty`, ...).
	Xterm,
	/// `screen` and `tmux`: Meta arrives as an Escape prefix.
	Multiplexer,
	/// The Linux virtual console: `<S-F1>` arrives as `<F13>`.
	Linux,
	/// `dumb` or unset.
	Dumb,
	Other,
}

/// Terminal capabilities read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermProfile {
	pub term: String,
	pub kind: TermKind,
	pub truecolor: bool,
}

impl TermProfile {
	/// Builds a profile from a `TERM` value and an optional `COLORTERM` value.
	pub fn new(term: &str, colorterm: Option<&str>) -> Self {
		let kind = match term {
			"" | "dumb" => TermKind::Dumb,
			"linux" => TermKind::Linux,
			t if t.starts_with("screen") || t.starts_with("tmux") => TermKind::Multiplexer,
			t if t.starts_with("xterm") || t.starts_with("rxvt") || matches!(t, "alacritty" | "xterm-kitty" | "wezterm" | "foot") => TermKind::Xterm,
			_ => TermKind::Other,
		};
		let truecolor = matches!(colorterm, Some("truecolor" | "24bit")) || term.ends_with("-direct");
		Self {
			term: term.to_string(),
			kind,
			truecolor,
		}
	}

	/// Reads `TERM` and `COLORTERM` from the process environment.
	pub fn from_env() -> Self {
		let term = std::env::var("TERM").unwrap_or_default();
		let colorterm = std::env::var("COLORTERM").ok();
		Self::new(&term, colorterm.as_deref())
	}

	pub fn meta_sends_escape(&self) -> bool {
		self.kind == TermKind::Multiplexer
	}

	/// Extra sequences under which a binding for `keys` must also be registered.
	///
	/// Empty when the terminal delivers `keys` unchanged.
	pub fn aliases(&self, keys: &[Node]) -> Vec<Vec<Node>> {
		let translated: Option<Vec<Node>> = match self.kind {
			TermKind::Multiplexer if keys.iter().any(|n| n.has(Modifier::Alt)) => Some(
				keys.iter()
					.flat_map(|n| {
						if n.has(Modifier::Alt) {
							vec![Node::from(Key::Esc), n.without(Modifier::Alt)]
						} else {
							vec![*n]
						}
					})
					.collect(),
			),
			TermKind::Linux if keys.iter().any(is_shifted_low_fn) => Some(
				keys.iter()
					.map(|n| match n.key {
						Key::F(f) if is_shifted_low_fn(n) => Node::new(n.without(Modifier::Shift).modifiers, Key::F(f + 12)),
						_ => *n,
					})
					.collect(),
			),
			_ => None,
		};
		translated.into_iter().collect()
	}
}

impl Default for TermProfile {
	fn default() -> Self {
		Self::new("xterm-256color", None)
	}
}

fn is_shifted_low_fn(node: &Node) -> bool {
	matches!(node.key, Key::F(1..=12)) && node.has(Modifier::Shift)
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use rcload_keymap_parser::parse_notation;

	use super::*;

	#[test]
	fn classifies_terminals() {
		assert_eq!(TermProfile::new("screen-256color", None).kind, TermKind::Multiplexer);
		assert_eq!(TermProfile::new("tmux-256color", None).kind, TermKind::Multiplexer);
		assert_eq!(TermProfile::new("xterm-256color", Some("truecolor")).kind, TermKind::Xterm);
		assert!(TermProfile::new("xterm-256color", Some("truecolor")).truecolor);
		assert_eq!(TermProfile::new("linux", None).kind, TermKind::Linux);
		assert_eq!(TermProfile::new("", None).kind, TermKind::Dumb);
	}

	#[test]
	fn multiplexer_aliases_meta_as_escape() {
		let profile = TermProfile::new("screen", None);
		let aliases = profile.aliases(&parse_notation("<M-j>x").unwrap());
		assert_eq!(aliases, vec![parse_notation("<Esc>jx").unwrap()]);
		assert!(profile.aliases(&parse_notation("<C-j>").unwrap()).is_empty());
	}

	#[test]
	fn linux_console_aliases_shifted_function_keys() {
		let profile = TermProfile::new("linux", None);
		assert_eq!(profile.aliases(&parse_notation("<S-F5>").unwrap()), vec![parse_notation("<F17>").unwrap()]);
		assert!(profile.aliases(&parse_notation("<F5>").unwrap()).is_empty());
	}

	#[test]
	fn xterm_needs_no_aliases() {
		let profile = TermProfile::new("xterm-256color", None);
		assert!(profile.aliases(&parse_notation("<M-j><S-F5>").unwrap()).is_empty());
	}
}
