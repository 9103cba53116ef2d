//! # Parser
//!
//! Parses plain-text chord definitions into [`Node`] sequences. Two notations
//! are accepted:
//!
//! ## Dash notation
//!
//! ```text
//! node      = modifiers* key
//! modifiers = modifier "-"
//! modifier  = "ctrl" | "cmd" | "alt" | "shift"
//! key       = fn-key | named-key | char
//! fn-key    = "f" digit digit?
//! named-key = "del" | "insert" | "end" | ...
//! char      = ascii-char
//! ```
//!
//! Sequences are whitespace separated: `"ctrl-w h"`.
//!
//! ## Angle-bracket notation
//!
//! The notation used by rc scripts: literal characters interleaved with
//! `<...>` groups, e.g. `"<C-w>h"`, `"<leader>ff"`, `"<S-F5>"`. A group that
//! does not name a key is taken literally, character by character.

use std::str::FromStr;

use crate::node::{KEY_SEP, Key, Modifier, Node};

#[cfg(test)]
mod tests;

/// Function pointer type for parser combinators.
type ParserFn<T> = fn(&mut Parser) -> Result<Option<T>, ParseError>;

/// Represents an error that occurred during parsing.
#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
	/// Human-readable description of the parse error.
	pub message: String,
	/// Byte offset in the input where the error occurred.
	pub position: usize,
}

impl std::fmt::Display for ParseError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "parse error at position {}: {}", self.position, self.message)
	}
}

impl std::error::Error for ParseError {}

/// Maintains the parser's state for recursive descent parsing.
struct Parser<'a> {
	input: &'a str,
	position: usize,
}

impl<'a> Parser<'a> {
	fn new(input: &'a str) -> Self {
		Self { input, position: 0 }
	}

	fn peek(&self) -> Option<char> {
		self.input.chars().next()
	}

	fn peek_at(&self, n: usize) -> Option<char> {
		self.input.chars().nth(n)
	}

	fn next(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.position += ch.len_utf8();
		self.input = &self.input[ch.len_utf8()..];
		Some(ch)
	}

	fn is_end(&self) -> bool {
		self.input.is_empty()
	}

	/// Consumes the next character if it matches the expected one.
	fn take(&mut self, expected: char) -> Result<(), ParseError> {
		match self.next() {
			Some(ch) if ch == expected => Ok(()),
			Some(ch) => Err(ParseError {
				message: format!("expected '{expected}', found '{ch}'"),
				position: self.position - ch.len_utf8(),
			}),
			None => Err(ParseError {
				message: format!("expected '{expected}', found end of input"),
				position: self.position,
			}),
		}
	}

	/// Attempts to parse with a fallback: restores state if parsing fails.
	fn try_parse<T, F>(&mut self, f: F) -> Result<Option<T>, ParseError>
	where
		F: FnOnce(&mut Parser<'a>) -> Result<Option<T>, ParseError>,
	{
		let snapshot = (self.input, self.position);
		match f(self) {
			Ok(Some(val)) => Ok(Some(val)),
			Ok(None) | Err(_) => {
				self.input = snapshot.0;
				self.position = snapshot.1;
				Ok(None)
			}
		}
	}

	fn take_while<F>(&mut self, predicate: F) -> String
	where
		F: Fn(char) -> bool,
	{
		let mut result = String::new();
		while let Some(ch) = self.peek() {
			if !predicate(ch) {
				break;
			}
			result.push(ch);
			self.next();
		}
		result
	}

	/// Tries multiple parsers in sequence, returning the result of the first successful one.
	fn alt<T>(&mut self, parsers: &[ParserFn<T>]) -> Result<Option<T>, ParseError> {
		for p in parsers {
			if let Some(value) = p(self)? {
				return Ok(Some(value));
			}
		}
		Ok(None)
	}

	fn error(&self, message: String) -> ParseError {
		ParseError {
			message,
			position: self.position,
		}
	}
}

/// Parses a single dash-notation key expression into a [`Node`].
///
/// ```
/// use rcload_keymap_parser::{parse, Key, Modifier, Node};
///
/// let node = parse("ctrl-a").unwrap();
/// assert_eq!(node, Node::new(Modifier::Ctrl as u8, Key::Char('a')));
/// ```
pub fn parse(s: &str) -> Result<Node, ParseError> {
	let mut parser = Parser::new(s);
	let node = parse_node(&mut parser)?;

	if let Some(ch) = parser.peek() {
		return Err(parser.error(format!("expected end of input, found: {ch}")));
	}

	Ok(node)
}

/// Grammar: `node = modifiers* key`
fn parse_node(parser: &mut Parser) -> Result<Node, ParseError> {
	let mut modifiers = 0u8;

	for _ in 0..Modifier::ALL.len() {
		match try_parse_modifier(parser)? {
			Some(modifier) => modifiers |= modifier as u8,
			None => break,
		}
	}

	let key = parse_key(parser)?;
	Ok(Node::new(modifiers, key))
}

fn try_parse_modifier(parser: &mut Parser) -> Result<Option<Modifier>, ParseError> {
	parser.try_parse(|p| {
		let name = p.take_while(|ch| ch.is_ascii_alphabetic());
		let Ok(modifier) = name.parse::<Modifier>() else {
			return Ok(None);
		};

		p.take(KEY_SEP)?;

		Ok(Some(modifier))
	})
}

fn parse_key(parser: &mut Parser) -> Result<Key, ParseError> {
	match parser.alt(&[try_parse_fn_key, try_parse_named_key, try_parse_char])? {
		Some(key) => Ok(key),
		None => Err(parser.error("expected a valid key".to_string())),
	}
}

/// Attempts to parse a function key (`f1` to `f35`).
///
/// Only activates when the input starts with `f` followed by a digit. Once
/// activated, the number must be in range or an error is returned.
fn try_parse_fn_key(parser: &mut Parser) -> Result<Option<Key>, ParseError> {
	if !matches!(parser.peek(), Some('f' | 'F')) {
		return Ok(None);
	}

	if !matches!(parser.peek_at(1), Some(ch) if ch.is_ascii_digit()) {
		return Ok(None);
	}

	parser.next();
	let num = parser.take_while(|ch| ch.is_ascii_digit());

	match num.parse::<u8>() {
		Ok(n) if (1..=35).contains(&n) => Ok(Some(Key::F(n))),
		_ => Err(parser.error("invalid function key number (must be 1-35)".to_string())),
	}
}

fn try_parse_named_key(parser: &mut Parser) -> Result<Option<Key>, ParseError> {
	parser.try_parse(|p| {
		let name = p.take_while(|ch| ch.is_ascii_alphabetic());
		if name.len() < 2 {
			return Ok(None);
		}

		Ok(name.parse::<Key>().ok())
	})
}

fn try_parse_char(parser: &mut Parser) -> Result<Option<Key>, ParseError> {
	match parser.peek() {
		Some(ch) if ch.is_ascii() && !ch.is_ascii_whitespace() => {
			parser.next();
			Ok(Some(Key::Char(ch)))
		}
		_ => Ok(None),
	}
}

/// Parses a whitespace-separated sequence of dash-notation expressions.
///
/// ```
/// use rcload_keymap_parser::{parse_seq, Key, Node};
///
/// let seq = parse_seq("a b").unwrap();
/// assert_eq!(seq, vec![Node::from(Key::Char('a')), Node::from(Key::Char('b'))]);
/// ```
pub fn parse_seq(s: &str) -> Result<Vec<Node>, ParseError> {
	let seq: Vec<Node> = s.split_whitespace().map(parse).collect::<Result<_, _>>()?;
	if seq.is_empty() {
		return Err(ParseError {
			message: "empty key sequence".to_string(),
			position: 0,
		});
	}
	Ok(seq)
}

/// Parses angle-bracket notation (`<C-w>h`, `<leader>ff`, `<lt>`).
///
/// A literal space is the [`Key::Space`] key.
pub fn parse_notation(s: &str) -> Result<Vec<Node>, ParseError> {
	let mut parser = Parser::new(s);
	let mut nodes = Vec::new();

	while !parser.is_end() {
		if let Some(node) = parser.try_parse(try_parse_bracket)? {
			nodes.push(node);
			continue;
		}
		match parser.next() {
			Some(' ') => nodes.push(Node::from(Key::Space)),
			Some(ch) => nodes.push(Node::from(Key::Char(ch))),
			None => break,
		}
	}

	if nodes.is_empty() {
		return Err(parser.error("empty key sequence".to_string()));
	}
	Ok(nodes)
}

/// Parses one `<mods-key>` group. Returns `None` if the group is not a key.
fn try_parse_bracket(parser: &mut Parser) -> Result<Option<Node>, ParseError> {
	parser.take('<')?;
	let body = parser.take_while(|ch| ch != '>' && ch != '<' && !ch.is_whitespace());
	parser.take('>')?;

	// `<C-->` binds ctrl + '-'.
	let (mods, key) = match body.strip_suffix("--") {
		Some(mods) => (mods, "-"),
		None => match body.rsplit_once(KEY_SEP) {
			Some((mods, key)) => (mods, key),
			None => ("", body.as_str()),
		},
	};

	let mut modifiers = 0u8;
	if !mods.is_empty() {
		for part in mods.split(KEY_SEP) {
			let modifier = Modifier::from_abbrev(part).or_else(|| part.parse().ok());
			match modifier {
				Some(modifier) => modifiers |= modifier as u8,
				None => return Ok(None),
			}
		}
	}

	let mut chars = key.chars();
	let key = match (chars.next(), chars.next()) {
		(None, _) => return Ok(None),
		(Some(ch), None) if modifiers & Modifier::Ctrl as u8 != 0 => Key::Char(ch.to_ascii_lowercase()),
		(Some(ch), None) => Key::Char(ch),
		_ => match parse_fn_name(key).or_else(|| key.parse::<Key>().ok()) {
			Some(key) => key,
			None => return Ok(None),
		},
	};

	Ok(Some(Node::new(modifiers, key)))
}

fn parse_fn_name(name: &str) -> Option<Key> {
	let digits = name.strip_prefix(['f', 'F'])?;
	match digits.parse::<u8>() {
		Ok(n) if (1..=35).contains(&n) => Some(Key::F(n)),
		_ => None,
	}
}

/// Parses a chord written in either notation.
///
/// Dash notation is tried first; input it rejects (such as `gg` or
/// `<C-w>h`) is read as angle-bracket notation.
pub fn parse_chord(s: &str) -> Result<Vec<Node>, ParseError> {
	parse_seq(s).or_else(|_| parse_notation(s.trim()))
}

impl FromStr for Node {
	type Err = ParseError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		parse(s)
	}
}
