//! Script literals: strings, integers, lists and dictionaries.

use std::fmt;

use indexmap::IndexMap;

use crate::{ConfigError, Result};

/// A value written in the script (`'x'`, `"x"`, `42`, `[..]`, `{..}`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
	Str(String),
	Int(i64),
	List(Vec<Literal>),
	Dict(IndexMap<String, Literal>),
}

impl Literal {
	/// Parses `text` as exactly one literal; a trailing `"` comment is allowed.
	pub fn parse(text: &str) -> Result<Self> {
		let mut cursor = Cursor { src: text, pos: 0 };
		let value = cursor.literal()?;
		cursor.skip_ws();
		match cursor.peek() {
			None | Some('"') => Ok(value),
			Some(c) => Err(cursor.error(format!("unexpected '{c}' after value"))),
		}
	}

	/// Parses a literal at the start of `text`, returning it and the unparsed rest.
	pub fn parse_prefix(text: &str) -> Result<(Self, &str)> {
		let mut cursor = Cursor { src: text, pos: 0 };
		let value = cursor.literal()?;
		Ok((value, &text[cursor.pos..]))
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Literal::Str(s) => Some(s),
			_ => None,
		}
	}

	/// Integer value, with strings converted by their leading digits.
	pub fn as_int(&self) -> Option<i64> {
		match self {
			Literal::Int(n) => Some(*n),
			Literal::Str(s) => Some(leading_int(s)),
			_ => None,
		}
	}

	/// A string or a list of strings, as a list.
	pub fn strings(&self) -> Option<Vec<String>> {
		match self {
			Literal::Str(s) => Some(vec![s.clone()]),
			Literal::List(items) => items.iter().map(|i| i.as_str().map(str::to_string)).collect(),
			_ => None,
		}
	}

	pub fn truthy(&self) -> bool {
		self.as_int().is_some_and(|n| n != 0)
	}
}

impl fmt::Display for Literal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Literal::Str(s) => write!(f, "'{}'", s.replace('\'', "''")),
			Literal::Int(n) => write!(f, "{n}"),
			Literal::List(items) => {
				f.write_str("[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
			Literal::Dict(entries) => {
				f.write_str("{")?;
				for (i, (key, value)) in entries.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "'{key}': {value}")?;
				}
				f.write_str("}")
			}
		}
	}
}

/// Vim's string-to-number rule: leading decimal digits, otherwise zero.
pub(crate) fn leading_int(s: &str) -> i64 {
	let s = s.trim_start();
	let (sign, digits) = match s.strip_prefix('-') {
		Some(rest) => (-1, rest),
		None => (1, s),
	};
	let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());
	digits[..end].parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

struct Cursor<'a> {
	src: &'a str,
	pos: usize,
}

impl Cursor<'_> {
	fn peek(&self) -> Option<char> {
		self.src[self.pos..].chars().next()
	}

	fn bump(&mut self) -> Option<char> {
		let c = self.peek()?;
		self.pos += c.len_utf8();
		Some(c)
	}

	fn eat(&mut self, c: char) -> bool {
		if self.peek() == Some(c) {
			self.pos += c.len_utf8();
			true
		} else {
			false
		}
	}

	fn skip_ws(&mut self) {
		while self.peek().is_some_and(char::is_whitespace) {
			self.bump();
		}
	}

	fn error(&self, reason: String) -> ConfigError {
		ConfigError::syntax("literal", format!("{reason} at column {}", self.pos + 1))
	}

	fn literal(&mut self) -> Result<Literal> {
		self.skip_ws();
		match self.peek() {
			Some('\'') => self.single_quoted().map(Literal::Str),
			Some('"') => self.double_quoted().map(Literal::Str),
			Some('[') => self.list(),
			Some('{') => self.dict(),
			Some(c) if c == '-' || c.is_ascii_digit() => self.int(),
			Some('v') if self.src[self.pos..].starts_with("v:true") => {
				self.pos += "v:true".len();
				Ok(Literal::Int(1))
			}
			Some('v') if self.src[self.pos..].starts_with("v:false") => {
				self.pos += "v:false".len();
				Ok(Literal::Int(0))
			}
			Some(c) => Err(self.error(format!("unexpected '{c}'"))),
			None => Err(self.error("expected a value".to_string())),
		}
	}

	fn single_quoted(&mut self) -> Result<String> {
		self.bump();
		let mut out = String::new();
		loop {
			match self.bump() {
				Some('\'') if self.eat('\'') => out.push('\''),
				Some('\'') => return Ok(out),
				Some(c) => out.push(c),
				None => return Err(self.error("unterminated string".to_string())),
			}
		}
	}

	fn double_quoted(&mut self) -> Result<String> {
		self.bump();
		let mut out = String::new();
		loop {
			match self.bump() {
				Some('"') => return Ok(out),
				Some('\\') => match self.bump() {
					Some('n') => out.push('\n'),
					Some('t') => out.push('\t'),
					Some('e') => out.push('\u{1b}'),
					// `"\<C-w>"` is the key itself, kept in notation form.
					Some('<') => out.push('<'),
					Some(c) => out.push(c),
					None => return Err(self.error("unterminated string".to_string())),
				},
				Some(c) => out.push(c),
				None => return Err(self.error("unterminated string".to_string())),
			}
		}
	}

	fn int(&mut self) -> Result<Literal> {
		let start = self.pos;
		self.eat('-');
		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.bump();
		}
		self.src[start..self.pos]
			.parse()
			.map(Literal::Int)
			.map_err(|_| self.error(format!("invalid number '{}'", &self.src[start..self.pos])))
	}

	fn list(&mut self) -> Result<Literal> {
		self.bump();
		let mut items = Vec::new();
		loop {
			self.skip_ws();
			if self.eat(']') {
				return Ok(Literal::List(items));
			}
			items.push(self.literal()?);
			self.skip_ws();
			if !self.eat(',') {
				self.skip_ws();
				if self.eat(']') {
					return Ok(Literal::List(items));
				}
				return Err(self.error("expected ',' or ']'".to_string()));
			}
		}
	}

	fn dict(&mut self) -> Result<Literal> {
		self.bump();
		let mut entries = IndexMap::new();
		loop {
			self.skip_ws();
			if self.eat('}') {
				return Ok(Literal::Dict(entries));
			}
			let key = match self.literal()? {
				Literal::Str(key) => key,
				other => return Err(self.error(format!("dictionary key must be a string, got {other}"))),
			};
			self.skip_ws();
			if !self.eat(':') {
				return Err(self.error("expected ':'".to_string()));
			}
			let value = self.literal()?;
			entries.insert(key, value);
			self.skip_ws();
			if !self.eat(',') {
				self.skip_ws();
				if self.eat('}') {
					return Ok(Literal::Dict(entries));
				}
				return Err(self.error("expected ',' or '}'".to_string()));
			}
		}
	}
}
