//! `if` conditions.
//!
//! Supports the subset of expressions startup scripts use to branch on the
//! environment: option reads (`&term`), variables, `has()`, `exists()`,
//! comparisons (`==`, `!=`, `=~`, `!~`, each with an optional `#`/`?` case
//! suffix) and the boolean operators `!`, `&&`, `||`.

use regex::RegexBuilder;

use crate::literal::{Literal, leading_int};
use crate::{ConfigError, Result};

#[cfg(test)]
mod tests;

/// What a condition can observe.
pub trait CondEnv {
	/// Value of `&name`.
	fn option(&self, name: &str) -> Option<Value>;
	/// Value of a script variable (`g:name`).
	fn var(&self, name: &str) -> Option<Value>;
	/// `has('feature')`.
	fn has(&self, feature: &str) -> bool;
}

/// A condition operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	Int(i64),
	Str(String),
}

impl Value {
	fn as_int(&self) -> i64 {
		match self {
			Value::Int(n) => *n,
			Value::Str(s) => leading_int(s),
		}
	}

	fn into_string(self) -> String {
		match self {
			Value::Int(n) => n.to_string(),
			Value::Str(s) => s,
		}
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Int(i64::from(b))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
	Eq,
	Ne,
	Match,
	NoMatch,
}

/// Parsed condition expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
	Int(i64),
	Str(String),
	Option(String),
	Var(String),
	Has(String),
	Exists(String),
	Not(Box<Expr>),
	And(Box<Expr>, Box<Expr>),
	Or(Box<Expr>, Box<Expr>),
	Cmp {
		op: CmpOp,
		ignore_case: bool,
		lhs: Box<Expr>,
		rhs: Box<Expr>,
	},
}

impl Expr {
	pub fn parse(src: &str) -> Result<Self> {
		let mut parser = ExprParser { src, pos: 0 };
		let expr = parser.or()?;
		parser.skip_ws();
		if parser.pos < src.len() && !parser.rest().starts_with('"') {
			return Err(ConfigError::Condition(format!("unexpected '{}'", parser.rest())));
		}
		Ok(expr)
	}

	/// Evaluates to a truth value.
	pub fn test(&self, env: &dyn CondEnv) -> Result<bool> {
		Ok(self.eval(env)?.as_int() != 0)
	}

	pub fn eval(&self, env: &dyn CondEnv) -> Result<Value> {
		Ok(match self {
			Expr::Int(n) => Value::Int(*n),
			Expr::Str(s) => Value::Str(s.clone()),
			Expr::Option(name) => env.option(name).ok_or_else(|| ConfigError::Condition(format!("unknown option '&{name}'")))?,
			Expr::Var(name) => env.var(name).ok_or_else(|| ConfigError::Condition(format!("undefined variable '{name}'")))?,
			Expr::Has(feature) => env.has(feature).into(),
			Expr::Exists(name) => exists(env, name).into(),
			Expr::Not(inner) => (!inner.test(env)?).into(),
			Expr::And(a, b) => (a.test(env)? && b.test(env)?).into(),
			Expr::Or(a, b) => (a.test(env)? || b.test(env)?).into(),
			Expr::Cmp { op, ignore_case, lhs, rhs } => compare(*op, *ignore_case, lhs.eval(env)?, rhs.eval(env)?)?.into(),
		})
	}
}

fn exists(env: &dyn CondEnv, name: &str) -> bool {
	match name.strip_prefix('&') {
		Some(option) => env.option(option).is_some(),
		None => env.var(name).is_some(),
	}
}

fn compare(op: CmpOp, ignore_case: bool, lhs: Value, rhs: Value) -> Result<bool> {
	match op {
		CmpOp::Eq | CmpOp::Ne => {
			let equal = match (&lhs, &rhs) {
				(Value::Int(a), Value::Int(b)) => a == b,
				(Value::Int(a), Value::Str(_)) => *a == rhs.as_int(),
				(Value::Str(_), Value::Int(b)) => lhs.as_int() == *b,
				(Value::Str(a), Value::Str(b)) if ignore_case => a.eq_ignore_ascii_case(b),
				(Value::Str(a), Value::Str(b)) => a == b,
			};
			Ok(equal == (op == CmpOp::Eq))
		}
		CmpOp::Match | CmpOp::NoMatch => {
			let pattern = rhs.into_string();
			let regex = RegexBuilder::new(&vim_regex(&pattern))
				.case_insensitive(ignore_case)
				.build()
				.map_err(|e| ConfigError::Condition(format!("bad pattern '{pattern}': {e}")))?;
			Ok(regex.is_match(&lhs.into_string()) == (op == CmpOp::Match))
		}
	}
}

/// Translates a magic-mode vim pattern into `regex` syntax.
pub fn vim_regex(pattern: &str) -> String {
	let mut out = String::with_capacity(pattern.len());
	let mut chars = pattern.chars();
	while let Some(c) = chars.next() {
		match c {
			'\\' => match chars.next() {
				Some(c @ ('|' | '(' | ')' | '+' | '?' | '{' | '}')) => out.push(c),
				Some('=') => out.push('?'),
				Some('<' | '>') => out.push_str("\\b"),
				Some(c) => {
					out.push('\\');
					out.push(c);
				}
				None => out.push_str("\\\\"),
			},
			'|' | '(' | ')' | '+' | '?' | '{' | '}' => {
				out.push('\\');
				out.push(c);
			}
			c => out.push(c),
		}
	}
	out
}

struct ExprParser<'a> {
	src: &'a str,
	pos: usize,
}

impl<'a> ExprParser<'a> {
	fn rest(&self) -> &'a str {
		&self.src[self.pos..]
	}

	fn skip_ws(&mut self) {
		let trimmed = self.rest().trim_start();
		self.pos = self.src.len() - trimmed.len();
	}

	fn eat(&mut self, token: &str) -> bool {
		self.skip_ws();
		if self.rest().starts_with(token) {
			self.pos += token.len();
			true
		} else {
			false
		}
	}

	fn error<T>(&self, expected: &str) -> Result<T> {
		let found = match self.rest() {
			"" => "end of condition".to_string(),
			rest => format!("'{rest}'"),
		};
		Err(ConfigError::Condition(format!("expected {expected}, found {found}")))
	}

	fn or(&mut self) -> Result<Expr> {
		let mut lhs = self.and()?;
		while self.eat("||") {
			lhs = Expr::Or(Box::new(lhs), Box::new(self.and()?));
		}
		Ok(lhs)
	}

	fn and(&mut self) -> Result<Expr> {
		let mut lhs = self.cmp()?;
		while self.eat("&&") {
			lhs = Expr::And(Box::new(lhs), Box::new(self.cmp()?));
		}
		Ok(lhs)
	}

	fn cmp(&mut self) -> Result<Expr> {
		let lhs = self.unary()?;
		let op = if self.eat("==") {
			CmpOp::Eq
		} else if self.eat("!=") {
			CmpOp::Ne
		} else if self.eat("=~") {
			CmpOp::Match
		} else if self.eat("!~") {
			CmpOp::NoMatch
		} else {
			return Ok(lhs);
		};
		let ignore_case = match self.rest().chars().next() {
			Some('?') => {
				self.pos += 1;
				true
			}
			Some('#') => {
				self.pos += 1;
				false
			}
			_ => false,
		};
		let rhs = self.unary()?;
		Ok(Expr::Cmp {
			op,
			ignore_case,
			lhs: Box::new(lhs),
			rhs: Box::new(rhs),
		})
	}

	fn unary(&mut self) -> Result<Expr> {
		self.skip_ws();
		if self.rest().starts_with('!') && !self.rest().starts_with("!=") && !self.rest().starts_with("!~") {
			self.pos += 1;
			return Ok(Expr::Not(Box::new(self.unary()?)));
		}
		self.primary()
	}

	fn primary(&mut self) -> Result<Expr> {
		self.skip_ws();
		let rest = self.rest();
		match rest.chars().next() {
			Some('(') => {
				self.pos += 1;
				let inner = self.or()?;
				if !self.eat(")") {
					return self.error("')'");
				}
				Ok(inner)
			}
			Some('&') => {
				self.pos += 1;
				let name = self.ident();
				if name.is_empty() {
					return self.error("an option name");
				}
				Ok(Expr::Option(name.to_string()))
			}
			Some('\'' | '"' | '-' | '0'..='9') => {
				let (literal, after) = Literal::parse_prefix(rest)?;
				self.pos = self.src.len() - after.len();
				match literal {
					Literal::Str(s) => Ok(Expr::Str(s)),
					Literal::Int(n) => Ok(Expr::Int(n)),
					other => Err(ConfigError::Condition(format!("unsupported operand {other}"))),
				}
			}
			Some(c) if c.is_ascii_alphabetic() || c == '_' => {
				let name = self.ident();
				match name {
					"has" | "exists" => {
						if !self.eat("(") {
							return self.error("'('");
						}
						let arg = match self.primary()? {
							Expr::Str(s) => s,
							_ => return self.error("a string argument"),
						};
						if !self.eat(")") {
							return self.error("')'");
						}
						Ok(if name == "has" { Expr::Has(arg) } else { Expr::Exists(arg) })
					}
					_ => Ok(Expr::Var(name.to_string())),
				}
			}
			_ => self.error("an operand"),
		}
	}

	/// Identifier, including scope prefixes like `g:` and `v:`.
	fn ident(&mut self) -> &'a str {
		let rest = self.rest();
		let len = rest.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == ':' || c == '#')).unwrap_or(rest.len());
		self.pos += len;
		&rest[..len]
	}
}
