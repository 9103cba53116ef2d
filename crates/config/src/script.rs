//! Script parsing.
//!
//! Turns source text into [`Stmt`]s tagged with their 1-based line numbers.
//! Parsing never aborts: a malformed line becomes a [`Diagnostic`] and the
//! parser moves on.

use rcload_keymap::Mode;

use crate::cond::Expr;
use crate::filetype::Event;
use crate::literal::Literal;
use crate::{ConfigError, Diagnostic, Result};

#[cfg(test)]
mod tests;

/// A parsed script.
#[derive(Debug, Clone, Default)]
pub struct Script {
	pub statements: Vec<Stmt>,
	pub diagnostics: Vec<Diagnostic>,
}

/// A statement with the line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
	pub line: usize,
	pub kind: Statement,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
	/// `set` (`local == false`) or `setlocal`.
	Set { local: bool, args: Vec<String> },
	Let { name: String, value: Literal },
	Map(MapDef),
	Unmap { modes: &'static [Mode], buffer: bool, lhs: String },
	/// `call plug#begin([dir])`
	PlugBegin(Option<String>),
	Plug { locator: String, options: Option<Literal> },
	/// `call plug#end()`
	PlugEnd,
	Colorscheme(String),
	Syntax(bool),
	Filetype(FiletypeCmd),
	Augroup(String),
	AugroupEnd,
	/// `autocmd!`: clear the current group.
	AutocmdClear,
	Autocmd(AutocmdDef),
	If(Expr),
	ElseIf(Expr),
	Else,
	EndIf,
	/// Any other ex-command, checked against the command table.
	Command { name: String, args: String },
}

/// A `map`-family definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapDef {
	pub modes: &'static [Mode],
	pub recursive: bool,
	pub silent: bool,
	pub buffer: bool,
	pub nowait: bool,
	pub expr: bool,
	pub unique: bool,
	pub lhs: String,
	pub rhs: String,
}

/// `filetype [plugin] [indent] on|off`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiletypeCmd {
	pub enable: bool,
	pub plugin: bool,
	pub indent: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocmdDef {
	/// Explicit group name (`autocmd MyGroup FileType ...`).
	pub group: Option<String>,
	pub events: Vec<Event>,
	pub patterns: Vec<String>,
	pub command: String,
}

const NVO: &[Mode] = &[Mode::Normal, Mode::Visual, Mode::OperatorPending];
const IC: &[Mode] = &[Mode::Insert, Mode::CommandLine];

/// Map commands: name, modes, recursive.
const MAP_COMMANDS: &[(&str, &[Mode], bool)] = &[
	("map", NVO, true),
	("noremap", NVO, false),
	("nmap", &[Mode::Normal], true),
	("nnoremap", &[Mode::Normal], false),
	("vmap", &[Mode::Visual], true),
	("vnoremap", &[Mode::Visual], false),
	("xmap", &[Mode::Visual], true),
	("xnoremap", &[Mode::Visual], false),
	("omap", &[Mode::OperatorPending], true),
	("onoremap", &[Mode::OperatorPending], false),
	("imap", &[Mode::Insert], true),
	("inoremap", &[Mode::Insert], false),
	("cmap", &[Mode::CommandLine], true),
	("cnoremap", &[Mode::CommandLine], false),
];

const UNMAP_COMMANDS: &[(&str, &[Mode])] = &[
	("unmap", NVO),
	("nunmap", &[Mode::Normal]),
	("vunmap", &[Mode::Visual]),
	("xunmap", &[Mode::Visual]),
	("ounmap", &[Mode::OperatorPending]),
	("iunmap", &[Mode::Insert]),
	("cunmap", &[Mode::CommandLine]),
];

const MAP_MODIFIERS: &[&str] = &["<silent>", "<buffer>", "<nowait>", "<expr>", "<unique>", "<script>", "<special>"];

/// Parses a whole script.
pub fn parse_script(src: &str) -> Script {
	let mut script = Script::default();
	let mut function: Option<usize> = None;

	for (line, text) in logical_lines(src) {
		let text = text.trim();
		let text = text.trim_start_matches(':').trim_start();
		if text.is_empty() || text.starts_with('"') {
			continue;
		}

		let (word, bang, rest) = split_command(text);

		if function.is_some() {
			if matches!(word, "endfunction" | "endfunc" | "endfun" | "endf") {
				function = None;
			}
			continue;
		}
		if matches!(word, "function" | "func" | "fun" | "fu") {
			let name = rest.split(['(', ' ']).next().unwrap_or_default().to_string();
			script.diagnostics.push(Diagnostic::new(line, ConfigError::FunctionSkipped(name)));
			function = Some(line);
			continue;
		}

		match parse_command(word, bang, rest) {
			Ok(kinds) => script.statements.extend(kinds.into_iter().map(|kind| Stmt { line, kind })),
			Err(error) => {
				// Keep `if` blocks balanced even when the condition is malformed.
				if word == "if" {
					script.statements.push(Stmt {
						line,
						kind: Statement::If(Expr::Int(0)),
					});
				}
				script.diagnostics.push(Diagnostic::new(line, error));
			}
		}
	}

	if let Some(line) = function {
		script.diagnostics.push(Diagnostic::new(line, ConfigError::Unbalanced("missing endfunction")));
	}
	script
}

/// Joins `\` continuation lines onto the line they continue.
fn logical_lines(src: &str) -> Vec<(usize, String)> {
	let mut lines: Vec<(usize, String)> = Vec::new();
	for (idx, raw) in src.lines().enumerate() {
		let trimmed = raw.trim_start();
		if let Some(cont) = trimmed.strip_prefix('\\')
			&& let Some((_, prev)) = lines.last_mut()
		{
			prev.push_str(cont);
			continue;
		}
		lines.push((idx + 1, raw.to_string()));
	}
	lines
}

/// Splits `text` into the command word, a trailing `!`, and the arguments.
fn split_command(text: &str) -> (&str, bool, &str) {
	let end = text.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '#')).unwrap_or(text.len());
	let (word, rest) = text.split_at(end);
	match rest.strip_prefix('!') {
		Some(rest) => (word, true, rest.trim()),
		None => (word, false, rest.trim()),
	}
}

fn one(kind: Statement) -> Result<Vec<Statement>> {
	Ok(vec![kind])
}

fn parse_command(word: &str, bang: bool, rest: &str) -> Result<Vec<Statement>> {
	if let Some((_, modes, recursive)) = MAP_COMMANDS.iter().find(|(name, ..)| *name == word) {
		let modes = if bang && matches!(word, "map" | "noremap") { IC } else { *modes };
		return parse_map(modes, *recursive, rest).map(|def| vec![Statement::Map(def)]);
	}
	if let Some((_, modes)) = UNMAP_COMMANDS.iter().find(|(name, _)| *name == word) {
		let modes = if bang && word == "unmap" { IC } else { *modes };
		let (flags, lhs) = take_modifiers(rest);
		let lhs = first_arg(lhs).ok_or_else(|| ConfigError::syntax("unmap", "missing key sequence"))?;
		return one(Statement::Unmap {
			modes,
			buffer: flags.contains(&"<buffer>"),
			lhs: lhs.to_string(),
		});
	}

	match word {
		"set" | "se" => one(Statement::Set {
			local: false,
			args: split_set_args(rest),
		}),
		"setlocal" | "setl" => one(Statement::Set {
			local: true,
			args: split_set_args(rest),
		}),
		"let" => parse_let(rest).map(|kind| vec![kind]),
		"call" | "cal" => one(parse_call(strip_comment(rest))?),
		"Plug" => parse_plug(rest).map(|kind| vec![kind]),
		"colorscheme" | "colo" => match first_arg(rest) {
			Some(name) => one(Statement::Colorscheme(name.to_string())),
			None => Err(ConfigError::syntax("colorscheme", "missing scheme name")),
		},
		"syntax" | "syn" => match strip_comment(rest) {
			"on" | "enable" => one(Statement::Syntax(true)),
			"off" => one(Statement::Syntax(false)),
			other => Err(ConfigError::syntax("syntax", format!("unsupported argument '{other}'"))),
		},
		"filetype" | "filet" => parse_filetype(strip_comment(rest)).map(|kind| vec![kind]),
		"augroup" | "aug" => match strip_comment(rest) {
			"" => Err(ConfigError::syntax("augroup", "missing group name")),
			end if end.eq_ignore_ascii_case("end") => one(Statement::AugroupEnd),
			name => one(Statement::Augroup(name.to_string())),
		},
		"autocmd" | "au" => {
			let mut out = Vec::new();
			if bang {
				out.push(Statement::AutocmdClear);
			}
			if !rest.is_empty() {
				out.push(Statement::Autocmd(parse_autocmd(rest)?));
			} else if !bang {
				return Err(ConfigError::syntax("autocmd", "listing autocommands is not supported"));
			}
			Ok(out)
		}
		"if" => one(Statement::If(Expr::parse(rest)?)),
		"elseif" | "elsei" => one(Statement::ElseIf(Expr::parse(rest)?)),
		"else" | "el" => one(Statement::Else),
		"endif" | "en" => one(Statement::EndIf),
		"" => Err(ConfigError::syntax("command", format!("cannot parse '{rest}'"))),
		name => one(Statement::Command {
			name: if bang { format!("{name}!") } else { name.to_string() },
			args: rest.to_string(),
		}),
	}
}

/// Splits `set` arguments on unescaped whitespace, stopping at a `"` comment.
pub fn split_set_args(rest: &str) -> Vec<String> {
	let mut args = Vec::new();
	let mut current = String::new();
	let mut chars = rest.chars().peekable();
	while let Some(c) = chars.next() {
		match c {
			'\\' => match chars.next() {
				Some(next) => current.push(next),
				None => current.push('\\'),
			},
			'"' if current.is_empty() => break,
			c if c.is_whitespace() => {
				if !current.is_empty() {
					args.push(std::mem::take(&mut current));
				}
			}
			c => current.push(c),
		}
	}
	if !current.is_empty() {
		args.push(current);
	}
	args
}

/// Cuts a trailing `" comment`. A `"` inside parentheses or a quoted string,
/// or one glued to the previous word, is not a comment.
fn strip_comment(rest: &str) -> &str {
	let mut depth = 0usize;
	let mut quote = None;
	let mut escaped = false;
	let mut prev = ' ';
	for (i, c) in rest.char_indices() {
		match quote {
			Some('"') if escaped => escaped = false,
			Some('"') if c == '\\' => escaped = true,
			Some(q) if c == q => quote = None,
			Some(_) => {}
			None => match c {
				'"' if depth == 0 && prev.is_whitespace() => return rest[..i].trim_end(),
				'"' | '\'' => quote = Some(c),
				'(' => depth += 1,
				')' => depth = depth.saturating_sub(1),
				_ => {}
			},
		}
		prev = c;
	}
	rest
}

fn first_arg(rest: &str) -> Option<&str> {
	rest.split_whitespace().next()
}

/// Strips leading `<silent>`-style modifiers, returning them and the rest.
fn take_modifiers(mut rest: &str) -> (Vec<&'static str>, &str) {
	let mut flags = Vec::new();
	'outer: loop {
		rest = rest.trim_start();
		for modifier in MAP_MODIFIERS {
			if rest.get(..modifier.len()).is_some_and(|head| head.eq_ignore_ascii_case(modifier)) {
				flags.push(*modifier);
				rest = &rest[modifier.len()..];
				continue 'outer;
			}
		}
		return (flags, rest);
	}
}

fn parse_map(modes: &'static [Mode], recursive: bool, rest: &str) -> Result<MapDef> {
	let (flags, rest) = take_modifiers(rest);
	let split = rest.find(char::is_whitespace).unwrap_or(rest.len());
	let (lhs, rhs) = rest.split_at(split);
	if lhs.is_empty() {
		return Err(ConfigError::syntax("map", "missing key sequence"));
	}
	let rhs = rhs.trim();
	if rhs.is_empty() {
		return Err(ConfigError::syntax("map", format!("'{lhs}' has no right-hand side")));
	}

	Ok(MapDef {
		modes,
		recursive,
		silent: flags.contains(&"<silent>"),
		buffer: flags.contains(&"<buffer>"),
		nowait: flags.contains(&"<nowait>"),
		expr: flags.contains(&"<expr>"),
		unique: flags.contains(&"<unique>"),
		lhs: lhs.to_string(),
		rhs: rhs.to_string(),
	})
}

fn parse_let(rest: &str) -> Result<Statement> {
	let (name, value) = rest.split_once('=').ok_or_else(|| ConfigError::syntax("let", "expected '='"))?;
	let name = name.trim();
	if name.is_empty() || name.contains(char::is_whitespace) || name.ends_with(['.', '+', '-']) {
		return Err(ConfigError::syntax("let", format!("unsupported target '{name}'")));
	}
	Ok(Statement::Let {
		name: name.to_string(),
		value: Literal::parse(value)?,
	})
}

fn parse_call(rest: &str) -> Result<Statement> {
	let (func, args) = match rest.split_once('(') {
		Some((func, args)) => (func.trim(), args.trim_end()),
		None => return Err(ConfigError::syntax("call", format!("expected a function call, got '{rest}'"))),
	};
	let args = args
		.strip_suffix(')')
		.ok_or_else(|| ConfigError::syntax("call", format!("unterminated call to {func}()")))?
		.trim();

	match func {
		"plug#begin" if args.is_empty() => Ok(Statement::PlugBegin(None)),
		"plug#begin" => match Literal::parse(args)? {
			Literal::Str(dir) => Ok(Statement::PlugBegin(Some(dir))),
			other => Err(ConfigError::syntax("call", format!("plug#begin() expects a directory, got {other}"))),
		},
		"plug#end" => Ok(Statement::PlugEnd),
		_ => Ok(Statement::Command {
			name: "call".to_string(),
			args: rest.to_string(),
		}),
	}
}

fn parse_plug(rest: &str) -> Result<Statement> {
	let (locator, after) = Literal::parse_prefix(rest)?;
	let Literal::Str(locator) = locator else {
		return Err(ConfigError::syntax("Plug", format!("expected a quoted locator, got {locator}")));
	};

	let after = after.trim();
	let options = if after.is_empty() || after.starts_with('"') {
		None
	} else {
		let dict = after
			.strip_prefix(',')
			.ok_or_else(|| ConfigError::syntax("Plug", format!("unexpected '{after}'")))?;
		Some(Literal::parse(dict)?)
	};
	Ok(Statement::Plug { locator, options })
}

fn parse_filetype(rest: &str) -> Result<Statement> {
	let mut cmd = FiletypeCmd {
		enable: true,
		plugin: false,
		indent: false,
	};
	let mut switch = None;
	for word in rest.split_whitespace() {
		match word {
			"plugin" => cmd.plugin = true,
			"indent" => cmd.indent = true,
			"on" | "detect" => switch = Some(true),
			"off" => switch = Some(false),
			other => return Err(ConfigError::syntax("filetype", format!("unexpected '{other}'"))),
		}
	}
	cmd.enable = switch.ok_or_else(|| ConfigError::syntax("filetype", "expected 'on' or 'off'"))?;
	Ok(Statement::Filetype(cmd))
}

fn parse_events(word: &str) -> Option<Vec<Event>> {
	word.split(',').map(|e| e.parse().ok()).collect()
}

fn parse_autocmd(rest: &str) -> Result<AutocmdDef> {
	let mut words = rest.split_whitespace();
	let first = words.next().ok_or_else(|| ConfigError::syntax("autocmd", "missing event"))?;

	let unknown = || {
		let name = first.split(',').find(|e| e.parse::<Event>().is_err()).unwrap_or(first);
		ConfigError::UnknownEvent(name.to_string())
	};
	let (group, events) = match parse_events(first) {
		Some(events) => (None, events),
		None => {
			let second = words.next().ok_or_else(unknown)?;
			(Some(first.to_string()), parse_events(second).ok_or_else(unknown)?)
		}
	};

	let patterns: Vec<String> = words
		.next()
		.ok_or_else(|| ConfigError::syntax("autocmd", "missing pattern"))?
		.split(',')
		.map(str::to_string)
		.collect();

	// Everything after the pattern, minus `++once`/`++nested`, is the command.
	let after_pattern = rest_after_words(rest, if group.is_some() { 3 } else { 2 });
	let mut command = after_pattern;
	while let Some(stripped) = command.strip_prefix("++once").or_else(|| command.strip_prefix("++nested")) {
		command = stripped.trim_start();
	}
	if command.is_empty() {
		return Err(ConfigError::syntax("autocmd", "missing command"));
	}

	Ok(AutocmdDef {
		group,
		events,
		patterns,
		command: command.to_string(),
	})
}

/// The text remaining after skipping `n` whitespace-separated words.
pub(crate) fn rest_after_words(text: &str, n: usize) -> &str {
	let mut rest = text.trim_start();
	for _ in 0..n {
		let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
		rest = rest[end..].trim_start();
	}
	rest
}
