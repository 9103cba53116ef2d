//! Statement evaluation.
//!
//! Statements run in script order against a [`Session`]. Every failure is
//! recorded as a [`Diagnostic`] and evaluation continues with the next
//! statement. Plugins declared in a `plug#begin()`/`plug#end()` block are
//! resolved when the block closes, so their contributions are visible to
//! every statement after `plug#end()` and to none before it.

use std::path::{Path, PathBuf};

use rcload_keymap::parser::{Node, expand_leaders, parse_notation};
use rcload_keymap::{Action, Binding, KeyBindingTable, Provider, TermProfile};
use rcload_options::{AssignOp, Assignment, OptionScope, OptionValue, OptionsRegistry, parse};
use rcload_plugins::{DirResolver, Manifest, PlugOptions, PluginEntry, PluginResolver, resolve_manifest};

use crate::cond::{CondEnv, Expr, Value};
use crate::filetype::{Event, FileTypeRule, Patterns, RuleAction};
use crate::literal::Literal;
use crate::script::{AutocmdDef, FiletypeCmd, MapDef, Statement, Stmt, parse_script, rest_after_words, split_set_args};
use crate::session::{Session, normalize_var, register_contributions};
use crate::settings::expand_home;
use crate::{ConfigError, Diagnostic, Result};


/// Features `has()` reports when the host does not say otherwise.
pub const DEFAULT_FEATURES: &[&str] = &["autocmd", "eval", "mouse", "syntax", "termguicolors", "unix"];

/// Host environment a script is evaluated in.
pub struct LoadContext<'a> {
	pub profile: TermProfile,
	/// Plugin resolver; when `None`, installed plugins are read from disk.
	pub resolver: Option<&'a dyn PluginResolver>,
	/// Install directory overriding the one given to `plug#begin()`.
	pub plugin_dir: Option<PathBuf>,
	/// Names `has()` is true for.
	pub features: Vec<String>,
	pub registry: OptionsRegistry,
}

impl Default for LoadContext<'_> {
	fn default() -> Self {
		Self {
			profile: TermProfile::default(),
			resolver: None,
			plugin_dir: None,
			features: DEFAULT_FEATURES.iter().map(|s| s.to_string()).collect(),
			registry: OptionsRegistry::builtin(),
		}
	}
}

impl<'a> LoadContext<'a> {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_profile(mut self, profile: TermProfile) -> Self {
		self.profile = profile;
		self
	}

	pub fn with_resolver(mut self, resolver: &'a dyn PluginResolver) -> Self {
		self.resolver = Some(resolver);
		self
	}

	pub fn with_plugin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
		self.plugin_dir = Some(dir.into());
		self
	}

	pub fn with_features(mut self, features: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.features = features.into_iter().map(Into::into).collect();
		self
	}

	pub fn with_registry(mut self, registry: OptionsRegistry) -> Self {
		self.registry = registry;
		self
	}
}

/// Outcome of loading a script.
#[derive(Debug)]
pub struct LoadReport {
	pub session: Session,
	/// Every problem found, in line order.
	pub diagnostics: Vec<Diagnostic>,
}

impl LoadReport {
	pub fn has_errors(&self) -> bool {
		self.diagnostics.iter().any(Diagnostic::is_error)
	}

	pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
		self.diagnostics.iter().filter(|d| d.is_error())
	}
}

/// Parses and evaluates `src`.
pub fn load_str(src: &str, ctx: &LoadContext<'_>) -> LoadReport {
	let script = parse_script(src);
	let mut eval = Evaluator::new(ctx);
	eval.diagnostics.extend(script.diagnostics);
	for stmt in &script.statements {
		eval.statement(stmt);
	}
	eval.finish()
}

/// Reads and evaluates the script at `path`. Only failing to read it is an error.
pub fn load_file(path: impl AsRef<Path>, ctx: &LoadContext<'_>) -> Result<LoadReport> {
	let path = path.as_ref();
	let src = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
		path: path.to_path_buf(),
		message: e.to_string(),
	})?;
	tracing::debug!(domain = "config", path = %path.display(), "loading script");
	Ok(load_str(&src, ctx))
}

/// State of one `if` block.
struct CondFrame {
	/// The enclosing block is live.
	parent: bool,
	/// Some branch of this block was taken.
	taken: bool,
	/// The current branch is live.
	active: bool,
	seen_else: bool,
}

/// An open `plug#begin()` block.
struct PlugBlock {
	line: usize,
	manifest: Manifest,
	/// Declaring line of each entry, by plugin name.
	lines: Vec<(String, usize)>,
}

struct Evaluator<'c, 'r> {
	ctx: &'c LoadContext<'r>,
	session: Session,
	diagnostics: Vec<Diagnostic>,
	conds: Vec<(usize, CondFrame)>,
	group: Option<(usize, String)>,
	block: Option<PlugBlock>,
	/// Error from the rejected part of a partially valid rule.
	pending_error: Option<ConfigError>,
}

impl<'c, 'r> Evaluator<'c, 'r> {
	fn new(ctx: &'c LoadContext<'r>) -> Self {
		let keymap = KeyBindingTable::new(ctx.profile.clone());
		Self {
			ctx,
			session: Session::new(ctx.registry.clone(), keymap),
			diagnostics: Vec::new(),
			conds: Vec::new(),
			group: None,
			block: None,
			pending_error: None,
		}
	}

	fn report(&mut self, line: usize, error: impl Into<ConfigError>) {
		let diagnostic = Diagnostic::new(line, error);
		tracing::warn!(domain = "config", line, severity = %diagnostic.severity, error = %diagnostic.error, "script diagnostic");
		self.diagnostics.push(diagnostic);
	}

	fn active(&self) -> bool {
		self.conds.last().is_none_or(|(_, frame)| frame.active)
	}

	fn finish(mut self) -> LoadReport {
		if let Some((line, _)) = self.conds.last() {
			let line = *line;
			self.report(line, ConfigError::Unbalanced("missing endif"));
		}
		if let Some((line, _)) = self.group.take() {
			self.report(line, ConfigError::Unbalanced("missing 'augroup END'"));
		}
		if let Some(block) = self.block.take() {
			self.report(block.line, ConfigError::Unbalanced("missing 'call plug#end()'; plugins in the block were not loaded"));
			for entry in block.manifest.entries() {
				self.session.manifest.push(entry.clone());
			}
		}
		self.diagnostics.sort_by_key(|d| d.line);
		LoadReport {
			session: self.session,
			diagnostics: self.diagnostics,
		}
	}

	fn statement(&mut self, stmt: &Stmt) {
		let line = stmt.line;
		match &stmt.kind {
			Statement::If(expr) => return self.begin_if(line, expr),
			Statement::ElseIf(expr) => return self.else_if(line, expr),
			Statement::Else => return self.else_branch(line),
			Statement::EndIf => {
				if self.conds.pop().is_none() {
					self.report(line, ConfigError::Unbalanced("endif without if"));
				}
				return;
			}
			_ if !self.active() => return,
			_ => {}
		}

		tracing::trace!(domain = "config", line, statement = ?stmt.kind, "evaluating");
		match &stmt.kind {
			Statement::Set { local, args } => self.set(line, *local, args),
			Statement::Let { name, value } => self.let_var(line, name, value),
			Statement::Map(def) => self.map(line, def),
			Statement::Unmap { modes, buffer: _, lhs } => self.unmap(line, modes, lhs),
			Statement::PlugBegin(dir) => self.plug_begin(line, dir.as_deref()),
			Statement::Plug { locator, options } => self.plug(line, locator, options.as_ref()),
			Statement::PlugEnd => self.plug_end(line),
			Statement::Colorscheme(name) => self.colorscheme(line, name),
			Statement::Syntax(on) => self.session.features.syntax = *on,
			Statement::Filetype(cmd) => self.filetype(*cmd),
			Statement::Augroup(name) => self.group = Some((line, name.clone())),
			Statement::AugroupEnd => {
				if self.group.take().is_none() {
					self.report(line, ConfigError::Unbalanced("'augroup END' without augroup"));
				}
			}
			Statement::AutocmdClear => {
				let group = self.group.as_ref().map(|(_, name)| name.clone());
				self.session.rules.retain(|rule| rule.group != group);
			}
			Statement::Autocmd(def) => self.autocmd(line, def),
			Statement::Command { name, args } => self.command(line, name, args),
			Statement::If(_) | Statement::ElseIf(_) | Statement::Else | Statement::EndIf => {}
		}
	}

	fn condition(&mut self, line: usize, expr: &Expr) -> bool {
		match expr.test(&*self) {
			Ok(value) => value,
			Err(error) => {
				self.report(line, error);
				false
			}
		}
	}

	fn begin_if(&mut self, line: usize, expr: &Expr) {
		let parent = self.active();
		let value = parent && self.condition(line, expr);
		self.conds.push((line, CondFrame {
			parent,
			taken: value,
			active: value,
			seen_else: false,
		}));
	}

	fn else_if(&mut self, line: usize, expr: &Expr) {
		let Some((_, frame)) = self.conds.last() else {
			return self.report(line, ConfigError::Unbalanced("elseif without if"));
		};
		if frame.seen_else {
			return self.report(line, ConfigError::Unbalanced("elseif after else"));
		}
		let live = frame.parent && !frame.taken;
		let value = live && self.condition(line, expr);
		if let Some((_, frame)) = self.conds.last_mut() {
			frame.active = value;
			frame.taken |= value;
		}
	}

	fn else_branch(&mut self, line: usize) {
		match self.conds.last_mut() {
			Some((_, frame)) if !frame.seen_else => {
				frame.active = frame.parent && !frame.taken;
				frame.taken = true;
				frame.seen_else = true;
			}
			Some(_) => self.report(line, ConfigError::Unbalanced("multiple else")),
			None => self.report(line, ConfigError::Unbalanced("else without if")),
		}
	}

	fn set(&mut self, line: usize, local: bool, args: &[String]) {
		for arg in args {
			if let Err(error) = self.set_one(local, arg) {
				self.report(line, error);
			}
		}
	}

	fn set_one(&mut self, local: bool, arg: &str) -> Result<()> {
		let registry = &self.session.registry;
		let (id, op) = Assignment::parse(arg)?.resolve(registry)?;
		let def = registry.def(id);
		let current = self.session.options().resolve(id);
		let value = parse::apply(registry, id, &op, &current)?;
		tracing::debug!(domain = "config", option = def.name, %value, "set");
		self.session.global.set(id, value);
		// A global-only option has no local value; `setlocal` sets the global one.
		if local && def.scope == OptionScope::Global {
			return Err(ConfigError::ScopeMismatch(def.name.to_string()));
		}
		Ok(())
	}

	fn let_var(&mut self, line: usize, name: &str, value: &Literal) {
		if let Some(option) = name.strip_prefix('&') {
			let text = match value {
				Literal::Str(s) => s.clone(),
				Literal::Int(n) => n.to_string(),
				other => return self.report(line, ConfigError::syntax("let", format!("cannot assign {other} to &{option}"))),
			};
			let option = option.strip_prefix("l:").or_else(|| option.strip_prefix("g:")).unwrap_or(option);
			if let Err(error) = self.assign_option(option, &text) {
				self.report(line, error);
			}
			return;
		}
		let name = normalize_var(name);
		tracing::debug!(domain = "config", var = %name, %value, "let");
		self.session.vars.insert(name, value.clone());
	}

	fn assign_option(&mut self, name: &str, text: &str) -> Result<()> {
		let registry = &self.session.registry;
		let id = registry.lookup(name)?;
		let current = self.session.options().resolve(id);
		let value = match registry.def(id).value_type {
			rcload_options::OptionType::Bool => OptionValue::Bool(text.trim() != "0" && !text.is_empty()),
			_ => parse::apply(registry, id, &AssignOp::Assign(text.to_string()), &current)?,
		};
		registry.validate(id, &value)?;
		self.session.global.set(id, value);
		Ok(())
	}

	fn parse_keys(&self, text: &str) -> Result<Vec<Node>> {
		let keys = parse_notation(text).map_err(|error| ConfigError::Chord {
			keys: text.to_string(),
			error,
		})?;
		Ok(expand_leaders(&keys, &self.session.leader(), &self.session.local_leader()))
	}

	fn map(&mut self, line: usize, def: &MapDef) {
		if let Err(error) = self.try_map(def) {
			self.report(line, error);
		}
	}

	fn try_map(&mut self, def: &MapDef) -> Result<()> {
		if def.expr {
			return Err(ConfigError::syntax("map", format!("<expr> mapping for '{}' is not evaluated", def.lhs)));
		}
		let keys = self.parse_keys(&def.lhs)?;
		let action = self.classify_rhs(&def.rhs)?;

		if def.unique && def.modes.iter().any(|mode| self.session.keymap.get(*mode, &keys).is_some()) {
			return Err(ConfigError::syntax("map", format!("'{}' already exists and <unique> was given", def.lhs)));
		}

		let binding = Binding::new(action).recursive(def.recursive).silent(def.silent).buffer_local(def.buffer);
		for mode in def.modes {
			self.session.keymap.bind(*mode, keys.clone(), binding.clone());
		}
		Ok(())
	}

	/// Classifies a mapping's right-hand side.
	fn classify_rhs(&self, rhs: &str) -> Result<Action> {
		if let Some(name) = plug_mapping(rhs) {
			return Ok(Action::Plug(name.to_string()));
		}
		if let Some((name, args)) = ex_command(rhs) {
			let args = args.split_whitespace().map(str::to_string).collect();
			return Ok(if name.starts_with(|c: char| c.is_ascii_uppercase()) {
				Action::external(name, args)
			} else {
				Action::builtin(name, args)
			});
		}
		self.parse_keys(rhs).map(Action::Keys)
	}

	fn unmap(&mut self, line: usize, modes: &[rcload_keymap::Mode], lhs: &str) {
		let keys = match self.parse_keys(lhs) {
			Ok(keys) => keys,
			Err(error) => return self.report(line, error),
		};
		let mut removed = false;
		for mode in modes {
			removed |= self.session.keymap.unbind(*mode, &keys).is_some();
		}
		if !removed {
			self.report(line, ConfigError::NoSuchMapping(lhs.to_string()));
		}
	}

	fn plug_begin(&mut self, line: usize, dir: Option<&str>) {
		if let Some(open) = &self.block {
			let open = open.line;
			self.report(line, ConfigError::Unbalanced("plug#begin() while a block is open"));
			tracing::debug!(domain = "plugins", previous = open, "discarding unclosed plugin block");
		}
		let mut manifest = Manifest::new();
		manifest.dir = dir.map(expand_home);
		self.block = Some(PlugBlock {
			line,
			manifest,
			lines: Vec::new(),
		});
		self.session.commands.register_plugin_manager();
	}

	fn plug(&mut self, line: usize, locator: &str, options: Option<&Literal>) {
		if self.block.is_none() {
			return self.report(line, ConfigError::PlugOutsideBlock);
		}
		let options = match options.map(plug_options).transpose() {
			Ok(options) => options.unwrap_or_default(),
			Err(error) => return self.report(line, error),
		};
		let entry = match PluginEntry::new(locator, options) {
			Ok(entry) => entry,
			Err(error) => return self.report(line, error),
		};
		if let Some(block) = &mut self.block {
			block.lines.push((entry.name(), line));
			block.manifest.push(entry);
		}
	}

	fn plug_end(&mut self, line: usize) {
		let Some(block) = self.block.take() else {
			return self.report(line, ConfigError::Unbalanced("plug#end() without plug#begin()"));
		};

		let fallback;
		let resolver: &dyn PluginResolver = match self.ctx.resolver {
			Some(resolver) => resolver,
			None => {
				let root = self
					.ctx
					.plugin_dir
					.clone()
					.or_else(|| block.manifest.dir.clone())
					.or_else(|| dirs::home_dir().map(|home| home.join(".vim").join("plugged")))
					.unwrap_or_else(|| PathBuf::from("plugged"));
				fallback = DirResolver::new(root);
				&fallback
			}
		};

		let report = resolve_manifest(&block.manifest, resolver);
		let declared_at = |name: &str| block.lines.iter().rev().find(|(n, _)| n == name).map_or(line, |(_, l)| *l);

		for (entry, error) in &report.failed {
			let at = declared_at(&entry.name());
			self.report(at, error.clone());
		}
		for (entry, plugin) in &report.loaded {
			let options = &entry.options;
			for trigger in &options.on_commands {
				match plug_mapping(trigger) {
					Some(mapping) => self.session.commands.register_mapping(mapping, Provider::Stub(plugin.name.clone())),
					None => self.session.commands.register_command(trigger.clone(), Provider::Stub(plugin.name.clone())),
				}
			}
			if !options.for_filetypes.is_empty() {
				self.session.deferred.push((entry.clone(), plugin.clone()));
				continue;
			}
			if !options.on_commands.is_empty() {
				continue;
			}
			register_contributions(&mut self.session.commands, plugin);
			for scheme in &plugin.info.colorschemes {
				if !self.session.colorschemes.contains(scheme) {
					self.session.colorschemes.push(scheme.clone());
				}
			}
			for (glob, filetype) in &plugin.info.filetypes {
				match Patterns::globs([glob.as_str()]) {
					Ok(patterns) => self.session.detections.push((patterns, filetype.clone())),
					Err(error) => {
						let at = declared_at(&plugin.name);
						self.report(at, ConfigError::syntax("plugin detection", format!("{}: {error}", plugin.name)));
					}
				}
			}
		}

		for entry in block.manifest.entries() {
			self.session.manifest.push(entry.clone());
		}
		if self.session.manifest.dir.is_none() {
			self.session.manifest.dir = block.manifest.dir.clone();
		}
		self.session.plugins.extend(report);
	}

	fn colorscheme(&mut self, line: usize, name: &str) {
		if self.session.colorschemes.iter().any(|s| s == name) {
			tracing::debug!(domain = "config", colorscheme = name, "colorscheme");
			self.session.colorscheme = Some(name.to_string());
		} else {
			self.report(line, ConfigError::UnknownColorscheme(name.to_string()));
		}
	}

	fn filetype(&mut self, cmd: FiletypeCmd) {
		let features = &mut self.session.features;
		if cmd.enable {
			features.detect = true;
			features.plugin |= cmd.plugin;
			features.indent |= cmd.indent;
		} else if cmd.plugin || cmd.indent {
			features.plugin &= !cmd.plugin;
			features.indent &= !cmd.indent;
		} else {
			features.detect = false;
		}
	}

	fn autocmd(&mut self, line: usize, def: &AutocmdDef) {
		let group = def.group.clone().or_else(|| self.group.as_ref().map(|(_, name)| name.clone()));
		// The command only compiles differently for `FileType`, so it is
		// compiled at most twice and each problem is reported once.
		let mut compiled: [Option<Option<RuleAction>>; 2] = [None, None];
		let mut reported = Vec::new();
		for event in &def.events {
			let key = usize::from(*event == Event::FileType);
			let action = match &compiled[key] {
				Some(action) => action.clone(),
				None => {
					let result = self.rule_action(*event, &def.command);
					let mut errors: Vec<ConfigError> = self.pending_error.take().into_iter().collect();
					let action = match result {
						Ok(action) => action,
						Err(error) => {
							errors.push(error);
							None
						}
					};
					for error in errors {
						if !reported.contains(&error) {
							reported.push(error.clone());
							self.report(line, error);
						}
					}
					compiled[key] = Some(action.clone());
					action
				}
			};
			let Some(action) = action else {
				continue;
			};
			let patterns = if event.matches_paths() {
				match Patterns::globs(def.patterns.iter().map(|p| p.as_str())) {
					Ok(patterns) => patterns,
					Err(error) => {
						let error = ConfigError::syntax("autocmd pattern", error.to_string());
						if !reported.contains(&error) {
							reported.push(error.clone());
							self.report(line, error);
						}
						continue;
					}
				}
			} else {
				Patterns::filetypes(def.patterns.iter().cloned())
			};
			tracing::debug!(domain = "config", line, %event, %patterns, action = %action.describe(), "autocmd");
			self.session.rules.push(FileTypeRule {
				line,
				group: group.clone(),
				event: *event,
				patterns,
				action,
			});
		}
	}

	/// Compiles an autocommand's command. `Ok(None)` means nothing is left to run.
	fn rule_action(&mut self, event: Event, command: &str) -> Result<Option<RuleAction>> {
		let command = command.trim().trim_start_matches(':').trim_start();
		if is_trim_whitespace(command) {
			return Ok(Some(RuleAction::TrimTrailingWhitespace));
		}

		let word_end = command.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_')).unwrap_or(command.len());
		let (word, rest) = (&command[..word_end], command[word_end..].trim());
		match word {
			"set" | "se" | "setlocal" | "setl" => self.rule_options(event, rest),
			"setfiletype" | "setf" => match rest.split_whitespace().next() {
				Some(ft) => Ok(Some(RuleAction::SetFiletype(ft.to_string()))),
				None => Err(ConfigError::syntax("setfiletype", "missing file type")),
			},
			"autocmd" | "au" => {
				let mut words = rest.split_whitespace();
				let nested = (words.next(), words.next());
				match nested {
					(Some(ev), Some("<buffer>")) if ev.parse::<Event>() == Ok(Event::BufWritePre) => {
						let inner = rest_after_words(rest, 2);
						match self.rule_action(Event::BufWritePre, inner)? {
							Some(inner) => Ok(Some(RuleAction::OnWrite(Box::new(inner)))),
							None => Ok(None),
						}
					}
					_ => Err(ConfigError::syntax("autocmd", format!("unsupported nested autocommand '{rest}'"))),
				}
			}
			"" => Err(ConfigError::syntax("autocmd", format!("cannot parse command '{command}'"))),
			name => Ok(Some(RuleAction::Command {
				name: name.to_string(),
				args: rest.to_string(),
			})),
		}
	}

	/// `setlocal` arguments inside a rule: resolved now, applied on activation.
	fn rule_options(&mut self, event: Event, rest: &str) -> Result<Option<RuleAction>> {
		let registry = &self.session.registry;
		let mut ops = Vec::new();
		let mut filetype = None;
		let mut first_error = None;

		for arg in split_set_args(rest) {
			let resolved = Assignment::parse(&arg).and_then(|a| a.resolve(registry)).map_err(ConfigError::from);
			let (id, op) = match resolved {
				Ok(resolved) => resolved,
				Err(error) => {
					first_error.get_or_insert(error);
					continue;
				}
			};
			let def = registry.def(id);
			if def.name == rcload_options::keys::FILETYPE
				&& event != Event::FileType
				&& let AssignOp::Assign(ft) = &op
			{
				filetype = Some(ft.clone());
				continue;
			}
			if def.scope == OptionScope::Global {
				first_error.get_or_insert(ConfigError::ScopeMismatch(def.name.to_string()));
				continue;
			}
			if let Err(error) = parse::apply(registry, id, &op, &def.default_value()) {
				first_error.get_or_insert(error.into());
				continue;
			}
			ops.push((id, op));
		}

		if let Some(error) = first_error {
			if ops.is_empty() && filetype.is_none() {
				return Err(error);
			}
			// Keep the valid part of the line, report the rest.
			self.pending_error = Some(error);
		}
		Ok(match (filetype, ops.is_empty()) {
			(Some(ft), true) => Some(RuleAction::SetFiletype(ft)),
			(_, false) => Some(RuleAction::Options(ops)),
			(None, true) => None,
		})
	}

	fn command(&mut self, line: usize, name: &str, args: &str) {
		let base = name.trim_end_matches('!');
		if self.session.commands.command(base).is_some() {
			tracing::debug!(domain = "config", line, command = name, args, "command not evaluated at startup");
		} else {
			self.report(line, ConfigError::UnknownCommand(name.to_string()));
		}
	}
}

impl CondEnv for Evaluator<'_, '_> {
	fn option(&self, name: &str) -> Option<Value> {
		if name == "term" {
			return Some(Value::Str(self.ctx.profile.term.clone()));
		}
		let value = self.session.options().resolve_name(name)?;
		Some(match value {
			OptionValue::Bool(b) => b.into(),
			OptionValue::Int(n) => Value::Int(n),
			other => Value::Str(other.to_string()),
		})
	}

	fn var(&self, name: &str) -> Option<Value> {
		match self.session.vars.get(&normalize_var(name))? {
			Literal::Int(n) => Some(Value::Int(*n)),
			Literal::Str(s) => Some(Value::Str(s.clone())),
			other => Some(Value::Str(other.to_string())),
		}
	}

	fn has(&self, feature: &str) -> bool {
		self.ctx.features.iter().any(|f| f == feature) || (feature == "termguicolors" && self.ctx.profile.truecolor)
	}
}

/// `<Plug>(name)` or `<Plug>Name` on its own.
fn plug_mapping(text: &str) -> Option<&str> {
	let rest = text.get(..6).filter(|head| head.eq_ignore_ascii_case("<plug>")).map(|_| &text[6..])?;
	let name = match rest.strip_prefix('(') {
		Some(inner) => inner.strip_suffix(')')?,
		None => rest,
	};
	(!name.is_empty() && !name.contains(char::is_whitespace)).then_some(name)
}

/// `:Name args<CR>` (optionally `:<C-u>` or `<Cmd>`) with a single command.
fn ex_command(rhs: &str) -> Option<(&str, &str)> {
	let body = if let Some(rest) = rhs.strip_prefix(':') {
		strip_prefix_ignore_case(rest, "<C-u>").unwrap_or(rest)
	} else {
		strip_prefix_ignore_case(rhs, "<Cmd>")?
	};
	let body = strip_suffix_ignore_case(body, "<CR>")?;
	if body.to_ascii_lowercase().contains("<cr>") || body.contains('|') {
		return None;
	}
	let body = body.trim();
	let end = body.find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '#')).unwrap_or(body.len());
	if end == 0 {
		return None;
	}
	let (name, args) = body.split_at(end);
	let args = args.strip_prefix('!').unwrap_or(args);
	Some((name, args.trim()))
}

fn strip_prefix_ignore_case<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
	text.get(..prefix.len()).filter(|head| head.eq_ignore_ascii_case(prefix)).map(|_| &text[prefix.len()..])
}

fn strip_suffix_ignore_case<'t>(text: &'t str, suffix: &str) -> Option<&'t str> {
	let split = text.len().checked_sub(suffix.len())?;
	text.get(split..).filter(|tail| tail.eq_ignore_ascii_case(suffix)).map(|_| &text[..split])
}

/// `%s/\s\+$//e`, optionally prefixed with `keeppatterns` or `silent!`.
fn is_trim_whitespace(command: &str) -> bool {
	let mut command = command;
	for prefix in ["keeppatterns ", "keepp ", "silent! ", "sil! "] {
		if let Some(rest) = command.strip_prefix(prefix) {
			command = rest.trim_start();
		}
	}
	["%s/\\s\\+$//", "%s/\\s\\+\\$//"]
		.iter()
		.find_map(|form| command.strip_prefix(form))
		.is_some_and(|flags| flags.chars().all(|c| matches!(c, 'e' | 'g' | 'I')))
}

/// Converts a `Plug` option dictionary.
fn plug_options(literal: &Literal) -> Result<PlugOptions> {
	let Literal::Dict(entries) = literal else {
		return Err(ConfigError::syntax("Plug options", format!("expected a dictionary, got {literal}")));
	};
	let string = |key: &str, value: &Literal| {
		value
			.as_str()
			.map(str::to_string)
			.ok_or_else(|| ConfigError::syntax("Plug options", format!("'{key}' must be a string")))
	};
	let strings = |key: &str, value: &Literal| {
		value
			.strings()
			.ok_or_else(|| ConfigError::syntax("Plug options", format!("'{key}' must be a string or a list of strings")))
	};

	let mut options = PlugOptions::default();
	for (key, value) in entries {
		match key.as_str() {
			"branch" => options.branch = Some(string(key, value)?),
			"tag" => options.tag = Some(string(key, value)?),
			"commit" => options.commit = Some(string(key, value)?),
			"as" => options.rename = Some(string(key, value)?),
			"do" => options.on_update = Some(string(key, value)?),
			"rtp" => options.rtp = Some(string(key, value)?),
			"on" => options.on_commands = strings(key, value)?,
			"for" => options.for_filetypes = strings(key, value)?,
			"frozen" => options.frozen = value.truthy(),
			"dir" => return Err(ConfigError::syntax("Plug options", "'dir' is not supported; use plug#begin()")),
			other => return Err(ConfigError::syntax("Plug options", format!("unknown option '{other}'"))),
		}
	}
	Ok(options)
}
