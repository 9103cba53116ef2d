//! Evaluated script state.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rcload_keymap::parser::{Node, expand_leaders, parse_chord, parse_notation};
use rcload_keymap::{CommandTable, InvokeError, Invocation, KeyBindingTable, Mode, Provider};
use rcload_options::{OptionResolver, OptionStore, OptionsRegistry, parse};
use rcload_plugins::{Manifest, ManifestReport, PluginEntry, ResolvedPlugin};

use crate::filetype::{Event, FileTypeRule, Patterns, RuleAction, detect_filetype, trim_trailing_whitespace};
use crate::literal::Literal;
use crate::{ConfigError, Result};


/// Color schemes shipped with the host.
pub const BUILTIN_COLORSCHEMES: &[&str] = &[
	"blue",
	"darkblue",
	"default",
	"delek",
	"desert",
	"elflord",
	"evening",
	"habamax",
	"industry",
	"koehler",
	"lunaperche",
	"morning",
	"murphy",
	"pablo",
	"peachpuff",
	"quiet",
	"retrobox",
	"ron",
	"shine",
	"slate",
	"sorbet",
	"torte",
	"wildcharm",
	"zaibatsu",
	"zellner",
];

/// `syntax` and `filetype` switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Features {
	pub syntax: bool,
	pub detect: bool,
	pub plugin: bool,
	pub indent: bool,
}

/// Everything a script produced.
///
/// Built once by the loader and then only read. Per-buffer state lives in
/// a [`BufferView`] created by [`Session::activate`].
#[derive(Debug)]
pub struct Session {
	pub(crate) registry: OptionsRegistry,
	pub(crate) global: OptionStore,
	pub(crate) rules: Vec<FileTypeRule>,
	pub(crate) keymap: KeyBindingTable,
	pub(crate) commands: CommandTable,
	pub(crate) manifest: Manifest,
	pub(crate) plugins: ManifestReport,
	/// Plugins loaded only when a buffer of one of their file types opens.
	pub(crate) deferred: Vec<(PluginEntry, ResolvedPlugin)>,
	/// Plugin file-type detections, in load order.
	pub(crate) detections: Vec<(Patterns, String)>,
	pub(crate) vars: IndexMap<String, Literal>,
	pub(crate) features: Features,
	pub(crate) colorschemes: Vec<String>,
	pub(crate) colorscheme: Option<String>,
}

impl Session {
	pub(crate) fn new(registry: OptionsRegistry, keymap: KeyBindingTable) -> Self {
		Self {
			registry,
			global: OptionStore::new(),
			rules: Vec::new(),
			keymap,
			commands: CommandTable::with_host_commands(),
			manifest: Manifest::new(),
			plugins: ManifestReport::default(),
			deferred: Vec::new(),
			detections: Vec::new(),
			vars: IndexMap::new(),
			features: Features::default(),
			colorschemes: BUILTIN_COLORSCHEMES.iter().map(|s| s.to_string()).collect(),
			colorscheme: None,
		}
	}

	pub fn registry(&self) -> &OptionsRegistry {
		&self.registry
	}

	/// Global option layer written by top-level `set`.
	pub fn global(&self) -> &OptionStore {
		&self.global
	}

	/// Resolver over the global layer and the host defaults.
	///
	/// File-type overrides are only visible through [`BufferView::options`].
	pub fn options(&self) -> OptionResolver<'_> {
		OptionResolver::new(&self.registry).with_global(&self.global)
	}

	pub fn keymap(&self) -> &KeyBindingTable {
		&self.keymap
	}

	pub fn commands(&self) -> &CommandTable {
		&self.commands
	}

	/// Every declared plugin, in declaration order.
	pub fn manifest(&self) -> &Manifest {
		&self.manifest
	}

	pub fn plugins(&self) -> &ManifestReport {
		&self.plugins
	}

	pub fn rules(&self) -> &[FileTypeRule] {
		&self.rules
	}

	pub fn features(&self) -> Features {
		self.features
	}

	pub fn colorscheme(&self) -> Option<&str> {
		self.colorscheme.as_deref()
	}

	/// Color schemes available at the end of the script.
	pub fn colorschemes(&self) -> &[String] {
		&self.colorschemes
	}

	/// Looks up a script variable; bare names are global (`g:`).
	pub fn var(&self, name: &str) -> Option<&Literal> {
		self.vars.get(&normalize_var(name))
	}

	pub fn vars(&self) -> impl Iterator<Item = (&str, &Literal)> {
		self.vars.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// `mapleader` as keys (`\` when unset).
	pub fn leader(&self) -> Vec<Node> {
		self.leader_var("g:mapleader")
	}

	pub fn local_leader(&self) -> Vec<Node> {
		self.leader_var("g:maplocalleader")
	}

	fn leader_var(&self, name: &str) -> Vec<Node> {
		let text = self.vars.get(name).and_then(Literal::as_str).unwrap_or("\\");
		parse_notation(text).unwrap_or_default()
	}

	/// Parses a pressed chord, expanding `<leader>` with the final leader values.
	pub fn parse_keys(&self, chord: &str) -> Result<Vec<Node>> {
		let keys = parse_chord(chord).map_err(|error| ConfigError::Chord {
			keys: chord.to_string(),
			error,
		})?;
		Ok(expand_leaders(&keys, &self.leader(), &self.local_leader()))
	}

	/// Resolves a pressed chord. Missing commands surface here, not at load time.
	pub fn invoke(&self, mode: Mode, chord: &str) -> Result<Invocation> {
		let keys = self.parse_keys(chord)?;
		Ok(self.invoke_keys(mode, &keys)?)
	}

	pub fn invoke_keys(&self, mode: Mode, keys: &[Node]) -> std::result::Result<Invocation, InvokeError> {
		self.keymap.invoke(mode, keys, &self.commands)
	}

	/// Activates a buffer for `path`, detecting its file type.
	pub fn activate(&self, path: impl AsRef<Path>) -> BufferView<'_> {
		let path = path.as_ref();
		let event = if path.exists() { Event::BufRead } else { Event::BufNewFile };
		let filetype = self.detect(path, event);
		self.build_view(Some(path.to_path_buf()), filetype, Some(event))
	}

	/// Activates a buffer with a known file type and no path.
	pub fn activate_filetype(&self, filetype: &str) -> BufferView<'_> {
		self.build_view(None, Some(filetype.to_string()), None)
	}

	/// File type for `path`: built-in table, then plugin detections, then
	/// `setfiletype` rules in script order. The last match wins.
	pub fn detect(&self, path: &Path, event: Event) -> Option<String> {
		let mut filetype = None;
		if self.features.detect {
			filetype = detect_filetype(path).map(str::to_string);
			for (patterns, ft) in &self.detections {
				if patterns.matches_path(path) {
					filetype = Some(ft.clone());
				}
			}
		}
		for rule in self.rules.iter().filter(|r| r.event == event && r.patterns.matches_path(path)) {
			if let RuleAction::SetFiletype(ft) = &rule.action {
				filetype = Some(ft.clone());
			}
		}
		filetype
	}

	fn build_view(&self, path: Option<PathBuf>, filetype: Option<String>, open_event: Option<Event>) -> BufferView<'_> {
		let mut view = BufferView {
			session: self,
			path,
			filetype,
			layer: OptionStore::new(),
			commands: None,
			loaded: Vec::new(),
			on_write: Vec::new(),
			opened: RunOutcome::default(),
		};

		if let Some(ft) = view.filetype.clone() {
			view.load_deferred(&ft);
			for rule in self.rules.iter().filter(|r| r.event == Event::FileType && r.patterns.matches_filetype(&ft)) {
				view.run(&rule.action, rule.line);
			}
		}

		if let (Some(path), Some(event)) = (view.path.clone(), open_event) {
			for rule in self.rules.iter().filter(|r| r.event == event && r.patterns.matches_path(&path)) {
				view.run(&rule.action, rule.line);
			}
		}

		let write_rules: Vec<&FileTypeRule> = self
			.rules
			.iter()
			.filter(|r| r.event == Event::BufWritePre)
			.filter(|r| match &view.path {
				Some(path) => r.patterns.matches_path(path),
				None => r.patterns.is_wildcard(),
			})
			.collect();
		view.on_write.extend(write_rules.into_iter().map(|r| r.action.clone()));

		tracing::debug!(
			domain = "config",
			filetype = view.filetype.as_deref().unwrap_or(""),
			overrides = view.layer.len(),
			on_write = view.on_write.len(),
			"buffer activated"
		);
		view
	}
}

/// Commands that ran (or failed to resolve) for an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOutcome {
	/// Descriptions of the actions that ran, in order.
	pub ran: Vec<String>,
	pub errors: Vec<InvokeError>,
}

/// Result of the pre-write hooks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteOutcome {
	/// Text to write after every transforming hook ran.
	pub text: String,
	pub ran: Vec<String>,
	/// Hooks whose command could not be resolved; the write still proceeds.
	pub errors: Vec<InvokeError>,
}

/// A buffer's view of the session: its file type, its option layer and its hooks.
#[derive(Debug)]
pub struct BufferView<'s> {
	session: &'s Session,
	path: Option<PathBuf>,
	filetype: Option<String>,
	layer: OptionStore,
	/// Session commands plus those of plugins loaded for this buffer; `None` until one loads.
	commands: Option<CommandTable>,
	loaded: Vec<String>,
	on_write: Vec<RuleAction>,
	opened: RunOutcome,
}

impl<'s> BufferView<'s> {
	pub fn session(&self) -> &'s Session {
		self.session
	}

	pub fn path(&self) -> Option<&Path> {
		self.path.as_deref()
	}

	pub fn filetype(&self) -> Option<&str> {
		self.filetype.as_deref()
	}

	/// File-type layer built from the matching rules.
	pub fn layer(&self) -> &OptionStore {
		&self.layer
	}

	/// Resolver: file-type layer, then global, then default.
	pub fn options(&self) -> OptionResolver<'_> {
		OptionResolver::new(&self.session.registry)
			.with_filetype(&self.layer)
			.with_global(&self.session.global)
	}

	pub fn commands(&self) -> &CommandTable {
		self.commands.as_ref().unwrap_or(&self.session.commands)
	}

	/// Plugins loaded on demand for this buffer's file type.
	pub fn loaded_plugins(&self) -> &[String] {
		&self.loaded
	}

	/// Commands run while the buffer was opened.
	pub fn opened(&self) -> &RunOutcome {
		&self.opened
	}

	/// Actions that run before each write.
	pub fn write_hooks(&self) -> &[RuleAction] {
		&self.on_write
	}

	pub fn invoke(&self, mode: Mode, chord: &str) -> Result<Invocation> {
		let keys = self.session.parse_keys(chord)?;
		Ok(self.session.keymap.invoke(mode, &keys, self.commands())?)
	}

	/// Runs the pre-write hooks in order over `text`.
	///
	/// A hook naming an unavailable command is reported in the outcome and
	/// the remaining hooks still run.
	pub fn pre_write(&self, text: &str) -> WriteOutcome {
		let mut outcome = WriteOutcome {
			text: text.to_string(),
			..WriteOutcome::default()
		};
		for action in &self.on_write {
			let action = match action {
				RuleAction::OnWrite(inner) => inner.as_ref(),
				other => other,
			};
			match action {
				RuleAction::TrimTrailingWhitespace => {
					outcome.text = trim_trailing_whitespace(&outcome.text);
					outcome.ran.push(action.describe());
				}
				RuleAction::Command { name, .. } => match self.resolve_command(name) {
					Ok(provider) => outcome.ran.push(format!("{} [{provider}]", action.describe())),
					Err(error) => outcome.errors.push(error),
				},
				RuleAction::Options(_) | RuleAction::SetFiletype(_) | RuleAction::OnWrite(_) => {}
			}
		}
		if !outcome.errors.is_empty() {
			tracing::warn!(domain = "config", errors = outcome.errors.len(), "pre-write hooks reported errors");
		}
		outcome
	}

	fn resolve_command(&self, name: &str) -> std::result::Result<&Provider, InvokeError> {
		self.commands().command(name).ok_or_else(|| InvokeError::CommandNotFound(name.to_string()))
	}

	fn load_deferred(&mut self, filetype: &str) {
		let session = self.session;
		for (entry, plugin) in &session.deferred {
			if !entry.options.for_filetypes.iter().any(|ft| ft == filetype) {
				continue;
			}
			let table = self.commands.get_or_insert_with(|| session.commands.clone());
			register_contributions(table, plugin);
			self.loaded.push(plugin.name.clone());
			tracing::debug!(domain = "plugins", plugin = %plugin.name, filetype, "loaded on demand");
		}
	}

	fn run(&mut self, action: &RuleAction, line: usize) {
		match action {
			RuleAction::Options(ops) => {
				for (id, op) in ops {
					let current = self.options().resolve(*id);
					match parse::apply(&self.session.registry, *id, op, &current) {
						Ok(value) => self.layer.set(*id, value),
						Err(error) => tracing::warn!(domain = "config", line, %error, "file-type override rejected"),
					}
				}
			}
			RuleAction::OnWrite(inner) => self.on_write.push((**inner).clone()),
			RuleAction::Command { name, .. } => match self.resolve_command(name) {
				Ok(provider) => {
					let ran = format!("{} [{provider}]", action.describe());
					self.opened.ran.push(ran);
				}
				Err(error) => self.opened.errors.push(error),
			},
			RuleAction::SetFiletype(_) | RuleAction::TrimTrailingWhitespace => {}
		}
	}
}

/// Registers a loaded plugin's commands and `<Plug>` mappings.
pub(crate) fn register_contributions(table: &mut CommandTable, plugin: &ResolvedPlugin) {
	for command in &plugin.info.commands {
		table.register_command(command.clone(), Provider::Plugin(plugin.name.clone()));
	}
	for mapping in &plugin.info.mappings {
		table.register_mapping(mapping.clone(), Provider::Plugin(plugin.name.clone()));
	}
}

/// `mapleader` and `g:mapleader` name the same variable.
pub(crate) fn normalize_var(name: &str) -> String {
	let has_scope = name.len() > 2 && name.as_bytes()[1] == b':' && name.as_bytes()[0].is_ascii_alphabetic();
	if has_scope { name.to_string() } else { format!("g:{name}") }
}
