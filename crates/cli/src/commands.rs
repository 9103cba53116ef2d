//! Subcommand implementations. Output goes to the given writer so the
//! commands can be exercised without a terminal.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rcload_config::{BufferView, LoadContext, LoadReport, RcFile, Session, Settings, load_file};
use rcload_keymap::parser::notation_seq;
use rcload_keymap::{Mode, TermProfile};
use rcload_options::OptionResolver;
use rcload_plugins::Pin;

use crate::cli::{Cli, Command};

/// Inputs shared by every subcommand, after flags and settings are merged.
#[derive(Debug)]
pub struct Env {
	pub rc: PathBuf,
	pub profile: TermProfile,
	pub plugin_dir: Option<PathBuf>,
	pub strict: bool,
}

impl Env {
	pub fn new(cli: &Cli) -> Result<Self> {
		let settings = match &cli.config {
			Some(path) => Settings::load(path)?,
			None => Settings::load_default()?,
		};
		let colorterm = std::env::var("COLORTERM").ok();
		let term = cli
			.term
			.clone()
			.or_else(|| settings.terminal.term.clone())
			.unwrap_or_else(|| std::env::var("TERM").unwrap_or_default());

		Ok(Self {
			rc: cli.rc.clone().unwrap_or_else(|| settings.rc_path()),
			profile: TermProfile::new(&term, colorterm.as_deref()),
			plugin_dir: settings.plugin_dir(),
			strict: cli.strict || settings.loader.strict,
		})
	}

	fn load(&self) -> Result<LoadReport> {
		let mut ctx = LoadContext::new().with_profile(self.profile.clone());
		if let Some(dir) = &self.plugin_dir {
			ctx = ctx.with_plugin_dir(dir);
		}
		let report = load_file(&self.rc, &ctx)?;
		tracing::info!(
			rc = %self.rc.display(),
			diagnostics = report.diagnostics.len(),
			"script loaded"
		);
		Ok(report)
	}
}

/// What the process should exit with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
	Ok,
	Failed,
}

pub fn run(command: &Command, env: &Env, out: &mut dyn Write) -> Result<Status> {
	match command {
		Command::EnsureLine { line, after } => return ensure_line(&env.rc, line, after.as_deref(), out),
		Command::ReplaceLine { prefix, line } => return replace_line(&env.rc, prefix, line, out),
		_ => {}
	}

	let report = env.load()?;
	if !matches!(command, Command::Check) {
		for diagnostic in &report.diagnostics {
			tracing::warn!("{}: {diagnostic}", env.rc.display());
		}
	}
	let session = &report.session;

	match command {
		Command::Check => check(&report, &env.rc, out)?,
		Command::Options { filetype, file, names } => {
			let view = buffer(session, filetype.as_deref(), file.as_deref());
			match &view {
				Some(view) => options(&view.options(), names, out)?,
				None => options(&session.options(), names, out)?,
			}
		}
		Command::Keys { mode } => keys(session, *mode, out)?,
		Command::Press { chord, mode, filetype } => {
			let view = filetype.as_deref().map(|ft| session.activate_filetype(ft));
			let result = match &view {
				Some(view) => view.invoke(*mode, chord),
				None => session.invoke(*mode, chord),
			};
			match result {
				Ok(invocation) => writeln!(out, "{}", invocation.describe())?,
				Err(error) => writeln!(out, "error: {error}")?,
			}
		}
		Command::Plugins => plugins(session, out)?,
		Command::WriteHook { file, dry_run } => write_hook(session, file, *dry_run, out)?,
		Command::EnsureLine { .. } | Command::ReplaceLine { .. } => {}
	}

	Ok(if env.strict && report.has_errors() { Status::Failed } else { Status::Ok })
}

fn buffer<'s>(session: &'s Session, filetype: Option<&str>, file: Option<&Path>) -> Option<BufferView<'s>> {
	match (filetype, file) {
		(Some(ft), _) => Some(session.activate_filetype(ft)),
		(None, Some(path)) => Some(session.activate(path)),
		(None, None) => None,
	}
}

fn check(report: &LoadReport, rc: &Path, out: &mut dyn Write) -> Result<()> {
	for diagnostic in &report.diagnostics {
		writeln!(out, "{}:{diagnostic}", rc.display())?;
	}
	let errors = report.errors().count();
	let warnings = report.diagnostics.len() - errors;
	writeln!(out, "{errors} error(s), {warnings} warning(s)")?;
	Ok(())
}

fn options(resolver: &OptionResolver<'_>, names: &[String], out: &mut dyn Write) -> Result<()> {
	if names.is_empty() {
		for (name, value) in resolver.snapshot() {
			writeln!(out, "{name}={value}")?;
		}
		return Ok(());
	}
	let registry = resolver.registry();
	for name in names {
		match registry.lookup(name) {
			Ok(id) => writeln!(out, "{}={}", registry.def(id).name, resolver.resolve(id))?,
			Err(error) => writeln!(out, "error: {error}")?,
		}
	}
	Ok(())
}

fn keys(session: &Session, mode: Option<Mode>, out: &mut dyn Write) -> Result<()> {
	let modes: Vec<Mode> = match mode {
		Some(mode) => vec![mode],
		None => Mode::ALL.to_vec(),
	};
	for mode in modes {
		for (keys, binding) in session.keymap().bindings(mode) {
			let flag = if binding.recursive { ' ' } else { '*' };
			writeln!(out, "{}  {:<16} {flag} {}", mode.letter(), notation_seq(keys), binding.action.describe())?;
		}
	}
	Ok(())
}

fn plugins(session: &Session, out: &mut dyn Write) -> Result<()> {
	let report = session.plugins();
	for entry in session.manifest().entries() {
		let name = entry.name();
		let status = if report.is_loaded(&name) {
			"loaded".to_string()
		} else if let Some(error) = report.failure(&name) {
			format!("failed: {error}")
		} else {
			"not resolved".to_string()
		};
		let mut notes = Vec::new();
		match entry.pin() {
			Some(Pin::Branch(branch)) => notes.push(format!("branch {branch}")),
			Some(Pin::Tag(tag)) => notes.push(format!("tag {tag}")),
			Some(Pin::Commit(commit)) => notes.push(format!("commit {commit}")),
			None => {}
		}
		if !entry.options.on_commands.is_empty() {
			notes.push(format!("on: {}", entry.options.on_commands.join(",")));
		}
		if !entry.options.for_filetypes.is_empty() {
			notes.push(format!("for: {}", entry.options.for_filetypes.join(",")));
		}
		let notes = if notes.is_empty() { String::new() } else { format!(" ({})", notes.join("; ")) };
		writeln!(out, "{name:<24} {status}{notes}")?;
	}
	Ok(())
}

fn write_hook(session: &Session, file: &Path, dry_run: bool, out: &mut dyn Write) -> Result<()> {
	let text = std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
	let view = session.activate(file);
	let outcome = view.pre_write(&text);
	for ran in &outcome.ran {
		writeln!(out, "ran: {ran}")?;
	}
	for error in &outcome.errors {
		writeln!(out, "error: {error}")?;
	}
	if dry_run {
		write!(out, "{}", outcome.text)?;
	} else if outcome.text != text {
		std::fs::write(file, &outcome.text).with_context(|| format!("failed to write {}", file.display()))?;
		writeln!(out, "updated {}", file.display())?;
	}
	Ok(())
}

fn ensure_line(rc: &Path, line: &str, after: Option<&str>, out: &mut dyn Write) -> Result<Status> {
	let mut file = RcFile::open(rc)?;
	if file.ensure_line_present(line, after) {
		file.save()?;
		writeln!(out, "added '{}' to {}", line.trim(), rc.display())?;
	} else {
		writeln!(out, "'{}' already present in {}", line.trim(), rc.display())?;
	}
	Ok(Status::Ok)
}

fn replace_line(rc: &Path, prefix: &str, line: &str, out: &mut dyn Write) -> Result<Status> {
	let mut file = RcFile::open(rc)?;
	let replaced = file.replace_line_prefix(prefix, line);
	file.save()?;
	let verb = if replaced { "replaced" } else { "appended" };
	writeln!(out, "{verb} '{}' in {}", line.trim(), rc.display())?;
	Ok(Status::Ok)
}

#[cfg(test)]
mod tests {
	use clap::Parser;
	use pretty_assertions::assert_eq;

	use super::*;

	struct Fixture {
		dir: tempfile::TempDir,
		env: Env,
	}

	impl Fixture {
		fn new(script: &str) -> Self {
			let dir = tempfile::tempdir().unwrap();
			let rc = dir.path().join("vimrc");
			std::fs::write(&rc, script).unwrap();
			let env = Env {
				rc,
				profile: TermProfile::new("xterm-256color", None),
				plugin_dir: Some(dir.path().join("plugged")),
				strict: false,
			};
			Self { dir, env }
		}

		fn run(&self, args: &[&str]) -> (Status, String) {
			let cli = Cli::try_parse_from(std::iter::once("rcload").chain(args.iter().copied())).unwrap();
			let mut out = Vec::new();
			let status = run(&cli.command, &self.env, &mut out).unwrap();
			(status, String::from_utf8(out).unwrap())
		}
	}

	#[test]
	fn check_lists_diagnostics() {
		let fixture = Fixture::new("set number\nset bogus\nfunction! F()\nendfunction\n");
		let (status, out) = fixture.run(&["check"]);
		assert_eq!(status, Status::Ok);
		assert!(out.contains("line 2: error: unknown option: bogus"), "{out}");
		assert!(out.ends_with("1 error(s), 1 warning(s)\n"), "{out}");
	}

	#[test]
	fn strict_fails_on_errors_only() {
		let mut fixture = Fixture::new("set bogus\n");
		fixture.env.strict = true;
		assert_eq!(fixture.run(&["check"]).0, Status::Failed);

		let mut fixture = Fixture::new("setlocal hlsearch\n");
		fixture.env.strict = true;
		assert_eq!(fixture.run(&["check"]).0, Status::Ok);
	}

	#[test]
	fn options_by_scope() {
		let fixture = Fixture::new("set ts=8\nautocmd FileType python setlocal ts=4\n");
		assert_eq!(fixture.run(&["options", "ts"]).1, "tabstop=8\n");
		let (_, out) = fixture.run(&["options", "--filetype", "python", "tabstop", "zzzzzzzz"]);
		let lines: Vec<&str> = out.lines().collect();
		assert_eq!(lines[0], "tabstop=4");
		assert!(lines[1].starts_with("error: unknown option: zzzzzzzz"), "{out}");
	}

	#[test]
	fn keys_and_press() {
		let fixture = Fixture::new("let mapleader = ','\nnnoremap <leader>w :w<CR>\nnnoremap <leader>t :Tagbar<CR>\n");
		let (_, keys) = fixture.run(&["keys", "--mode", "n"]);
		assert_eq!(keys.lines().count(), 2);
		assert!(keys.contains(",w"), "{keys}");

		assert_eq!(fixture.run(&["press", ",w"]).1, "cmd:w [host]\n");
		assert_eq!(fixture.run(&["press", "<leader>t"]).1, "error: not an editor command: Tagbar\n");
	}

	#[test]
	fn plugins_report_status() {
		let fixture = Fixture::new("call plug#begin()\nPlug 'junegunn/fzf', { 'tag': '0.40' }\ncall plug#end()\n");
		let (status, out) = fixture.run(&["plugins"]);
		assert_eq!(status, Status::Ok);
		assert!(out.starts_with("fzf"), "{out}");
		assert!(out.contains("failed: plugin 'fzf' is not installed"), "{out}");
		assert!(out.contains("(tag"), "{out}");
	}

	#[test]
	fn write_hook_rewrites_file() {
		let fixture = Fixture::new("autocmd BufWritePre *.py :%s/\\s\\+$//e\n");
		let file = fixture.dir.path().join("app.py");
		std::fs::write(&file, "x = 1  \n").unwrap();

		let (_, out) = fixture.run(&["write-hook", "--dry-run", file.to_str().unwrap()]);
		assert!(out.ends_with("x = 1\n"), "{out}");
		assert_eq!(std::fs::read_to_string(&file).unwrap(), "x = 1  \n");

		fixture.run(&["write-hook", file.to_str().unwrap()]);
		assert_eq!(std::fs::read_to_string(&file).unwrap(), "x = 1\n");
	}

	#[test]
	fn line_edits() {
		let fixture = Fixture::new("colorscheme desert\n");
		fixture.run(&["ensure-line", "set number"]);
		fixture.run(&["ensure-line", "set number"]);
		fixture.run(&["replace-line", "colorscheme", "colorscheme slate"]);
		assert_eq!(std::fs::read_to_string(&fixture.env.rc).unwrap(), "colorscheme slate\nset number\n");
	}

	#[test]
	fn missing_script_is_an_error() {
		let fixture = Fixture::new("");
		std::fs::remove_file(&fixture.env.rc).unwrap();
		let cli = Cli::try_parse_from(["rcload", "check"]).unwrap();
		assert!(run(&cli.command, &fixture.env, &mut Vec::new()).is_err());
	}
}
