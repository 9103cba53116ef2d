//! rcload binary.
//!
//! Loads a vimrc-style startup script the way the editor would at launch and
//! reports what it produced: diagnostics, effective options, key bindings,
//! plugin status and pre-write hooks. Also performs idempotent line edits on
//! the script.

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{Env, Status};

fn main() -> anyhow::Result<ExitCode> {
	let cli = Cli::parse();

	setup_tracing(cli.verbose, cli.quiet);

	let env = Env::new(&cli)?;
	tracing::debug!(rc = %env.rc.display(), term = ?env.profile.kind, strict = env.strict, "starting rcload");

	let mut stdout = std::io::stdout().lock();
	match commands::run(&cli.command, &env, &mut stdout)? {
		Status::Ok => Ok(ExitCode::SUCCESS),
		Status::Failed => Ok(ExitCode::FAILURE),
	}
}

fn setup_tracing(verbose: u8, quiet: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		EnvFilter::new(match (quiet, verbose) {
			(true, _) => "error",
			(false, 0) => "warn",
			(false, 1) => "rcload=debug,rcload_config=debug,warn",
			(false, _) => "trace",
		})
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(verbose > 0)
		.init();
}
