use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use rcload_keymap::Mode;

#[derive(Parser, Debug)]
#[command(name = "rcload")]
#[command(about = "Evaluate and inspect a vimrc-style startup script")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Startup script (defaults to the settings file's `paths.rc`, then ~/.vimrc)
	#[arg(long, global = true, value_name = "PATH")]
	pub rc: Option<PathBuf>,

	/// Tool settings file (defaults to $RCLOAD_CONFIG, then <config dir>/rcload/rcload.toml)
	#[arg(long, global = true, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Terminal type used for `&term` and key-code adjustments (defaults to $TERM)
	#[arg(long, global = true)]
	pub term: Option<String>,

	/// Exit with a failure status when the script has errors
	#[arg(long, global = true)]
	pub strict: bool,

	/// More logging (-v debug, -vv trace)
	#[arg(short, long, global = true, action = ArgAction::Count)]
	pub verbose: u8,

	/// Only log errors
	#[arg(short, long, global = true, conflicts_with = "verbose")]
	pub quiet: bool,

	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// Load the script and print every diagnostic
	Check,
	/// Print effective option values
	Options {
		/// Resolve for a buffer of this file type
		#[arg(long, conflicts_with = "file")]
		filetype: Option<String>,
		/// Resolve for this file, detecting its file type
		#[arg(long)]
		file: Option<PathBuf>,
		/// Options to print (all when omitted)
		names: Vec<String>,
	},
	/// List key bindings
	Keys {
		/// Only this mode (n, v, o, i, c)
		#[arg(long, short, value_parser = parse_mode)]
		mode: Option<Mode>,
	},
	/// Resolve a chord as if it were pressed
	Press {
		/// Chord, e.g. `ctrl-n`, `<C-n>` or `<leader>ff`
		chord: String,
		#[arg(long, short, value_parser = parse_mode, default_value = "n")]
		mode: Mode,
		/// Resolve inside a buffer of this file type
		#[arg(long)]
		filetype: Option<String>,
	},
	/// Show declared plugins and how they resolved
	Plugins,
	/// Run the pre-write hooks over a file
	WriteHook {
		file: PathBuf,
		/// Print the result instead of rewriting the file
		#[arg(long)]
		dry_run: bool,
	},
	/// Add a line to the startup script unless it is already there
	EnsureLine {
		line: String,
		/// Insert after the first line starting with this prefix
		#[arg(long, value_name = "PREFIX")]
		after: Option<String>,
	},
	/// Replace every line starting with PREFIX, or append LINE
	ReplaceLine { prefix: String, line: String },
}

fn parse_mode(s: &str) -> Result<Mode, String> {
	s.parse()
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn verify_cli() {
		Cli::command().debug_assert();
	}

	#[test]
	fn global_flags_after_subcommand() {
		let cli = Cli::try_parse_from(["rcload", "check", "--rc", "/tmp/vimrc", "--strict", "-vv"]).unwrap();
		assert_eq!(cli.rc, Some(PathBuf::from("/tmp/vimrc")));
		assert!(cli.strict);
		assert_eq!(cli.verbose, 2);
		assert!(matches!(cli.command, Command::Check));
	}

	#[test]
	fn press_defaults_to_normal_mode() {
		let cli = Cli::try_parse_from(["rcload", "press", "<leader>f"]).unwrap();
		let Command::Press { chord, mode, filetype } = cli.command else {
			panic!("expected press");
		};
		assert_eq!(chord, "<leader>f");
		assert_eq!(mode, Mode::Normal);
		assert_eq!(filetype, None);

		let cli = Cli::try_parse_from(["rcload", "keys", "--mode", "insert"]).unwrap();
		assert!(matches!(cli.command, Command::Keys { mode: Some(Mode::Insert) }));
		assert!(Cli::try_parse_from(["rcload", "keys", "--mode", "z"]).is_err());
	}

	#[test]
	fn options_file_and_filetype_conflict() {
		assert!(Cli::try_parse_from(["rcload", "options", "--filetype", "c", "--file", "x.c"]).is_err());
		let cli = Cli::try_parse_from(["rcload", "options", "--filetype", "c", "tabstop", "sw"]).unwrap();
		let Command::Options { names, .. } = cli.command else {
			panic!("expected options");
		};
		assert_eq!(names, ["tabstop", "sw"]);
	}
}
