//! Startup-script loader for rcload.
//!
//! A vimrc-style script is parsed into statements ([`parse_script`]) and then
//! evaluated in order into a [`Session`] ([`load_str`], [`load_file`]):
//!
//! - `set` writes the global option layer; `autocmd FileType` overrides are
//!   kept as rules and applied when a matching buffer is activated.
//! - `map` and friends fill the [`KeyBindingTable`](rcload_keymap::KeyBindingTable).
//!   Commands named on the right-hand side are resolved only when a chord
//!   is pressed.
//! - `Plug` declarations are resolved at `call plug#end()`.
//!
//! Loading is fail-soft. Every problem becomes a [`Diagnostic`] tagged with
//! its line, and evaluation continues with the next statement.
//!
//! ```
//! use rcload_config::{LoadContext, load_str};
//!
//! let report = load_str("set tabstop=4\nautocmd FileType python setlocal tabstop=2", &LoadContext::new());
//! assert!(report.diagnostics.is_empty());
//! let view = report.session.activate_filetype("python");
//! assert_eq!(view.options().resolve_name("tabstop").and_then(|v| v.as_int()), Some(2));
//! ```

mod cond;
mod edit;
mod error;
mod eval;
mod filetype;
mod literal;
mod script;
mod session;
mod settings;

pub use cond::{CmpOp, CondEnv, Expr, Value, vim_regex};
pub use edit::RcFile;
pub use error::{ConfigError, Diagnostic, Result, Severity};
pub use eval::{DEFAULT_FEATURES, LoadContext, LoadReport, load_file, load_str};
pub use filetype::{Event, FileTypeRule, Patterns, RuleAction, detect_filetype, trim_trailing_whitespace};
pub use literal::Literal;
pub use script::{AutocmdDef, FiletypeCmd, MapDef, Script, Statement, Stmt, parse_script, split_set_args};
pub use session::{BUILTIN_COLORSCHEMES, BufferView, Features, RunOutcome, Session, WriteOutcome};
pub use settings::{LoaderSettings, PathSettings, SETTINGS_ENV, Settings, SettingsError, TerminalSettings, expand_home};
