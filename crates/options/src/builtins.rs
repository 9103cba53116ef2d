//! Built-in option table supplied by the host.

use OptionDefault::{Bool, Int, Text};

use crate::validators::{non_negative_int, positive_int, status_mode, timeout_or_inherit};
use crate::{OptionDef, OptionDefault, OptionScope, OptionType, OptionValidator};

/// Names of frequently used built-in options.
pub mod keys {
	pub const TABSTOP: &str = "tabstop";
	pub const SHIFTWIDTH: &str = "shiftwidth";
	pub const SOFTTABSTOP: &str = "softtabstop";
	pub const EXPANDTAB: &str = "expandtab";
	pub const NUMBER: &str = "number";
	pub const TEXTWIDTH: &str = "textwidth";
	pub const FILETYPE: &str = "filetype";
	pub const BACKGROUND: &str = "background";
	pub const MOUSE: &str = "mouse";
	pub const CLIPBOARD: &str = "clipboard";
	pub const BACKSPACE: &str = "backspace";
}

const fn global(name: &'static str, alias: Option<&'static str>, description: &'static str, value_type: OptionType, default: OptionDefault) -> OptionDef {
	OptionDef {
		name,
		alias,
		description,
		value_type,
		default,
		scope: OptionScope::Global,
		validator: None,
	}
}

const fn local(name: &'static str, alias: Option<&'static str>, description: &'static str, value_type: OptionType, default: OptionDefault) -> OptionDef {
	OptionDef {
		scope: OptionScope::Local,
		..global(name, alias, description, value_type, default)
	}
}

const fn validated(def: OptionDef, validator: OptionValidator) -> OptionDef {
	OptionDef {
		validator: Some(validator),
		..def
	}
}

pub static BUILTINS: &[OptionDef] = &[
	// indentation
	validated(local("tabstop", Some("ts"), "Columns a tab character occupies", OptionType::Int, Int(8)), positive_int),
	validated(local("shiftwidth", Some("sw"), "Columns per indentation step (0 follows tabstop)", OptionType::Int, Int(8)), non_negative_int),
	validated(local("softtabstop", Some("sts"), "Columns a <Tab> keypress inserts", OptionType::Int, Int(0)), non_negative_int),
	local("expandtab", Some("et"), "Insert spaces instead of tabs", OptionType::Bool, Bool(false)),
	local("autoindent", Some("ai"), "Copy indent from the previous line", OptionType::Bool, Bool(false)),
	local("smartindent", Some("si"), "Language-agnostic smart indenting", OptionType::Bool, Bool(false)),
	validated(local("textwidth", Some("tw"), "Maximum width of inserted text (0 disables)", OptionType::Int, Int(0)), non_negative_int),
	local("fileformat", Some("ff"), "Line ending used when writing", OptionType::Enum(&["unix", "dos", "mac"]), Text("unix")),
	local("filetype", Some("ft"), "Type of the buffer's contents", OptionType::String, Text("")),
	local("syntax", Some("syn"), "Syntax highlighting language", OptionType::String, Text("")),
	local("undofile", Some("udf"), "Persist undo history", OptionType::Bool, Bool(false)),
	// display
	local("number", Some("nu"), "Show line numbers", OptionType::Bool, Bool(false)),
	local("relativenumber", Some("rnu"), "Show relative line numbers", OptionType::Bool, Bool(false)),
	local("wrap", None, "Wrap long lines", OptionType::Bool, Bool(true)),
	local("cursorline", Some("cul"), "Highlight the cursor line", OptionType::Bool, Bool(false)),
	local("colorcolumn", Some("cc"), "Columns to highlight", OptionType::Set(&[]), Text("")),
	local("list", None, "Show invisible characters", OptionType::Bool, Bool(false)),
	global("listchars", Some("lcs"), "Characters used by 'list'", OptionType::Set(&[]), Text("eol:$")),
	local("signcolumn", Some("scl"), "When to draw the sign column", OptionType::Enum(&["auto", "no", "yes", "number"]), Text("auto")),
	validated(global("laststatus", Some("ls"), "When the last window has a status line", OptionType::Int, Int(1)), status_mode),
	validated(global("scrolloff", Some("so"), "Lines kept above and below the cursor", OptionType::Int, Int(0)), non_negative_int),
	global("ruler", Some("ru"), "Show the cursor position", OptionType::Bool, Bool(false)),
	global("showcmd", Some("sc"), "Show the pending command", OptionType::Bool, Bool(false)),
	global("showmatch", Some("sm"), "Briefly jump to the matching bracket", OptionType::Bool, Bool(false)),
	global("showmode", Some("smd"), "Show the current mode", OptionType::Bool, Bool(true)),
	global("wildmenu", Some("wmnu"), "Command-line completion menu", OptionType::Bool, Bool(false)),
	global("background", Some("bg"), "Background brightness the colours assume", OptionType::Enum(&["dark", "light"]), Text("light")),
	global("termguicolors", Some("tgc"), "Use 24-bit colour in the terminal", OptionType::Bool, Bool(false)),
	// search
	global("hlsearch", Some("hls"), "Highlight search matches", OptionType::Bool, Bool(false)),
	global("incsearch", Some("is"), "Search while typing", OptionType::Bool, Bool(false)),
	global("ignorecase", Some("ic"), "Case-insensitive search", OptionType::Bool, Bool(false)),
	global("smartcase", Some("scs"), "Case-sensitive when the pattern has capitals", OptionType::Bool, Bool(false)),
	// behaviour
	global("encoding", Some("enc"), "Internal character encoding", OptionType::String, Text("utf-8")),
	global("hidden", Some("hid"), "Keep abandoned buffers loaded", OptionType::Bool, Bool(false)),
	global("compatible", Some("cp"), "Behave like vi", OptionType::Bool, Bool(false)),
	global("mouse", None, "Modes where the mouse is enabled", OptionType::Flags("nvichar"), Text("")),
	global("clipboard", Some("cb"), "Registers shared with the system clipboard", OptionType::Set(&["unnamed", "unnamedplus", "autoselect"]), Text("")),
	global("backspace", Some("bs"), "What <BS> may delete in insert mode", OptionType::Set(&["indent", "eol", "start", "nostop"]), Text("")),
	global("path", Some("pa"), "Directories searched by file commands", OptionType::Set(&[]), Text(".,,")),
	global("wildignore", Some("wig"), "Patterns ignored by file completion", OptionType::Set(&[]), Text("")),
	validated(global("updatetime", Some("ut"), "Idle milliseconds before swap writes and CursorHold", OptionType::Int, Int(4000)), non_negative_int),
	validated(global("timeoutlen", Some("tm"), "Milliseconds to wait for a mapped sequence", OptionType::Int, Int(1000)), non_negative_int),
	validated(global("ttimeoutlen", Some("ttm"), "Milliseconds to wait for a key code (-1 follows timeoutlen)", OptionType::Int, Int(-1)), timeout_or_inherit),
	global("backup", Some("bk"), "Keep a backup after writing", OptionType::Bool, Bool(false)),
	global("swapfile", Some("swf"), "Use a swap file", OptionType::Bool, Bool(true)),
	global("autoread", Some("ar"), "Reload files changed outside the editor", OptionType::Bool, Bool(false)),
	global("splitright", Some("spr"), "Vertical splits open to the right", OptionType::Bool, Bool(false)),
	global("splitbelow", Some("sb"), "Horizontal splits open below", OptionType::Bool, Bool(false)),
];
