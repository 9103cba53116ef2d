//! End-to-end loading of a realistic startup script against plugins on disk.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use rcload_config::{ConfigError, LoadContext, RcFile, Severity, load_file};
use rcload_keymap::{Invocation, InvokeError, Mode, Provider, TermProfile};
use rcload_options::OptionValue;
use rcload_plugins::PluginError;

const VIMRC: &str = r#"" General
set nocompatible
set number relativenumber
set tabstop=4 shiftwidth=4 expandtab
set backspace=indent,eol,start
set clipboard^=unnamed

let mapleader = ","

call plug#begin('~/.vim/plugged')
Plug 'preservim/nerdtree', { 'on': 'NERDTreeToggle' }
Plug 'tpope/vim-fugitive'
Plug 'fatih/vim-go', { 'for': 'go', 'do': ':GoUpdateBinaries' }
Plug 'morhetz/gruvbox'
Plug 'dense-analysis/ale'
call plug#end()

if &term =~ '^screen'
  set ttimeoutlen=10
endif

colorscheme gruvbox
set background=dark

nnoremap <leader>n :NERDTreeToggle<CR>
nnoremap <leader>gs :Git<CR>
nnoremap <leader>b :GoBuild<CR>
nnoremap <leader>l :ALEFix<CR>
nnoremap <silent> <leader><space> :nohlsearch<CR>

augroup vimrc
  autocmd!
  autocmd FileType python setlocal tabstop=4 shiftwidth=4 softtabstop=4
  autocmd FileType go setlocal noexpandtab tabstop=8
  autocmd FileType make setlocal noexpandtab
  autocmd BufWritePre *.py :%s/\s\+$//e
augroup END
"#;

fn install(root: &Path, name: &str, manifest: &str) {
	let dir = root.join(name);
	fs::create_dir_all(&dir).unwrap();
	fs::write(dir.join("plugin.toml"), manifest).unwrap();
}

#[test]
fn loads_a_realistic_vimrc() {
	let plugged = tempfile::tempdir().unwrap();
	install(plugged.path(), "nerdtree", "commands = [\"NERDTreeToggle\", \"NERDTreeFind\"]\n");
	install(plugged.path(), "vim-fugitive", "commands = [\"Git\", \"Gdiffsplit\"]\n");
	install(plugged.path(), "vim-go", "commands = [\"GoBuild\", \"GoTest\"]\n");
	fs::create_dir_all(plugged.path().join("gruvbox/colors")).unwrap();
	fs::write(plugged.path().join("gruvbox/colors/gruvbox.vim"), "\" scheme\n").unwrap();

	let home = tempfile::tempdir().unwrap();
	let rc = home.path().join(".vimrc");
	fs::write(&rc, VIMRC).unwrap();

	let ctx = LoadContext::new()
		.with_profile(TermProfile::new("screen-256color", None))
		.with_plugin_dir(plugged.path());
	let report = load_file(&rc, &ctx).unwrap();

	// `^=` is not supported and ale is not installed.
	let problems: Vec<(usize, Severity)> = report.diagnostics.iter().map(|d| (d.line, d.severity)).collect();
	assert_eq!(problems, vec![(6, Severity::Error), (15, Severity::Warning)]);
	assert!(matches!(
		&report.diagnostics[1].error,
		ConfigError::Plugin(PluginError::NotInstalled { name, .. }) if name == "ale"
	));

	let session = &report.session;
	let options = session.options();
	assert_eq!(options.resolve_name("tabstop"), Some(OptionValue::Int(4)));
	assert_eq!(options.resolve_name("ttimeoutlen"), Some(OptionValue::Int(10)));
	assert_eq!(options.resolve_name("background"), Some(OptionValue::String("dark".into())));
	assert_eq!(session.colorscheme(), Some("gruvbox"));

	// Lazy commands resolve to a stub until the plugin loads.
	let Invocation::Command { provider, .. } = session.invoke(Mode::Normal, ",n").unwrap() else {
		panic!("expected a command");
	};
	assert_eq!(provider, Provider::Stub("nerdtree".into()));
	let Invocation::Command { provider, .. } = session.invoke(Mode::Normal, ",gs").unwrap() else {
		panic!("expected a command");
	};
	assert_eq!(provider, Provider::Plugin("vim-fugitive".into()));
	assert_eq!(
		session.invoke(Mode::Normal, ",l"),
		Err(ConfigError::Invoke(InvokeError::CommandNotFound("ALEFix".into())))
	);
	assert!(session.invoke(Mode::Normal, "<leader><Space>").is_ok());

	let go = session.activate_filetype("go");
	assert_eq!(go.options().resolve_name("tabstop"), Some(OptionValue::Int(8)));
	assert_eq!(go.options().resolve_name("expandtab"), Some(OptionValue::Bool(false)));
	assert!(go.invoke(Mode::Normal, ",b").is_ok());

	let python = session.activate(home.path().join("script.py"));
	assert_eq!(python.pre_write("x = 1   \n").text, "x = 1\n");
}

#[test]
fn rc_edits_are_idempotent() {
	let home = tempfile::tempdir().unwrap();
	let rc = home.path().join(".vimrc");
	fs::write(&rc, "call plug#begin()\nPlug 'tpope/vim-sensible'\ncall plug#end()\ncolorscheme desert\n").unwrap();

	for _ in 0..2 {
		let mut file = RcFile::open(&rc).unwrap();
		file.ensure_line_present("Plug 'morhetz/gruvbox'", Some("Plug "));
		file.replace_line_prefix("colorscheme", "colorscheme gruvbox");
		file.save().unwrap();
	}

	assert_eq!(
		fs::read_to_string(&rc).unwrap(),
		"call plug#begin()\nPlug 'tpope/vim-sensible'\nPlug 'morhetz/gruvbox'\ncall plug#end()\ncolorscheme gruvbox\n"
	);
}
