use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

fn kinds(src: &str) -> Vec<Statement> {
	let script = parse_script(src);
	assert!(script.diagnostics.is_empty(), "unexpected diagnostics: {:?}", script.diagnostics);
	script.statements.into_iter().map(|s| s.kind).collect()
}

fn single(src: &str) -> Statement {
	let mut all = kinds(src);
	assert_eq!(all.len(), 1, "{src}");
	all.remove(0)
}

#[test]
fn skips_comments_and_blank_lines() {
	let script = parse_script("\" leading comment\n\n   \" indented\nset number\n");
	assert_eq!(script.statements.len(), 1);
	assert_eq!(script.statements[0].line, 4);
}

#[test]
fn joins_continuation_lines() {
	let script = parse_script("Plug 'junegunn/fzf',\n  \\ { 'do': './install --all' }\nset ruler");
	assert_eq!(script.statements[0].line, 1);
	let Statement::Plug { locator, options } = &script.statements[0].kind else {
		panic!("expected Plug, got {:?}", script.statements[0].kind);
	};
	assert_eq!(locator, "junegunn/fzf");
	assert!(options.is_some());
	assert_eq!(script.statements[1].line, 3);
}

#[rstest]
#[case("set ts=4 sw=4 et", false, &["ts=4", "sw=4", "et"])]
#[case(":setlocal nowrap", true, &["nowrap"])]
#[case("set listchars=tab:>\\ ,trail:- \" shown chars", false, &["listchars=tab:> ,trail:-"])]
#[case("se backspace+=nostop", false, &["backspace+=nostop"])]
fn set_arguments(#[case] src: &str, #[case] local: bool, #[case] args: &[&str]) {
	assert_eq!(single(src), Statement::Set {
		local,
		args: args.iter().map(|a| a.to_string()).collect(),
	});
}

#[test]
fn let_statements() {
	assert_eq!(single("let mapleader = \",\""), Statement::Let {
		name: "mapleader".into(),
		value: Literal::Str(",".into()),
	});
	assert_eq!(single("let g:count = 3"), Statement::Let {
		name: "g:count".into(),
		value: Literal::Int(3),
	});
}

#[test]
fn map_with_modifiers() {
	let Statement::Map(def) = single("nnoremap <silent><buffer> <leader>f :Files<CR>") else {
		panic!("expected a map");
	};
	assert_eq!(def.modes, &[Mode::Normal]);
	assert!(!def.recursive);
	assert!(def.silent && def.buffer && !def.expr);
	assert_eq!(def.lhs, "<leader>f");
	assert_eq!(def.rhs, ":Files<CR>");
}

#[test]
fn map_bang_targets_insert_and_command_line() {
	let Statement::Map(def) = single("noremap! <C-a> <Home>") else {
		panic!("expected a map");
	};
	assert_eq!(def.modes, &[Mode::Insert, Mode::CommandLine]);

	let Statement::Map(def) = single("map Y y$") else {
		panic!("expected a map");
	};
	assert_eq!(def.modes, &[Mode::Normal, Mode::Visual, Mode::OperatorPending]);
	assert!(def.recursive);
}

#[test]
fn plug_block() {
	assert_eq!(kinds("call plug#begin('~/.vim/plugged')\nPlug 'tpope/vim-surround'\ncall plug#end()"), vec![
		Statement::PlugBegin(Some("~/.vim/plugged".into())),
		Statement::Plug {
			locator: "tpope/vim-surround".into(),
			options: None
		},
		Statement::PlugEnd,
	]);
	assert_eq!(single("call plug#begin()"), Statement::PlugBegin(None));
}

#[test]
fn autocmds() {
	assert_eq!(kinds("augroup vimrc\nautocmd!\nautocmd FileType python,go setlocal ts=4\naugroup END"), vec![
		Statement::Augroup("vimrc".into()),
		Statement::AutocmdClear,
		Statement::Autocmd(AutocmdDef {
			group: None,
			events: vec![Event::FileType],
			patterns: vec!["python".into(), "go".into()],
			command: "setlocal ts=4".into(),
		}),
		Statement::AugroupEnd,
	]);

	let Statement::Autocmd(def) = single("au vimrc BufRead,BufNewFile *.md ++once setfiletype markdown") else {
		panic!("expected an autocmd");
	};
	assert_eq!(def.group.as_deref(), Some("vimrc"));
	assert_eq!(def.events, vec![Event::BufRead, Event::BufNewFile]);
	assert_eq!(def.command, "setfiletype markdown");
}

#[test]
fn conditionals() {
	let all = kinds("if &term =~ '^screen'\nset ttimeoutlen=10\nelseif has('gui')\nelse\nendif");
	assert!(matches!(all[0], Statement::If(_)));
	assert!(matches!(all[2], Statement::ElseIf(_)));
	assert_eq!(all[3], Statement::Else);
	assert_eq!(all[4], Statement::EndIf);
}

#[test]
fn malformed_if_still_opens_a_block() {
	let script = parse_script("if has('unix'\nset number\nendif");
	assert_eq!(script.diagnostics.len(), 1);
	assert_eq!(script.diagnostics[0].line, 1);
	assert_eq!(script.statements[0].kind, Statement::If(Expr::Int(0)));
	assert_eq!(script.statements.len(), 3);
}

#[test]
fn functions_are_skipped() {
	let script = parse_script("function! Strip()\n  %s/x//\nendfunction\nset number");
	assert_eq!(script.statements.len(), 1);
	assert_eq!(script.diagnostics[0].error, ConfigError::FunctionSkipped("Strip".into()));
	assert_eq!(script.diagnostics[0].severity, crate::Severity::Warning);
}

#[test]
fn other_commands_pass_through() {
	assert_eq!(single("nohlsearch"), Statement::Command {
		name: "nohlsearch".into(),
		args: String::new(),
	});
	assert_eq!(single("call SetupThings(1)"), Statement::Command {
		name: "call".into(),
		args: "SetupThings(1)".into(),
	});
	assert_eq!(single("filetype plugin indent on"), Statement::Filetype(FiletypeCmd {
		enable: true,
		plugin: true,
		indent: true,
	}));
}

#[rstest]
#[case("nmap x")]
#[case("let x")]
#[case("colorscheme")]
#[case("syntax sometimes")]
#[case("filetype plugin")]
#[case("autocmd CursorHold * echo")]
#[case("autocmd FileType python")]
#[case("Plug tpope/vim-surround")]
#[case("call plug#begin(")]
fn malformed_lines(#[case] src: &str) {
	let script = parse_script(src);
	assert_eq!(script.diagnostics.len(), 1, "{src}: {:?}", script.statements);
	assert!(script.statements.is_empty());
}

#[rstest]
#[case("syntax on \" enable highlighting", Statement::Syntax(true))]
#[case("filetype plugin indent on \" detect", Statement::Filetype(FiletypeCmd { enable: true, plugin: true, indent: true }))]
#[case("call plug#begin('~/.vim/plugged') \" plugins", Statement::PlugBegin(Some("~/.vim/plugged".into())))]
#[case("call plug#end() \" done", Statement::PlugEnd)]
#[case("augroup vimrc \" group", Statement::Augroup("vimrc".into()))]
#[case("augroup END \" close", Statement::AugroupEnd)]
fn trailing_comments(#[case] src: &str, #[case] expected: Statement) {
	assert_eq!(single(src), expected);
}

#[test]
fn quotes_inside_calls_are_not_comments() {
	assert_eq!(single("call SetTitle(\"a \\\" b\") \" note"), Statement::Command {
		name: "call".into(),
		args: "SetTitle(\"a \\\" b\")".into(),
	});
}
