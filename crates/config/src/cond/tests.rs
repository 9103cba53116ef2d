use rstest::rstest;

use super::*;

struct TestEnv;

impl CondEnv for TestEnv {
	fn option(&self, name: &str) -> Option<Value> {
		match name {
			"term" => Some(Value::Str("screen-256color".into())),
			"compatible" => Some(Value::Int(0)),
			_ => None,
		}
	}

	fn var(&self, name: &str) -> Option<Value> {
		(name == "g:loaded").then(|| Value::Int(1))
	}

	fn has(&self, feature: &str) -> bool {
		feature == "unix"
	}
}

#[rstest]
#[case("1", true)]
#[case("0", false)]
#[case("&term =~ '^screen'", true)]
#[case("&term =~ 'xterm\\|rxvt'", false)]
#[case("&term =~? 'SCREEN'", true)]
#[case("&term !~ 'tmux'", true)]
#[case("&term == 'screen-256color'", true)]
#[case("&term != \"linux\"", true)]
#[case("&compatible", false)]
#[case("!&compatible", true)]
#[case("has('unix') && !has('win32')", true)]
#[case("has('win32') || has('mac')", false)]
#[case("exists('g:loaded')", true)]
#[case("exists('g:missing')", false)]
#[case("exists('&term')", true)]
#[case("(has('unix') || 0) && g:loaded", true)]
#[case("g:loaded == 1 \" trailing comment", true)]
fn evaluates(#[case] src: &str, #[case] expected: bool) {
	let expr = Expr::parse(src).unwrap();
	assert_eq!(expr.test(&TestEnv).unwrap(), expected, "{src}");
}

#[rstest]
#[case("")]
#[case("has('unix'")]
#[case("&")]
#[case("1 2")]
#[case("&term ==")]
fn rejects_malformed(#[case] src: &str) {
	assert!(Expr::parse(src).is_err(), "{src}");
}

#[test]
fn unknown_names_fail_at_evaluation() {
	assert!(Expr::parse("&nosuch").unwrap().test(&TestEnv).is_err());
	assert!(Expr::parse("g:nosuch").unwrap().test(&TestEnv).is_err());
	assert!(Expr::parse("&term =~ '('").unwrap().test(&TestEnv).is_ok());
}

#[test]
fn translates_vim_patterns() {
	assert_eq!(vim_regex(r"xterm\|rxvt"), "xterm|rxvt");
	assert_eq!(vim_regex(r"\s\+$"), r"\s+$");
	assert_eq!(vim_regex("a(b)"), r"a\(b\)");
}
