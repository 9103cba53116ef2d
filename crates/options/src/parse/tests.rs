use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use super::*;

fn eval(reg: &OptionsRegistry, text: &str, current: Option<OptionValue>) -> Result<OptionValue, OptionError> {
	let (id, op) = Assignment::parse(text)?.resolve(reg)?;
	let current = current.unwrap_or_else(|| reg.default_value(id));
	apply(reg, id, &op, &current)
}

#[rstest]
#[case("number", "number", AssignOp::Enable)]
#[case("ts=4", "ts", AssignOp::Assign("4".into()))]
#[case("ts:4", "ts", AssignOp::Assign("4".into()))]
#[case("path+=**", "path", AssignOp::Add("**".into()))]
#[case("bs-=eol", "bs", AssignOp::Remove("eol".into()))]
#[case("listchars=tab:> ,trail:-", "listchars", AssignOp::Assign("tab:> ,trail:-".into()))]
fn parses_assignment_forms(#[case] input: &str, #[case] name: &str, #[case] op: AssignOp) {
	assert_eq!(Assignment::parse(input).unwrap(), Assignment { name: name.into(), op });
}

#[rstest]
#[case("=4")]
#[case("ts?")]
fn rejects_malformed(#[case] input: &str) {
	assert!(matches!(Assignment::parse(input), Err(OptionError::Malformed(_))));
}

#[test]
fn toggles_are_rejected() {
	let reg = OptionsRegistry::builtin();
	assert!(matches!(Assignment::parse("number!"), Err(OptionError::UnsupportedOperator { op: "!", .. })));
	assert!(matches!(
		Assignment::parse("invnumber").unwrap().resolve(&reg),
		Err(OptionError::UnsupportedOperator { op: "inv", .. })
	));
}

#[test]
fn no_prefix_disables_booleans() {
	let reg = OptionsRegistry::builtin();
	assert_eq!(eval(&reg, "noexpandtab", Some(OptionValue::Bool(true))).unwrap(), OptionValue::Bool(false));
	assert_eq!(eval(&reg, "nonu", None).unwrap(), OptionValue::Bool(false));
}

#[test]
fn boolean_syntax_on_non_boolean_is_an_error() {
	let reg = OptionsRegistry::builtin();
	assert!(matches!(eval(&reg, "tabstop", None), Err(OptionError::NotBoolean(name)) if name == "tabstop"));
}

#[test]
fn unknown_option_carries_suggestion() {
	let reg = OptionsRegistry::builtin();
	match eval(&reg, "tabstp=4", None) {
		Err(OptionError::UnknownOption { name, suggestion }) => {
			assert_eq!(name, "tabstp");
			assert_eq!(suggestion.as_deref(), Some("tabstop"));
		}
		other => panic!("expected unknown option, got {other:?}"),
	}
}

#[test]
fn enum_membership_is_checked() {
	let reg = OptionsRegistry::builtin();
	assert_eq!(eval(&reg, "background=dark", None).unwrap(), OptionValue::String("dark".into()));
	assert!(matches!(eval(&reg, "background=blue", None), Err(OptionError::InvalidValue { .. })));
}

#[test]
fn set_operators_are_union_and_difference() {
	let reg = OptionsRegistry::builtin();
	let v = eval(&reg, "backspace=indent,eol", None).unwrap();
	let v = eval(&reg, "backspace+=start", Some(v)).unwrap();
	assert_eq!(v.to_string(), "eol,indent,start");
	let v = eval(&reg, "backspace-=eol", Some(v)).unwrap();
	assert_eq!(v.to_string(), "indent,start");
	assert!(matches!(eval(&reg, "backspace+=bogus", Some(v)), Err(OptionError::InvalidValue { .. })));
}

#[test]
fn flags_accept_single_characters() {
	let reg = OptionsRegistry::builtin();
	let v = eval(&reg, "mouse=a", None).unwrap();
	assert_eq!(v.to_string(), "a");
	let v = eval(&reg, "mouse+=nv", Some(v)).unwrap();
	assert_eq!(v.to_string(), "anv");
	assert!(eval(&reg, "mouse=z", None).is_err());
}

#[test]
fn add_on_scalar_is_unsupported() {
	let reg = OptionsRegistry::builtin();
	assert!(matches!(eval(&reg, "tabstop+=2", None), Err(OptionError::UnsupportedOperator { op: "+=", .. })));
}

#[test]
fn all_builtin_defaults_validate() {
	let reg = OptionsRegistry::builtin();
	for (id, def) in reg.iter() {
		assert!(reg.validate(id, &def.default_value()).is_ok(), "default of {} is invalid", def.name);
	}
}

fn statement() -> impl Strategy<Value = String> {
	prop_oneof![
		(1i64..32).prop_map(|n| format!("tabstop={n}")),
		Just("expandtab".to_string()),
		Just("noexpandtab".to_string()),
		prop::sample::subsequence(vec!["indent", "eol", "start"], 0..=3).prop_map(|v| format!("backspace+={}", v.join(","))),
		prop::sample::subsequence(vec!["indent", "eol", "start"], 0..=3).prop_map(|v| format!("backspace-={}", v.join(","))),
		prop::sample::select(vec!["n", "v", "a", "nv"]).prop_map(|f| format!("mouse+={f}")),
	]
}

proptest! {
	#[test]
	fn applying_twice_equals_applying_once(stmt in statement(), start in prop::sample::subsequence(vec!["indent", "eol", "start"], 0..=3)) {
		let reg = OptionsRegistry::builtin();
		let (id, op) = Assignment::parse(&stmt).unwrap().resolve(&reg).unwrap();
		let current = match reg.def(id).value_type {
			OptionType::Set(_) => OptionValue::Set(start.iter().map(|s| s.to_string()).collect()),
			_ => reg.default_value(id),
		};

		let once = apply(&reg, id, &op, &current).unwrap();
		let twice = apply(&reg, id, &op, &once).unwrap();
		prop_assert_eq!(once, twice);
	}
}
