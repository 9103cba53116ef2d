use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

fn ch(c: char) -> Node {
	Node::from(Key::Char(c))
}

#[rstest]
#[case("a", Node::from(Key::Char('a')))]
#[case("ctrl-a", Node::new(Modifier::Ctrl as u8, Key::Char('a')))]
#[case("ctrl-alt-f1", Node::new(Modifier::Ctrl as u8 | Modifier::Alt as u8, Key::F(1)))]
#[case("shift-tab", Node::new(Modifier::Shift as u8, Key::Tab))]
#[case("end", Node::from(Key::End))]
#[case("f12", Node::from(Key::F(12)))]
#[case("-", Node::from(Key::Char('-')))]
fn parses_dash_nodes(#[case] input: &str, #[case] expected: Node) {
	assert_eq!(parse(input).unwrap(), expected);
}

#[rstest]
#[case("f36")]
#[case("ctrl-")]
#[case("ab")]
#[case("")]
fn rejects_invalid_dash_nodes(#[case] input: &str) {
	assert!(parse(input).is_err(), "{input:?} should not parse");
}

#[test]
fn parse_error_reports_position() {
	let err = parse("ab").unwrap_err();
	assert_eq!(err.position, 1);
}

#[test]
fn dash_sequence_splits_on_whitespace() {
	let seq = parse_seq("ctrl-w  h").unwrap();
	assert_eq!(seq, vec![Node::new(Modifier::Ctrl as u8, Key::Char('w')), ch('h')]);
	assert!(parse_seq("   ").is_err());
}

#[rstest]
#[case("gg", vec![ch('g'), ch('g')])]
#[case("<C-w>h", vec![Node::new(Modifier::Ctrl as u8, Key::Char('w')), ch('h')])]
#[case("<C-W>", vec![Node::new(Modifier::Ctrl as u8, Key::Char('w'))])]
#[case("<leader>ff", vec![Node::from(Key::Leader), ch('f'), ch('f')])]
#[case("<S-F5>", vec![Node::new(Modifier::Shift as u8, Key::F(5))])]
#[case("<M-j>", vec![Node::new(Modifier::Alt as u8, Key::Char('j'))])]
#[case("<C-->", vec![Node::new(Modifier::Ctrl as u8, Key::Char('-'))])]
#[case(":w<CR>", vec![ch(':'), ch('w'), Node::from(Key::Enter)])]
#[case("<lt>", vec![ch('<')])]
#[case("a b", vec![ch('a'), Node::from(Key::Space), ch('b')])]
fn parses_bracket_notation(#[case] input: &str, #[case] expected: Vec<Node>) {
	assert_eq!(parse_notation(input).unwrap(), expected);
}

#[test]
fn unknown_bracket_group_is_literal() {
	let seq = parse_notation("<Plug>").unwrap();
	assert_eq!(seq, "<Plug>".chars().map(ch).collect::<Vec<_>>());
}

#[test]
fn unterminated_bracket_is_literal() {
	let seq = parse_notation("<C-w").unwrap();
	assert_eq!(seq.len(), 4);
	assert_eq!(seq[0], ch('<'));
}

#[test]
fn chord_prefers_dash_then_falls_back() {
	assert_eq!(parse_chord("ctrl-w h").unwrap(), parse_notation("<C-w>h").unwrap());
	assert_eq!(parse_chord("gg").unwrap(), vec![ch('g'), ch('g')]);
	assert_eq!(parse_chord("<leader>n").unwrap(), vec![Node::from(Key::Leader), ch('n')]);
}

#[test]
fn notation_renders_back() {
	let seq = parse_notation("<C-w>h<CR><F5><lt>x").unwrap();
	assert_eq!(crate::notation_seq(&seq), "<C-w>h<CR><F5><lt>x");
	assert_eq!(crate::display_seq(&seq), "ctrl-w h enter f5 < x");
}

#[test]
fn leaders_expand_in_place() {
	let seq = parse_notation("<leader>n<localleader>").unwrap();
	let expanded = crate::expand_leaders(&seq, &[ch(',')], &[ch('\\')]);
	assert_eq!(expanded, vec![ch(','), ch('n'), ch('\\')]);
}
