//! Chord grammar for rcload key bindings.

mod node;
mod parser;

pub use node::{KEY_SEP, Key, Modifier, Node, display_seq, expand_leaders, notation_seq};
pub use parser::{ParseError, parse, parse_chord, parse_notation, parse_seq};
