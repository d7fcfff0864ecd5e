//! Shared fixtures for unit tests.

use crate::keywords::KeywordClasses;
use crate::lexer::Lexer;

/// A small C-flavoured dialect exercising every rule kind.
pub(crate) const SAMPLE_DIALECT: &str = r##"
name: sample
file_extensions: [smp]
operators: "()=,+-:"
rules:
  - rule: line_comment
    leaders: ";"
  - rule: block_comment
    open: "/*"
    close: "*/"
  - rule: quote
    quote: '"'
    state: string
    escape: { kind: backslash }
    at_eol: mark
  - rule: quote
    quote: '`'
    state: raw_string
  - rule: number
    extra: "%"
  - rule: preprocessor
    leader: "#"
  - rule: sigil_word
    sigil: "@"
    state: asm_instruction
  - rule: sigil_group
    sigil: "@"
    open: "["
    close: "]"
    state: asm_register
  - rule: line_start_word
  - rule: identifier
    extra: "-"
  - rule: operator
fold:
  open: [begin]
  close: [end]
  directive_open: ["if*", region]
  directive_close: ["end*"]
"##;

pub(crate) fn sample_lexer() -> Lexer {
    Lexer::from_yaml_str(SAMPLE_DIALECT).unwrap()
}

/// Class 0 for `begin`/`end`, class 1 for `print`.
pub(crate) fn sample_keywords(word: &str) -> KeywordClasses {
    match word {
        "begin" | "end" => KeywordClasses::single(0),
        "print" => KeywordClasses::single(1),
        _ => KeywordClasses::EMPTY,
    }
}
