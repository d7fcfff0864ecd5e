//! Serializable language definitions.
//!
//! A [`Dialect`] lists the entry rules of a lexer in priority order, the operator characters,
//! and the words that open and close folds. It is plain data; [`Lexer::new`](crate::Lexer::new)
//! validates it and compiles it into lookup tables.
//!
//! ```yaml
//! name: sample
//! operators: "()=,"
//! rules:
//!   - rule: line_comment
//!     leaders: ";"
//!   - rule: quote
//!     quote: '"'
//!     state: string
//!     escape: { kind: backslash }
//!     at_eol: mark
//!   - rule: line_start_word
//!   - rule: identifier
//!   - rule: operator
//! fold:
//!   open: [begin]
//!   close: [end]
//! ```

use crate::error::DialectError;
use crate::state::LexState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A language definition for the tokenizer and folder.
pub struct Dialect {
    /// Human-readable name.
    pub name: String,

    #[serde(default)]
    /// File extensions (without the dot) associated with this dialect.
    pub file_extensions: Vec<String>,

    /// Entry rules, checked in order from the `Default` state; the first match wins.
    pub rules: Vec<EntryRule>,

    #[serde(default)]
    /// Characters that lex as single-character operators.
    pub operators: String,

    #[serde(default)]
    /// Words that adjust fold levels.
    pub fold: FoldRules,
}

impl Dialect {
    /// Parse a dialect from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DialectError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serialize the dialect to YAML.
    pub fn to_yaml_string(&self) -> Result<String, DialectError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
/// A rule that may start a new lexical state while in `Default`.
pub enum EntryRule {
    /// Any of `leaders` starts a comment that runs to the end of the line.
    LineComment {
        /// Comment leader characters (e.g. `";#"`).
        leaders: String,
    },

    /// A two-character opener starts a comment closed by a two-character closer.
    BlockComment {
        /// Opening delimiter (e.g. `"/*"`).
        open: String,
        /// Closing delimiter (e.g. `"*/"`).
        close: String,
    },

    /// A quote character starts a quoted construct closed by the same character.
    Quote {
        /// The quote glyph.
        quote: char,
        /// `string`, `character`, or `raw_string`.
        state: LexState,
        #[serde(default)]
        /// Escape convention inside the construct.
        escape: EscapeRule,
        #[serde(default)]
        /// What happens when the construct reaches an unescaped line end.
        at_eol: EolPolicy,
    },

    /// A digit, or `.` followed by a digit, starts a number.
    Number {
        #[serde(default)]
        /// Characters besides word characters that continue a number (e.g. `"%"`).
        extra: String,
    },

    /// `leader` followed by a word start, before anything visible on the line.
    Preprocessor {
        /// Directive leader (e.g. `!` or `#`).
        leader: char,
    },

    /// `sigil` followed by a word start.
    SigilWord {
        /// The sigil.
        sigil: char,
        /// `asm_instruction`, `asm_register`, or `doc_tag`.
        state: LexState,
    },

    /// `sigil` followed by `open`; the run ends after `close`.
    SigilGroup {
        /// The sigil.
        sigil: char,
        /// Group opener.
        open: char,
        /// Group closer.
        close: char,
        /// `asm_instruction`, `asm_register`, or `doc_tag`.
        state: LexState,
    },

    /// A word start before anything visible on the line starts a keyword candidate.
    LineStartWord {
        #[serde(default = "default_true")]
        /// Reclassify the word as a label when terminated by a single `:`.
        labels: bool,
    },

    /// Any other word start starts an identifier.
    Identifier {
        #[serde(default)]
        /// Characters besides word characters that continue an identifier.
        extra: String,
    },

    /// A character from [`Dialect::operators`] lexes as a one-character operator.
    Operator,
}

fn default_true() -> bool {
    true
}

impl EntryRule {
    /// The rule kind, as written in YAML.
    pub fn kind(&self) -> &'static str {
        match self {
            EntryRule::LineComment { .. } => "line_comment",
            EntryRule::BlockComment { .. } => "block_comment",
            EntryRule::Quote { .. } => "quote",
            EntryRule::Number { .. } => "number",
            EntryRule::Preprocessor { .. } => "preprocessor",
            EntryRule::SigilWord { .. } => "sigil_word",
            EntryRule::SigilGroup { .. } => "sigil_group",
            EntryRule::LineStartWord { .. } => "line_start_word",
            EntryRule::Identifier { .. } => "identifier",
            EntryRule::Operator => "operator",
        }
    }

    /// The state this rule enters.
    pub fn state(&self) -> LexState {
        match self {
            EntryRule::LineComment { .. } => LexState::LineComment,
            EntryRule::BlockComment { .. } => LexState::BlockComment,
            EntryRule::Quote { state, .. }
            | EntryRule::SigilWord { state, .. }
            | EntryRule::SigilGroup { state, .. } => *state,
            EntryRule::Number { .. } => LexState::Number,
            EntryRule::Preprocessor { .. } => LexState::Preprocessor,
            EntryRule::LineStartWord { .. } => LexState::Keyword,
            EntryRule::Identifier { .. } => LexState::Identifier,
            EntryRule::Operator => LexState::Operator,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// How a quoted construct escapes its own delimiter.
pub enum EscapeRule {
    /// No escapes; the first matching quote closes.
    #[default]
    None,
    /// A backslash consumes the following character.
    Backslash,
    /// `sigil` then backslash then backslash-or-quote is consumed as a unit (NSIS `$\"`).
    SigilBackslash {
        /// The lead sigil.
        sigil: char,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Behavior of an open quoted construct at an unescaped line end.
pub enum EolPolicy {
    /// Keep going on the next line.
    #[default]
    Continue,
    /// Style the construct `string_eol` through the line end and close it.
    Mark,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Words that open and close folds.
pub struct FoldRules {
    #[serde(default)]
    /// Keyword-styled words that open a fold.
    pub open: Vec<WordMatch>,
    #[serde(default)]
    /// Keyword-styled words that close a fold.
    pub close: Vec<WordMatch>,
    #[serde(default)]
    /// Preprocessor directives (without leader) that open a fold.
    pub directive_open: Vec<WordMatch>,
    #[serde(default)]
    /// Preprocessor directives (without leader) that close a fold.
    pub directive_close: Vec<WordMatch>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
/// A lowercase word pattern: `word` matches exactly, `word*` matches by prefix.
pub enum WordMatch {
    /// Match the whole word.
    Exact(String),
    /// Match any word starting with the prefix.
    Prefix(String),
}

impl WordMatch {
    /// Returns `true` if the (lowercased) word matches.
    pub fn matches(&self, word: &str) -> bool {
        match self {
            WordMatch::Exact(w) => word == w,
            WordMatch::Prefix(p) => word.starts_with(p.as_str()),
        }
    }
}

impl TryFrom<String> for WordMatch {
    type Error = DialectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let lowered = value.to_ascii_lowercase();
        match lowered.strip_suffix('*') {
            Some("") => Err(DialectError::InvalidMatcher(value)),
            Some(prefix) => Ok(WordMatch::Prefix(prefix.to_string())),
            None if lowered.is_empty() => Err(DialectError::InvalidMatcher(value)),
            None => Ok(WordMatch::Exact(lowered)),
        }
    }
}

impl From<WordMatch> for String {
    fn from(value: WordMatch) -> Self {
        match value {
            WordMatch::Exact(w) => w,
            WordMatch::Prefix(p) => format!("{p}*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_match_parse() {
        assert_eq!(
            WordMatch::try_from("Section".to_string()).unwrap(),
            WordMatch::Exact("section".to_string())
        );
        assert_eq!(
            WordMatch::try_from("if*".to_string()).unwrap(),
            WordMatch::Prefix("if".to_string())
        );
        assert!(WordMatch::try_from("*".to_string()).is_err());
        assert!(WordMatch::try_from(String::new()).is_err());
    }

    #[test]
    fn test_word_match_matches() {
        let exact = WordMatch::Exact("macro".to_string());
        assert!(exact.matches("macro"));
        assert!(!exact.matches("macroend"));

        let prefix = WordMatch::Prefix("if".to_string());
        assert!(prefix.matches("if"));
        assert!(prefix.matches("ifdef"));
        assert!(!prefix.matches("endif"));
    }

    #[test]
    fn test_dialect_yaml() {
        let yaml = r#"
name: sample
file_extensions: [smp]
operators: "()="
rules:
  - rule: line_comment
    leaders: ";#"
  - rule: quote
    quote: '"'
    state: string
    escape: { kind: sigil_backslash, sigil: "$" }
    at_eol: mark
  - rule: line_start_word
  - rule: identifier
    extra: "-"
  - rule: operator
fold:
  open: [begin]
  close: [end]
  directive_open: ["if*"]
"#;
        let dialect = Dialect::from_yaml_str(yaml).unwrap();
        assert_eq!(dialect.name, "sample");
        assert_eq!(dialect.file_extensions, vec!["smp".to_string()]);
        assert_eq!(dialect.rules.len(), 5);
        assert_eq!(
            dialect.rules[1],
            EntryRule::Quote {
                quote: '"',
                state: LexState::String,
                escape: EscapeRule::SigilBackslash { sigil: '$' },
                at_eol: EolPolicy::Mark,
            }
        );
        assert_eq!(dialect.rules[2], EntryRule::LineStartWord { labels: true });
        assert_eq!(dialect.rules[4], EntryRule::Operator);
        assert_eq!(
            dialect.fold.directive_open,
            vec![WordMatch::Prefix("if".to_string())]
        );

        let round = Dialect::from_yaml_str(&dialect.to_yaml_string().unwrap()).unwrap();
        assert_eq!(round, dialect);
    }

    #[test]
    fn test_rule_states() {
        assert_eq!(
            EntryRule::LineStartWord { labels: false }.state(),
            LexState::Keyword
        );
        assert_eq!(
            EntryRule::SigilGroup {
                sigil: '$',
                open: '{',
                close: '}',
                state: LexState::AsmRegister,
            }
            .state(),
            LexState::AsmRegister
        );
        assert_eq!(EntryRule::Operator.kind(), "operator");
    }
}
