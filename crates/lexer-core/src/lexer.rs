//! Compilation of a [`Dialect`] into lookup tables.
//!
//! Compiling does two things: it checks that the dialect is well-formed (ASCII delimiters,
//! two-character block comment markers, one producing rule per state), and it splits every rule
//! into an *entry* half, matched from `Default`, and an *exit* half, indexed by the state the
//! rule produces. The transition function in [`crate::transition`] only ever looks at these
//! tables.

use crate::charclass::ByteSet;
use crate::dialect::{Dialect, EntryRule, EolPolicy, EscapeRule, FoldRules};
use crate::error::DialectError;
use crate::state::LexState;
use std::path::Path;

/// How a state ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExitRule {
    /// `Default` never exits.
    Stay,
    /// Close before the current character. Used for single-character states and for states
    /// no rule produces.
    Immediate,
    /// Close before the first character that cannot continue a number.
    Number { extra: ByteSet },
    /// Close before the first non-word character.
    Word { extra: ByteSet, labels: bool },
    /// Close before the character that follows `close`.
    AfterChar { close: u8 },
    /// Close after the matching quote.
    Quote {
        quote: u8,
        escape: CompiledEscape,
        mark_eol: bool,
    },
    /// Close at the start of the next line.
    LineComment,
    /// Close after the two-character closer.
    BlockComment { close: [u8; 2] },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CompiledEscape {
    None,
    Backslash,
    SigilBackslash { sigil: u8 },
}

/// How a state starts, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntryMatch {
    LineComment { leaders: ByteSet },
    BlockComment { open: [u8; 2] },
    Quote { quote: u8, state: LexState },
    Number,
    Preprocessor { leader: u8 },
    SigilWord { sigil: u8, state: LexState },
    SigilGroup { sigil: u8, open: u8, state: LexState },
    LineStartWord,
    Identifier,
    Operator,
}

/// A validated, compiled [`Dialect`].
///
/// A `Lexer` is immutable and can be shared between documents (it is `Send + Sync`).
#[derive(Debug, Clone)]
pub struct Lexer {
    dialect: Dialect,
    pub(crate) exits: [ExitRule; LexState::ALL.len()],
    pub(crate) entries: Vec<EntryMatch>,
    pub(crate) operators: ByteSet,
    pub(crate) directive_leader: Option<u8>,
}

impl Lexer {
    /// Validate and compile a dialect.
    pub fn new(dialect: Dialect) -> Result<Self, DialectError> {
        let mut exits = [ExitRule::Immediate; LexState::ALL.len()];
        exits[LexState::Default.index()] = ExitRule::Stay;

        let mut produced = [false; LexState::ALL.len()];
        let mut entries = Vec::with_capacity(dialect.rules.len());
        let mut directive_leader = None;

        for rule in &dialect.rules {
            let state = rule.state();
            if produced[state.index()] {
                return Err(DialectError::DuplicateState(state));
            }
            produced[state.index()] = true;

            let (entry, exit) = compile_rule(rule)?;
            if let EntryMatch::Preprocessor { leader } = entry {
                directive_leader = Some(leader);
            }
            entries.push(entry);
            exits[state.index()] = exit;
        }

        let operators = ascii_set("operators", &dialect.operators)?;

        Ok(Self {
            dialect,
            exits,
            entries,
            operators,
            directive_leader,
        })
    }

    /// Parse and compile a YAML dialect.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DialectError> {
        Self::new(Dialect::from_yaml_str(yaml)?)
    }

    /// Load, parse, and compile a YAML dialect file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DialectError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// The dialect name.
    pub fn name(&self) -> &str {
        &self.dialect.name
    }

    /// File extensions associated with the dialect.
    pub fn file_extensions(&self) -> &[String] {
        &self.dialect.file_extensions
    }

    /// The source definition.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Fold word rules.
    pub fn fold_rules(&self) -> &FoldRules {
        &self.dialect.fold
    }

    /// The preprocessor leader, if the dialect has directives.
    pub fn directive_leader(&self) -> Option<u8> {
        self.directive_leader
    }

    /// Returns `true` if some entry rule produces `state`.
    pub fn produces(&self, state: LexState) -> bool {
        self.dialect.rules.iter().any(|rule| rule.state() == state)
    }

    /// Returns `true` if `path` ends with one of the dialect's file extensions.
    pub fn matches_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.dialect
                    .file_extensions
                    .iter()
                    .any(|known| known.eq_ignore_ascii_case(ext))
            })
    }
}

fn compile_rule(rule: &EntryRule) -> Result<(EntryMatch, ExitRule), DialectError> {
    let compiled = match rule {
        EntryRule::LineComment { leaders } => (
            EntryMatch::LineComment {
                leaders: ascii_set("line_comment.leaders", leaders)?,
            },
            ExitRule::LineComment,
        ),
        EntryRule::BlockComment { open, close } => (
            EntryMatch::BlockComment {
                open: delimiter("block_comment.open", open)?,
            },
            ExitRule::BlockComment {
                close: delimiter("block_comment.close", close)?,
            },
        ),
        EntryRule::Quote {
            quote,
            state,
            escape,
            at_eol,
        } => {
            if !matches!(
                state,
                LexState::String | LexState::Character | LexState::RawString
            ) {
                return Err(DialectError::InvalidState {
                    rule: rule.kind(),
                    state: *state,
                });
            }
            let quote = ascii_char("quote.quote", *quote)?;
            let escape = match escape {
                EscapeRule::None => CompiledEscape::None,
                EscapeRule::Backslash => CompiledEscape::Backslash,
                EscapeRule::SigilBackslash { sigil } => CompiledEscape::SigilBackslash {
                    sigil: ascii_char("quote.escape.sigil", *sigil)?,
                },
            };
            (
                EntryMatch::Quote {
                    quote,
                    state: *state,
                },
                ExitRule::Quote {
                    quote,
                    escape,
                    mark_eol: *at_eol == EolPolicy::Mark,
                },
            )
        }
        EntryRule::Number { extra } => (
            EntryMatch::Number,
            ExitRule::Number {
                extra: ascii_set("number.extra", extra)?,
            },
        ),
        EntryRule::Preprocessor { leader } => (
            EntryMatch::Preprocessor {
                leader: ascii_char("preprocessor.leader", *leader)?,
            },
            ExitRule::Word {
                extra: ByteSet::empty(),
                labels: false,
            },
        ),
        EntryRule::SigilWord { sigil, state } => {
            check_sigil_state(rule, *state)?;
            (
                EntryMatch::SigilWord {
                    sigil: ascii_char("sigil_word.sigil", *sigil)?,
                    state: *state,
                },
                ExitRule::Word {
                    extra: ByteSet::empty(),
                    labels: false,
                },
            )
        }
        EntryRule::SigilGroup {
            sigil,
            open,
            close,
            state,
        } => {
            check_sigil_state(rule, *state)?;
            (
                EntryMatch::SigilGroup {
                    sigil: ascii_char("sigil_group.sigil", *sigil)?,
                    open: ascii_char("sigil_group.open", *open)?,
                    state: *state,
                },
                ExitRule::AfterChar {
                    close: ascii_char("sigil_group.close", *close)?,
                },
            )
        }
        EntryRule::LineStartWord { labels } => (
            EntryMatch::LineStartWord,
            ExitRule::Word {
                extra: ByteSet::empty(),
                labels: *labels,
            },
        ),
        EntryRule::Identifier { extra } => (
            EntryMatch::Identifier,
            ExitRule::Word {
                extra: ascii_set("identifier.extra", extra)?,
                labels: false,
            },
        ),
        EntryRule::Operator => (EntryMatch::Operator, ExitRule::Immediate),
    };
    Ok(compiled)
}

fn check_sigil_state(rule: &EntryRule, state: LexState) -> Result<(), DialectError> {
    if matches!(
        state,
        LexState::AsmInstruction | LexState::AsmRegister | LexState::DocTag
    ) {
        Ok(())
    } else {
        Err(DialectError::InvalidState {
            rule: rule.kind(),
            state,
        })
    }
}

fn ascii_char(field: &'static str, ch: char) -> Result<u8, DialectError> {
    if ch.is_ascii() {
        Ok(ch as u8)
    } else {
        Err(DialectError::NonAscii {
            field,
            value: ch.to_string(),
        })
    }
}

fn ascii_set(field: &'static str, chars: &str) -> Result<ByteSet, DialectError> {
    if chars.is_ascii() {
        Ok(ByteSet::from_bytes(chars.as_bytes()))
    } else {
        Err(DialectError::NonAscii {
            field,
            value: chars.to_string(),
        })
    }
}

fn delimiter(field: &'static str, text: &str) -> Result<[u8; 2], DialectError> {
    if !text.is_ascii() {
        return Err(DialectError::NonAscii {
            field,
            value: text.to_string(),
        });
    }
    match *text.as_bytes() {
        [a, b] => Ok([a, b]),
        _ => Err(DialectError::DelimiterLength {
            field,
            expected: 2,
            value: text.to_string(),
        }),
    }
}
