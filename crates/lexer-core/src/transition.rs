//! The pure state transition function.
//!
//! Given the current state, a three-character window, and the line context, [`Lexer::step`]
//! decides what the tokenizer does at one offset. Nothing here touches a buffer, so every rule
//! can be tested with literal windows.
//!
//! A transition is applied in this order:
//!
//! 1. commit everything before the current offset with `close_before`, if set;
//! 2. switch to `state` and advance `skip` extra characters;
//! 3. perform `action`.

use crate::charclass::{is_digit, is_eol, is_word_char, is_word_start};
use crate::lexer::{CompiledEscape, EntryMatch, ExitRule, Lexer};
use crate::state::LexState;

/// The characters around the current offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharWindow {
    /// The character before the current one (`0` at the start of the buffer).
    pub prev: u8,
    /// The current character (`0` past the end of the buffer).
    pub ch: u8,
    /// The character after the current one (`0` past the end of the buffer).
    pub next: u8,
}

impl CharWindow {
    /// Build a window.
    pub const fn new(prev: u8, ch: u8, next: u8) -> Self {
        Self { prev, ch, next }
    }

    /// Returns `true` if the current character ends a physical line.
    pub fn at_eol(&self) -> bool {
        is_eol(self.ch, self.next)
    }
}

/// Where the current offset sits on its line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineContext {
    /// The offset is the first byte of its line.
    pub at_line_start: bool,
    /// Non-space characters seen on the logical line before this offset.
    pub visible_chars: usize,
}

/// What the tokenizer does after the state bookkeeping of a [`Step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Keep scanning.
    Continue,
    /// Commit through the current character (after the skip) with the given style.
    CloseAfter(LexState),
    /// The current character is a backslash before a line terminator: consume both and keep
    /// the state.
    Continuation,
    /// An escape was consumed by the skip; check for a continuation again at the new offset.
    Escape,
}

/// The outcome of one transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Commit `[segment start, offset)` with this style.
    pub close_before: Option<LexState>,
    /// The state after the transition.
    pub state: LexState,
    /// Extra characters consumed with the current one.
    pub skip: usize,
    /// The follow-up action.
    pub action: Action,
}

impl Step {
    const fn stay(state: LexState) -> Self {
        Self {
            close_before: None,
            state,
            skip: 0,
            action: Action::Continue,
        }
    }

    const fn close_before(style: LexState) -> Self {
        Self {
            close_before: Some(style),
            state: LexState::Default,
            skip: 0,
            action: Action::Continue,
        }
    }

    const fn close_after(style: LexState, skip: usize) -> Self {
        Self {
            close_before: None,
            state: LexState::Default,
            skip,
            action: Action::CloseAfter(style),
        }
    }
}

impl Lexer {
    /// The full transition at one offset: exit rules for `state`, then the line continuation
    /// check, then entry rules if the state is (now) `Default`.
    pub fn step(&self, state: LexState, w: CharWindow, ctx: LineContext) -> Step {
        let exit = self.exit(state, w, ctx);
        if exit.action != Action::Continue || exit.skip > 0 {
            return exit;
        }

        if self.continues_line(exit.state, w) {
            return Step {
                action: Action::Continuation,
                ..exit
            };
        }

        if exit.state != LexState::Default {
            return exit;
        }

        match self.enter(w, ctx) {
            Some(entry) => Step {
                close_before: exit.close_before.or(Some(LexState::Default)),
                ..entry
            },
            None => exit,
        }
    }

    /// Exit rules: does `state` end at this offset?
    pub fn exit(&self, state: LexState, w: CharWindow, ctx: LineContext) -> Step {
        match self.exits[state.index()] {
            ExitRule::Stay => Step::stay(state),
            ExitRule::Immediate => Step::close_before(state),
            ExitRule::Number { extra } => {
                let continues = is_word_char(w.ch)
                    || extra.contains(w.ch)
                    || ((w.ch == b'+' || w.ch == b'-') && is_digit(w.next));
                if continues {
                    Step::stay(state)
                } else {
                    Step::close_before(state)
                }
            }
            ExitRule::Word { extra, labels } => {
                if is_word_char(w.ch) || extra.contains(w.ch) {
                    Step::stay(state)
                } else if labels && w.ch == b':' && w.next != b':' {
                    Step::close_before(LexState::Label)
                } else {
                    Step::close_before(state)
                }
            }
            ExitRule::AfterChar { close } => {
                if w.prev == close {
                    Step::close_before(state)
                } else {
                    Step::stay(state)
                }
            }
            ExitRule::Quote {
                quote,
                escape,
                mark_eol,
            } => {
                let escaped = match escape {
                    CompiledEscape::None => false,
                    CompiledEscape::Backslash => {
                        w.ch == b'\\' && w.next != b'\r' && w.next != b'\n'
                    }
                    CompiledEscape::SigilBackslash { sigil } => {
                        w.prev == sigil && w.ch == b'\\' && (w.next == b'\\' || w.next == quote)
                    }
                };
                if escaped {
                    Step {
                        close_before: None,
                        state,
                        skip: 1,
                        action: Action::Escape,
                    }
                } else if w.ch == quote {
                    Step::close_after(state, 0)
                } else if mark_eol && w.at_eol() {
                    Step::close_after(LexState::StringEol, 0)
                } else {
                    Step::stay(state)
                }
            }
            ExitRule::LineComment => {
                if ctx.at_line_start {
                    Step::close_before(state)
                } else {
                    Step::stay(state)
                }
            }
            ExitRule::BlockComment { close } => {
                if w.ch == close[0] && w.next == close[1] {
                    Step::close_after(state, 1)
                } else {
                    Step::stay(state)
                }
            }
        }
    }

    /// Returns `true` if a backslash at this offset joins the line with the next one.
    ///
    /// Line comments never continue.
    pub fn continues_line(&self, state: LexState, w: CharWindow) -> bool {
        state != LexState::LineComment && w.ch == b'\\' && (w.next == b'\n' || w.next == b'\r')
    }

    /// Entry rules: the first rule matching from `Default`, if any.
    pub fn enter(&self, w: CharWindow, ctx: LineContext) -> Option<Step> {
        let line_start = ctx.visible_chars == 0;
        self.entries.iter().find_map(|entry| {
            let (state, skip) = match *entry {
                EntryMatch::LineComment { leaders } if leaders.contains(w.ch) => {
                    (LexState::LineComment, 0)
                }
                EntryMatch::BlockComment { open } if w.ch == open[0] && w.next == open[1] => {
                    (LexState::BlockComment, 1)
                }
                EntryMatch::Quote { quote, state } if w.ch == quote => (state, 0),
                EntryMatch::Number
                    if is_digit(w.ch) || (w.ch == b'.' && is_digit(w.next)) =>
                {
                    (LexState::Number, 0)
                }
                EntryMatch::Preprocessor { leader }
                    if line_start && w.ch == leader && is_word_start(w.next) =>
                {
                    (LexState::Preprocessor, 0)
                }
                EntryMatch::SigilWord { sigil, state }
                    if w.ch == sigil && is_word_start(w.next) =>
                {
                    (state, 0)
                }
                EntryMatch::SigilGroup { sigil, open, state }
                    if w.ch == sigil && w.next == open =>
                {
                    (state, 0)
                }
                EntryMatch::LineStartWord if line_start && is_word_start(w.ch) => {
                    (LexState::Keyword, 0)
                }
                EntryMatch::Identifier if is_word_start(w.ch) => (LexState::Identifier, 0),
                EntryMatch::Operator if self.operators.contains(w.ch) => (LexState::Operator, 0),
                _ => return None,
            };
            Some(Step {
                close_before: Some(LexState::Default),
                state,
                skip,
                action: Action::Continue,
            })
        })
    }
}
