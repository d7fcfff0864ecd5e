//! The tokenizer (colouriser): drives [`Lexer::step`] over a buffer range and collects spans.

use crate::accessor::{Accessor, EOF_CHAR};
use crate::charclass::is_space_char;
use crate::error::LexError;
use crate::keywords::{KeywordOracle, NoKeywords};
use crate::lexer::Lexer;
use crate::state::{LexState, StyleSpan, push_span};
use crate::transition::{Action, CharWindow, LineContext};
use tracing::{debug, trace};

/// Everything the tokenizer needs besides the buffer.
#[derive(Clone, Copy)]
pub struct LexConfig<'a> {
    /// The compiled dialect.
    pub lexer: &'a Lexer,
    /// Sub-styles keyword spans.
    pub keywords: &'a dyn KeywordOracle,
}

impl<'a> LexConfig<'a> {
    /// A configuration without a keyword oracle.
    pub fn new(lexer: &'a Lexer) -> Self {
        Self {
            lexer,
            keywords: &NoKeywords,
        }
    }

    /// Use `keywords` to classify keyword spans.
    pub fn with_keywords(mut self, keywords: &'a dyn KeywordOracle) -> Self {
        self.keywords = keywords;
        self
    }
}

impl std::fmt::Debug for LexConfig<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LexConfig")
            .field("lexer", &self.lexer.name())
            .finish_non_exhaustive()
    }
}

/// The state carried out of a physical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineEnd {
    /// The line whose terminator was scanned.
    pub line: usize,
    /// The state after the terminator; a scan starting on the next line resumes with it.
    pub state: LexState,
}

/// Output of [`tokenize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    /// Contiguous spans covering the requested range, in order.
    pub spans: Vec<StyleSpan>,
    /// The carried-out state at the end of the range.
    pub state: LexState,
    /// States at every line terminator scanned. Lines joined by a continuation have no entry.
    pub line_ends: Vec<LineEnd>,
}

/// Tokenize `[start, start + length)`, resuming in state `initial`.
///
/// The result covers the range exactly. The scan reads one character of history before `start`
/// and one of lookahead past the end; when the range reaches the end of the buffer it runs one
/// extra position over the end-of-buffer sentinel so the last construct closes normally.
pub fn tokenize<A: Accessor + ?Sized>(
    accessor: &A,
    start: usize,
    length: usize,
    initial: LexState,
    config: &LexConfig<'_>,
) -> Result<Tokenized, LexError> {
    let len = accessor.len();
    let end = start
        .checked_add(length)
        .filter(|end| *end <= len)
        .ok_or(LexError::RangeOutOfBounds { start, length, len })?;

    debug!(
        lexer = config.lexer.name(),
        start,
        end,
        ?initial,
        "tokenize"
    );

    let mut colouriser = Colouriser::new(accessor, config, start, end);
    let state = colouriser.run(initial);
    let result = Tokenized {
        spans: colouriser.spans,
        state,
        line_ends: colouriser.line_ends,
    };

    debug!(
        spans = result.spans.len(),
        lines = result.line_ends.len(),
        state = ?result.state,
        "tokenize done"
    );
    Ok(result)
}

/// Scan state for one [`tokenize`] call.
struct Colouriser<'a, A: Accessor + ?Sized> {
    accessor: &'a A,
    config: &'a LexConfig<'a>,
    end: usize,
    scan_end: usize,
    pos: usize,
    segment_start: usize,
    line: usize,
    line_start: usize,
    visible_chars: usize,
    spans: Vec<StyleSpan>,
    line_ends: Vec<LineEnd>,
}

impl<'a, A: Accessor + ?Sized> Colouriser<'a, A> {
    fn new(accessor: &'a A, config: &'a LexConfig<'a>, start: usize, end: usize) -> Self {
        let scan_end = if end == accessor.len() { end + 1 } else { end };
        let line = accessor.line_of(start);
        let line_start = accessor.line_start(line);
        let visible_chars = (line_start..start)
            .filter(|pos| !is_space_char(accessor.char_at(*pos)))
            .count();

        Self {
            accessor,
            config,
            end,
            scan_end,
            pos: start,
            segment_start: start,
            line,
            line_start,
            visible_chars,
            spans: Vec::new(),
            line_ends: Vec::new(),
        }
    }

    fn run(&mut self, initial: LexState) -> LexState {
        let lexer = self.config.lexer;
        let mut state = initial;

        while self.pos < self.scan_end {
            let ctx = LineContext {
                at_line_start: self.pos == self.line_start,
                visible_chars: self.visible_chars,
            };
            let step = lexer.step(state, self.window(), ctx);

            if let Some(style) = step.close_before {
                self.commit(self.pos, style);
            }
            state = step.state;
            for _ in 0..step.skip {
                self.consume();
            }

            match step.action {
                Action::Continue => {}
                Action::CloseAfter(style) => self.commit(self.pos + 1, style),
                Action::Continuation => {
                    self.join_lines();
                    continue;
                }
                Action::Escape => {
                    if lexer.continues_line(state, self.window()) {
                        self.join_lines();
                        continue;
                    }
                }
            }

            let at_eol = self.window().at_eol();
            self.consume();
            if at_eol {
                self.line_ends.push(LineEnd {
                    line: self.line,
                    state,
                });
                self.next_line();
                self.visible_chars = 0;
            }
        }

        self.commit(self.end, state);
        state
    }

    fn window(&self) -> CharWindow {
        let prev = match self.pos.checked_sub(1) {
            Some(p) => self.accessor.char_at(p),
            None => EOF_CHAR,
        };
        CharWindow::new(
            prev,
            self.accessor.char_at(self.pos),
            self.accessor.char_at(self.pos + 1),
        )
    }

    fn consume(&mut self) {
        if !is_space_char(self.accessor.char_at(self.pos)) {
            self.visible_chars += 1;
        }
        self.pos += 1;
    }

    /// Consume a backslash and the line terminator after it, treating `\r\n` as one unit.
    /// The visible count carries over so the next physical line continues the logical one.
    fn join_lines(&mut self) {
        self.consume();
        if self.accessor.char_at(self.pos) == b'\r' && self.accessor.char_at(self.pos + 1) == b'\n'
        {
            self.pos += 1;
        }
        self.pos += 1;
        self.next_line();
    }

    fn next_line(&mut self) {
        self.line += 1;
        self.line_start = self.accessor.line_start(self.line);
    }

    fn commit(&mut self, pos: usize, style: LexState) {
        let stop = pos.min(self.end);
        if stop <= self.segment_start {
            return;
        }
        let class = if style == LexState::Keyword {
            self.keyword_class(self.segment_start, stop)
        } else {
            None
        };
        trace!(start = self.segment_start, end = stop, ?style, "commit");
        push_span(
            &mut self.spans,
            StyleSpan::new(self.segment_start, stop, style).with_keyword_class(class),
        );
        self.segment_start = stop;
    }

    fn keyword_class(&self, start: usize, end: usize) -> Option<u8> {
        let word: String = (start..end)
            .map(|pos| char::from(self.accessor.char_at(pos).to_ascii_lowercase()))
            .collect();
        self.config.keywords.classify(&word).first()
    }
}
