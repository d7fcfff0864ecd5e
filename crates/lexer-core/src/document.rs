//! An incrementally re-lexed text buffer.
//!
//! [`Document`] is the host side of the tokenizer and folder: it owns the text (a [`Rope`]), one
//! style byte per text byte, one fold record per line, and the carried state at the end of every
//! line. After each edit it re-lexes from the nearest line whose starting state is known and stops
//! as soon as the carried state at a line end matches what was stored before the edit.
//!
//! ```text
//! edit ──► splice per-byte / per-line vectors
//!            │
//!            ▼
//!          restart line (walk back over continued lines)
//!            │
//!            ▼
//!          tokenize chunk ──► state at chunk end == stored? ──no──► next chunk
//!            │ yes
//!            ▼
//!          fold re-lexed lines (and the rest, if the last level moved)
//! ```

use crate::accessor::{Accessor, EOF_CHAR, StyledAccessor};
use crate::error::LexError;
use crate::fold_level::{FoldChange, FoldLevel};
use crate::folder::fold;
use crate::keywords::{KeywordOracle, NoKeywords};
use crate::lexer::Lexer;
use crate::properties::{FoldOptions, PropertySet};
use crate::state::{LexState, StyleSpan, push_span};
use crate::tokenizer::{LexConfig, tokenize};
use ropey::Rope;
use std::ops::Range;
use std::sync::Arc;
use tracing::{debug, trace};

/// What an edit re-computed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// Byte range whose styles were recomputed (in post-edit offsets).
    pub restyled: Range<usize>,
    /// Fold records that changed, in line order.
    pub fold_changes: Vec<FoldChange>,
}

/// A text buffer with styles and fold levels kept up to date across edits.
pub struct Document {
    rope: Rope,
    styles: Vec<u8>,
    keyword_classes: Vec<Option<u8>>,
    levels: Vec<FoldLevel>,
    /// Carried state at the end of each line; `None` for a line joined to the next one by a
    /// continuation, or not lexed yet.
    line_states: Vec<Option<LexState>>,
    properties: PropertySet,
    lexer: Arc<Lexer>,
    keywords: Box<dyn KeywordOracle + Send + Sync>,
}

impl Document {
    /// Create an unstyled document. Call [`Document::restyle_all`] to lex it.
    pub fn new(lexer: Arc<Lexer>, text: &str) -> Self {
        let rope = Rope::from_str(text);
        let lines = rope.len_lines();
        Self {
            styles: vec![LexState::Default.as_u8(); text.len()],
            keyword_classes: vec![None; text.len()],
            levels: vec![FoldLevel::default(); lines],
            line_states: vec![None; lines],
            rope,
            properties: PropertySet::new(),
            lexer,
            keywords: Box::new(NoKeywords),
        }
    }

    /// Use `keywords` to sub-style keyword spans.
    pub fn with_keywords(mut self, keywords: impl KeywordOracle + Send + Sync + 'static) -> Self {
        self.keywords = Box::new(keywords);
        self
    }

    /// Replace the property set.
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Set one property. Takes effect on the next edit or [`Document::restyle_all`].
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.set(key, value);
    }

    /// The property set.
    pub fn properties(&self) -> &PropertySet {
        &self.properties
    }

    /// The lexer.
    pub fn lexer(&self) -> &Arc<Lexer> {
        &self.lexer
    }

    /// The text.
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// The text as a `String`.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// One style byte per text byte.
    pub fn styles(&self) -> &[u8] {
        &self.styles
    }

    /// One fold record per line.
    pub fn levels(&self) -> &[FoldLevel] {
        &self.levels
    }

    /// The carried state at the end of `line`.
    pub fn line_state(&self, line: usize) -> Option<LexState> {
        self.line_states.get(line).copied().flatten()
    }

    /// The styled text as contiguous spans.
    pub fn spans(&self) -> Vec<StyleSpan> {
        let mut spans = Vec::new();
        for (pos, (&style, &class)) in self.styles.iter().zip(&self.keyword_classes).enumerate() {
            let state = LexState::from_u8(style).unwrap_or_default();
            push_span(
                &mut spans,
                StyleSpan::new(pos, pos + 1, state).with_keyword_class(class),
            );
        }
        spans
    }

    /// Lex and fold the whole document.
    pub fn restyle_all(&mut self) -> Result<EditOutcome, LexError> {
        self.line_states.fill(None);
        let last_line = self.line_count() - 1;
        self.relex(0, last_line)
    }

    /// Insert `text` at byte offset `pos`.
    pub fn insert(&mut self, pos: usize, text: &str) -> Result<EditOutcome, LexError> {
        self.check_offset(pos)?;
        let edit_line = self.line_of(pos);
        let lines_before = self.line_count();

        let char_idx = self.rope.byte_to_char(pos);
        self.rope.insert(char_idx, text);

        let default = LexState::Default.as_u8();
        self.styles
            .splice(pos..pos, std::iter::repeat_n(default, text.len()));
        self.keyword_classes
            .splice(pos..pos, std::iter::repeat_n(None, text.len()));

        let added = self.line_count().saturating_sub(lines_before);
        let level = self.level_at(edit_line);
        self.levels
            .splice(edit_line + 1..edit_line + 1, std::iter::repeat_n(level, added));
        // The stored end state of the edited line now belongs to its last piece.
        self.line_states
            .splice(edit_line..edit_line, std::iter::repeat_n(None, added));

        debug!(pos, len = text.len(), edit_line, added, "insert");
        self.relex(self.restart_line(pos), edit_line + added)
    }

    /// Delete the bytes in `range`.
    pub fn delete(&mut self, range: Range<usize>) -> Result<EditOutcome, LexError> {
        if range.start > range.end {
            return Err(LexError::RangeOutOfBounds {
                start: range.start,
                length: 0,
                len: self.len(),
            });
        }
        self.check_offset(range.start)?;
        self.check_offset(range.end)?;
        if range.is_empty() {
            return Ok(EditOutcome {
                restyled: range.start..range.start,
                fold_changes: Vec::new(),
            });
        }

        let edit_line = self.line_of(range.start);
        let lines_before = self.line_count();

        let chars = self.rope.byte_to_char(range.start)..self.rope.byte_to_char(range.end);
        self.rope.remove(chars);
        self.styles.drain(range.clone());
        self.keyword_classes.drain(range.clone());

        let removed = lines_before.saturating_sub(self.line_count());
        self.levels.drain(edit_line + 1..edit_line + 1 + removed);
        self.line_states.drain(edit_line..edit_line + removed);

        debug!(start = range.start, end = range.end, edit_line, removed, "delete");
        self.relex(self.restart_line(range.start), edit_line)
    }

    fn check_offset(&self, offset: usize) -> Result<(), LexError> {
        let len = self.len();
        if offset > len {
            return Err(LexError::OffsetOutOfBounds { offset, len });
        }
        let char_idx = self.rope.byte_to_char(offset);
        if self.rope.char_to_byte(char_idx) != offset {
            return Err(LexError::NotCharBoundary(offset));
        }
        Ok(())
    }

    /// The nearest line at or before the one holding `pos - 1` whose start state is known.
    fn restart_line(&self, pos: usize) -> usize {
        let mut line = self.line_of(pos.saturating_sub(1));
        while line > 0 && self.line_states[line - 1].is_none() {
            line -= 1;
        }
        line
    }

    /// Re-lex from the start of `restart` through at least `dirty_last` and on until the carried
    /// state converges, then fold what was re-lexed.
    fn relex(&mut self, restart: usize, dirty_last: usize) -> Result<EditOutcome, LexError> {
        let len = self.len();
        let last_line = self.line_count() - 1;
        let start = self.line_start(restart);
        let initial = match restart.checked_sub(1) {
            Some(prev) => self.line_states[prev].unwrap_or_default(),
            None => LexState::Default,
        };

        let mut chunk_start = start;
        let mut chunk_first = restart;
        let mut chunk_initial = initial;
        let mut chunk_last = dirty_last.min(last_line);
        let mut growth = 1usize;

        let relexed_end = loop {
            let chunk_end = if chunk_last >= last_line {
                len
            } else {
                self.line_start(chunk_last + 1)
            };
            let stored = self.line_states[chunk_last];

            let config = LexConfig {
                lexer: &self.lexer,
                keywords: &*self.keywords,
            };
            let out = tokenize(
                &*self,
                chunk_start,
                chunk_end - chunk_start,
                chunk_initial,
                &config,
            )?;
            trace!(chunk_start, chunk_end, spans = out.spans.len(), "relex chunk");

            for span in &out.spans {
                self.styles[span.start..span.end].fill(span.state.as_u8());
                self.keyword_classes[span.start..span.end].fill(span.keyword_class);
            }
            self.line_states[chunk_first..=chunk_last].fill(None);
            for end in &out.line_ends {
                if let Some(slot) = self.line_states.get_mut(end.line) {
                    *slot = Some(end.state);
                }
            }
            if chunk_end == len {
                self.line_states[last_line] = Some(out.state);
                break len;
            }

            match self.line_states[chunk_last] {
                // The last line continues into the next one: lex the same chunk further.
                None => {
                    debug!(line = chunk_last, "chunk ends on a continued line");
                    chunk_last += 1;
                }
                Some(state) if Some(state) == stored => break chunk_end,
                Some(state) => {
                    chunk_start = chunk_end;
                    chunk_first = chunk_last + 1;
                    chunk_initial = state;
                    growth *= 2;
                    chunk_last = (chunk_last + growth).min(last_line);
                }
            }
        };

        debug!(start, end = relexed_end, restart, "relexed");
        let fold_changes = self.refold(restart, relexed_end)?;
        Ok(EditOutcome {
            restyled: start..relexed_end,
            fold_changes,
        })
    }

    /// Fold from the start of line `restart` to `end`, then on to the end of the document if the
    /// next line no longer starts at the level the last folded line ends at.
    fn refold(&mut self, restart: usize, end: usize) -> Result<Vec<FoldChange>, LexError> {
        let options = FoldOptions::from_accessor(self);
        if !options.enabled {
            return Ok(Vec::new());
        }
        let lexer = Arc::clone(&self.lexer);
        let len = self.len();

        // Comment-line folding looks one line up and down.
        let (start, end) = if options.comments {
            let start = self.line_start(restart.saturating_sub(1));
            let end = if end < len {
                self.line_start(self.line_of(end) + 1)
            } else {
                end
            };
            (start, end)
        } else {
            (self.line_start(restart), end)
        };

        let init_style = match start.checked_sub(1) {
            Some(prev) => self.style_at(prev),
            None => LexState::Default,
        };
        let mut changes = fold(self, start, end - start, init_style, &lexer, &options)?;

        if end > start && end < len {
            let last_line = self.line_of(end - 1);
            if self.level_at(last_line).next() != self.level_at(last_line + 1).current() {
                debug!(from = end, "fold level moved, folding to the end");
                let init_style = self.style_at(end - 1);
                changes.extend(fold(self, end, len - end, init_style, &lexer, &options)?);
            }
        }
        Ok(changes)
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("lexer", &self.lexer.name())
            .field("len", &self.rope.len_bytes())
            .field("lines", &self.rope.len_lines())
            .finish_non_exhaustive()
    }
}

impl Accessor for Document {
    fn len(&self) -> usize {
        self.rope.len_bytes()
    }

    fn char_at(&self, pos: usize) -> u8 {
        self.rope.get_byte(pos).unwrap_or(EOF_CHAR)
    }

    fn line_of(&self, pos: usize) -> usize {
        let pos = pos.min(self.len());
        // The `\n` of a `\r\n` pair belongs to the line of the `\r`.
        if pos > 0 && self.char_at(pos) == b'\n' && self.char_at(pos - 1) == b'\r' {
            return self.rope.byte_to_line(pos - 1);
        }
        self.rope.byte_to_line(pos)
    }

    fn line_start(&self, line: usize) -> usize {
        if line < self.rope.len_lines() {
            self.rope.line_to_byte(line)
        } else {
            self.len()
        }
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn property_int(&self, key: &str, default: i64) -> i64 {
        self.properties.get_int(key, default)
    }
}

impl StyledAccessor for Document {
    fn style_at(&self, pos: usize) -> LexState {
        self.styles
            .get(pos)
            .and_then(|style| LexState::from_u8(*style))
            .unwrap_or_default()
    }

    fn level_at(&self, line: usize) -> FoldLevel {
        self.levels.get(line).copied().unwrap_or_default()
    }

    fn set_level(&mut self, line: usize, level: FoldLevel) {
        if let Some(slot) = self.levels.get_mut(line) {
            *slot = level;
        }
    }
}
