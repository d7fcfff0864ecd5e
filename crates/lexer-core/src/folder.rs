//! The folder: derives per-line fold records from committed styles.

use crate::accessor::StyledAccessor;
use crate::charclass::{is_eol, is_space_char, is_word_char};
use crate::dialect::WordMatch;
use crate::error::LexError;
use crate::fold_level::{FoldChange, FoldLevel};
use crate::lexer::Lexer;
use crate::properties::FoldOptions;
use crate::state::LexState;
use tracing::{debug, trace};

/// Structural words are compared on at most this many characters.
pub const MAX_FOLD_WORD_LEN: usize = 15;

/// Fold `[start, start + length)`.
///
/// `init_style` is the style of the character before `start`. Levels continue from the stored
/// record of the line before `start`. Records are written through
/// [`StyledAccessor::set_level`] only when they differ from the stored ones; the changed records
/// are also returned in line order.
pub fn fold<A: StyledAccessor + ?Sized>(
    accessor: &mut A,
    start: usize,
    length: usize,
    init_style: LexState,
    lexer: &Lexer,
    options: &FoldOptions,
) -> Result<Vec<FoldChange>, LexError> {
    let len = accessor.len();
    let end = start
        .checked_add(length)
        .filter(|end| *end <= len)
        .ok_or(LexError::RangeOutOfBounds { start, length, len })?;

    if !options.enabled {
        return Ok(Vec::new());
    }

    let base = options.base;
    let rules = lexer.fold_rules();
    let mut line = accessor.line_of(start);
    let mut level_current = match line.checked_sub(1) {
        Some(prev) => accessor.level_at(prev).next().max(base),
        None => base,
    };
    let mut level_next = level_current;
    let mut visible_chars = 0usize;
    let mut changes = Vec::new();

    debug!(start, end, line, level = level_current, "fold");

    let mut ch_next = accessor.char_at(start);
    let mut style = init_style;
    let mut style_next = accessor.style_at(start);

    for i in start..end {
        let ch = ch_next;
        ch_next = accessor.char_at(i + 1);
        let style_prev = style;
        style = style_next;
        style_next = accessor.style_at(i + 1);
        let at_eol = is_eol(ch, ch_next);

        let mut delta = 0i32;

        if options.comments && at_eol && is_comment_line(accessor, line) {
            let before = line.checked_sub(1).is_some_and(|l| is_comment_line(accessor, l));
            let after = is_comment_line(accessor, line + 1);
            if !before && after {
                delta += 1;
            } else if before && !after {
                delta -= 1;
            }
        }

        if options.comments && style == LexState::BlockComment {
            if style_prev != LexState::BlockComment {
                delta += 1;
            } else if style_next != LexState::BlockComment && !at_eol {
                delta -= 1;
            }
        }

        if style == LexState::Keyword && style_prev != LexState::Keyword {
            let word = lowered_word(accessor, i);
            delta += word_delta(&word, &rules.open, &rules.close);
        }

        if Some(ch) == lexer.directive_leader() && style == LexState::Preprocessor {
            let word = lowered_word(accessor, i + 1);
            delta += word_delta(&word, &rules.directive_open, &rules.directive_close);
        }

        if delta > 0 {
            // Levels above `NUMBER_MASK` do not fit the packed record.
            level_next = (level_next + delta.unsigned_abs()).min(FoldLevel::NUMBER_MASK);
        } else if delta < 0 {
            level_next = level_next.saturating_sub(delta.unsigned_abs()).max(base);
        }

        if !is_space_char(ch) {
            visible_chars += 1;
        }

        if at_eol || i + 1 == end {
            let mut level = FoldLevel::new(level_current, level_next);
            if visible_chars == 0 && options.compact {
                level = level.with_whitespace();
            }
            if level_current < level_next {
                level = level.with_header();
            }
            let old = accessor.level_at(line);
            if level != old {
                trace!(line, ?old, new = ?level, "fold level");
                accessor.set_level(line, level);
                changes.push(FoldChange {
                    line,
                    old,
                    new: level,
                });
            }
            line += 1;
            level_current = level_next;
            visible_chars = 0;
        }
    }

    debug!(changed = changes.len(), "fold done");
    Ok(changes)
}

fn word_delta(word: &str, open: &[WordMatch], close: &[WordMatch]) -> i32 {
    if word.is_empty() {
        0
    } else if open.iter().any(|m| m.matches(word)) {
        1
    } else if close.iter().any(|m| m.matches(word)) {
        -1
    } else {
        0
    }
}

/// The lowercased run of word characters at `pos`, truncated to [`MAX_FOLD_WORD_LEN`].
fn lowered_word<A: StyledAccessor + ?Sized>(accessor: &A, pos: usize) -> String {
    (pos..)
        .map(|p| accessor.char_at(p))
        .take_while(|ch| is_word_char(*ch))
        .take(MAX_FOLD_WORD_LEN)
        .map(|ch| char::from(ch.to_ascii_lowercase()))
        .collect()
}

/// A line whose first non-blank character is styled as a line comment.
fn is_comment_line<A: StyledAccessor + ?Sized>(accessor: &A, line: usize) -> bool {
    if line >= accessor.line_count() {
        return false;
    }
    let mut pos = accessor.line_start(line);
    let len = accessor.len();
    while pos < len {
        let ch = accessor.char_at(pos);
        if ch == b'\r' || ch == b'\n' {
            return false;
        }
        if ch != b' ' && ch != b'\t' {
            return accessor.style_at(pos) == LexState::LineComment;
        }
        pos += 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accessor::{Accessor, TextAccessor};
    use crate::fold_level::FOLD_BASE;
    use crate::testing::sample_lexer;
    use crate::tokenizer::{LexConfig, tokenize};
    use pretty_assertions::assert_eq;

    /// A text accessor with styles and fold records attached.
    struct Styled<'a> {
        text: TextAccessor<'a>,
        styles: Vec<LexState>,
        levels: Vec<FoldLevel>,
    }

    impl<'a> Styled<'a> {
        fn new(text: &'a str) -> Self {
            let lexer = sample_lexer();
            let text = TextAccessor::new(text);
            let out =
                tokenize(&text, 0, text.len(), LexState::Default, &LexConfig::new(&lexer)).unwrap();
            let mut styles = vec![LexState::Default; text.len()];
            for span in out.spans {
                styles[span.start..span.end].fill(span.state);
            }
            let levels = vec![FoldLevel::default(); text.line_count()];
            Self {
                text,
                styles,
                levels,
            }
        }

        fn fold(&mut self, options: &FoldOptions) -> Vec<FoldChange> {
            let len = self.len();
            fold(self, 0, len, LexState::Default, &sample_lexer(), options).unwrap()
        }

        fn depths(&self) -> Vec<(u32, u32)> {
            self.levels
                .iter()
                .map(|l| (l.current() - FOLD_BASE, l.next() - FOLD_BASE))
                .collect()
        }
    }

    impl Accessor for Styled<'_> {
        fn len(&self) -> usize {
            self.text.len()
        }
        fn char_at(&self, pos: usize) -> u8 {
            self.text.char_at(pos)
        }
        fn line_of(&self, pos: usize) -> usize {
            self.text.line_of(pos)
        }
        fn line_start(&self, line: usize) -> usize {
            self.text.line_start(line)
        }
        fn line_count(&self) -> usize {
            self.text.line_count()
        }
        fn property_int(&self, key: &str, default: i64) -> i64 {
            self.text.property_int(key, default)
        }
    }

    impl StyledAccessor for Styled<'_> {
        fn style_at(&self, pos: usize) -> LexState {
            self.styles.get(pos).copied().unwrap_or_default()
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

    #[test]
    fn test_keyword_pairs() {
        let mut doc = Styled::new("begin\n  x\n  BEGIN\n  y\n  end\nEnd\nz");
        doc.fold(&FoldOptions::default());
        assert_eq!(doc.depths(), vec![
            (0, 1),
            (1, 1),
            (1, 2),
            (2, 2),
            (2, 1),
            (1, 0),
            (0, 0)
        ]);
        assert!(doc.levels[0].is_header());
        assert!(doc.levels[2].is_header());
        assert!(!doc.levels[4].is_header());
    }

    #[test]
    fn test_identifier_words_do_not_fold() {
        let mut doc = Styled::new("x begin\ny end\n");
        doc.fold(&FoldOptions::default());
        assert_eq!(doc.depths(), vec![(0, 0), (0, 0), (0, 0)]);
    }

    #[test]
    fn test_directives() {
        let mut doc = Styled::new("#ifdef A\n#region r\n#endregion\n#endif\n#define B\n");
        doc.fold(&FoldOptions::default());
        assert_eq!(doc.depths(), vec![
            (0, 1),
            (1, 2),
            (2, 1),
            (1, 0),
            (0, 0),
            (0, 0)
        ]);
    }

    #[test]
    fn test_unbalanced_close_is_clamped() {
        let mut doc = Styled::new("end\nend\nbegin");
        doc.fold(&FoldOptions::default());
        assert_eq!(doc.depths(), vec![(0, 0), (0, 0), (0, 1)]);
    }

    #[test]
    fn test_compact_whitespace_flag() {
        let mut doc = Styled::new("begin\n\n  \nend\n");
        doc.fold(&FoldOptions::default());
        assert!(!doc.levels[0].is_whitespace());
        assert!(doc.levels[1].is_whitespace());
        assert!(doc.levels[2].is_whitespace());
        assert!(!doc.levels[3].is_whitespace());

        let mut doc = Styled::new("begin\n\nend\n");
        doc.fold(&FoldOptions {
            compact: false,
            ..FoldOptions::default()
        });
        assert!(!doc.levels[1].is_whitespace());
    }

    #[test]
    fn test_comment_folding() {
        let text = "x\n; a\n; b\n; c\ny /* p\nq\n*/ z\n";
        let mut doc = Styled::new(text);
        doc.fold(&FoldOptions::default());
        assert!(doc.depths().iter().all(|d| *d == (0, 0)));

        let mut doc = Styled::new(text);
        doc.fold(&FoldOptions {
            comments: true,
            ..FoldOptions::default()
        });
        assert_eq!(doc.depths(), vec![
            (0, 0),
            (0, 1),
            (1, 1),
            (1, 0),
            (0, 1),
            (1, 1),
            (1, 0),
            (0, 0)
        ]);
    }

    #[test]
    fn test_second_run_reports_nothing() {
        let mut doc = Styled::new("begin\n#if A\nend\n#endif\n");
        let first = doc.fold(&FoldOptions::default());
        assert!(!first.is_empty());
        assert_eq!(first[0].line, 0);
        assert_eq!(doc.fold(&FoldOptions::default()), vec![]);
    }

    #[test]
    fn test_disabled_is_noop() {
        let mut doc = Styled::new("begin\nend\n");
        let changes = doc.fold(&FoldOptions {
            enabled: false,
            ..FoldOptions::default()
        });
        assert!(changes.is_empty());
        assert_eq!(doc.depths(), vec![(0, 0), (0, 0), (0, 0)]);
    }

    #[test]
    fn test_partial_range_continues_from_previous_line() {
        let text = "begin\nbegin\nx\nend\nend\n";
        let mut doc = Styled::new(text);
        doc.fold(&FoldOptions::default());
        let expected = doc.levels.clone();

        // Forget lines 2.. and refold from line 2 only.
        for level in &mut doc.levels[2..] {
            *level = FoldLevel::default();
        }
        let start = doc.line_start(2);
        let len = doc.len();
        fold(
            &mut doc,
            start,
            len - start,
            LexState::Default,
            &sample_lexer(),
            &FoldOptions::default(),
        )
        .unwrap();
        assert_eq!(doc.levels, expected);
    }

    #[test]
    fn test_deep_nesting_saturates() {
        let openers = (FoldLevel::NUMBER_MASK - FOLD_BASE) as usize + 10;
        let text = vec!["begin"; openers].join("\n");
        let mut doc = Styled::new(&text);
        doc.fold(&FoldOptions::default());
        let expected = doc.levels.clone();

        assert!(doc.levels.iter().all(|l| l.next() >= l.current()));
        assert_eq!(doc.levels[openers - 1].current(), FoldLevel::NUMBER_MASK);
        assert_eq!(doc.levels[openers - 1].next(), FoldLevel::NUMBER_MASK);
        assert!(!doc.levels[openers - 1].is_header());

        // A refold from the saturated tail inherits the same level.
        let line = openers - 5;
        for level in &mut doc.levels[line..] {
            *level = FoldLevel::default();
        }
        let start = doc.line_start(line);
        let len = doc.len();
        fold(
            &mut doc,
            start,
            len - start,
            LexState::Default,
            &sample_lexer(),
            &FoldOptions::default(),
        )
        .unwrap();
        assert_eq!(doc.levels, expected);
    }

    #[test]
    fn test_long_words_truncate() {
        let text = "beginningofsomethinglong\n";
        let mut doc = Styled::new(text);
        doc.fold(&FoldOptions::default());
        assert_eq!(doc.depths(), vec![(0, 0), (0, 0)]);
        assert_eq!(lowered_word(&doc, 0).len(), MAX_FOLD_WORD_LEN);
    }
}
