//! Lexical states and style spans.

use serde::{Deserialize, Serialize};

/// The lexical state at a buffer offset.
///
/// Exactly one state is current at any offset. The numeric value doubles as the style byte a
/// host stores per character (see [`LexState::as_u8`] / [`LexState::from_u8`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LexState {
    /// Unclassified text.
    #[default]
    Default = 0,
    /// A word that is not at the start of its line.
    Identifier = 1,
    /// A word at the first visible position of its line (keyword candidate).
    Keyword = 2,
    /// A line-leading word terminated by a single `:`.
    Label = 3,
    /// A numeric literal.
    Number = 4,
    /// A quoted string.
    String = 5,
    /// A raw (backtick) string.
    RawString = 6,
    /// A character (single-quoted) literal.
    Character = 7,
    /// A comment running to the end of the line.
    LineComment = 8,
    /// A delimited block comment.
    BlockComment = 9,
    /// A preprocessor directive.
    Preprocessor = 10,
    /// A sigil-prefixed word (variable or instruction reference).
    AsmInstruction = 11,
    /// A sigil-prefixed brace group.
    AsmRegister = 12,
    /// A sigil-prefixed parenthesized group.
    DocTag = 13,
    /// A single operator character.
    Operator = 14,
    /// A quoted construct still open when its line ended.
    StringEol = 15,
}

impl LexState {
    /// Every state, in style-byte order.
    pub const ALL: [LexState; 16] = [
        LexState::Default,
        LexState::Identifier,
        LexState::Keyword,
        LexState::Label,
        LexState::Number,
        LexState::String,
        LexState::RawString,
        LexState::Character,
        LexState::LineComment,
        LexState::BlockComment,
        LexState::Preprocessor,
        LexState::AsmInstruction,
        LexState::AsmRegister,
        LexState::DocTag,
        LexState::Operator,
        LexState::StringEol,
    ];

    /// The style byte for this state.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decode a style byte. Unknown values yield `None`.
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Index of this state in [`LexState::ALL`].
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// Returns `true` for comment states.
    pub const fn is_comment(self) -> bool {
        matches!(self, LexState::LineComment | LexState::BlockComment)
    }

    /// Returns `true` for quoted-construct states (including the end-of-line error state).
    pub const fn is_string(self) -> bool {
        matches!(
            self,
            LexState::String | LexState::RawString | LexState::Character | LexState::StringEol
        )
    }
}

/// A half-open range of buffer offsets tagged with one lexical state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyleSpan {
    /// Start offset (inclusive).
    pub start: usize,
    /// End offset (exclusive).
    pub end: usize,
    /// The state of every offset in the span.
    pub state: LexState,
    /// Keyword class chosen by the keyword oracle, for [`LexState::Keyword`] spans only.
    pub keyword_class: Option<u8>,
}

impl StyleSpan {
    /// Create a span without a keyword class.
    pub fn new(start: usize, end: usize, state: LexState) -> Self {
        Self {
            start,
            end,
            state,
            keyword_class: None,
        }
    }

    /// Attach a keyword class.
    pub fn with_keyword_class(mut self, class: Option<u8>) -> Self {
        self.keyword_class = class;
        self
    }

    /// Number of offsets covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the span covers nothing.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Check if the span contains an offset.
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// Append a span, extending the previous one when it is adjacent and styled identically.
pub fn push_span(spans: &mut Vec<StyleSpan>, span: StyleSpan) {
    if span.is_empty() {
        return;
    }

    if let Some(last) = spans.last_mut()
        && last.end == span.start
        && last.state == span.state
        && last.keyword_class == span.keyword_class
    {
        last.end = span.end;
        return;
    }

    spans.push(span);
}

/// Collapse a per-offset style array into maximal spans starting at `base`.
///
/// Unknown style bytes decode as [`LexState::Default`].
pub fn spans_from_styles(base: usize, styles: &[u8]) -> Vec<StyleSpan> {
    let mut spans = Vec::new();
    for (idx, &style) in styles.iter().enumerate() {
        let state = LexState::from_u8(style).unwrap_or_default();
        let pos = base + idx;
        push_span(&mut spans, StyleSpan::new(pos, pos + 1, state));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_byte_round_trip() {
        for state in LexState::ALL {
            assert_eq!(LexState::from_u8(state.as_u8()), Some(state));
        }
        assert_eq!(LexState::from_u8(16), None);
        assert_eq!(LexState::default(), LexState::Default);
    }

    #[test]
    fn test_state_groups() {
        assert!(LexState::LineComment.is_comment());
        assert!(LexState::BlockComment.is_comment());
        assert!(!LexState::String.is_comment());
        assert!(LexState::StringEol.is_string());
        assert!(!LexState::Operator.is_string());
    }

    #[test]
    fn test_push_span_merges_adjacent() {
        let mut spans = Vec::new();
        push_span(&mut spans, StyleSpan::new(0, 1, LexState::Operator));
        push_span(&mut spans, StyleSpan::new(1, 2, LexState::Operator));
        push_span(&mut spans, StyleSpan::new(2, 2, LexState::Default));
        push_span(&mut spans, StyleSpan::new(2, 5, LexState::Default));
        push_span(
            &mut spans,
            StyleSpan::new(5, 8, LexState::Keyword).with_keyword_class(Some(1)),
        );
        push_span(&mut spans, StyleSpan::new(8, 9, LexState::Keyword));

        assert_eq!(
            spans,
            vec![
                StyleSpan::new(0, 2, LexState::Operator),
                StyleSpan::new(2, 5, LexState::Default),
                StyleSpan::new(5, 8, LexState::Keyword).with_keyword_class(Some(1)),
                StyleSpan::new(8, 9, LexState::Keyword),
            ]
        );
    }

    #[test]
    fn test_spans_from_styles() {
        let styles = [0, 0, 5, 5, 5, 99];
        let spans = spans_from_styles(10, &styles);
        assert_eq!(
            spans,
            vec![
                StyleSpan::new(10, 12, LexState::Default),
                StyleSpan::new(12, 15, LexState::String),
                StyleSpan::new(15, 16, LexState::Default),
            ]
        );
    }

    #[test]
    fn test_serde_names() {
        let yaml = serde_yaml::to_string(&LexState::StringEol).unwrap();
        assert_eq!(yaml.trim(), "string_eol");
        let state: LexState = serde_yaml::from_str("raw_string").unwrap();
        assert_eq!(state, LexState::RawString);
    }
}
