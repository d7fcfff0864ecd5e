//! Read-only buffer access consumed by the tokenizer and the folder.
//!
//! Offsets are byte offsets. Lines are separated by `\n`, `\r\n`, or a lone `\r`.

use crate::fold_level::FoldLevel;
use crate::properties::PropertySet;
use crate::state::LexState;

/// Value returned by [`Accessor::char_at`] past the end of the buffer.
pub const EOF_CHAR: u8 = 0;

/// Character, line, and property access over a text buffer.
pub trait Accessor {
    /// Buffer length in bytes.
    fn len(&self) -> usize;

    /// Returns `true` for an empty buffer.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte at `pos`, or [`EOF_CHAR`] when `pos` is out of range.
    fn char_at(&self, pos: usize) -> u8;

    /// Line containing `pos`. Offsets past the end map to the last line.
    fn line_of(&self, pos: usize) -> usize;

    /// Offset of the first byte of `line`. Lines past the end start at [`Accessor::len`].
    fn line_start(&self, line: usize) -> usize;

    /// Number of lines (a buffer always has at least one).
    fn line_count(&self) -> usize;

    /// Integer property lookup.
    fn property_int(&self, key: &str, default: i64) -> i64;
}

/// Access to previously committed styles and fold records.
pub trait StyledAccessor: Accessor {
    /// Style at `pos`; [`LexState::Default`] out of range.
    fn style_at(&self, pos: usize) -> LexState;

    /// Stored fold record for `line`.
    fn level_at(&self, line: usize) -> FoldLevel;

    /// Overwrite the fold record for `line`.
    fn set_level(&mut self, line: usize, level: FoldLevel);
}

/// Compute the start offset of every line in `bytes`.
pub(crate) fn line_starts(bytes: &[u8]) -> Vec<usize> {
    let mut starts = vec![0];
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => starts.push(i + 1),
            b'\r' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                starts.push(i + 1);
            }
            _ => {}
        }
        i += 1;
    }
    starts
}

/// An [`Accessor`] over a borrowed byte slice, with line starts computed up front.
#[derive(Debug, Clone)]
pub struct TextAccessor<'a> {
    bytes: &'a [u8],
    line_starts: Vec<usize>,
    properties: Option<&'a PropertySet>,
}

impl<'a> TextAccessor<'a> {
    /// Wrap a string.
    pub fn new(text: &'a str) -> Self {
        Self::from_bytes(text.as_bytes())
    }

    /// Wrap raw bytes.
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            line_starts: line_starts(bytes),
            properties: None,
        }
    }

    /// Answer property lookups from `properties`.
    pub fn with_properties(mut self, properties: &'a PropertySet) -> Self {
        self.properties = Some(properties);
        self
    }

    /// The wrapped bytes.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl Accessor for TextAccessor<'_> {
    fn len(&self) -> usize {
        self.bytes.len()
    }

    fn char_at(&self, pos: usize) -> u8 {
        self.bytes.get(pos).copied().unwrap_or(EOF_CHAR)
    }

    fn line_of(&self, pos: usize) -> usize {
        // Index of the last line start <= pos.
        self.line_starts
            .partition_point(|&start| start <= pos)
            .saturating_sub(1)
    }

    fn line_start(&self, line: usize) -> usize {
        self.line_starts
            .get(line)
            .copied()
            .unwrap_or(self.bytes.len())
    }

    fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    fn property_int(&self, key: &str, default: i64) -> i64 {
        self.properties
            .map_or(default, |props| props.get_int(key, default))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_starts_mixed_terminators() {
        assert_eq!(line_starts(b""), vec![0]);
        assert_eq!(line_starts(b"a\nb"), vec![0, 2]);
        assert_eq!(line_starts(b"a\r\nb\rc\n"), vec![0, 3, 5, 7]);
    }

    #[test]
    fn test_text_accessor_lines() {
        let acc = TextAccessor::new("ab\r\ncd\ne");
        assert_eq!(acc.len(), 8);
        assert_eq!(acc.line_count(), 3);
        assert_eq!(acc.line_of(0), 0);
        assert_eq!(acc.line_of(3), 0); // the `\n` of `\r\n`
        assert_eq!(acc.line_of(4), 1);
        assert_eq!(acc.line_of(7), 2);
        assert_eq!(acc.line_of(100), 2);
        assert_eq!(acc.line_start(1), 4);
        assert_eq!(acc.line_start(2), 7);
        assert_eq!(acc.line_start(9), 8);
    }

    #[test]
    fn test_text_accessor_sentinel() {
        let acc = TextAccessor::new("x");
        assert_eq!(acc.char_at(0), b'x');
        assert_eq!(acc.char_at(1), EOF_CHAR);
        assert_eq!(acc.char_at(usize::MAX), EOF_CHAR);
    }

    #[test]
    fn test_text_accessor_properties() {
        let props = PropertySet::new().with("fold", "1");
        let acc = TextAccessor::new("").with_properties(&props);
        assert_eq!(acc.property_int("fold", 0), 1);
        assert_eq!(acc.property_int("fold.compact", 1), 1);
        assert_eq!(TextAccessor::new("").property_int("fold", 0), 0);
    }
}
