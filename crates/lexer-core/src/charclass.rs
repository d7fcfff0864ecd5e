//! Character classification over single code units.
//!
//! All predicates are table lookups over a byte. Bytes at or above `0x80` belong to no class,
//! so multi-byte UTF-8 sequences are left to the `Default` state.

const WORD: u8 = 0x01;
const WORD_START: u8 = 0x02;
const SPACE: u8 = 0x04;
const DIGIT: u8 = 0x08;

static CLASSES: [u8; 256] = build_classes();

const fn build_classes() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut ch = 0usize;
    while ch < 128 {
        let b = ch as u8;
        let mut class = 0u8;
        if b.is_ascii_digit() {
            class |= WORD | DIGIT;
        }
        if b.is_ascii_alphabetic() || b == b'_' {
            class |= WORD | WORD_START;
        }
        if b == b'.' {
            class |= WORD;
        }
        if b == b' ' || (b >= 0x09 && b <= 0x0d) {
            class |= SPACE;
        }
        table[ch] = class;
        ch += 1;
    }
    // Digits start words too (`iswordstart` is alphanumeric or underscore).
    let mut d = b'0' as usize;
    while d <= b'9' as usize {
        table[d] |= WORD_START;
        d += 1;
    }
    table
}

/// Returns `true` for characters that may continue a word: ASCII alphanumerics, `_` and `.`.
#[inline]
pub fn is_word_char(ch: u8) -> bool {
    CLASSES[ch as usize] & WORD != 0
}

/// Returns `true` for characters that may start a word: ASCII alphanumerics and `_`.
#[inline]
pub fn is_word_start(ch: u8) -> bool {
    CLASSES[ch as usize] & WORD_START != 0
}

/// Returns `true` for space, tab, and the other ASCII control whitespace (`0x09..=0x0d`).
#[inline]
pub fn is_space_char(ch: u8) -> bool {
    CLASSES[ch as usize] & SPACE != 0
}

/// Returns `true` for ASCII decimal digits.
#[inline]
pub fn is_digit(ch: u8) -> bool {
    CLASSES[ch as usize] & DIGIT != 0
}

/// Returns `true` if `ch` terminates a physical line, given the character after it.
///
/// `\r\n` ends on the `\n`; a lone `\r` ends the line by itself.
#[inline]
pub fn is_eol(ch: u8, next: u8) -> bool {
    (ch == b'\r' && next != b'\n') || ch == b'\n'
}

/// A set of bytes, used for operator characters and rule-specific extra word characters.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ByteSet {
    bits: [u64; 4],
}

impl ByteSet {
    /// An empty set.
    pub const fn empty() -> Self {
        Self { bits: [0; 4] }
    }

    /// Build a set from the given bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut set = Self::empty();
        for &b in bytes {
            set.insert(b);
        }
        set
    }

    /// Add a byte.
    pub fn insert(&mut self, b: u8) {
        self.bits[(b >> 6) as usize] |= 1u64 << (b & 63);
    }

    /// Returns `true` if the byte is in the set.
    #[inline]
    pub fn contains(&self, b: u8) -> bool {
        self.bits[(b >> 6) as usize] & (1u64 << (b & 63)) != 0
    }

    /// Returns `true` if the set holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }
}

impl Default for ByteSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for ByteSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let members: String = (0u8..=255)
            .filter(|b| self.contains(*b))
            .map(|b| b as char)
            .collect();
        f.debug_tuple("ByteSet").field(&members).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_classes() {
        assert!(is_word_char(b'a'));
        assert!(is_word_char(b'Z'));
        assert!(is_word_char(b'7'));
        assert!(is_word_char(b'_'));
        assert!(is_word_char(b'.'));
        assert!(!is_word_char(b'-'));
        assert!(!is_word_char(b' '));
        assert!(!is_word_char(0xC3));

        assert!(is_word_start(b'a'));
        assert!(is_word_start(b'_'));
        assert!(is_word_start(b'3'));
        assert!(!is_word_start(b'.'));
        assert!(!is_word_start(b'$'));
    }

    #[test]
    fn test_space_and_digit() {
        for ch in [b' ', b'\t', b'\n', b'\r', 0x0b, 0x0c] {
            assert!(is_space_char(ch), "{ch:#x} should be space");
        }
        assert!(!is_space_char(b'x'));
        assert!(!is_space_char(0));

        assert!(is_digit(b'0'));
        assert!(is_digit(b'9'));
        assert!(!is_digit(b'a'));
    }

    #[test]
    fn test_eol() {
        assert!(is_eol(b'\n', b'x'));
        assert!(is_eol(b'\r', b'x'));
        assert!(!is_eol(b'\r', b'\n'));
        assert!(!is_eol(b'a', b'\n'));
    }

    #[test]
    fn test_byte_set() {
        let set = ByteSet::from_bytes(b"()+-");
        assert!(set.contains(b'('));
        assert!(set.contains(b'-'));
        assert!(!set.contains(b'*'));
        assert!(!set.is_empty());
        assert!(ByteSet::empty().is_empty());

        let mut high = ByteSet::empty();
        high.insert(0xFF);
        assert!(high.contains(0xFF));
        assert!(!high.contains(0x7F));
    }
}
