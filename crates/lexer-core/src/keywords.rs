//! The keyword-membership oracle used to sub-style line-leading words.

/// A set of keyword class indices (0..32).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct KeywordClasses(u32);

impl KeywordClasses {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// A set holding one class.
    pub const fn single(class: u8) -> Self {
        Self::EMPTY.with(class)
    }

    /// Add a class. Indices of 32 and above are ignored.
    pub const fn with(self, class: u8) -> Self {
        if class < 32 {
            Self(self.0 | (1u32 << class))
        } else {
            self
        }
    }

    /// Returns `true` if `class` is in the set.
    pub const fn contains(self, class: u8) -> bool {
        class < 32 && self.0 & (1u32 << class) != 0
    }

    /// Returns `true` if no class is present.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The lowest class index present.
    pub const fn first(self) -> Option<u8> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as u8)
        }
    }
}

/// Maps a lowercase word to the keyword classes it belongs to.
///
/// Implementations must be pure: the same word always yields the same classes.
pub trait KeywordOracle {
    /// Classify `word` (already lowercased).
    fn classify(&self, word: &str) -> KeywordClasses;
}

/// An oracle that recognizes nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoKeywords;

impl KeywordOracle for NoKeywords {
    fn classify(&self, _word: &str) -> KeywordClasses {
        KeywordClasses::EMPTY
    }
}

impl<F> KeywordOracle for F
where
    F: Fn(&str) -> KeywordClasses,
{
    fn classify(&self, word: &str) -> KeywordClasses {
        self(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_classes() {
        let set = KeywordClasses::EMPTY.with(3).with(1);
        assert!(set.contains(1));
        assert!(set.contains(3));
        assert!(!set.contains(2));
        assert_eq!(set.first(), Some(1));
        assert!(KeywordClasses::EMPTY.is_empty());
        assert_eq!(KeywordClasses::EMPTY.first(), None);
        assert_eq!(KeywordClasses::single(40), KeywordClasses::EMPTY);
    }

    #[test]
    fn test_closure_oracle() {
        let oracle = |word: &str| {
            if word == "section" {
                KeywordClasses::single(0)
            } else {
                KeywordClasses::EMPTY
            }
        };
        assert_eq!(oracle.classify("section").first(), Some(0));
        assert!(oracle.classify("other").is_empty());
        assert!(NoKeywords.classify("section").is_empty());
    }
}
