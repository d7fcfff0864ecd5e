//! Keyword lists.
//!
//! A [`KeywordLists`] is an ordered set of [`WordList`]s; the index of a list is the keyword
//! class reported for its words. Hosts fill the lists from their own configuration.

use lexer_core::{KeywordClasses, KeywordOracle};
use std::collections::HashSet;

/// The most lists a [`KeywordLists`] can hold (one bit per class).
pub const MAX_KEYWORD_CLASSES: usize = 32;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A set of lowercase words.
pub struct WordList {
    words: HashSet<String>,
}

impl WordList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from whitespace-separated words. Words are stored lowercased.
    pub fn from_words(words: &str) -> Self {
        words.split_whitespace().collect()
    }

    /// Add a word.
    pub fn insert(&mut self, word: &str) {
        self.words.insert(word.to_ascii_lowercase());
    }

    /// Returns `true` if `word` (already lowercased) is in the list.
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if the list has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<'a> FromIterator<&'a str> for WordList {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        let mut list = Self::new();
        for word in iter {
            list.insert(word);
        }
        list
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Keyword classes backed by word lists; list `i` is class `i`.
pub struct KeywordLists {
    lists: Vec<WordList>,
}

impl KeywordLists {
    /// Create an oracle with no lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a list as the next class. Lists past [`MAX_KEYWORD_CLASSES`] are ignored.
    pub fn with_list(mut self, list: WordList) -> Self {
        self.push(list);
        self
    }

    /// Append a list as the next class and return its index, or `None` when full.
    pub fn push(&mut self, list: WordList) -> Option<u8> {
        if self.lists.len() >= MAX_KEYWORD_CLASSES {
            tracing::warn!(len = self.lists.len(), "keyword list ignored, all classes used");
            return None;
        }
        self.lists.push(list);
        u8::try_from(self.lists.len() - 1).ok()
    }

    /// The list for `class`.
    pub fn list(&self, class: u8) -> Option<&WordList> {
        self.lists.get(usize::from(class))
    }

    /// Number of lists.
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    /// Returns `true` if there are no lists.
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }
}

impl KeywordOracle for KeywordLists {
    fn classify(&self, word: &str) -> KeywordClasses {
        self.lists
            .iter()
            .enumerate()
            .filter(|(_, list)| list.contains(word))
            .fold(KeywordClasses::EMPTY, |set, (class, _)| set.with(class as u8))
    }
}
