//! Error types.

use crate::state::LexState;
use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while loading or compiling a [`Dialect`](crate::Dialect).
pub enum DialectError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    /// Filesystem I/O failed.
    Io(#[from] std::io::Error),

    #[error("{field} must be ASCII, got {value:?}")]
    /// A delimiter, sigil, or character set contained a non-ASCII character.
    NonAscii {
        /// The offending field.
        field: &'static str,
        /// The offending value.
        value: String,
    },

    #[error("{field} must be {expected} characters long, got {value:?}")]
    /// A delimiter had the wrong length.
    DelimiterLength {
        /// The offending field.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// The offending value.
        value: String,
    },

    #[error("state {0:?} is produced by more than one rule")]
    /// Two entry rules produce the same state, so its exit behavior would be ambiguous.
    DuplicateState(LexState),

    #[error("rule `{rule}` cannot produce state {state:?}")]
    /// A rule names a state outside the set it may produce.
    InvalidState {
        /// The rule kind.
        rule: &'static str,
        /// The requested state.
        state: LexState,
    },

    #[error("invalid word matcher {0:?}")]
    /// A fold word matcher was empty.
    InvalidMatcher(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Host precondition violations. Within a valid range no pass ever fails.
pub enum LexError {
    #[error("range {start}+{length} exceeds buffer length {len}")]
    /// The requested range runs past the end of the buffer.
    RangeOutOfBounds {
        /// Range start.
        start: usize,
        /// Range length.
        length: usize,
        /// Buffer length.
        len: usize,
    },

    #[error("offset {offset} exceeds buffer length {len}")]
    /// An edit offset lies past the end of the buffer.
    OffsetOutOfBounds {
        /// The offset.
        offset: usize,
        /// Buffer length.
        len: usize,
    },

    #[error("offset {0} is not on a UTF-8 character boundary")]
    /// An edit offset splits a multi-byte character.
    NotCharBoundary(usize),
}

#[derive(Debug, Error)]
/// Errors produced while loading a [`PropertySet`](crate::PropertySet).
pub enum PropertyError {
    #[error("YAML parse error: {0}")]
    /// YAML parsing failed.
    Yaml(#[from] serde_yaml::Error),

    #[error("property {0:?} is not a scalar value")]
    /// A property value was a sequence or mapping.
    NotScalar(String),
}
