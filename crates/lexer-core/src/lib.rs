#![warn(missing_docs)]
//! Lexer Core - Resumable Lexing and Folding for Text Editors
//!
//! # Overview
//!
//! `lexer-core` turns a text buffer into style spans and per-line fold levels. It is headless: a
//! host owns the buffer and the view, calls the tokenizer over a dirty range with the state
//! carried out of the previous range, then calls the folder over the same range.
//!
//! Languages are data. A [`Dialect`] lists the entry rules of a lexer in priority order (comment
//! leaders, quote styles, sigils, operators) and the words that open and close folds; it is
//! usually written in YAML and compiled into a [`Lexer`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Document (rope + styles + levels)          │  ← Incremental host
//! ├─────────────────────────────────────────────┤
//! │  tokenize()            │  fold()            │  ← Passes
//! ├─────────────────────────────────────────────┤
//! │  Lexer::step (exit / continuation / entry)  │  ← Pure transition
//! ├─────────────────────────────────────────────┤
//! │  Dialect (serde) → Lexer (lookup tables)    │  ← Configuration
//! ├─────────────────────────────────────────────┤
//! │  Accessor / StyledAccessor, charclass       │  ← Buffer access
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use lexer_core::{LexConfig, LexState, Lexer, TextAccessor, tokenize};
//!
//! let lexer = Lexer::from_yaml_str(r##"
//! name: tiny
//! operators: "="
//! rules:
//!   - rule: line_comment
//!     leaders: "#"
//!   - rule: line_start_word
//!   - rule: identifier
//!   - rule: operator
//! "##).unwrap();
//!
//! let text = "set x = y # note";
//! let out = tokenize(
//!     &TextAccessor::new(text),
//!     0,
//!     text.len(),
//!     LexState::Default,
//!     &LexConfig::new(&lexer),
//! )
//! .unwrap();
//!
//! assert_eq!(out.spans[0].state, LexState::Keyword);
//! assert_eq!(out.spans.last().unwrap().state, LexState::LineComment);
//! ```
//!
//! # Module Description
//!
//! - [`accessor`] - buffer access traits and a slice-backed accessor
//! - [`charclass`] - table-driven character classes
//! - [`dialect`] - serializable language definitions
//! - [`transition`] - the pure per-character transition function
//! - [`tokenizer`] - the colouriser pass
//! - [`folder`] - the fold pass
//! - [`document`] - an incrementally re-lexed rope buffer

pub mod accessor;
pub mod charclass;
pub mod dialect;
pub mod document;
pub mod error;
pub mod fold_level;
pub mod folder;
pub mod keywords;
pub mod lexer;
pub mod properties;
pub mod state;
pub mod tokenizer;
pub mod transition;

#[cfg(test)]
mod testing;

pub use accessor::{Accessor, EOF_CHAR, StyledAccessor, TextAccessor};
pub use dialect::{Dialect, EntryRule, EolPolicy, EscapeRule, FoldRules, WordMatch};
pub use document::{Document, EditOutcome};
pub use error::{DialectError, LexError, PropertyError};
pub use fold_level::{FOLD_BASE, FoldChange, FoldLevel};
pub use folder::fold;
pub use keywords::{KeywordClasses, KeywordOracle, NoKeywords};
pub use lexer::Lexer;
pub use properties::{FoldOptions, PROP_FOLD, PROP_FOLD_COMMENT, PROP_FOLD_COMPACT, PropertySet};
pub use state::{LexState, StyleSpan, push_span, spans_from_styles};
pub use tokenizer::{LexConfig, LineEnd, Tokenized, tokenize};
pub use transition::{Action, CharWindow, LineContext, Step};
