#![warn(missing_docs)]
//! `lexer-core-lang` - language presets for `lexer-core`.
//!
//! Presets are YAML [`Dialect`](lexer_core::Dialect) definitions embedded in the crate, so a
//! host can use them as-is or copy the file and adjust it. Keyword lists are not shipped; a host
//! fills [`KeywordLists`] from its own configuration and passes it to the tokenizer as the
//! keyword oracle.
//!
//! ```rust
//! use lexer_core_lang::{KeywordLists, WordList, lexer_for_path};
//! use std::path::Path;
//!
//! let lexer = lexer_for_path(Path::new("setup.nsi")).unwrap().unwrap();
//! assert_eq!(lexer.name(), "nsis");
//!
//! let keywords = KeywordLists::new().with_list(WordList::from_words("Section SectionEnd"));
//! # let _ = keywords;
//! ```

pub mod keywords;
pub mod nsis;

pub use keywords::{KeywordLists, MAX_KEYWORD_CLASSES, WordList};
pub use nsis::{NSIS_DIALECT_YAML, nsis_dialect, nsis_lexer};

use lexer_core::{DialectError, Lexer};
use std::path::Path;

/// Built-in presets as `(name, yaml)` pairs.
pub const PRESETS: &[(&str, &str)] = &[("nsis", NSIS_DIALECT_YAML)];

/// Compile the built-in preset called `name`.
pub fn lexer_by_name(name: &str) -> Option<Result<Lexer, DialectError>> {
    PRESETS
        .iter()
        .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
        .map(|(_, yaml)| Lexer::from_yaml_str(yaml))
}

/// Compile the first built-in preset whose file extensions match `path`.
pub fn lexer_for_path(path: &Path) -> Option<Result<Lexer, DialectError>> {
    for (name, yaml) in PRESETS {
        match Lexer::from_yaml_str(yaml) {
            Ok(lexer) if lexer.matches_path(path) => return Some(Ok(lexer)),
            Ok(_) => {}
            Err(err) => {
                tracing::error!(preset = name, %err, "built-in preset failed to compile");
                return Some(Err(err));
            }
        }
    }
    None
}
