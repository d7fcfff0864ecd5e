//! The NSIS (Nullsoft Scriptable Install System) preset.
//!
//! Line comments start with `;` or `#`, block comments are `/* */`. Strings use `"`, `'`, or
//! `` ` ``. A `"` string ends at the line end (styled `string_eol`) unless continued with a
//! trailing backslash, and inside it `$\"` and `$\\` are escapes. `'` and `` ` `` strings run
//! across lines until their closing quote. `!` starts a compiler directive at the start of a line,
//! `$name` is a variable, `${name}` a define and `$(name)` a language string.
//!
//! Folds open on `Section`, `Function`, `SectionGroup`, `PageEx` and the `!macro` / `!if*`
//! directives, and close on the matching `*End` words and `!macroend` / `!end*`.

use lexer_core::{Dialect, DialectError, Lexer};

/// The YAML definition of the NSIS dialect.
pub const NSIS_DIALECT_YAML: &str = include_str!("../dialects/nsis.yaml");

/// The NSIS dialect.
pub fn nsis_dialect() -> Result<Dialect, DialectError> {
    Dialect::from_yaml_str(NSIS_DIALECT_YAML)
}

/// A compiled NSIS lexer.
pub fn nsis_lexer() -> Result<Lexer, DialectError> {
    Lexer::from_yaml_str(NSIS_DIALECT_YAML)
}
