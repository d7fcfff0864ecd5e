//! Named integer-valued properties and the folding options read from them.

use crate::accessor::Accessor;
use crate::error::PropertyError;
use crate::fold_level::FOLD_BASE;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// Property enabling the folder.
pub const PROP_FOLD: &str = "fold";
/// Property enabling comment folding.
pub const PROP_FOLD_COMMENT: &str = "fold.comment";
/// Property enabling compact folding (blank lines flagged as whitespace).
pub const PROP_FOLD_COMPACT: &str = "fold.compact";

/// A string-keyed property table.
///
/// Values are stored as strings and parsed on lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertySet {
    values: BTreeMap<String, String>,
}

impl PropertySet {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load properties from a YAML mapping of scalar values.
    ///
    /// ```yaml
    /// fold: 1
    /// fold.comment: true
    /// ```
    pub fn from_yaml_str(yaml: &str) -> Result<Self, PropertyError> {
        let raw: BTreeMap<String, Value> = serde_yaml::from_str(yaml)?;
        let mut set = Self::new();
        for (key, value) in raw {
            let text = match value {
                Value::Null => String::new(),
                Value::Bool(b) => String::from(if b { "1" } else { "0" }),
                Value::Number(n) => n.to_string(),
                Value::String(s) => s,
                _ => return Err(PropertyError::NotScalar(key)),
            };
            set.values.insert(key, text);
        }
        Ok(set)
    }

    /// Set a property.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`PropertySet::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Raw string value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Integer value; missing, empty, or non-numeric values yield `default`.
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse().ok())
            .unwrap_or(default)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if no property is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Folder switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldOptions {
    /// Run the folder at all.
    pub enabled: bool,
    /// Let comment blocks contribute to levels.
    pub comments: bool,
    /// Flag blank lines as whitespace.
    pub compact: bool,
    /// Levels never drop below this floor.
    pub base: u32,
}

impl FoldOptions {
    /// Read `fold` (default off), `fold.comment` (default off), and `fold.compact`
    /// (default on) through the accessor's property lookup.
    pub fn from_accessor<A: Accessor + ?Sized>(accessor: &A) -> Self {
        Self {
            enabled: accessor.property_int(PROP_FOLD, 0) != 0,
            comments: accessor.property_int(PROP_FOLD_COMMENT, 0) != 0,
            compact: accessor.property_int(PROP_FOLD_COMPACT, 1) != 0,
            base: FOLD_BASE,
        }
    }

    /// Same as [`FoldOptions::from_accessor`], reading a property set directly.
    pub fn from_properties(props: &PropertySet) -> Self {
        Self {
            enabled: props.get_int(PROP_FOLD, 0) != 0,
            comments: props.get_int(PROP_FOLD_COMMENT, 0) != 0,
            compact: props.get_int(PROP_FOLD_COMPACT, 1) != 0,
            base: FOLD_BASE,
        }
    }
}

impl Default for FoldOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            comments: false,
            compact: true,
            base: FOLD_BASE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_int() {
        let props = PropertySet::new()
            .with("fold", "1")
            .with("tab", " 4 ")
            .with("bad", "yes")
            .with("empty", "");

        assert_eq!(props.get_int("fold", 0), 1);
        assert_eq!(props.get_int("tab", 0), 4);
        assert_eq!(props.get_int("bad", 7), 7);
        assert_eq!(props.get_int("empty", 3), 3);
        assert_eq!(props.get_int("missing", -1), -1);
    }

    #[test]
    fn test_from_yaml() {
        let props = PropertySet::from_yaml_str(
            "fold: 1\nfold.comment: true\nfold.compact: false\nname: nsis\n",
        )
        .unwrap();
        assert_eq!(props.len(), 4);
        assert_eq!(props.get_int(PROP_FOLD, 0), 1);
        assert_eq!(props.get_int(PROP_FOLD_COMMENT, 0), 1);
        assert_eq!(props.get_int(PROP_FOLD_COMPACT, 1), 0);
        assert_eq!(props.get("name"), Some("nsis"));
    }

    #[test]
    fn test_from_yaml_rejects_nested() {
        let err = PropertySet::from_yaml_str("fold:\n  - 1\n").unwrap_err();
        assert!(matches!(err, PropertyError::NotScalar(key) if key == "fold"));
    }

    #[test]
    fn test_fold_options_defaults() {
        let options = FoldOptions::from_properties(&PropertySet::new());
        assert!(!options.enabled);
        assert!(!options.comments);
        assert!(options.compact);
        assert_eq!(options.base, FOLD_BASE);

        let options =
            FoldOptions::from_properties(&PropertySet::new().with(PROP_FOLD, "1"));
        assert!(options.enabled);
    }
}
