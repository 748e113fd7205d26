//! Field configuration tags
//!
//! Model columns carry a compact option string such as
//! `label=Full name,width=6,blank,max_length=80`. Segments are comma
//! separated; a segment is either `key=value` or a bare flag.

use std::collections::HashMap;
use std::str::FromStr;

use super::error::ConfigureError;

/// Parsed field configuration tags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMap {
    entries: HashMap<String, String>,
}

impl TagMap {
    /// Create an empty tag map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a `key=value` entry
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a bare flag
    #[must_use]
    pub fn with_flag(mut self, key: impl Into<String>) -> Self {
        self.insert(key, "");
        self
    }

    /// Insert or replace an entry
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Raw value for `key` (empty for bare flags)
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Non-empty value for `key`
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Check if `key` is present at all
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Flag state: a bare flag or a truthy value is on
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| {
            v.is_empty() || matches!(v.to_ascii_lowercase().as_str(), "true" | "1" | "yes" | "on")
        })
    }

    /// Parse the value for `key`
    ///
    /// # Errors
    ///
    /// Returns `ConfigureError::InvalidValue` if the value does not parse.
    pub fn parse<T>(&self, key: &str) -> Result<Option<T>, ConfigureError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.value(key)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|e| ConfigureError::invalid(key, raw, e.to_string()))
            })
            .transpose()
    }

    /// Number of entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for TagMap {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse_tag(s))
    }
}

/// Parse a tag string into a [`TagMap`]
///
/// Whitespace around keys and values is trimmed, empty segments are
/// skipped and a repeated key keeps its last value.
///
/// ```rust
/// use admin_fields::fields::parse_tag;
///
/// let tags = parse_tag("label=Full name, width=6, blank");
/// assert_eq!(tags.get("label"), Some("Full name"));
/// assert!(tags.flag("blank"));
/// assert!(!tags.flag("null"));
/// ```
#[must_use]
pub fn parse_tag(tag: &str) -> TagMap {
    let mut map = TagMap::new();
    for segment in tag.split(',') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        match segment.split_once('=') {
            Some((key, value)) => {
                let key = key.trim();
                if !key.is_empty() {
                    map.insert(key, value.trim());
                }
            }
            None => map.insert(segment, ""),
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_pairs_and_flags() {
        let tags = parse_tag("label=Title,width=6,blank,null");
        assert_eq!(tags.get("label"), Some("Title"));
        assert_eq!(tags.get("width"), Some("6"));
        assert!(tags.flag("blank"));
        assert!(tags.flag("null"));
        assert_eq!(tags.len(), 4);
    }

    #[test]
    fn test_parse_skips_empty_segments() {
        let tags = parse_tag(" , ,list,,=orphan");
        assert_eq!(tags.len(), 1);
        assert!(tags.flag("list"));
    }

    #[test]
    fn test_last_key_wins() {
        let tags = parse_tag("width=4,width=8");
        assert_eq!(tags.get("width"), Some("8"));
    }

    #[test]
    fn test_value_keeps_inner_equals() {
        let tags = parse_tag("default=a=b");
        assert_eq!(tags.get("default"), Some("a=b"));
    }

    #[test]
    fn test_flag_values() {
        let tags = parse_tag("a=true,b=0,c=Yes,d=no");
        assert!(tags.flag("a"));
        assert!(!tags.flag("b"));
        assert!(tags.flag("c"));
        assert!(!tags.flag("d"));
        assert!(!tags.flag("missing"));
    }

    #[test]
    fn test_parse_typed() {
        let tags = parse_tag("max=10,min=abc,empty=");
        assert_eq!(tags.parse::<i64>("max").unwrap(), Some(10));
        assert_eq!(tags.parse::<i64>("missing").unwrap(), None);
        assert_eq!(tags.parse::<i64>("empty").unwrap(), None);
        assert!(matches!(
            tags.parse::<i64>("min"),
            Err(ConfigureError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_builder() {
        let tags = TagMap::new().with("label", "Name").with_flag("blank");
        assert_eq!(tags.value("label"), Some("Name"));
        assert!(tags.flag("blank"));
        assert!(tags.contains("blank"));
        assert_eq!(tags.value("blank"), None);
    }

    proptest! {
        #[test]
        fn parsed_keys_are_trimmed_and_non_empty(s in "[a-z=, ]{0,40}") {
            let tags = parse_tag(&s);
            for key in tags.entries.keys() {
                prop_assert!(!key.is_empty());
                prop_assert_eq!(key.trim(), key.as_str());
                prop_assert!(!key.contains(','));
            }
        }
    }
}
