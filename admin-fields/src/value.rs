//! Typed field values
//!
//! `FieldValue` is what a field's `validate` produces and what its
//! `render` / `render_string` consume.

use chrono::NaiveDateTime;
use std::fmt;

/// Format used when a date-time value is displayed without a field-specific format
pub const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A validated form value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// No value (stored as NULL)
    #[default]
    Null,
    /// Free text, also used for file paths and blank inputs
    Text(String),
    /// Whole number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Checkbox state
    Bool(bool),
    /// Date and time without timezone
    DateTime(NaiveDateTime),
}

impl FieldValue {
    /// Check if this is the null value
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Borrow the text content, if this is a text value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Get the boolean content, if this is a boolean value
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::DateTime(dt) => write!(f, "{}", dt.format(DEFAULT_DATETIME_FORMAT)),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<Self>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
