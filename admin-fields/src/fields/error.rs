//! Field error types
//!
//! `ValidationError` is what a single field reports for a submitted
//! value; its `Display` text is what ends up under the input.
//! `ValidationErrors` collects those messages per field name for a whole
//! form.

use std::collections::HashMap;
use thiserror::Error;

use crate::storage::StorageError;
use crate::template::TemplateError;

/// Message shown when a required field is submitted empty
pub const REQUIRED_MESSAGE: &str = "This field can't be empty.";

/// A submitted value was rejected
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Empty input on a field that is not allowed to be blank
    #[error("This field can't be empty.")]
    Required,

    /// The input could not be turned into a value of the field's type
    #[error("{0}")]
    Invalid(String),

    /// Storing an uploaded file failed
    #[error("Upload failed: {0}")]
    Upload(#[from] StorageError),
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Invalid`]
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

/// A configuration tag could not be applied to a field
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigureError {
    /// Tag value is malformed or out of range
    #[error("invalid value {value:?} for tag `{key}`: {reason}")]
    InvalidValue {
        /// Tag key
        key: String,
        /// Offending value
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// A tag the field cannot work without was not given
    #[error("missing required tag `{0}`")]
    MissingTag(String),
}

impl ConfigureError {
    /// Build an [`ConfigureError::InvalidValue`]
    #[must_use]
    pub fn invalid(key: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while rendering a field
#[derive(Debug, Error)]
pub enum RenderError {
    /// Template rendering failed
    #[error("template error: {0}")]
    Template(#[from] TemplateError),
}

/// Validation messages for a whole form, keyed by field name
///
/// # Examples
///
/// ```rust
/// use admin_fields::fields::ValidationErrors;
///
/// let mut errors = ValidationErrors::new();
/// errors.add("title", "This field can't be empty.");
/// errors.add("price", "Enter a number.");
///
/// assert!(errors.has_errors());
/// assert_eq!(errors.first("title"), Some("This field can't be empty."));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    errors: HashMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// Empty collection
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message for `field`
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    /// Whether any field failed
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether `field` failed
    #[must_use]
    pub fn has_field_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Every message for `field`, in the order recorded
    #[must_use]
    pub fn for_field(&self, field: &str) -> &[String] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    /// First message for a field, the one a field wrapper displays
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.for_field(field).first().map(String::as_str)
    }

    /// Total number of messages
    #[must_use]
    pub fn count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }
}
