//! Field capability contract and built-in field types
//!
//! A field type knows three things about one model column:
//!
//! - how to render an edit widget for it ([`Field::render`]),
//! - how to show a value read-only in list views ([`Field::render_string`]),
//! - how to turn the raw submitted string into a typed value
//!   ([`Field::validate`]).
//!
//! Every field embeds a [`BaseField`] with the state shared by all types
//! (label, blank/null flags, grid width, ...). Optional capabilities are
//! discovered at runtime: file fields expose a [`FileHandler`], fields
//! pointing at another table expose a [`RelationalField`].
//!
//! # Quick Start
//!
//! ```rust
//! use admin_fields::fields::{parse_tag, Field, IntField};
//! use admin_fields::template::FieldTemplates;
//! use admin_fields::FieldValue;
//!
//! let mut stock = IntField::new("stock");
//! stock.configure(&parse_tag("label=In stock,min=0,width=4"))?;
//!
//! assert_eq!(stock.validate("12")?, FieldValue::Int(12));
//! assert!(stock.validate("-1").is_err());
//!
//! let templates = FieldTemplates::new()?;
//! let html = stock.render(&templates, &FieldValue::Int(12), None, false)?;
//! assert!(html.contains(r#"type="number""#));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Custom field types
//!
//! Implement [`Field`] on a struct that embeds a [`BaseField`] and
//! register a factory for it with
//! [`FieldRegistry::register`](crate::registry::FieldRegistry::register).

mod base;
mod boolean;
mod choice;
mod error;
mod file;
mod foreign_key;
mod number;
mod tag;
mod text;
mod time;
mod url;

pub use base::{humanize, BaseField, RenderContext, FULL_WIDTH, WRAPPER_TEMPLATE};
pub use boolean::BoolField;
pub use choice::{ChoiceField, SelectOption};
pub use error::{ConfigureError, RenderError, ValidationError, ValidationErrors, REQUIRED_MESSAGE};
pub use file::FileField;
pub use foreign_key::ForeignKeyField;
pub use number::{FloatField, IntField};
pub use tag::{parse_tag, TagMap};
pub use text::{TextField, TextareaField};
pub use time::TimeField;
pub use url::UrlField;

use async_trait::async_trait;
use std::fmt;

use crate::storage::{StorageError, UploadedFile};
use crate::template::{escape_html, FieldTemplates};
use crate::value::FieldValue;

/// A pluggable form input type
pub trait Field: Send + Sync + fmt::Debug {
    /// Shared field state
    fn attrs(&self) -> &BaseField;

    /// Mutable shared field state
    fn attrs_mut(&mut self) -> &mut BaseField;

    /// Apply configuration tags
    ///
    /// The default applies the common tags only. Field types with their
    /// own options call [`BaseField::configure`] first.
    ///
    /// # Errors
    ///
    /// Returns error if a tag value is malformed.
    fn configure(&mut self, tags: &TagMap) -> Result<(), ConfigureError> {
        self.attrs_mut().configure(tags)
    }

    /// Render the edit widget inside the shared wrapper
    ///
    /// `error` is shown under the input, `start_row` closes the current
    /// grid row before this field.
    ///
    /// # Errors
    ///
    /// Returns error if template rendering fails.
    fn render(
        &self,
        templates: &FieldTemplates,
        value: &FieldValue,
        error: Option<&str>,
        start_row: bool,
    ) -> Result<String, RenderError>;

    /// Read-only HTML for list views
    fn render_string(&self, value: &FieldValue) -> String {
        escape_html(&value.to_string())
    }

    /// Turn the raw submitted string into a value
    ///
    /// Empty input is handled by the validation pipeline, which applies
    /// the blank/null policy to whatever this returns.
    ///
    /// # Errors
    ///
    /// Returns error if the input is not acceptable for this field.
    fn validate(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        Ok(FieldValue::from(raw))
    }

    /// Upload capability, for fields backed by a file input
    fn as_file_handler(&self) -> Option<&dyn FileHandler> {
        None
    }

    /// Relation capability, for fields pointing at another table
    fn as_relational(&self) -> Option<&dyn RelationalField> {
        None
    }

    /// Mutable relation capability
    fn as_relational_mut(&mut self) -> Option<&mut dyn RelationalField> {
        None
    }
}

/// Fields that accept a file upload
#[async_trait]
pub trait FileHandler: Send + Sync {
    /// Store an uploaded file and return the value to persist
    ///
    /// # Errors
    ///
    /// Returns error if the file is rejected or cannot be stored.
    async fn handle_file(&self, file: &UploadedFile) -> Result<String, StorageError>;
}

/// Fields whose value references rows of another table
pub trait RelationalField {
    /// Set the table the value points into
    fn set_related_table(&mut self, table: String);
    /// Table the value points into
    fn related_table(&self) -> &str;
    /// Set the column shown for related rows
    fn set_list_column(&mut self, column: String);
    /// Column shown for related rows
    fn list_column(&self) -> &str;
    /// Set the admin slug of the related model
    fn set_model_slug(&mut self, slug: String);
    /// Admin slug of the related model
    fn model_slug(&self) -> &str;
    /// Join table for many-to-many relations
    fn relation_table(&self) -> &str;
}
