//! admin-fields: pluggable field types for admin CRUD forms
//!
//! Every column of an admin form is backed by a field type that can:
//!
//! - render an edit widget inside a shared label/help/error wrapper,
//! - render a read-only, escaped string for list views,
//! - turn the raw submitted string into a typed [`FieldValue`].
//!
//! Field types are looked up by name in a [`FieldRegistry`] that comes
//! pre-populated with the built-ins (`text`, `textarea`, `int`, `float`,
//! `bool`, `choice`, `time`, `url`, `file`, `foreignkey`) and accepts
//! custom types. Submissions are read with the [`FormData`] extractor and
//! run through [`validate`](validate::validate), which applies the
//! blank/null policy and stores uploads.
//!
//! # Quick Start
//!
//! ```rust
//! use admin_fields::prelude::*;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let registry = FieldRegistry::default();
//! let templates = FieldTemplates::new()?;
//!
//! let price = registry.build("float", "price", &parse_tag("min=0,step=0.01,width=6"))?;
//!
//! let mut form = FormData::new();
//! form.insert_value("price", "19.90");
//! let value = validate(&*price, &form, None).await?;
//!
//! let html = price.render(&templates, &value, None, false)?;
//! assert!(html.contains("col-sm-6"));
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! See [`config::FieldsConfig`] for upload, layout and template settings.

// Lint configuration is handled at the workspace level in Cargo.toml
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod extractors;
pub mod fields;
pub mod observability;
pub mod registry;
pub mod storage;
pub mod template;
pub mod validate;
pub mod value;

pub use extractors::FormData;
pub use fields::{BaseField, Field};
pub use registry::FieldRegistry;
pub use value::FieldValue;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! ```rust
    //! use admin_fields::prelude::*;
    //! ```

    pub use crate::config::FieldsConfig;
    pub use crate::extractors::{FormData, FormDataError, FormLimits};
    pub use crate::fields::{
        parse_tag, BaseField, ConfigureError, Field, FileHandler, RelationalField, RenderError,
        TagMap, ValidationError, ValidationErrors,
    };
    pub use crate::registry::{
        build_custom, get_custom, register_custom, FieldRegistry, RegistryError,
    };
    pub use crate::storage::{LocalUploadStore, UploadStore, UploadedFile};
    pub use crate::template::FieldTemplates;
    pub use crate::validate::{validate, validate_all};
    pub use crate::value::FieldValue;

    // Re-export key dependencies
    pub use axum;
    pub use minijinja;
}
