//! Field type registry
//!
//! Maps a field type name (`"text"`, `"file"`, ...) to a factory producing
//! fresh field instances. Factories rather than shared instances are kept
//! so every form column gets its own [`BaseField`](crate::fields::BaseField).
//!
//! A process-wide registry pre-populated with the built-in types is
//! available through [`register_custom`], [`get_custom`] and
//! [`build_custom`].

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::config::FieldsConfig;
use crate::fields::{
    BoolField, ChoiceField, ConfigureError, Field, FileField, FloatField, ForeignKeyField,
    IntField, TagMap, TextField, TextareaField, TimeField, UrlField, FULL_WIDTH,
};
use crate::storage::{LocalUploadStore, UploadStore};
use crate::value::DEFAULT_DATETIME_FORMAT;

/// Produces a fresh, unnamed field instance
pub type FieldFactory = Arc<dyn Fn() -> Box<dyn Field> + Send + Sync>;

/// Errors from registering or building field types
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Field type name is empty
    #[error("A field type needs a non-empty name.")]
    InvalidName,

    /// A field type with this name is already registered
    #[error("A field with the name {0} already exists.")]
    Duplicate(String),

    /// No field type with this name is registered
    #[error("Unknown field type {0}.")]
    UnknownKind(String),

    /// Tags could not be applied to the new field
    #[error("Field {field}: {source}")]
    Configure {
        /// Form field name being built
        field: String,
        /// Underlying tag error
        #[source]
        source: ConfigureError,
    },
}

/// Names of the built-in field types
pub const BUILTIN_KINDS: [&str; 10] = [
    "bool",
    "choice",
    "file",
    "float",
    "foreignkey",
    "int",
    "text",
    "textarea",
    "time",
    "url",
];

/// Name to factory map for field types
#[derive(Clone)]
pub struct FieldRegistry {
    factories: HashMap<String, FieldFactory>,
}

impl fmt::Debug for FieldRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRegistry")
            .field("kinds", &self.names())
            .finish()
    }
}

impl Default for FieldRegistry {
    fn default() -> Self {
        Self::with_config(&FieldsConfig::default())
    }
}

impl FieldRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Create a registry with the built-in types, storing uploads on disk
    /// as configured
    #[must_use]
    pub fn with_config(config: &FieldsConfig) -> Self {
        let store = LocalUploadStore::new(&config.uploads.dir, config.uploads.url_prefix.as_str())
            .with_max_file_size(config.uploads.max_file_size);
        Self::with_store(config, Arc::new(store))
    }

    /// Create a registry with the built-in types using `store` for uploads
    #[must_use]
    pub fn with_store(config: &FieldsConfig, store: Arc<dyn UploadStore>) -> Self {
        let width = config.layout.default_width;
        let time_format = match TimeField::default().with_format(&config.time_format) {
            Ok(_) => config.time_format.clone(),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring configured time format");
                DEFAULT_DATETIME_FORMAT.to_string()
            }
        };

        let mut registry = Self::new();
        registry.insert_builtin("text", width, || Box::new(TextField::default()));
        registry.insert_builtin("textarea", width, || Box::new(TextareaField::default()));
        registry.insert_builtin("int", width, || Box::new(IntField::default()));
        registry.insert_builtin("float", width, || Box::new(FloatField::default()));
        registry.insert_builtin("bool", width, || Box::new(BoolField::default()));
        registry.insert_builtin("choice", width, || Box::new(ChoiceField::default()));
        registry.insert_builtin("url", width, || Box::new(UrlField::default()));
        registry.insert_builtin("foreignkey", width, || Box::new(ForeignKeyField::default()));
        registry.insert_builtin("time", width, move || {
            let field = TimeField::default();
            Box::new(field.clone().with_format(&time_format).unwrap_or(field))
        });
        registry.insert_builtin("file", width, move || {
            Box::new(FileField::new("", Arc::clone(&store)))
        });
        registry
    }

    fn insert_builtin<F>(&mut self, name: &str, width: u8, make: F)
    where
        F: Fn() -> Box<dyn Field> + Send + Sync + 'static,
    {
        let factory: FieldFactory = Arc::new(move || {
            let mut field = make();
            if width != FULL_WIDTH {
                field.attrs_mut().width = width;
            }
            field
        });
        self.factories.insert(name.to_string(), factory);
    }

    /// Register a field type
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::InvalidName` for an empty name and
    /// `RegistryError::Duplicate` if the name is taken.
    ///
    /// # Example
    ///
    /// ```rust
    /// use admin_fields::fields::TextField;
    /// use admin_fields::registry::FieldRegistry;
    ///
    /// let mut registry = FieldRegistry::new();
    /// registry.register("slug", || Box::new(TextField::default()))?;
    /// assert!(registry.register("slug", || Box::new(TextField::default())).is_err());
    /// # Ok::<(), admin_fields::registry::RegistryError>(())
    /// ```
    pub fn register<F>(&mut self, name: &str, factory: F) -> Result<(), RegistryError>
    where
        F: Fn() -> Box<dyn Field> + Send + Sync + 'static,
    {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::InvalidName);
        }
        if self.factories.contains_key(name) {
            tracing::warn!(kind = name, "Field type already registered");
            return Err(RegistryError::Duplicate(name.to_string()));
        }

        self.factories.insert(name.to_string(), Arc::new(factory));
        tracing::debug!(kind = name, "Registered field type");
        Ok(())
    }

    /// Fresh instance of a field type
    #[must_use]
    pub fn get(&self, kind: &str) -> Option<Box<dyn Field>> {
        self.factories.get(kind).map(|make| make())
    }

    /// Create a named, configured field of type `kind`
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownKind` if `kind` is not registered and
    /// `RegistryError::Configure` if a tag is rejected.
    pub fn build(
        &self,
        kind: &str,
        field_name: &str,
        tags: &TagMap,
    ) -> Result<Box<dyn Field>, RegistryError> {
        let mut field = self
            .get(kind)
            .ok_or_else(|| RegistryError::UnknownKind(kind.to_string()))?;
        field.attrs_mut().set_name(field_name);
        field
            .configure(tags)
            .map_err(|source| RegistryError::Configure {
                field: field_name.to_string(),
                source,
            })?;
        Ok(field)
    }

    /// Check whether a field type is registered
    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered field type names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

static DEFAULT_REGISTRY: Lazy<RwLock<FieldRegistry>> =
    Lazy::new(|| RwLock::new(FieldRegistry::default()));

/// Register a field type in the process-wide registry
///
/// # Errors
///
/// See [`FieldRegistry::register`].
pub fn register_custom<F>(name: &str, factory: F) -> Result<(), RegistryError>
where
    F: Fn() -> Box<dyn Field> + Send + Sync + 'static,
{
    DEFAULT_REGISTRY.write().register(name, factory)
}

/// Fresh instance of a field type from the process-wide registry
#[must_use]
pub fn get_custom(kind: &str) -> Option<Box<dyn Field>> {
    DEFAULT_REGISTRY.read().get(kind)
}

/// Build a named, configured field from the process-wide registry
///
/// # Errors
///
/// See [`FieldRegistry::build`].
pub fn build_custom(
    kind: &str,
    field_name: &str,
    tags: &TagMap,
) -> Result<Box<dyn Field>, RegistryError> {
    DEFAULT_REGISTRY.read().build(kind, field_name, tags)
}
