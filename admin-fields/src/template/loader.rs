//! Field template loader with override directory and reload support

use minijinja::Environment;
use parking_lot::RwLock;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use super::TEMPLATE_NAMES;
use crate::config::TemplateSettings;

/// Templates compiled into the crate, used when no override exists
const EMBEDDED: &[(&str, &str)] = &[
    (
        "fields/wrapper.html",
        include_str!("../../templates/fields/wrapper.html"),
    ),
    (
        "fields/input.html",
        include_str!("../../templates/fields/input.html"),
    ),
    (
        "fields/textarea.html",
        include_str!("../../templates/fields/textarea.html"),
    ),
    (
        "fields/checkbox.html",
        include_str!("../../templates/fields/checkbox.html"),
    ),
    (
        "fields/select.html",
        include_str!("../../templates/fields/select.html"),
    ),
    (
        "fields/file.html",
        include_str!("../../templates/fields/file.html"),
    ),
];

/// Errors that can occur when loading or rendering field templates
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Override file exists but could not be read
    #[error("failed to read template '{0}': {1}")]
    ReadFailed(String, std::io::Error),

    /// No override and no embedded default for this name
    #[error("template not found: {0}")]
    NotFound(String),

    /// Template compilation or rendering failed
    #[error("template render error: {0}")]
    Render(#[from] minijinja::Error),
}

/// Thread-safe field template environment
///
/// Cloning is cheap and clones share the same environment, so a
/// [`reload`](Self::reload) is seen by every holder.
#[derive(Debug, Clone)]
pub struct FieldTemplates {
    env: Arc<RwLock<Environment<'static>>>,
    override_dir: Option<PathBuf>,
}

impl FieldTemplates {
    /// Create templates from the embedded defaults only
    ///
    /// # Errors
    ///
    /// Returns error if an embedded template fails to compile.
    pub fn new() -> Result<Self, TemplateError> {
        Self::build(None)
    }

    /// Create templates, preferring files found under `dir`
    ///
    /// # Errors
    ///
    /// Returns error if an override cannot be read or fails to compile.
    pub fn with_override_dir(dir: impl Into<PathBuf>) -> Result<Self, TemplateError> {
        Self::build(Some(dir.into()))
    }

    /// Create templates from configuration
    ///
    /// # Errors
    ///
    /// Returns error if an override cannot be read or fails to compile.
    pub fn from_settings(settings: &TemplateSettings) -> Result<Self, TemplateError> {
        Self::build(settings.override_dir.clone())
    }

    fn build(override_dir: Option<PathBuf>) -> Result<Self, TemplateError> {
        let env = Self::create_environment(override_dir.as_deref())?;
        Ok(Self {
            env: Arc::new(RwLock::new(env)),
            override_dir,
        })
    }

    /// Create a new minijinja environment with all templates loaded
    fn create_environment(
        override_dir: Option<&Path>,
    ) -> Result<Environment<'static>, TemplateError> {
        let mut env = Environment::new();

        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        for name in TEMPLATE_NAMES {
            let content = Self::load_template_content(name, override_dir)?;
            env.add_template_owned((*name).to_string(), content)?;
        }

        Ok(env)
    }

    /// Load template content: override directory first, then embedded default
    fn load_template_content(
        name: &str,
        override_dir: Option<&Path>,
    ) -> Result<String, TemplateError> {
        if let Some(dir) = override_dir {
            let path = dir.join(name);
            if path.exists() {
                tracing::debug!(template = name, path = %path.display(), "Using template override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| TemplateError::ReadFailed(name.to_string(), e));
            }
        }

        EMBEDDED
            .iter()
            .find(|(embedded, _)| *embedded == name)
            .map(|(_, source)| (*source).to_string())
            .ok_or_else(|| TemplateError::NotFound(name.to_string()))
    }

    /// Render a template with the given context
    ///
    /// # Errors
    ///
    /// Returns error if the template is not found or rendering fails.
    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<String, TemplateError> {
        self.env
            .read()
            .get_template(name)
            .and_then(|tmpl| tmpl.render(ctx))
            .map_err(Into::into)
    }

    /// Reload all templates, picking up edited override files
    ///
    /// # Errors
    ///
    /// Returns error if templates cannot be reloaded; the previous
    /// environment stays in place.
    pub fn reload(&self) -> Result<(), TemplateError> {
        let new_env = Self::create_environment(self.override_dir.as_deref())?;

        *self.env.write() = new_env;

        tracing::debug!("Field templates reloaded");
        Ok(())
    }

    /// Check if a template is overridden on disk
    #[must_use]
    pub fn is_customized(&self, name: &str) -> bool {
        self.override_dir
            .as_ref()
            .is_some_and(|dir| dir.join(name).exists())
    }
}
