//! File upload field

use async_trait::async_trait;
use minijinja::Value;
use std::fmt;
use std::sync::Arc;

use super::base::{BaseField, RenderContext};
use super::error::{ConfigureError, RenderError};
use super::tag::TagMap;
use super::{Field, FileHandler};
use crate::storage::{StorageError, UploadStore, UploadedFile};
use crate::template::{escape_html, FieldTemplates};
use crate::value::FieldValue;

/// File input backed by an [`UploadStore`]
///
/// The validated value is the stored path returned by the store. When an
/// edit form is submitted without a new file the previous path is kept.
///
/// Tags: `upload_to` (sub-directory), `accept` (`image/png|image/*`),
/// `max_size` (bytes).
#[derive(Clone)]
pub struct FileField {
    base: BaseField,
    upload_to: String,
    accept: Vec<String>,
    max_size: Option<u64>,
    store: Arc<dyn UploadStore>,
}

impl fmt::Debug for FileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileField")
            .field("base", &self.base)
            .field("upload_to", &self.upload_to)
            .field("accept", &self.accept)
            .field("max_size", &self.max_size)
            .finish_non_exhaustive()
    }
}

impl FileField {
    /// Create a file field storing uploads in `store`
    #[must_use]
    pub fn new(name: impl Into<String>, store: Arc<dyn UploadStore>) -> Self {
        Self {
            base: BaseField::new(name),
            upload_to: String::new(),
            accept: Vec::new(),
            max_size: None,
            store,
        }
    }

    /// Sub-directory uploads go to
    #[must_use]
    pub fn upload_to(mut self, dir: impl Into<String>) -> Self {
        self.upload_to = dir.into();
        self
    }

    /// Accepted MIME types
    #[must_use]
    pub fn accept<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept = types.into_iter().map(Into::into).collect();
        self
    }

    /// Reject uploads larger than `bytes`
    #[must_use]
    pub const fn max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }

    fn url_for(&self, value: &FieldValue) -> Option<String> {
        value
            .as_str()
            .filter(|path| !path.is_empty())
            .map(|path| self.store.url(path))
    }
}

impl Field for FileField {
    fn attrs(&self) -> &BaseField {
        &self.base
    }

    fn attrs_mut(&mut self) -> &mut BaseField {
        &mut self.base
    }

    fn configure(&mut self, tags: &TagMap) -> Result<(), ConfigureError> {
        let upload_to = tags.value("upload_to");
        if let Some(dir) = upload_to.filter(|dir| dir.split('/').any(|part| part == "..")) {
            return Err(ConfigureError::invalid(
                "upload_to",
                dir,
                "must stay inside the upload directory",
            ));
        }
        let max_size = tags.parse::<u64>("max_size")?;
        self.base.configure(tags)?;

        if let Some(dir) = upload_to {
            self.upload_to = dir.to_string();
        }
        if let Some(accept) = tags.value("accept") {
            self.accept = accept
                .split('|')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(ToString::to_string)
                .collect();
        }
        if max_size.is_some() {
            self.max_size = max_size;
        }
        Ok(())
    }

    fn render(
        &self,
        templates: &FieldTemplates,
        value: &FieldValue,
        error: Option<&str>,
        start_row: bool,
    ) -> Result<String, RenderError> {
        let ctx = RenderContext::from([
            ("url", Value::from(self.url_for(value).unwrap_or_default())),
            ("accept", Value::from(self.accept.join(","))),
        ]);
        self.base
            .base_render(templates, "fields/file.html", value, error, start_row, ctx)
    }

    fn render_string(&self, value: &FieldValue) -> String {
        match self.url_for(value) {
            Some(url) => format!(
                r#"<a href="{}" target="_blank">{}</a>"#,
                escape_html(&url),
                escape_html(&value.to_string())
            ),
            None => String::new(),
        }
    }

    fn as_file_handler(&self) -> Option<&dyn FileHandler> {
        Some(self)
    }
}

#[async_trait]
impl FileHandler for FileField {
    async fn handle_file(&self, file: &UploadedFile) -> Result<String, StorageError> {
        if let Some(limit) = self.max_size {
            file.validate_size(limit)?;
        }
        if !self.accept.is_empty() {
            file.validate_mime(&self.accept)?;
        }

        let path = self.store.save(&self.upload_to, file).await?;
        tracing::info!(
            field = %self.base.name,
            filename = %file.filename,
            path = %path,
            "File field stored upload"
        );
        Ok(path)
    }
}
