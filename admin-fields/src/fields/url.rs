//! URL field

use minijinja::Value;
use validator::ValidateUrl;

use super::base::{BaseField, RenderContext};
use super::error::{RenderError, ValidationError};
use super::Field;
use crate::template::{escape_html, FieldTemplates};
use crate::value::FieldValue;

/// Absolute URL input, shown as a link in list views
#[derive(Debug, Clone, Default)]
pub struct UrlField {
    base: BaseField,
}

impl UrlField {
    /// Create a URL field
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseField::new(name),
        }
    }
}

impl Field for UrlField {
    fn attrs(&self) -> &BaseField {
        &self.base
    }

    fn attrs_mut(&mut self) -> &mut BaseField {
        &mut self.base
    }

    fn render(
        &self,
        templates: &FieldTemplates,
        value: &FieldValue,
        error: Option<&str>,
        start_row: bool,
    ) -> Result<String, RenderError> {
        let ctx = RenderContext::from([
            ("input_type", Value::from("url")),
            ("placeholder", Value::from("https://")),
        ]);
        self.base
            .base_render(templates, "fields/input.html", value, error, start_row, ctx)
    }

    fn render_string(&self, value: &FieldValue) -> String {
        let url = value.to_string();
        if url.is_empty() {
            return String::new();
        }
        let escaped = escape_html(&url);
        format!(r#"<a href="{escaped}" target="_blank">{escaped}</a>"#)
    }

    fn validate(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        let candidate = raw.trim().to_string();
        if candidate.is_empty() {
            return Ok(FieldValue::Text(candidate));
        }
        if candidate.validate_url() {
            Ok(FieldValue::Text(candidate))
        } else {
            Err(ValidationError::invalid("Enter a valid URL."))
        }
    }
}
