//! Checkbox field

use minijinja::Value;

use super::base::{BaseField, RenderContext};
use super::error::{RenderError, ValidationError};
use super::Field;
use crate::template::FieldTemplates;
use crate::value::FieldValue;

/// Checkbox input
///
/// An unchecked checkbox is not submitted at all, so empty input
/// validates to `false` rather than tripping the required check.
#[derive(Debug, Clone, Default)]
pub struct BoolField {
    base: BaseField,
}

impl BoolField {
    /// Create a checkbox field
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseField::new(name),
        }
    }
}

fn is_checked(value: &FieldValue) -> bool {
    match value {
        FieldValue::Bool(b) => *b,
        FieldValue::Int(i) => *i != 0,
        FieldValue::Text(s) => parse_checkbox(s),
        _ => false,
    }
}

fn parse_checkbox(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "on" | "true" | "1" | "yes" | "checked"
    )
}

impl Field for BoolField {
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
        let ctx = RenderContext::from([("checked", Value::from(is_checked(value)))]);
        self.base
            .base_render(templates, "fields/checkbox.html", value, error, start_row, ctx)
    }

    fn render_string(&self, value: &FieldValue) -> String {
        if is_checked(value) { "Yes" } else { "No" }.to_string()
    }

    fn validate(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        Ok(FieldValue::Bool(parse_checkbox(raw)))
    }
}
