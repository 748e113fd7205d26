//! Single and multi-line text fields

use minijinja::Value;

use super::base::{BaseField, RenderContext};
use super::error::{ConfigureError, RenderError, ValidationError};
use super::tag::TagMap;
use super::Field;
use crate::template::FieldTemplates;
use crate::value::FieldValue;

/// Default visible rows of a textarea
pub const DEFAULT_ROWS: u32 = 5;

/// Single-line text input
#[derive(Debug, Clone, Default)]
pub struct TextField {
    base: BaseField,
    max_length: Option<usize>,
    placeholder: Option<String>,
}

impl TextField {
    /// Create a text field
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseField::new(name),
            ..Self::default()
        }
    }

    /// Limit input to `max` characters
    #[must_use]
    pub const fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }
}

impl Field for TextField {
    fn attrs(&self) -> &BaseField {
        &self.base
    }

    fn attrs_mut(&mut self) -> &mut BaseField {
        &mut self.base
    }

    fn configure(&mut self, tags: &TagMap) -> Result<(), ConfigureError> {
        let max_length = tags.parse::<usize>("max_length")?;
        self.base.configure(tags)?;
        if max_length.is_some() {
            self.max_length = max_length;
        }
        if let Some(placeholder) = tags.value("placeholder") {
            self.placeholder = Some(placeholder.to_string());
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
            ("input_type", Value::from("text")),
            ("max_length", Value::from(self.max_length)),
            ("placeholder", Value::from(self.placeholder.clone())),
        ]);
        self.base
            .base_render(templates, "fields/input.html", value, error, start_row, ctx)
    }

    fn validate(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        if let Some(max) = self.max_length {
            let len = raw.chars().count();
            if len > max {
                return Err(ValidationError::invalid(format!(
                    "Ensure this value has at most {max} characters (it has {len})."
                )));
            }
        }
        Ok(FieldValue::from(raw))
    }
}

/// Multi-line text input
#[derive(Debug, Clone)]
pub struct TextareaField {
    base: BaseField,
    rows: u32,
}

impl Default for TextareaField {
    fn default() -> Self {
        Self {
            base: BaseField::default(),
            rows: DEFAULT_ROWS,
        }
    }
}

impl TextareaField {
    /// Create a textarea field
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseField::new(name),
            ..Self::default()
        }
    }
}

impl Field for TextareaField {
    fn attrs(&self) -> &BaseField {
        &self.base
    }

    fn attrs_mut(&mut self) -> &mut BaseField {
        &mut self.base
    }

    fn configure(&mut self, tags: &TagMap) -> Result<(), ConfigureError> {
        let rows = tags.parse::<u32>("rows")?;
        if rows == Some(0) {
            return Err(ConfigureError::invalid("rows", "0", "must be at least 1"));
        }
        self.base.configure(tags)?;
        if let Some(rows) = rows {
            self.rows = rows;
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
        let ctx = RenderContext::from([("rows", Value::from(self.rows))]);
        self.base
            .base_render(templates, "fields/textarea.html", value, error, start_row, ctx)
    }
}
