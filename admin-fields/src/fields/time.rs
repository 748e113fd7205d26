//! Date and time field

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use minijinja::Value;
use std::fmt::Write;

use super::base::{BaseField, RenderContext};
use super::error::{ConfigureError, RenderError, ValidationError};
use super::tag::TagMap;
use super::Field;
use crate::template::{escape_html, FieldTemplates};
use crate::value::{FieldValue, DEFAULT_DATETIME_FORMAT};

/// Date/time entered as text in a chrono format
///
/// Formats without a time part (`%Y-%m-%d`) are accepted and parse to
/// midnight.
#[derive(Debug, Clone)]
pub struct TimeField {
    base: BaseField,
    format: String,
}

impl Default for TimeField {
    fn default() -> Self {
        Self {
            base: BaseField::default(),
            format: DEFAULT_DATETIME_FORMAT.to_string(),
        }
    }
}

impl TimeField {
    /// Create a time field using the default format
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseField::new(name),
            ..Self::default()
        }
    }

    /// Use a different chrono format
    ///
    /// # Errors
    ///
    /// Returns error if the format contains an unknown specifier.
    pub fn with_format(mut self, format: &str) -> Result<Self, ConfigureError> {
        self.set_format(format)?;
        Ok(self)
    }

    /// Current chrono format
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    fn set_format(&mut self, format: &str) -> Result<(), ConfigureError> {
        check_format(format)?;
        self.format = format.to_string();
        Ok(())
    }

    fn format_value(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::DateTime(dt) => {
                let mut out = String::new();
                if write!(out, "{}", dt.format(&self.format)).is_err() {
                    out = dt.format(DEFAULT_DATETIME_FORMAT).to_string();
                }
                out
            }
            other => other.to_string(),
        }
    }

    fn parse(&self, raw: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(raw, &self.format)
            .or_else(|_| {
                NaiveDate::parse_from_str(raw, &self.format).map(|d| d.and_time(NaiveTime::MIN))
            })
            .ok()
    }
}

impl Field for TimeField {
    fn attrs(&self) -> &BaseField {
        &self.base
    }

    fn attrs_mut(&mut self) -> &mut BaseField {
        &mut self.base
    }

    fn configure(&mut self, tags: &TagMap) -> Result<(), ConfigureError> {
        if let Some(format) = tags.get("format") {
            check_format(format)?;
        }
        self.base.configure(tags)?;
        if let Some(format) = tags.get("format") {
            self.format = format.to_string();
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
            ("value", Value::from(self.format_value(value))),
            ("placeholder", Value::from(self.format.as_str())),
        ]);
        self.base
            .base_render(templates, "fields/input.html", value, error, start_row, ctx)
    }

    fn render_string(&self, value: &FieldValue) -> String {
        escape_html(&self.format_value(value))
    }

    fn validate(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        self.parse(raw.trim())
            .map(FieldValue::DateTime)
            .ok_or_else(|| {
                ValidationError::invalid(format!(
                    "Enter a valid date/time in the format {}.",
                    self.format
                ))
            })
    }
}

fn check_format(format: &str) -> Result<(), ConfigureError> {
    if format.is_empty() || StrftimeItems::new(format).any(|item| item == Item::Error) {
        return Err(ConfigureError::invalid(
            "format",
            format,
            "not a valid chrono format",
        ));
    }
    Ok(())
}
