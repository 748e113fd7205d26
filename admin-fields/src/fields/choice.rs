//! Select-from-list field

use minijinja::Value;
use serde::Serialize;

use super::base::{BaseField, RenderContext};
use super::error::{ConfigureError, RenderError, ValidationError};
use super::tag::TagMap;
use super::Field;
use crate::template::{escape_html, FieldTemplates};
use crate::value::FieldValue;

/// Option for select dropdowns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Value attribute
    pub value: String,
    /// Display text
    pub label: String,
}

impl SelectOption {
    /// Create a new select option
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Context for select options in templates
#[derive(Debug, Clone, Serialize)]
struct SelectOptionCtx<'a> {
    value: &'a str,
    label: &'a str,
    selected: bool,
}

/// Template value for a list of options with `selected` marked
pub(super) fn options_context(options: &[SelectOption], selected: &str) -> Value {
    let ctx: Vec<SelectOptionCtx<'_>> = options
        .iter()
        .map(|opt| SelectOptionCtx {
            value: &opt.value,
            label: &opt.label,
            selected: opt.value == selected,
        })
        .collect();
    Value::from_serialize(&ctx)
}

/// Parse `draft:Draft|published:Published` or `small|medium|large`
fn parse_choices(raw: &str) -> Vec<SelectOption> {
    raw.split('|')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(|c| match c.split_once(':') {
            Some((value, label)) => SelectOption::new(value.trim(), label.trim()),
            None => SelectOption::new(c, c),
        })
        .collect()
}

/// Dropdown restricted to a fixed set of choices
#[derive(Debug, Clone, Default)]
pub struct ChoiceField {
    base: BaseField,
    choices: Vec<SelectOption>,
}

impl ChoiceField {
    /// Create a choice field
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: BaseField::new(name),
            choices: Vec::new(),
        }
    }

    /// Add a choice
    #[must_use]
    pub fn choice(mut self, value: impl Into<String>, label: impl Into<String>) -> Self {
        self.choices.push(SelectOption::new(value, label));
        self
    }

    /// Available choices
    #[must_use]
    pub fn choices(&self) -> &[SelectOption] {
        &self.choices
    }

    fn label_for(&self, value: &str) -> Option<&str> {
        self.choices
            .iter()
            .find(|c| c.value == value)
            .map(|c| c.label.as_str())
    }
}

impl Field for ChoiceField {
    fn attrs(&self) -> &BaseField {
        &self.base
    }

    fn attrs_mut(&mut self) -> &mut BaseField {
        &mut self.base
    }

    fn configure(&mut self, tags: &TagMap) -> Result<(), ConfigureError> {
        let choices = match tags.get("choices") {
            Some(raw) => {
                let choices = parse_choices(raw);
                if choices.is_empty() {
                    return Err(ConfigureError::invalid("choices", raw, "no choices given"));
                }
                Some(choices)
            }
            None => None,
        };
        self.base.configure(tags)?;
        if let Some(choices) = choices {
            self.choices = choices;
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
        let ctx = RenderContext::from([(
            "options",
            options_context(&self.choices, &value.to_string()),
        )]);
        self.base
            .base_render(templates, "fields/select.html", value, error, start_row, ctx)
    }

    fn render_string(&self, value: &FieldValue) -> String {
        let raw = value.to_string();
        escape_html(self.label_for(&raw).unwrap_or(&raw))
    }

    fn validate(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        if raw.is_empty() || self.label_for(raw).is_some() {
            Ok(FieldValue::from(raw))
        } else {
            Err(ValidationError::invalid(format!(
                "Select a valid choice. {raw} is not one of the available choices."
            )))
        }
    }
}
