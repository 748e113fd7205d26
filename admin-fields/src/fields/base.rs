//! Shared field state and the common rendering wrapper

use minijinja::Value;
use std::collections::BTreeMap;

use super::error::{ConfigureError, RenderError};
use super::tag::TagMap;
use crate::template::FieldTemplates;
use crate::value::FieldValue;

/// Grid width used when a field does not set one
pub const FULL_WIDTH: u8 = 12;

/// Template that wraps every rendered field
pub const WRAPPER_TEMPLATE: &str = "fields/wrapper.html";

/// Extra template variables a field passes to its own snippet
pub type RenderContext = BTreeMap<&'static str, Value>;

/// State every field type carries
///
/// Concrete fields embed a `BaseField` and expose it through
/// [`Field::attrs`](super::Field::attrs).
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseField {
    /// Form input name
    pub name: String,
    /// Human readable label
    pub label: String,
    /// Value used for new records
    pub default_value: Option<FieldValue>,
    /// Empty input is allowed
    pub blank: bool,
    /// Empty input is stored as NULL (only meaningful with `blank`)
    pub null: bool,
    /// Database column backing the field
    pub column_name: String,
    /// Shown as a column in list views
    pub list: bool,
    /// Included in list view search
    pub searchable: bool,
    /// Grid columns (1-12); 0 means "use the default"
    pub width: u8,
    /// Right-align in list views
    pub right: bool,
    /// Help text under the input
    pub help: String,
    /// Join table for many-to-many relations
    pub relation_table: String,
}

impl BaseField {
    /// Create base state for a named field
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let mut base = Self::default();
        base.set_name(name);
        base
    }

    /// Set the input name, filling in label and column when unset
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
        if self.label.is_empty() {
            self.label = humanize(&self.name);
        }
        if self.column_name.is_empty() {
            self.column_name.clone_from(&self.name);
        }
    }

    /// Width the wrapper uses
    #[must_use]
    pub const fn effective_width(&self) -> u8 {
        if self.width == 0 {
            FULL_WIDTH
        } else {
            self.width
        }
    }

    /// Apply the tags every field understands
    ///
    /// Flags only change state when present, so settings made in code
    /// survive an unrelated tag string. Nothing changes if a tag is
    /// rejected.
    ///
    /// # Errors
    ///
    /// Returns `ConfigureError::InvalidValue` for a width outside 1-12.
    pub fn configure(&mut self, tags: &TagMap) -> Result<(), ConfigureError> {
        let width = tags.parse::<u8>("width")?;
        if let Some(width) = width.filter(|w| !(1..=FULL_WIDTH).contains(w)) {
            return Err(ConfigureError::invalid(
                "width",
                &width.to_string(),
                "must be between 1 and 12",
            ));
        }

        if let Some(label) = tags.value("label") {
            self.label = label.to_string();
        }
        if let Some(help) = tags.value("help") {
            self.help = help.to_string();
        }
        if let Some(column) = tags.value("column") {
            self.column_name = column.to_string();
        }
        if let Some(default) = tags.value("default") {
            self.default_value = Some(FieldValue::from(default));
        }
        if let Some(table) = tags.value("relation") {
            self.relation_table = table.to_string();
        }
        if let Some(width) = width {
            self.width = width;
        }

        let flags: [(&str, &mut bool); 5] = [
            ("blank", &mut self.blank),
            ("null", &mut self.null),
            ("list", &mut self.list),
            ("search", &mut self.searchable),
            ("right", &mut self.right),
        ];
        for (key, slot) in flags {
            if tags.contains(key) {
                *slot = tags.flag(key);
            }
        }

        Ok(())
    }

    /// Render a field snippet inside the shared wrapper
    ///
    /// `ctx` carries the field-specific variables. The common ones
    /// (`label`, `blank`, `name`, `value`, `error`, `help`, `startrow`,
    /// `width`) are added here; a `value` already in `ctx` is kept so
    /// fields can pre-format it.
    ///
    /// # Errors
    ///
    /// Returns error if either template fails to render. The failure is
    /// also logged with the field name.
    pub fn base_render(
        &self,
        templates: &FieldTemplates,
        template: &str,
        value: &FieldValue,
        error: Option<&str>,
        start_row: bool,
        mut ctx: RenderContext,
    ) -> Result<String, RenderError> {
        ctx.insert("label", Value::from(self.label.as_str()));
        ctx.insert("blank", Value::from(self.blank));
        ctx.insert("name", Value::from(self.name.as_str()));
        ctx.entry("value")
            .or_insert_with(|| Value::from(value.to_string()));
        ctx.insert("error", Value::from(error.unwrap_or_default()));
        ctx.insert("help", Value::from(self.help.as_str()));
        ctx.insert("startrow", Value::from(start_row));
        ctx.insert("width", Value::from(self.effective_width()));

        let field_html = templates.render(template, &ctx).inspect_err(|e| {
            tracing::error!(field = %self.name, template, error = %e, "Field template failed");
        })?;
        ctx.insert("field", Value::from_safe_string(field_html));

        let html = templates.render(WRAPPER_TEMPLATE, &ctx).inspect_err(|e| {
            tracing::error!(field = %self.name, error = %e, "Field wrapper template failed");
        })?;

        Ok(html)
    }
}

/// Turn a column name into a label: `first_name` becomes `First name`
#[must_use]
pub fn humanize(name: &str) -> String {
    let spaced = name.replace(['_', '-'], " ");
    let trimmed = spaced.trim();
    let mut chars = trimmed.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
