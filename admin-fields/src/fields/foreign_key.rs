//! Reference to a row of another table

use super::base::{BaseField, RenderContext};
use super::choice::{options_context, SelectOption};
use super::error::{ConfigureError, RenderError, ValidationError};
use super::tag::TagMap;
use super::{Field, RelationalField};
use crate::template::{escape_html, FieldTemplates};
use crate::value::FieldValue;

/// Select of related rows, storing the related id
///
/// The owning admin loads the related rows and hands them over with
/// [`set_options`](Self::set_options); until then any integer id is
/// accepted.
///
/// Tags: `table`, `display` (column shown for related rows), `slug`.
#[derive(Debug, Clone, Default)]
pub struct ForeignKeyField {
    base: BaseField,
    related_table: String,
    list_column: String,
    model_slug: String,
    options: Vec<SelectOption>,
}

impl ForeignKeyField {
    /// Create a foreign key field pointing into `table`
    #[must_use]
    pub fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            base: BaseField::new(name),
            related_table: table.into(),
            ..Self::default()
        }
    }

    /// Replace the selectable related rows as `(id, label)` pairs
    pub fn set_options<I, L>(&mut self, rows: I)
    where
        I: IntoIterator<Item = (i64, L)>,
        L: Into<String>,
    {
        self.options = rows
            .into_iter()
            .map(|(id, label)| SelectOption::new(id.to_string(), label))
            .collect();
    }

    /// Related rows currently offered
    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    fn label_for(&self, id: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == id)
            .map(|o| o.label.as_str())
    }
}

impl Field for ForeignKeyField {
    fn attrs(&self) -> &BaseField {
        &self.base
    }

    fn attrs_mut(&mut self) -> &mut BaseField {
        &mut self.base
    }

    fn configure(&mut self, tags: &TagMap) -> Result<(), ConfigureError> {
        let table = tags.value("table");
        if table.is_none() && self.related_table.is_empty() {
            return Err(ConfigureError::MissingTag("table".to_string()));
        }
        self.base.configure(tags)?;
        if let Some(table) = table {
            self.related_table = table.to_string();
        }
        if let Some(column) = tags.value("display") {
            self.list_column = column.to_string();
        }
        if let Some(slug) = tags.value("slug") {
            self.model_slug = slug.to_string();
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
            options_context(&self.options, &value.to_string()),
        )]);
        self.base
            .base_render(templates, "fields/select.html", value, error, start_row, ctx)
    }

    fn render_string(&self, value: &FieldValue) -> String {
        let id = value.to_string();
        escape_html(self.label_for(&id).unwrap_or(&id))
    }

    fn validate(&self, raw: &str) -> Result<FieldValue, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(FieldValue::from(raw));
        }
        let id: i64 = raw
            .parse()
            .map_err(|_| ValidationError::invalid("Select a valid choice."))?;
        if !self.options.is_empty() && self.label_for(raw).is_none() {
            return Err(ValidationError::invalid(format!(
                "Select a valid choice. {raw} is not one of the available choices."
            )));
        }
        Ok(FieldValue::Int(id))
    }

    fn as_relational(&self) -> Option<&dyn RelationalField> {
        Some(self)
    }

    fn as_relational_mut(&mut self) -> Option<&mut dyn RelationalField> {
        Some(self)
    }
}

impl RelationalField for ForeignKeyField {
    fn set_related_table(&mut self, table: String) {
        self.related_table = table;
    }

    fn related_table(&self) -> &str {
        &self.related_table
    }

    fn set_list_column(&mut self, column: String) {
        self.list_column = column;
    }

    fn list_column(&self) -> &str {
        &self.list_column
    }

    fn set_model_slug(&mut self, slug: String) {
        self.model_slug = slug;
    }

    fn model_slug(&self) -> &str {
        &self.model_slug
    }

    fn relation_table(&self) -> &str {
        &self.base.relation_table
    }
}
