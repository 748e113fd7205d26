//! Field templates
//!
//! Every field renders through minijinja templates: a field-specific
//! snippet (`fields/input.html`, `fields/select.html`, ...) which is then
//! placed inside the shared `fields/wrapper.html` layout (grid column,
//! label, help text and error message).
//!
//! Default templates are compiled into the crate. Any of them can be
//! replaced by dropping a file with the same relative name into the
//! override directory configured under `[templates]`.
//!
//! # Example
//!
//! ```rust
//! use admin_fields::template::FieldTemplates;
//!
//! let templates = FieldTemplates::new()?;
//! let html = templates.render("fields/checkbox.html", minijinja::context! {
//!     name => "published",
//!     checked => true,
//! })?;
//! assert!(html.contains("checked"));
//! # Ok::<(), admin_fields::template::TemplateError>(())
//! ```

mod loader;

pub use loader::{FieldTemplates, TemplateError};

/// Names of all field templates
pub const TEMPLATE_NAMES: &[&str] = &[
    "fields/wrapper.html",
    "fields/input.html",
    "fields/textarea.html",
    "fields/checkbox.html",
    "fields/select.html",
    "fields/file.html",
];

/// Escape a string for use in HTML content or a quoted attribute
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\0' => out.push('\u{FFFD}'),
            _ => out.push(c),
        }
    }
    out
}
