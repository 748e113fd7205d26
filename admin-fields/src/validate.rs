//! Validation pipeline shared by all field types
//!
//! A field's own [`validate`](crate::fields::Field::validate) only parses
//! the raw string. The pipeline around it pulls the input out of the
//! submission, routes uploads through the field's
//! [`FileHandler`](crate::fields::FileHandler) and applies the blank/null
//! policy:
//!
//! | input | `blank` | `null` | result |
//! |-------|---------|--------|--------|
//! | empty | no      | any    | `ValidationError::Required` |
//! | empty | yes     | no     | `FieldValue::Text("")` |
//! | empty | yes     | yes    | `FieldValue::Null` |
//!
//! Checkboxes are the exception: an unchecked box submits nothing and
//! still validates to `Bool(false)`.

use std::collections::HashMap;

use crate::extractors::FormData;
use crate::fields::{Field, ValidationError, ValidationErrors};
use crate::value::FieldValue;

/// Validate one field against a submission
///
/// `existing` is the stored value when editing a record; file fields keep
/// it when no new file was chosen.
///
/// # Errors
///
/// Returns `ValidationError::Required` for empty input on a required
/// field, `ValidationError::Upload` if storing a file fails, or whatever
/// the field's own validation reports.
pub async fn validate(
    field: &dyn Field,
    form: &FormData,
    existing: Option<&FieldValue>,
) -> Result<FieldValue, ValidationError> {
    let attrs = field.attrs();
    let mut raw = form.value(&attrs.name).unwrap_or_default().to_string();

    // A file field's value comes from the store or the existing record,
    // never from text posted under its name.
    if let Some(handler) = field.as_file_handler() {
        raw.clear();
        if let Some(file) = form.file(&attrs.name) {
            raw = handler.handle_file(file).await.inspect_err(|e| {
                tracing::warn!(field = %attrs.name, error = %e, "Upload rejected");
            })?;
        } else if let Some(FieldValue::Text(previous)) = existing {
            raw.clone_from(previous);
        }
    }

    let result = field.validate(&raw);

    if raw.is_empty() && !matches!(result, Ok(FieldValue::Bool(_))) {
        return match (attrs.blank, attrs.null) {
            (true, true) => Ok(FieldValue::Null),
            (true, false) => Ok(FieldValue::Text(raw)),
            (false, _) => Err(ValidationError::Required),
        };
    }

    result
}

/// Validate a set of fields, collecting every error by field name
///
/// `existing` holds stored values by field name when editing a record.
///
/// # Errors
///
/// Returns all collected messages if any field failed.
pub async fn validate_all(
    fields: &[&dyn Field],
    form: &FormData,
    existing: &HashMap<String, FieldValue>,
) -> Result<HashMap<String, FieldValue>, ValidationErrors> {
    let mut values = HashMap::new();
    let mut errors = ValidationErrors::new();

    for &field in fields {
        let name = &field.attrs().name;
        match validate(field, form, existing.get(name)).await {
            Ok(value) => {
                values.insert(name.clone(), value);
            }
            Err(e) => errors.add(name.clone(), e.to_string()),
        }
    }

    if errors.has_errors() {
        tracing::debug!(count = errors.count(), "Form submission has validation errors");
        Err(errors)
    } else {
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{BoolField, FileField, IntField, TextField, REQUIRED_MESSAGE};
    use crate::storage::{MockUploadStore, StorageError, UploadedFile};
    use std::sync::Arc;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn optional<F: Field>(mut field: F, null: bool) -> F {
        field.attrs_mut().blank = true;
        field.attrs_mut().null = null;
        field
    }

    #[tokio::test]
    async fn test_required_field_rejects_empty() {
        let field = TextField::new("title");
        let err = validate(&field, &form(&[("title", "")]), None).await.unwrap_err();
        assert!(matches!(err, ValidationError::Required));
        assert_eq!(err.to_string(), REQUIRED_MESSAGE);

        let missing = validate(&field, &FormData::new(), None).await;
        assert!(matches!(missing, Err(ValidationError::Required)));
    }

    #[tokio::test]
    async fn test_blank_and_null_policy() {
        let empty = form(&[("stock", "")]);

        let nullable = optional(IntField::new("stock"), true);
        assert_eq!(validate(&nullable, &empty, None).await.unwrap(), FieldValue::Null);

        let blank = optional(TextField::new("stock"), false);
        assert_eq!(
            validate(&blank, &empty, None).await.unwrap(),
            FieldValue::from("")
        );
    }

    #[tokio::test]
    async fn test_blank_non_text_keeps_empty_text() {
        let blank_int = optional(IntField::new("stock"), false);
        assert_eq!(
            validate(&blank_int, &form(&[("stock", "")]), None).await.unwrap(),
            FieldValue::from("")
        );
    }

    #[tokio::test]
    async fn test_unchecked_checkbox_is_false() {
        let field = BoolField::new("published");
        assert_eq!(
            validate(&field, &FormData::new(), None).await.unwrap(),
            FieldValue::Bool(false)
        );
        assert_eq!(
            validate(&field, &form(&[("published", "on")]), None).await.unwrap(),
            FieldValue::Bool(true)
        );
    }

    #[tokio::test]
    async fn test_non_empty_input_uses_field_result() {
        let field = IntField::new("stock");
        assert_eq!(
            validate(&field, &form(&[("stock", "7")]), None).await.unwrap(),
            FieldValue::Int(7)
        );
        assert!(matches!(
            validate(&field, &form(&[("stock", "seven")]), None).await,
            Err(ValidationError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn test_file_upload_is_stored() {
        let mut store = MockUploadStore::new();
        store
            .expect_save()
            .times(1)
            .returning(|_, file| Ok(format!("docs/1_{}", file.filename)));
        let field = FileField::new("manual", Arc::new(store)).upload_to("docs");

        let mut submitted = FormData::new();
        submitted.insert_file("manual", UploadedFile::new("m.pdf", "application/pdf", vec![1]));

        assert_eq!(
            validate(&field, &submitted, None).await.unwrap(),
            FieldValue::from("docs/1_m.pdf")
        );
    }

    #[tokio::test]
    async fn test_file_field_keeps_existing_value() {
        let mut store = MockUploadStore::new();
        store.expect_save().never();
        let field = FileField::new("manual", Arc::new(store));

        let previous = FieldValue::from("docs/old.pdf");
        assert_eq!(
            validate(&field, &FormData::new(), Some(&previous)).await.unwrap(),
            previous
        );

        let err = validate(&field, &FormData::new(), None).await.unwrap_err();
        assert!(matches!(err, ValidationError::Required));
    }

    #[tokio::test]
    async fn test_file_field_ignores_posted_text() {
        let mut store = MockUploadStore::new();
        store.expect_save().never();
        let field = optional(FileField::new("manual", Arc::new(store)), false);

        let posted = form(&[("manual", "../../etc/passwd")]);
        assert_eq!(
            validate(&field, &posted, None).await.unwrap(),
            FieldValue::from("")
        );

        let previous = FieldValue::from("docs/old.pdf");
        assert_eq!(
            validate(&field, &posted, Some(&previous)).await.unwrap(),
            previous
        );
    }

    #[tokio::test]
    async fn test_upload_failure_becomes_validation_error() {
        let mut store = MockUploadStore::new();
        store
            .expect_save()
            .returning(|dir, _| Err(StorageError::InvalidPath(dir.to_string())));
        let field = FileField::new("manual", Arc::new(store));

        let mut submitted = FormData::new();
        submitted.insert_file("manual", UploadedFile::new("m.pdf", "application/pdf", vec![1]));

        let err = validate(&field, &submitted, None).await.unwrap_err();
        assert!(matches!(err, ValidationError::Upload(_)));
        assert!(err.to_string().starts_with("Upload failed"));
    }

    #[tokio::test]
    async fn test_validate_all_collects_errors() {
        let title = TextField::new("title");
        let stock = IntField::new("stock");
        let note = optional(TextField::new("note"), true);
        let fields: [&dyn Field; 3] = [&title, &stock, &note];

        let ok = validate_all(
            &fields,
            &form(&[("title", "Lamp"), ("stock", "3")]),
            &HashMap::new(),
        )
        .await
        .unwrap();
        assert_eq!(ok["title"], FieldValue::from("Lamp"));
        assert_eq!(ok["stock"], FieldValue::Int(3));
        assert_eq!(ok["note"], FieldValue::Null);

        let errors = validate_all(&fields, &form(&[("stock", "x")]), &HashMap::new())
            .await
            .unwrap_err();
        assert_eq!(errors.count(), 2);
        assert_eq!(errors.first("title"), Some(REQUIRED_MESSAGE));
        assert!(errors.has_field_error("stock"));
        assert!(!errors.has_field_error("note"));
    }
}
