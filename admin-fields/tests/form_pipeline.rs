//! Integration tests for the form pipeline
//!
//! Drives an axum handler end to end: extract the submission, build
//! fields from the registry, validate, store uploads on disk and render
//! the form again on errors.

use admin_fields::prelude::*;
use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::post,
    Extension, Router,
};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "----AdminFieldsIntegration";

struct AdminState {
    registry: FieldRegistry,
    templates: FieldTemplates,
}

fn product_fields(registry: &FieldRegistry) -> Result<Vec<Box<dyn Field>>, RegistryError> {
    Ok(vec![
        registry.build("text", "title", &parse_tag("max_length=40,list,search"))?,
        registry.build("int", "stock", &parse_tag("blank,null,min=0,width=4"))?,
        registry.build("bool", "published", &TagMap::new())?,
        registry.build(
            "file",
            "manual",
            &parse_tag("upload_to=manuals,accept=application/pdf,blank"),
        )?,
    ])
}

async fn save_product(State(state): State<Arc<AdminState>>, form: FormData) -> Response {
    let fields = match product_fields(&state.registry) {
        Ok(fields) => fields,
        Err(e) => return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };
    let refs: Vec<&dyn Field> = fields.iter().map(|f| &**f).collect();

    match validate_all(&refs, &form, &HashMap::new()).await {
        Ok(values) => {
            let lines: Vec<String> = fields
                .iter()
                .map(|f| {
                    let name = f.attrs().name.as_str();
                    format!("{name}={}", values[name])
                })
                .collect();
            (StatusCode::OK, lines.join("\n")).into_response()
        }
        Err(errors) => {
            let mut html = String::new();
            for field in &fields {
                let name = field.attrs().name.as_str();
                let value = FieldValue::from(form.value(name).unwrap_or_default());
                match field.render(&state.templates, &value, errors.first(name), false) {
                    Ok(rendered) => html.push_str(&rendered),
                    Err(e) => {
                        return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
                    }
                }
            }
            (StatusCode::UNPROCESSABLE_ENTITY, Html(html)).into_response()
        }
    }
}

fn app(upload_dir: &Path) -> Router {
    let mut config = FieldsConfig::default();
    config.uploads.dir = upload_dir.to_path_buf();
    let limits = FormLimits::from(&config.uploads);
    let state = AdminState {
        registry: FieldRegistry::with_config(&config),
        templates: FieldTemplates::new().unwrap(),
    };
    Router::new()
        .route("/products", post(save_product))
        .layer(Extension(limits))
        .layer(limits.body_limit())
        .with_state(Arc::new(state))
}

fn multipart(texts: &[(&str, &str)], file: Option<(&str, &str, &str, &[u8])>) -> Request<Body> {
    let mut body = String::new();
    for (name, value) in texts {
        write!(
            &mut body,
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
        .unwrap();
    }
    if let Some((name, filename, content_type, data)) = file {
        write!(
            &mut body,
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .unwrap();
        body.push_str(&String::from_utf8_lossy(data));
        body.push_str("\r\n");
    }
    write!(&mut body, "--{BOUNDARY}--\r\n").unwrap();

    Request::builder()
        .method("POST")
        .uri("/products")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_valid_submission_stores_upload() {
    let uploads = TempDir::new().unwrap();
    let req = multipart(
        &[("title", "Desk lamp"), ("stock", ""), ("published", "on")],
        Some(("manual", "lamp.pdf", "application/pdf", b"%PDF-1.4")),
    );

    let response = app(uploads.path()).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_text(response).await;
    assert!(body.contains("title=Desk lamp"));
    assert!(body.contains("stock=\n"));
    assert!(body.contains("published=true"));
    assert!(body.contains("manual=manuals/"));
    assert!(body.ends_with("_lamp.pdf"));

    let stored: Vec<_> = std::fs::read_dir(uploads.path().join("manuals"))
        .unwrap()
        .collect();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_upload_above_axum_default_body_limit() {
    let uploads = TempDir::new().unwrap();
    let manual = vec![b'a'; 3 * 1024 * 1024];
    let req = multipart(
        &[("title", "Desk lamp"), ("published", "on")],
        Some(("manual", "big.pdf", "application/pdf", &manual)),
    );

    let response = app(uploads.path()).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let stored: Vec<_> = std::fs::read_dir(uploads.path().join("manuals"))
        .unwrap()
        .map(|entry| entry.unwrap().metadata().unwrap().len())
        .collect();
    assert_eq!(stored, [manual.len() as u64]);
}

#[tokio::test]
async fn test_invalid_submission_renders_errors() {
    let uploads = TempDir::new().unwrap();
    let req = Request::builder()
        .method("POST")
        .uri("/products")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("title=&stock=-3"))
        .unwrap();

    let response = app(uploads.path()).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_text(response).await;
    assert!(body.contains("This field can&#x27;t be empty."));
    assert!(body.contains("Ensure this value is greater than or equal to 0."));
    assert!(body.contains(r#"<div class="col-sm-4">"#));
    assert!(body.contains(r#"type="file""#));
    assert_eq!(body.matches("has-error").count(), 2);
}

#[tokio::test]
async fn test_rejected_upload_is_a_field_error() {
    let uploads = TempDir::new().unwrap();
    let req = multipart(
        &[("title", "Desk lamp")],
        Some(("manual", "notes.txt", "text/plain", b"hello")),
    );

    let response = app(uploads.path()).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_text(response).await;
    assert!(body.contains("Upload failed"));
    assert!(!uploads.path().join("manuals").exists());
}

#[test]
fn test_config_file_drives_registry_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "time_format = \"%d.%m.%Y\"\n[layout]\ndefault_width = 6\n[uploads]\nurl_prefix = \"/media\""
    )
    .unwrap();
    let config = FieldsConfig::load_from(file.path()).unwrap();
    let registry = FieldRegistry::with_config(&config);

    let due = registry.build("time", "due", &TagMap::new()).unwrap();
    assert_eq!(due.attrs().effective_width(), 6);
    let value = due.validate("01.02.2025").unwrap();
    assert_eq!(due.render_string(&value), "01.02.2025");

    let manual = registry.build("file", "manual", &TagMap::new()).unwrap();
    assert_eq!(
        manual.render_string(&FieldValue::from("manuals/a.pdf")),
        r#"<a href="/media/manuals/a.pdf" target="_blank">manuals/a.pdf</a>"#
    );
}

#[test]
fn test_custom_field_type_in_process_registry() {
    #[derive(Debug, Default)]
    struct SkuField {
        base: BaseField,
    }

    impl Field for SkuField {
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
            let ctx = admin_fields::fields::RenderContext::from([(
                "input_type",
                minijinja::Value::from("text"),
            )]);
            self.base
                .base_render(templates, "fields/input.html", value, error, start_row, ctx)
        }

        fn validate(&self, raw: &str) -> Result<FieldValue, ValidationError> {
            let sku = raw.trim().to_ascii_uppercase();
            if sku.len() == 8 && sku.chars().all(|c| c.is_ascii_alphanumeric()) {
                Ok(FieldValue::Text(sku))
            } else {
                Err(ValidationError::invalid("Enter an 8 character SKU."))
            }
        }
    }

    register_custom("sku", || Box::new(SkuField::default())).unwrap();
    assert!(matches!(
        register_custom("sku", || Box::new(SkuField::default())),
        Err(RegistryError::Duplicate(_))
    ));

    let field = build_custom("sku", "sku", &parse_tag("label=SKU")).unwrap();
    assert_eq!(field.validate("ab12cd34").unwrap(), FieldValue::from("AB12CD34"));
    assert!(field.validate("short").is_err());

    let templates = FieldTemplates::new().unwrap();
    let html = field.render(&templates, &FieldValue::Null, None, true).unwrap();
    assert!(html.contains(r#"<label for="sku">SKU *</label>"#));
}
