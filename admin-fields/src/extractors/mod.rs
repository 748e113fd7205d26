//! Axum extractors for admin form submissions
//!
//! [`FormData`] collects every text value and uploaded file of a
//! submission, keyed by input name, ready for the validation pipeline.
//!
//! ```rust,no_run
//! use admin_fields::extractors::FormData;
//! use admin_fields::registry::build_custom;
//! use admin_fields::fields::parse_tag;
//! use admin_fields::validate::validate;
//! use axum::response::IntoResponse;
//!
//! async fn save_product(form: FormData) -> impl IntoResponse {
//!     let Ok(title) = build_custom("text", "title", &parse_tag("max_length=80")) else {
//!         return "bad field".to_string();
//!     };
//!     match validate(&*title, &form, None).await {
//!         Ok(value) => format!("title = {value}"),
//!         Err(e) => e.to_string(),
//!     }
//! }
//! ```

mod form_data;

pub use form_data::{FormData, FormDataError, FormLimits};
