//! Form submission extractor
//!
//! Accepts both `multipart/form-data` and urlencoded bodies. Multipart
//! file parts are streamed chunk by chunk so an oversized upload is
//! rejected before it is fully buffered.
//!
//! Limits come from a [`FormLimits`] request extension, falling back to
//! the defaults. axum caps request bodies at 2 MiB on its own, so routes
//! accepting larger uploads also need [`FormLimits::body_limit`]:
//!
//! ```rust,no_run
//! use admin_fields::config::FieldsConfig;
//! use admin_fields::extractors::{FormData, FormLimits};
//! use axum::{routing::post, Extension, Router};
//!
//! async fn save(form: FormData) -> String {
//!     format!("{} files", form.file_count())
//! }
//!
//! let config = FieldsConfig::default();
//! let limits = FormLimits::from(&config.uploads);
//! let app: Router = Router::new()
//!     .route("/products", post(save))
//!     .layer(Extension(limits))
//!     .layer(limits.body_limit());
//! ```

use axum::{
    extract::{
        multipart::{Field as MultipartField, MultipartError, MultipartRejection},
        rejection::FormRejection,
        DefaultBodyLimit, FromRequest, Multipart, Request,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};
use std::collections::HashMap;
use thiserror::Error;

use crate::config::UploadSettings;
use crate::storage::UploadedFile;

/// Limits applied while reading a multipart body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLimits {
    /// Maximum size of one file in bytes
    pub max_file_size: u64,
    /// Maximum number of files in one submission
    pub max_files: usize,
}

impl Default for FormLimits {
    fn default() -> Self {
        Self::from(&UploadSettings::default())
    }
}

impl FormLimits {
    /// Room left in the body for text values and multipart framing
    const BODY_OVERHEAD: usize = 1024 * 1024;

    /// Body size limit layer large enough for `max_files` full-size files
    #[must_use]
    pub fn body_limit(&self) -> DefaultBodyLimit {
        let files = self
            .max_file_size
            .saturating_mul(u64::try_from(self.max_files).unwrap_or(u64::MAX));
        let bytes = usize::try_from(files)
            .unwrap_or(usize::MAX)
            .saturating_add(Self::BODY_OVERHEAD);
        DefaultBodyLimit::max(bytes)
    }
}

impl From<&UploadSettings> for FormLimits {
    fn from(settings: &UploadSettings) -> Self {
        Self {
            max_file_size: settings.max_file_size,
            max_files: settings.max_files,
        }
    }
}

/// Rejection produced by the [`FormData`] extractor
#[derive(Debug, Error)]
pub enum FormDataError {
    /// Body could not be read as multipart
    #[error("Multipart error: {message}")]
    Multipart {
        /// Reason reported by axum
        message: String,
        /// Status axum assigns to the failure
        status: StatusCode,
    },

    /// Body could not be read as a urlencoded form
    #[error("Form error: {message}")]
    Form {
        /// Reason reported by axum
        message: String,
        /// Status axum assigns to the failure
        status: StatusCode,
    },

    /// A file exceeds the size limit
    #[error("File {filename} exceeds maximum of {max} bytes")]
    FileTooLarge {
        /// Submitted file name
        filename: String,
        /// Maximum allowed
        max: u64,
    },

    /// More files than allowed
    #[error("Upload contains more than {max} files")]
    TooManyFiles {
        /// Maximum allowed
        max: usize,
    },
}

impl FormDataError {
    /// Response status for this rejection
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Multipart { status, .. } | Self::Form { status, .. } => *status,
            Self::FileTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::TooManyFiles { .. } => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<MultipartError> for FormDataError {
    fn from(e: MultipartError) -> Self {
        Self::Multipart {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<MultipartRejection> for FormDataError {
    fn from(e: MultipartRejection) -> Self {
        Self::Multipart {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<FormRejection> for FormDataError {
    fn from(e: FormRejection) -> Self {
        Self::Form {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl IntoResponse for FormDataError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = %status, error = %self, "Rejected form submission");

        (status, self.to_string()).into_response()
    }
}

/// Submitted text values and files, keyed by input name
///
/// Inputs may repeat (multi-selects, checkbox groups), so every name maps
/// to all values in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<UploadedFile>>,
}

impl FormData {
    /// Empty form
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// First value submitted for `name`
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    /// All values submitted for `name`
    #[must_use]
    pub fn values(&self, name: &str) -> &[String] {
        self.values.get(name).map_or(&[], Vec::as_slice)
    }

    /// First file uploaded for `name`
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name).and_then(|f| f.first())
    }

    /// All files uploaded for `name`
    #[must_use]
    pub fn files(&self, name: &str) -> &[UploadedFile] {
        self.files.get(name).map_or(&[], Vec::as_slice)
    }

    /// Add a text value
    pub fn insert_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// Add an uploaded file
    pub fn insert_file(&mut self, name: impl Into<String>, file: UploadedFile) {
        self.files.entry(name.into()).or_default().push(file);
    }

    /// Total number of uploaded files
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    /// Read every part of a multipart body
    ///
    /// File parts without a file name are the browser's "no file chosen"
    /// and are skipped.
    ///
    /// # Errors
    ///
    /// Returns error if the body is malformed or a limit is exceeded.
    pub async fn from_multipart(
        mut multipart: Multipart,
        limits: FormLimits,
    ) -> Result<Self, FormDataError> {
        let mut form = Self::new();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            match field.file_name().map(ToString::to_string) {
                Some(filename) if filename.is_empty() => {}
                Some(filename) => {
                    if form.file_count() >= limits.max_files {
                        return Err(FormDataError::TooManyFiles {
                            max: limits.max_files,
                        });
                    }
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let data = read_limited(field, &filename, limits.max_file_size).await?;
                    form.insert_file(name, UploadedFile::new(filename, content_type, data));
                }
                None => {
                    let text = field.text().await?;
                    form.insert_value(name, text);
                }
            }
        }

        Ok(form)
    }
}

impl FromIterator<(String, String)> for FormData {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut form = Self::new();
        for (name, value) in iter {
            form.insert_value(name, value);
        }
        form
    }
}

/// Read a file part, stopping as soon as it grows past `max_size`
async fn read_limited(
    mut field: MultipartField<'_>,
    filename: &str,
    max_size: u64,
) -> Result<Vec<u8>, FormDataError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        data.extend_from_slice(&chunk);
        if data.len() as u64 > max_size {
            return Err(FormDataError::FileTooLarge {
                filename: filename.to_string(),
                max: max_size,
            });
        }
    }
    Ok(data)
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<mime::Mime>().ok())
        .is_some_and(|m| m.type_() == mime::MULTIPART && m.subtype() == mime::FORM_DATA)
}

impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = FormDataError;

    #[allow(clippy::manual_async_fn)]
    fn from_request(
        req: Request,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            if is_multipart(&req) {
                let limits = req
                    .extensions()
                    .get::<FormLimits>()
                    .copied()
                    .unwrap_or_default();
                let multipart = Multipart::from_request(req, state).await?;
                return Self::from_multipart(multipart, limits).await;
            }

            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state).await?;
            Ok(pairs.into_iter().collect())
        }
    }
}
