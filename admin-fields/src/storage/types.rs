//! Core types for upload storage

use thiserror::Error;

/// Errors that can occur while storing an uploaded file
#[derive(Debug, Error)]
pub enum StorageError {
    /// I/O error during storage operation
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid upload directory or path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// File size exceeds limit
    #[error("File size {actual} exceeds limit of {limit} bytes")]
    FileSizeExceeded {
        /// Actual file size
        actual: u64,
        /// Maximum allowed size
        limit: u64,
    },

    /// Invalid MIME type
    #[error("Invalid MIME type: expected {expected:?}, got {actual}")]
    InvalidMimeType {
        /// Expected MIME types
        expected: Vec<String>,
        /// Actual MIME type
        actual: String,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// A file part received in a multipart form submission
///
/// # Examples
///
/// ```rust
/// use admin_fields::storage::UploadedFile;
///
/// let file = UploadedFile::new("avatar.png", "image/png", vec![0x89, 0x50, 0x4E, 0x47]);
/// assert_eq!(file.size(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Original filename from the upload
    pub filename: String,

    /// MIME content type (e.g., "image/png", "application/pdf")
    pub content_type: String,

    /// File data as bytes
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Creates a new uploaded file
    #[must_use]
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            data,
        }
    }

    /// Returns the size of the file in bytes
    #[must_use]
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Validates the file size against a maximum limit
    ///
    /// # Errors
    ///
    /// Returns `StorageError::FileSizeExceeded` if the file is larger than `max_bytes`
    pub fn validate_size(&self, max_bytes: u64) -> StorageResult<()> {
        let size = self.size();
        if size > max_bytes {
            return Err(StorageError::FileSizeExceeded {
                actual: size,
                limit: max_bytes,
            });
        }
        Ok(())
    }

    /// Validates the file's MIME type against an allowlist
    ///
    /// Entries ending in `/*` match any subtype (`image/*`).
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidMimeType` if the content type is not allowed
    pub fn validate_mime<S: AsRef<str>>(&self, allowed_types: &[S]) -> StorageResult<()> {
        let actual = self.content_type.as_str();
        let allowed = allowed_types.iter().any(|allowed| {
            let allowed = allowed.as_ref();
            allowed
                .strip_suffix("/*")
                .map_or(allowed == actual, |major| {
                    actual.split('/').next() == Some(major)
                })
        });

        if !allowed {
            return Err(StorageError::InvalidMimeType {
                expected: allowed_types.iter().map(|s| s.as_ref().to_string()).collect(),
                actual: self.content_type.clone(),
            });
        }
        Ok(())
    }
}

/// Reduce a client-supplied filename to a safe single path component
///
/// Directory parts are dropped and anything outside `[A-Za-z0-9._-]`
/// becomes `_`. Never returns an empty or dot-leading name.
#[must_use]
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
