//! Local filesystem upload storage

use super::traits::UploadStore;
use super::types::{sanitize_filename, StorageError, StorageResult, UploadedFile};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Local filesystem upload store
///
/// Files are written as `<base>/<dir>/<uuid>_<sanitised filename>` so two
/// uploads of `photo.jpg` never collide.
///
/// ```text
/// /var/uploads/
/// └── avatars/
///     ├── 550e8400e29b41d4a716446655440000_photo.jpg
///     └── a3bb189e8bf94a9ab5c79f9c3b8e5d7a_photo.jpg
/// ```
#[derive(Debug, Clone)]
pub struct LocalUploadStore {
    base_path: PathBuf,
    url_prefix: String,
    max_file_size: Option<u64>,
}

impl LocalUploadStore {
    /// Creates a new local upload store
    ///
    /// The base directory is created lazily on first save. Use
    /// [`open`](Self::open) to check it up front.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            url_prefix: url_prefix.into(),
            max_file_size: None,
        }
    }

    /// Creates a store and makes sure its base directory is usable
    ///
    /// # Errors
    ///
    /// Returns an error if the base path exists and is not a directory, or
    /// if it cannot be created.
    pub async fn open(
        base_path: impl Into<PathBuf>,
        url_prefix: impl Into<String>,
    ) -> StorageResult<Self> {
        let store = Self::new(base_path, url_prefix);
        match fs::metadata(&store.base_path).await {
            Ok(meta) if !meta.is_dir() => {
                return Err(StorageError::InvalidPath(format!(
                    "{} is not a directory",
                    store.base_path.display()
                )));
            }
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::create_dir_all(&store.base_path).await?;
                tracing::info!(path = %store.base_path.display(), "Created upload directory");
            }
            Err(e) => return Err(e.into()),
        }
        Ok(store)
    }

    /// Reject uploads larger than `bytes`
    #[must_use]
    pub const fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Base directory on disk
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a stored path to its location on disk
    #[must_use]
    pub fn full_path(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }

    /// Normalise an upload sub-directory, refusing anything that leaves the base
    fn relative_dir(dir: &str) -> StorageResult<String> {
        let trimmed = dir.trim().trim_matches('/');
        let mut parts = Vec::new();
        for component in Path::new(trimmed).components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                Component::CurDir => {}
                _ => return Err(StorageError::InvalidPath(dir.to_string())),
            }
        }
        Ok(parts.join("/"))
    }
}

#[async_trait]
impl UploadStore for LocalUploadStore {
    async fn save(&self, dir: &str, file: &UploadedFile) -> StorageResult<String> {
        if let Some(limit) = self.max_file_size {
            file.validate_size(limit)?;
        }

        let dir = Self::relative_dir(dir)?;
        let stored_name = format!(
            "{}_{}",
            Uuid::new_v4().simple(),
            sanitize_filename(&file.filename)
        );
        let relative = if dir.is_empty() {
            stored_name
        } else {
            format!("{dir}/{stored_name}")
        };

        let full_path = self.full_path(&relative);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut f = fs::File::create(&full_path).await?;
        f.write_all(&file.data).await?;
        f.flush().await?;

        tracing::debug!(
            path = %relative,
            size = file.size(),
            content_type = %file.content_type,
            "Stored upload"
        );

        Ok(relative)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.url_prefix.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_save_writes_file_under_dir() {
        let temp = TempDir::new().unwrap();
        let store = LocalUploadStore::new(temp.path(), "/uploads");

        let file = UploadedFile::new("report final.pdf", "application/pdf", b"%PDF".to_vec());
        let path = store.save("docs", &file).await.unwrap();

        assert!(path.starts_with("docs/"));
        assert!(path.ends_with("_report_final.pdf"));
        let written = std::fs::read(store.full_path(&path)).unwrap();
        assert_eq!(written, b"%PDF");
    }

    #[tokio::test]
    async fn test_save_without_dir() {
        let temp = TempDir::new().unwrap();
        let store = LocalUploadStore::new(temp.path(), "/uploads");

        let file = UploadedFile::new("a.txt", "text/plain", b"a".to_vec());
        let path = store.save("", &file).await.unwrap();

        assert!(!path.contains('/'));
        assert!(store.full_path(&path).exists());
    }

    #[tokio::test]
    async fn test_same_name_does_not_collide() {
        let temp = TempDir::new().unwrap();
        let store = LocalUploadStore::new(temp.path(), "/uploads");

        let file = UploadedFile::new("photo.jpg", "image/jpeg", vec![1]);
        let first = store.save("img", &file).await.unwrap();
        let second = store.save("img", &file).await.unwrap();

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_rejects_escaping_dir() {
        let temp = TempDir::new().unwrap();
        let store = LocalUploadStore::new(temp.path(), "/uploads");

        let file = UploadedFile::new("x.txt", "text/plain", vec![]);
        let result = store.save("../outside", &file).await;

        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_max_file_size() {
        let temp = TempDir::new().unwrap();
        let store = LocalUploadStore::new(temp.path(), "/uploads").with_max_file_size(2);

        let file = UploadedFile::new("big.bin", "application/octet-stream", vec![0; 3]);
        let result = store.save("", &file).await;

        assert!(matches!(result, Err(StorageError::FileSizeExceeded { .. })));
    }

    #[tokio::test]
    async fn test_open_rejects_file_as_base() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let result = LocalUploadStore::open(temp.path(), "/uploads").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }

    #[tokio::test]
    async fn test_open_creates_missing_base() {
        let temp = TempDir::new().unwrap();
        let base = temp.path().join("media").join("uploads");
        let store = LocalUploadStore::open(&base, "/uploads").await.unwrap();
        assert!(store.base_path().is_dir());
    }

    #[test]
    fn test_url() {
        let store = LocalUploadStore::new("/nonexistent-upload-root", "/media/");
        assert_eq!(store.url("docs/a.pdf"), "/media/docs/a.pdf");
    }
}
