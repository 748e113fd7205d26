//! Upload storage trait definitions

use super::types::{StorageResult, UploadedFile};
use async_trait::async_trait;

/// Abstraction for where file fields put their uploads
///
/// A file field only needs two things from a backend: persist an upload
/// and hand back the value to store in the model column, and turn that
/// value into a URL for list and edit views.
///
/// # Examples
///
/// ```rust,no_run
/// use admin_fields::storage::{LocalUploadStore, UploadStore, UploadedFile};
///
/// # async fn example() -> anyhow::Result<()> {
/// let store = LocalUploadStore::open("/var/uploads", "/uploads").await?;
///
/// let file = UploadedFile::new("avatar.png", "image/png", vec![/* ... */]);
/// let path = store.save("avatars", &file).await?;
///
/// println!("Serve it from {}", store.url(&path));
/// # Ok(())
/// # }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadStore: Send + Sync {
    /// Stores an uploaded file under `dir` and returns its stored path
    ///
    /// The returned path is relative to the backend root and is what the
    /// file field hands back as its validated value.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` escapes the backend root or the write fails.
    async fn save(&self, dir: &str, file: &UploadedFile) -> StorageResult<String>;

    /// Public URL for a stored path
    fn url(&self, path: &str) -> String;
}
