//! Storage for files uploaded through file fields
//!
//! File fields delegate persistence to an [`UploadStore`]. The bundled
//! [`LocalUploadStore`] writes to a directory on disk; callers can plug in
//! their own backend by implementing the trait.

mod local;
mod traits;
mod types;

pub use local::LocalUploadStore;
pub use traits::UploadStore;
pub use types::{sanitize_filename, StorageError, StorageResult, UploadedFile};

#[cfg(test)]
pub use traits::MockUploadStore;
