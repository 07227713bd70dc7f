//! Named mockup storage.
//!
//! Backends store serialized `<controls>` documents by id; turning them into
//! a [`Document`](crate::Document) is the caller's job.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Document not found: {0}")]
    NotFound(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for mockup storage backends.
pub trait Storage: Send + Sync {
    /// Save a serialized mockup, replacing any previous one.
    fn save(&self, id: &str, xml: &str) -> StorageResult<()>;

    /// Load a serialized mockup.
    fn load(&self, id: &str) -> StorageResult<String>;

    /// Delete a mockup. Deleting a missing id is not an error.
    fn delete(&self, id: &str) -> StorageResult<()>;

    /// List all stored ids.
    fn list(&self) -> StorageResult<Vec<String>>;

    /// Check if a mockup exists.
    fn exists(&self, id: &str) -> StorageResult<bool>;
}
