//! Storage seam for the record store.
//!
//! A `Backend` moves the encoded record buffer to and from some medium. The
//! store never sees file handles; it only hands over or receives a `String`.

mod file;
mod in_memory;

use std::path::PathBuf;

use thiserror::Error;

pub use file::FileBackend;
pub use in_memory::InMemoryBackend;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage lock poisoned")]
    Lock,
}

/// Where a store's encoded contents live between runs.
pub trait Backend {
    /// Current contents, or `None` when nothing has been stored yet.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Replace the stored contents with `contents`.
    fn store(&self, contents: &str) -> Result<(), StorageError>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn load(&self) -> Result<Option<String>, StorageError> {
        (**self).load()
    }

    fn store(&self, contents: &str) -> Result<(), StorageError> {
        (**self).store(contents)
    }
}
