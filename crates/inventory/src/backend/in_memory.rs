use std::sync::RwLock;

use super::{Backend, StorageError};

/// In-memory backend.
///
/// Intended for tests/dev: behaves like a backing file that starts missing
/// (or with the given contents) and is replaced on every store.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    contents: RwLock<Option<String>>,
    writes: RwLock<usize>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(contents: impl Into<String>) -> Self {
        Self {
            contents: RwLock::new(Some(contents.into())),
            writes: RwLock::new(0),
        }
    }

    /// Snapshot of what is currently stored.
    pub fn contents(&self) -> Option<String> {
        self.contents.read().ok().and_then(|c| c.clone())
    }

    /// Number of successful `store` calls.
    pub fn writes(&self) -> usize {
        self.writes.read().map(|w| *w).unwrap_or(0)
    }
}

impl Backend for InMemoryBackend {
    fn load(&self) -> Result<Option<String>, StorageError> {
        let contents = self.contents.read().map_err(|_| StorageError::Lock)?;
        Ok(contents.clone())
    }

    fn store(&self, contents: &str) -> Result<(), StorageError> {
        let mut slot = self.contents.write().map_err(|_| StorageError::Lock)?;
        *slot = Some(contents.to_string());
        let mut writes = self.writes.write().map_err(|_| StorageError::Lock)?;
        *writes += 1;
        Ok(())
    }
}
