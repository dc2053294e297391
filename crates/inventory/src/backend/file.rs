use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use super::{Backend, StorageError};

/// Flat-file backend.
///
/// A missing file loads as "nothing stored". Bytes past the first invalid
/// UTF-8 sequence are dropped on load, like any other unreadable tail. Writes go to a sibling `.tmp`
/// file which is synced and then renamed over the target, so an interrupted
/// save leaves the previous contents in place. No handle is kept open between
/// calls.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Longest valid UTF-8 prefix of `bytes`.
    fn utf8_prefix(&self, mut bytes: Vec<u8>) -> String {
        if let Err(err) = std::str::from_utf8(&bytes) {
            let valid = err.valid_up_to();
            tracing::warn!(
                path = %self.path.display(),
                dropped = bytes.len() - valid,
                "ignoring backing data after invalid UTF-8"
            );
            bytes.truncate(valid);
        }
        String::from_utf8(bytes).unwrap_or_default()
    }

    fn write_err(&self, source: std::io::Error) -> StorageError {
        StorageError::Write {
            path: self.path.clone(),
            source,
        }
    }
}

impl Backend for FileBackend {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(self.utf8_prefix(bytes))),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "backing file missing; starting empty");
                Ok(None)
            }
            Err(source) => Err(StorageError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn store(&self, contents: &str) -> Result<(), StorageError> {
        let tmp_path = self.tmp_path();

        let mut tmp = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp_path)
            .map_err(|e| self.write_err(e))?;
        tmp.write_all(contents.as_bytes())
            .map_err(|e| self.write_err(e))?;
        tmp.sync_all().map_err(|e| self.write_err(e))?;
        drop(tmp);

        if let Err(err) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.write_err(err));
        }

        tracing::debug!(path = %self.path.display(), bytes = contents.len(), "backing file written");
        Ok(())
    }
}
