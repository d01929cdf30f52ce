//! File-backed local storage.
//!
//! Each key is one file, `<dir>/<key>.json`, so the persisted cart survives
//! between runs the way browser storage survives a reload.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use haat::cart::storage::{Storage, StorageError};
use tracing::debug;

/// Key-value storage over a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Storage rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');

        if !valid {
            return Err(StorageError::Unavailable(format!(
                "invalid storage key {key:?}"
            )));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path(key)?;

        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path(key)?;

        fs::create_dir_all(&self.dir)?;

        // Write then rename so a crash never leaves half a cart behind.
        let staging = path.with_extension("json.tmp");

        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;

        debug!(path = %path.display(), bytes = value.len(), "stored");

        Ok(())
    }
}
