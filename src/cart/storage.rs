//! Cart storage
//!
//! A minimal key/value seam standing in for the device-local storage the cart
//! is persisted to.

use std::io;

use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors surfaced by a [`Storage`] backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Underlying IO failure.
    #[error("storage io error")]
    Io(#[from] io::Error),

    /// The backend refused the operation (quota, permissions, closed handle).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String key/value storage.
pub trait Storage {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage, used for ephemeral sessions and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: FxHashMap<String, String>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-populated with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = FxHashMap::default();

        entries.insert(key.into(), value.into());

        Self { entries }
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());

        Ok(())
    }
}
