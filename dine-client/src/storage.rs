//! Local persisted state
//!
//! Snapshot storage for the client stores, the moral equivalent of browser
//! local storage: one JSON document per key. `FileStorage` keeps each key in
//! `{dir}/{key}.json`; `MemoryStorage` is used by tests and ephemeral runs.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Table session snapshot
pub const TABLE_KEY: &str = "table-storage";
/// Cart snapshot
pub const CART_KEY: &str = "cart-storage";
/// Auth session snapshot
pub const AUTH_KEY: &str = "auth-storage";
/// Raw bearer token read by the HTTP gateway on every request
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key/value backend for persisted snapshots
pub trait StorageBackend: Send + Sync + fmt::Debug {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key, returning whether it existed
    fn remove(&self, key: &str) -> Result<bool, StorageError>;
}

// ============================================================================
// File backend
// ============================================================================

/// One JSON file per key under a directory
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Memory backend
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: DashMap<String, String>,
}

impl StorageBackend for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.entries.remove(key).is_some())
    }
}

// ============================================================================
// Storage handle
// ============================================================================

/// Cloneable handle shared by the stores and the HTTP gateway
#[derive(Debug, Clone)]
pub struct Storage {
    backend: Arc<dyn StorageBackend>,
}

impl Storage {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// File-backed storage rooted at `dir`
    pub fn file(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileStorage::new(dir))
    }

    /// Ephemeral storage, lost when the last handle drops
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.backend.read(key)
    }

    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend.write(key, value)
    }

    pub fn remove(&self, key: &str) -> Result<bool, StorageError> {
        self.backend.remove(key)
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        match self.backend.read(key)? {
            Some(content) => Ok(Some(serde_json::from_str(&content)?)),
            None => Ok(None),
        }
    }

    /// Load a snapshot, falling back to the default when missing or unreadable
    pub fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "Discarding unreadable snapshot");
                T::default()
            }
        }
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let content = serde_json::to_string(value)?;
        self.backend.write(key, &content)
    }
}
