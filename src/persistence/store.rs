//! Key-value blob stores the application snapshot is written to.

use super::files::{atomic_write, backup_file, read_file};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Storage key the application snapshot lives under
pub const STATE_KEY: &str = "lifemaster-state";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to write {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("store is unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// A durable home for serialized snapshots
pub trait StateStore {
    /// The blob stored under `key`, or `None` if nothing was ever saved
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replace the blob stored under `key`
    fn save(&self, key: &str, blob: &str) -> Result<()>;

    /// Keep a copy of the blob under `key` somewhere `save` will not touch.
    /// Returns where the copy went, or `None` if there was nothing to copy.
    fn backup(&self, key: &str) -> Result<Option<String>>;
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl StateStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        read_file(&path).map_err(|e| StoreError::Read {
            path,
            message: format!("{:#}", e),
        })
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        let path = self.path_for(key);
        atomic_write(&path, blob).map_err(|e| StoreError::Write {
            path,
            message: format!("{:#}", e),
        })
    }

    fn backup(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match backup_file(&path) {
            Ok(copy) => Ok(copy.map(|p| p.display().to_string())),
            Err(e) => Err(StoreError::Write {
                path,
                message: format!("{:#}", e),
            }),
        }
    }
}

/// In-process store, useful for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RefCell<HashMap<String, String>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with one blob
    pub fn with_blob(key: &str, blob: &str) -> Self {
        let store = Self::default();
        store
            .blobs
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        store
    }

    /// A store whose every operation fails
    pub fn unavailable() -> Self {
        Self {
            blobs: RefCell::default(),
            unavailable: true,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.blobs.borrow().get(key).cloned()
    }
}

impl StateStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        if self.unavailable {
            return Err(StoreError::Unavailable("memory store disabled".to_string()));
        }
        Ok(self.get(key))
    }

    fn save(&self, key: &str, blob: &str) -> Result<()> {
        if self.unavailable {
            return Err(StoreError::Unavailable("memory store disabled".to_string()));
        }
        self.blobs
            .borrow_mut()
            .insert(key.to_string(), blob.to_string());
        Ok(())
    }

    /// Copies to `<key>.bak`
    fn backup(&self, key: &str) -> Result<Option<String>> {
        if self.unavailable {
            return Err(StoreError::Unavailable("memory store disabled".to_string()));
        }
        let Some(blob) = self.get(key) else {
            return Ok(None);
        };
        let backup_key = format!("{}.bak", key);
        self.blobs.borrow_mut().insert(backup_key.clone(), blob);
        Ok(Some(backup_key))
    }
}
