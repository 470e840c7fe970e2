//! Snapshot persistence over a key-value storage backend.
//!
//! The store is written as one JSON value under [`STORAGE_KEY`]. A missing
//! or unreadable value is replaced by the default snapshot without
//! surfacing an error to the user.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::config::STORAGE_KEY;
use crate::core::error::StorageError;
use crate::core::store::{Store, default_store, now};

/// Key-value backend in the shape of the browser `localStorage` API.
pub trait Storage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory backend, lost when dropped.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Backend keeping every key in a single JSON object file.
///
/// A missing file reads as an empty store.
#[derive(Clone, Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<HashMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        // a corrupt file is replaced rather than blocking every save
        let mut items = self.read_all().unwrap_or_default();
        items.insert(key.to_string(), value.to_string());
        let raw = serde_json::to_string_pretty(&items)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// Loads and saves whole [`Store`] snapshots.
#[derive(Clone, Debug)]
pub struct SnapshotStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SnapshotStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Load the persisted store, falling back to the default snapshot.
    pub fn load(&self) -> Store {
        match self.try_load() {
            Ok(Some(store)) => store,
            Ok(None) => {
                log::debug!("no stored snapshot, creating default filesystem");
                default_store(now())
            }
            Err(e) => {
                log::warn!("discarding stored snapshot: {}", e);
                default_store(now())
            }
        }
    }

    fn try_load(&self) -> Result<Option<Store>, StorageError> {
        let Some(raw) = self.storage.get_item(STORAGE_KEY)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Persist the store. Failures are logged, never returned.
    pub fn save(&mut self, store: &Store) {
        if let Err(e) = self.try_save(store) {
            log::warn!("failed to save snapshot: {}", e);
        }
    }

    fn try_save(&mut self, store: &Store) -> Result<(), StorageError> {
        let raw = serde_json::to_string(store)?;
        self.storage.set_item(STORAGE_KEY, &raw)
    }
}
