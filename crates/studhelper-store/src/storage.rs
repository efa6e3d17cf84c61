//! # Durable Key-Value Storage
//!
//! The client's "local storage": a handful of string keys (session token,
//! selected class) that survive restarts.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use thiserror::Error;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the selected class ID.
pub const SELECTED_CLASS_KEY: &str = "selectedClassId";

/// Errors writing to durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// String key-value storage shared by the stores.
pub trait KeyValueStore: Send + Sync {
    /// Reads a key.
    fn get(&self, key: &str) -> Option<String>;

    /// Writes a key.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removes a key. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage, lost on drop.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

/// Storage backed by a JSON object on disk.
///
/// The whole file is rewritten on every change.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`, starting empty if the file is missing or
    /// unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = Self::read_entries(&path);
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(path: &Path) -> BTreeMap<String, String> {
        if !path.exists() {
            tracing::debug!(?path, "Storage file not found, starting empty");
            return BTreeMap::new();
        }

        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => {
                    tracing::debug!(?path, "Loaded storage");
                    entries
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "Failed to parse storage, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) => {
                tracing::warn!(?path, error = %e, "Failed to read storage, starting empty");
                BTreeMap::new()
            }
        }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::with_entries([(TOKEN_KEY, "abc")]);
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("abc"));

        store.remove(TOKEN_KEY).unwrap();
        assert!(store.get(TOKEN_KEY).is_none());
        store.remove(TOKEN_KEY).unwrap();
    }

    #[test]
    fn test_file_store_persists_across_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let store = FileStore::open(&path);
        store.set(SELECTED_CLASS_KEY, "3").unwrap();
        drop(store);

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get(SELECTED_CLASS_KEY).as_deref(), Some("3"));

        reopened.remove(SELECTED_CLASS_KEY).unwrap();
        assert!(FileStore::open(&path).get(SELECTED_CLASS_KEY).is_none());
    }

    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path);
        assert!(store.get(TOKEN_KEY).is_none());

        store.set(TOKEN_KEY, "fresh").unwrap();
        assert_eq!(FileStore::open(&path).get(TOKEN_KEY).as_deref(), Some("fresh"));
    }
}
