//! Durable key/value storage for session tokens
//!
//! The session layer only ever touches three string keys. Backends report
//! failures as `LaptopHubError::Storage`; deciding whether a failure
//! matters is up to the caller.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::TokenStorageConfig;
use crate::error::{LaptopHubError, Result};

/// Access token
pub const ACCESS_KEY: &str = "lh_access";
/// Refresh token
pub const REFRESH_KEY: &str = "lh_refresh";
/// Email of the signed-in user
pub const EMAIL_KEY: &str = "lh_email";

/// Every key the session writes.
pub const SESSION_KEYS: [&str; 3] = [ACCESS_KEY, REFRESH_KEY, EMAIL_KEY];

/// String key/value storage
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// JSON object on disk, re-read on every access
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            LaptopHubError::storage(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            LaptopHubError::storage(format!("Failed to parse {}: {}", self.path.display(), e))
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                LaptopHubError::storage(format!("Failed to create storage directory: {}", e))
            })?;
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| LaptopHubError::storage(format!("Failed to serialize session: {}", e)))?;

        fs::write(&self.path, content).map_err(|e| {
            LaptopHubError::storage(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }

    fn update<F: FnOnce(&mut BTreeMap<String, String>)>(&self, change: F) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.load()?;
        change(&mut entries);
        self.save(&entries)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Process-lifetime storage
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// Storage that refuses every access, as when the host has it disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(LaptopHubError::storage("Storage is unavailable"))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(LaptopHubError::storage("Storage is unavailable"))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(LaptopHubError::storage("Storage is unavailable"))
    }
}

/// Store selected by configuration: a `FileStore` at the resolved path,
/// or a `MemoryStore` when persistence is turned off.
pub fn open_store(config: &TokenStorageConfig) -> Box<dyn KeyValueStore> {
    if config.enabled {
        Box::new(FileStore::new(config.resolved_path()))
    } else {
        Box::new(MemoryStore::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_store() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("session.json"));
        (dir, store)
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let (_dir, store) = file_store();
        store.set(ACCESS_KEY, "a1").unwrap();
        store.set(EMAIL_KEY, "sara@example.com").unwrap();

        let reopened = FileStore::new(store.path());
        assert_eq!(reopened.get(ACCESS_KEY).unwrap().as_deref(), Some("a1"));
        assert_eq!(
            reopened.get(EMAIL_KEY).unwrap().as_deref(),
            Some("sara@example.com")
        );
        assert_eq!(reopened.get(REFRESH_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_remove() {
        let (_dir, store) = file_store();
        store.remove(ACCESS_KEY).unwrap();
        assert!(!store.path().exists());

        store.set(ACCESS_KEY, "a1").unwrap();
        store.set(REFRESH_KEY, "r1").unwrap();
        store.remove(ACCESS_KEY).unwrap();
        assert_eq!(store.get(ACCESS_KEY).unwrap(), None);
        assert_eq!(store.get(REFRESH_KEY).unwrap().as_deref(), Some("r1"));
    }

    #[test]
    fn test_file_store_empty_file() {
        let (_dir, store) = file_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "  ").unwrap();
        assert_eq!(store.get(ACCESS_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_file_is_storage_error() {
        let (_dir, store) = file_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{not json").unwrap();
        let err = store.get(ACCESS_KEY).unwrap_err();
        assert!(matches!(err, LaptopHubError::Storage { .. }));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        store.set(EMAIL_KEY, "x@example.com").unwrap();
        assert_eq!(store.get(EMAIL_KEY).unwrap().as_deref(), Some("x@example.com"));
        store.remove(EMAIL_KEY).unwrap();
        store.remove(EMAIL_KEY).unwrap();
        assert_eq!(store.get(EMAIL_KEY).unwrap(), None);
    }

    #[test]
    fn test_unavailable_store_always_fails() {
        let store = UnavailableStore;
        assert!(store.get(ACCESS_KEY).is_err());
        assert!(store.set(ACCESS_KEY, "a").is_err());
        assert!(store.remove(ACCESS_KEY).is_err());
    }

    #[test]
    fn test_open_store_respects_enabled_flag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let disabled = open_store(&TokenStorageConfig {
            enabled: false,
            storage_path: Some(path.clone()),
        });
        disabled.set(ACCESS_KEY, "a1").unwrap();
        assert!(!path.exists());

        let enabled = open_store(&TokenStorageConfig {
            enabled: true,
            storage_path: Some(path.clone()),
        });
        enabled.set(ACCESS_KEY, "a1").unwrap();
        assert!(path.exists());
    }
}
