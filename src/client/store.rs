//! Key-value storage backing the result cache.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error_handling::StoreError;

/// String key-value storage.
///
/// Implementations must be safe to share across tasks.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store with an optional size quota.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that refuses any write which would push the total size of keys and
    /// values above `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        if let Some(limit) = self.quota_bytes {
            let others: usize = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            if others + key.len() + value.len() > limit {
                return Err(StoreError::QuotaExceeded { limit });
            }
        }
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let mut items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

/// Directory-backed store: one `<key>.json` file per key.
///
/// Reads and writes use blocking `std::fs` calls. The cache map is a single small
/// file, so callers on the Tokio runtime call it inline; wrap it in
/// `tokio::task::spawn_blocking` if entries grow large or the directory sits on
/// slow storage.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (and creates if needed) the store directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Keys are internal constants, but keep path separators out of file names
        let file_name: String = key
            .chars()
            .map(|c| match c {
                '/' | '\\' => '_',
                c => c,
            })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // Write then rename so a crash never leaves a half-written entry
        let path = self.path_for(key);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, value)?;
        fs::rename(&staging, &path)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get_item("k").expect("get"), None);

        store.set_item("k", "v1").expect("set");
        store.set_item("k", "v2").expect("overwrite");
        assert_eq!(store.get_item("k").expect("get"), Some("v2".to_string()));

        store.remove_item("k").expect("remove");
        assert_eq!(store.get_item("k").expect("get"), None);
    }

    #[test]
    fn test_memory_store_quota() {
        let store = MemoryStore::with_quota(10);
        store.set_item("k", "12345").expect("fits");
        // Replacing an existing value only counts the new size
        store.set_item("k", "123456789").expect("still fits");

        let err = store.set_item("k", "1234567890").expect_err("too large");
        assert!(matches!(err, StoreError::QuotaExceeded { limit: 10 }));
        assert_eq!(
            store.get_item("k").expect("get"),
            Some("123456789".to_string())
        );
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path().join("cache")).expect("open");

        assert_eq!(store.get_item("widget_scout.parser_cache").expect("get"), None);
        store
            .set_item("widget_scout.parser_cache", "{}")
            .expect("set");
        assert_eq!(
            store.get_item("widget_scout.parser_cache").expect("get"),
            Some("{}".to_string())
        );
        assert!(dir
            .path()
            .join("cache")
            .join("widget_scout.parser_cache.json")
            .exists());

        store.remove_item("widget_scout.parser_cache").expect("remove");
        store
            .remove_item("widget_scout.parser_cache")
            .expect("removing twice is fine");
        assert_eq!(store.get_item("widget_scout.parser_cache").expect("get"), None);
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileStore::open(dir.path()).expect("open");
        store.set_item("../escape", "x").expect("set");
        assert!(dir.path().join(".._escape.json").exists());
        assert_eq!(store.get_item("../escape").expect("get"), Some("x".to_string()));
    }
}
