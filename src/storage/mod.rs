//! Client-side key/value storage.
//!
//! A small `localStorage`-style store: string keys, JSON values. The file
//! backend is used by the binary; the memory backend backs tests and
//! throwaway sessions.

use std::collections::BTreeMap;
use std::path::PathBuf;

use parking_lot::Mutex;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::session::cookies::write_private;

/// Storage key for the marker written before redirecting to a payment gateway
pub const PENDING_PAYMENT_KEY: &str = "pendingPayment";

/// Raw string storage
pub trait ClientStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&self, key: &str) -> Result<()>;

    /// Read and deserialize a JSON value
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.get_item(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    /// Serialize and store a JSON value
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()>
    where
        Self: Sized,
    {
        self.set_item(key, &serde_json::to_string(value)?)
    }
}

/// Storage that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }
}

impl ClientStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.items.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.items.lock().remove(key);
        Ok(())
    }
}

/// Storage persisted as a single JSON object on disk.
///
/// Every write rewrites the whole file, which is fine for the handful of
/// keys the client keeps.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let items = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> Result<()> {
        write_private(&self.path, &serde_json::to_string_pretty(items)?)
    }
}

impl ClientStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.lock().get(key).cloned())
    }

    // Writes go to disk first; memory only changes once the file is written.
    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock();
        let mut next = items.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        *items = next;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.lock();
        if !items.contains_key(key) {
            return Ok(());
        }
        let mut next = items.clone();
        next.remove(key);
        self.flush(&next)?;
        *items = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Marker {
        order_id: u64,
    }

    #[test]
    fn test_memory_storage_json_roundtrip() {
        let storage = MemoryStorage::new();
        storage.set_json("m", &Marker { order_id: 9 }).unwrap();
        assert_eq!(
            storage.get_json::<Marker>("m").unwrap(),
            Some(Marker { order_id: 9 })
        );
        storage.remove_item("m").unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local_storage.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set_item("theme", "dark").unwrap();
        drop(storage);

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get_item("theme").unwrap().as_deref(), Some("dark"));
        reopened.remove_item("theme").unwrap();

        let again = FileStorage::open(&path).unwrap();
        assert!(again.get_item("theme").unwrap().is_none());
    }

    #[test]
    fn test_failed_write_leaves_memory_unchanged() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocked");
        let storage = FileStorage::open(blocker.join("local_storage.json")).unwrap();
        std::fs::write(&blocker, "a file, not a directory").unwrap();

        assert!(storage.set_item("pendingPayment", "{}").is_err());
        assert!(storage.get_item("pendingPayment").unwrap().is_none());
    }

    #[test]
    fn test_failed_remove_keeps_item() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        let storage = FileStorage::open(data_dir.join("local_storage.json")).unwrap();
        storage.set_item("theme", "dark").unwrap();

        std::fs::remove_dir_all(&data_dir).unwrap();
        std::fs::write(&data_dir, "a file, not a directory").unwrap();

        assert!(storage.remove_item("theme").is_err());
        assert_eq!(storage.get_item("theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("local_storage.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(FileStorage::open(&path).is_err());
    }
}
