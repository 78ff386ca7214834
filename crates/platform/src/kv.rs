//! Key/Value Persistence Interface
//!
//! Small string-to-string stores used for host-local state. The trait is
//! injectable so stores can be faked in tests; implementations must treat
//! removal of an absent key as a no-op.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use kernel::error::app_error::{AppError, AppResult};
use parking_lot::Mutex;

/// String key/value store
#[trait_variant::make(KeyValueStore: Send)]
pub trait LocalKeyValueStore {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Write `value` under `key`, overwriting any previous value
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete `key`; deleting an absent key is a no-op
    async fn remove(&self, key: &str) -> AppResult<()>;
}

/// In-memory store.
///
/// Cloned handles share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl KeyValueStore for MemoryKvStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// JSON-file-backed store.
///
/// The whole map is held in memory and rewritten to disk on every
/// mutation. Suitable for the handful of keys this workspace persists,
/// not for bulk data.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    path: PathBuf,
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl FileKvStore {
    /// Open a store at `path`, loading existing entries if the file exists.
    ///
    /// A corrupt file is logged and treated as empty rather than refusing
    /// to open; the next write replaces it.
    pub async fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => match serde_json::from_str::<HashMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "State file is corrupt, starting empty"
                    );
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => {
                return Err(AppError::storage("Failed to read state file").with_source(e));
            }
        };

        Ok(Self {
            path,
            entries: Arc::new(Mutex::new(entries)),
        })
    }

    async fn persist(&self) -> AppResult<()> {
        // Snapshot under the lock, write outside it
        let snapshot = self.entries.lock().clone();
        let raw = serde_json::to_string_pretty(&snapshot)?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| AppError::storage("Failed to write state file").with_source(e))
    }
}

impl KeyValueStore for FileKvStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.entries.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        self.persist().await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        self.entries.lock().remove(key);
        self.persist().await
    }
}

#[cfg(test)]
mod tests {
    use super::{FileKvStore, KeyValueStore, MemoryKvStore};

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v1").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v1".to_string()));

        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_remove_absent_is_noop() {
        let store = MemoryKvStore::new();
        store.remove("missing").await.unwrap();
    }

    #[tokio::test]
    async fn test_memory_store_shared_between_clones() {
        let store = MemoryKvStore::new();
        let other = store.clone();

        store.set("k", "v").await.unwrap();
        assert_eq!(other.get("k").await.unwrap(), Some("v".to_string()));
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");

        let store = FileKvStore::open(&path).await.unwrap();
        store.set("session_start_abc", "2026-01-01T12:00:00Z").await.unwrap();
        drop(store);

        let reopened = FileKvStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.get("session_start_abc").await.unwrap(),
            Some("2026-01-01T12:00:00Z".to_string())
        );
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let store = FileKvStore::open(&path).await.unwrap();
        assert_eq!(store.get("anything").await.unwrap(), None);
    }
}
