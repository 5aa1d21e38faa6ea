//! JSON file backed key-value store.
//!
//! The whole file is loaded on [`JsonFileStore::open`] and kept in memory.
//! Writes go to disk atomically (temp file + rename), either on every
//! change (autoflush, the default) or on [`JsonFileStore::flush`] /
//! [`JsonFileStore::close`].

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::errors::StorageError;
use crate::domain::ports::KeyValueStorePort;

/// Durable store persisting a `key -> string` map as JSON.
///
/// Flushes run one at a time, so an older snapshot can never be renamed
/// over a newer one.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
    autoflush: bool,
    dirty: AtomicBool,
    closed: AtomicBool,
    flush_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens the store at `path`, creating parent directories as needed.
    ///
    /// A missing file starts empty. A file that cannot be parsed is logged
    /// and replaced on the next write.
    ///
    /// # Errors
    /// Returns error if the parent directory cannot be created or the file
    /// exists but cannot be read.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let entries = match fs::read_to_string(&path).await {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Store file is corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), keys = entries.len(), "Opened key-value store");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
            autoflush: true,
            dirty: AtomicBool::new(false),
            closed: AtomicBool::new(false),
            flush_lock: Mutex::new(()),
        })
    }

    /// Enables or disables writing to disk on every change.
    #[must_use]
    pub fn with_autoflush(mut self, autoflush: bool) -> Self {
        self.autoflush = autoflush;
        self
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes pending changes to disk.
    ///
    /// # Errors
    /// Returns error if the file cannot be written.
    pub async fn flush(&self) -> Result<(), StorageError> {
        let _guard = self.flush_lock.lock().await;
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(());
        }

        let content = {
            let entries = self.entries.read();
            serde_json::to_string_pretty(&*entries)?
        };

        let path = self.path.clone();
        let result = tokio::task::spawn_blocking(move || write_atomic(&path, &content))
            .await
            .map_err(|e| std::io::Error::other(format!("flush task panicked: {e}")))?;

        if let Err(e) = result {
            self.dirty.store(true, Ordering::Release);
            return Err(e.into());
        }

        debug!(path = %self.path.display(), "Flushed key-value store");
        Ok(())
    }

    /// Flushes and closes the store. Later operations fail with
    /// [`StorageError::Closed`].
    ///
    /// # Errors
    /// Returns error if the final flush fails.
    pub async fn close(&self) -> Result<(), StorageError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        self.flush().await?;
        debug!(path = %self.path.display(), "Closed key-value store");
        Ok(())
    }

    /// Returns true once closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.is_closed() {
            Err(StorageError::Closed)
        } else {
            Ok(())
        }
    }

    async fn after_write(&self) -> Result<(), StorageError> {
        self.dirty.store(true, Ordering::Release);
        if self.autoflush {
            self.flush().await?;
        }
        Ok(())
    }
}

fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut temp_file = tempfile::NamedTempFile::new_in(parent)?;
    temp_file.write_all(content.as_bytes())?;
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl KeyValueStorePort for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.ensure_open()?;
        Ok(self.entries.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.ensure_open()?;
        self.entries.write().insert(key.to_string(), value);
        self.after_write().await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.ensure_open()?;
        if self.entries.write().remove(key).is_none() {
            return Ok(());
        }
        self.after_write().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_path(dir: &TempDir) -> PathBuf {
        dir.path().join("nested").join("avatar-cache.json")
    }

    #[tokio::test]
    async fn test_open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(store_path(&dir)).await.unwrap();

        assert_eq!(store.get("anything").await.unwrap(), None);
        assert!(dir.path().join("nested").exists());
    }

    #[tokio::test]
    async fn test_autoflush_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let store = JsonFileStore::open(&path).await.unwrap();
        store.set("key", "value".to_string()).await.unwrap();
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("key").await.unwrap().as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_manual_flush_on_close() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);

        let store = JsonFileStore::open(&path)
            .await
            .unwrap()
            .with_autoflush(false);
        store.set("key", "value".to_string()).await.unwrap();
        assert!(!path.exists());

        store.close().await.unwrap();
        assert!(path.exists());

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("key").await.unwrap().as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_closed_store_rejects_operations() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(store_path(&dir)).await.unwrap();

        store.close().await.unwrap();

        assert!(matches!(store.get("k").await, Err(StorageError::Closed)));
        assert!(matches!(
            store.set("k", "v".to_string()).await,
            Err(StorageError::Closed)
        ));
        store.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("avatar-cache.json");
        std::fs::write(&path, "{ definitely not json").unwrap();

        let store = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), None);

        store.set("key", "value".to_string()).await.unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"key\""));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_writes_all_reach_disk() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let store = std::sync::Arc::new(JsonFileStore::open(&path).await.unwrap());

        let tasks: Vec<_> = (0..200)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.set(&format!("key-{i}"), format!("value-{i}")).await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        drop(store);

        let reopened = JsonFileStore::open(&path).await.unwrap();
        for i in 0..200 {
            assert_eq!(
                reopened.get(&format!("key-{i}")).await.unwrap(),
                Some(format!("value-{i}")),
                "key-{i} missing after reopen"
            );
        }
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = TempDir::new().unwrap();
        let path = store_path(&dir);
        let store = JsonFileStore::open(&path).await.unwrap();

        store.set("key", "value".to_string()).await.unwrap();
        store.remove("key").await.unwrap();
        store.remove("key").await.unwrap();

        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.get("key").await.unwrap(), None);
    }
}
