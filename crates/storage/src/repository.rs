use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Namespace holding per-ticket progress entries.
pub const PROGRESS_NAMESPACE: &str = "quiz_progress";

/// Namespace holding user preferences.
pub const SETTINGS_NAMESPACE: &str = "quiz_settings";

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Flat string key-value store, one instance per namespace.
///
/// Values are kept as text; the typed helpers encode integers in decimal and
/// booleans as `true`/`false`.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be queried.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write all entries at once, overwriting existing keys.
    ///
    /// Either every entry is written or none is.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entries cannot be stored.
    async fn put_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError>;

    /// Write a single entry.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn put(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.put_all(&[(key, value)]).await
    }

    /// Read an integer value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored text is not an integer.
    async fn get_i64(&self, key: &str) -> Result<Option<i64>, StorageError> {
        self.get(key)
            .await?
            .map(|raw| {
                raw.trim()
                    .parse::<i64>()
                    .map_err(|err| StorageError::Serialization(format!("{key}: {err}")))
            })
            .transpose()
    }

    /// Write an integer value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn put_i64(&self, key: &str, value: i64) -> Result<(), StorageError> {
        self.put(key, value.to_string()).await
    }

    /// Read a boolean value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Serialization` if the stored text is not a boolean.
    async fn get_bool(&self, key: &str) -> Result<Option<bool>, StorageError> {
        self.get(key)
            .await?
            .map(|raw| match raw.trim() {
                "true" => Ok(true),
                "false" => Ok(false),
                other => Err(StorageError::Serialization(format!(
                    "{key}: expected boolean, found {other:?}"
                ))),
            })
            .transpose()
    }

    /// Write a boolean value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be stored.
    async fn put_bool(&self, key: &str, value: bool) -> Result<(), StorageError> {
        self.put(key, value.to_string()).await
    }
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of keys currently stored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len())
    }

    /// Returns true when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, StorageError> {
        self.len().map(|len| len == 0)
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put_all(&self, entries: &[(&str, String)]) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        for (key, value) in entries {
            guard.insert((*key).to_string(), value.clone());
        }
        Ok(())
    }
}

/// Aggregates the namespaced stores behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: Arc<dyn KeyValueStore>,
    pub settings: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let progress: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        let settings: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
        Self { progress, settings }
    }
}
