// ABOUTME: In-process configuration backend
// ABOUTME: HashMap-backed store used by tests and ephemeral runs

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::backend::ConfigBackend;
use crate::{StorageError, StorageResult};

type Entries = HashMap<(String, String), Value>;

#[derive(Debug, Default)]
pub struct MemoryConfigBackend {
    committed: Mutex<Entries>,
    pending: Mutex<Vec<(String, String, Value)>>,
}

impl MemoryConfigBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed keys across all namespaces
    pub fn len(&self) -> usize {
        self.committed().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn committed(&self) -> StorageResult<MutexGuard<'_, Entries>> {
        self.committed
            .lock()
            .map_err(|_| StorageError::Database("config map lock poisoned".to_string()))
    }

    fn pending(&self) -> StorageResult<MutexGuard<'_, Vec<(String, String, Value)>>> {
        self.pending
            .lock()
            .map_err(|_| StorageError::Database("pending writes lock poisoned".to_string()))
    }
}

#[async_trait]
impl ConfigBackend for MemoryConfigBackend {
    async fn get(&self, namespace: &str, key: &str) -> StorageResult<Option<Value>> {
        let entries = self.committed()?;
        Ok(entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    async fn set(&self, namespace: &str, key: &str, value: Value) -> StorageResult<()> {
        self.pending()?
            .push((namespace.to_string(), key.to_string(), value));
        Ok(())
    }

    async fn save(&self) -> StorageResult<()> {
        let staged = std::mem::take(&mut *self.pending()?);
        let mut entries = self.committed()?;
        for (namespace, key, value) in staged {
            debug!("Committing {}:{}", namespace, key);
            entries.insert((namespace, key), value);
        }
        Ok(())
    }
}
