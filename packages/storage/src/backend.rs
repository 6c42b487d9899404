// ABOUTME: Configuration backend trait
// ABOUTME: get / set / save contract shared by every persistence implementation

use async_trait::async_trait;
use serde_json::Value;

use crate::StorageResult;

/// A namespaced key-value configuration store.
///
/// `set` only stages a value; nothing is durable until `save` commits every
/// staged write. Reads always see committed state, never staged values.
#[async_trait]
pub trait ConfigBackend: Send + Sync {
    /// Read the committed value of `key` in `namespace`
    async fn get(&self, namespace: &str, key: &str) -> StorageResult<Option<Value>>;

    /// Stage a write of `key` in `namespace`
    async fn set(&self, namespace: &str, key: &str, value: Value) -> StorageResult<()>;

    /// Commit all staged writes
    async fn save(&self) -> StorageResult<()>;
}
