// ABOUTME: SQLite configuration backend
// ABOUTME: Persists namespaced JSON values in the config_store table via sqlx

use std::path::Path;
use std::str::FromStr;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::backend::ConfigBackend;
use crate::{StorageError, StorageResult};

pub struct SqliteConfigBackend {
    pool: SqlitePool,
    pending: Mutex<Vec<(String, String, Value)>>,
}

impl SqliteConfigBackend {
    /// Wrap an existing pool. Migrations are expected to have run already.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Open (or create) the database file at `path` and run migrations
    pub async fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Self::migrate(&pool).await?;
        info!("Opened configuration store at {}", path.display());

        Ok(Self::new(pool))
    }

    /// Open a private in-memory database and run migrations
    pub async fn in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str(":memory:")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Self::migrate(&pool).await?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(pool: &SqlitePool) -> StorageResult<()> {
        sqlx::migrate!("./migrations").run(pool).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn take_pending(&self) -> StorageResult<Vec<(String, String, Value)>> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|_| StorageError::Database("pending writes lock poisoned".to_string()))?;
        Ok(std::mem::take(&mut *pending))
    }
}

#[async_trait]
impl ConfigBackend for SqliteConfigBackend {
    async fn get(&self, namespace: &str, key: &str) -> StorageResult<Option<Value>> {
        let row = sqlx::query("SELECT value FROM config_store WHERE namespace = ? AND key = ?")
            .bind(namespace)
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        match row {
            Some(row) => {
                let raw: String = row.try_get("value").map_err(StorageError::Sqlx)?;
                Ok(Some(serde_json::from_str(&raw)?))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, namespace: &str, key: &str, value: Value) -> StorageResult<()> {
        let mut pending = self
            .pending
            .lock()
            .map_err(|_| StorageError::Database("pending writes lock poisoned".to_string()))?;
        pending.push((namespace.to_string(), key.to_string(), value));
        Ok(())
    }

    async fn save(&self) -> StorageResult<()> {
        let staged = self.take_pending()?;
        if staged.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        for (namespace, key, value) in &staged {
            debug!("Writing {}:{}", namespace, key);
            sqlx::query(
                r#"
                INSERT INTO config_store (namespace, key, value)
                VALUES (?, ?, ?)
                ON CONFLICT(namespace, key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = datetime('now', 'utc')
                "#,
            )
            .bind(namespace)
            .bind(key)
            .bind(serde_json::to_string(value)?)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        Ok(())
    }
}
