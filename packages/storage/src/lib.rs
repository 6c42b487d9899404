// ABOUTME: Key-value configuration persistence for inactive-user
// ABOUTME: Backend trait plus SQLite and in-memory implementations

pub mod backend;
pub mod memory;
pub mod sqlite;

use thiserror::Error;

pub use backend::ConfigBackend;
pub use memory::MemoryConfigBackend;
pub use sqlite::SqliteConfigBackend;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;
