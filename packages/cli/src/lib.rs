// ABOUTME: Library side of the inactive-user CLI
// ABOUTME: Environment configuration, store construction and tracing setup

pub mod config;

use std::sync::Arc;

use inactive_user_settings::PolicyConfigStore;
use inactive_user_storage::{SqliteConfigBackend, StorageError};
use tracing::debug;

pub use config::{Config, ConfigError};

/// Install the global tracing subscriber. `RUST_LOG` wins over the configured filter.
pub fn init_tracing(config: &Config) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Open the configured database and wrap it in a policy store
pub async fn open_store(config: &Config) -> Result<PolicyConfigStore, StorageError> {
    debug!("Using settings database {}", config.db_path.display());
    let backend = SqliteConfigBackend::open(&config.db_path).await?;
    Ok(PolicyConfigStore::new(Arc::new(backend)).with_site_mail(config.site_mail.clone()))
}
