// ABOUTME: Configuration constants and filesystem locations for inactive-user
// ABOUTME: Shared by the storage layer and the CLI

pub mod constants;

use std::env;
use std::path::PathBuf;

/// Get the path to the data directory (~/.inactive_user)
pub fn data_dir() -> Option<PathBuf> {
    // HOME first so tests can redirect it
    match env::var(constants::HOME) {
        Ok(home) if !home.is_empty() => Some(PathBuf::from(home).join(".inactive_user")),
        _ => dirs::home_dir().map(|home| home.join(".inactive_user")),
    }
}

/// Get the default path of the settings database (~/.inactive_user/settings.db)
pub fn default_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("settings.db"))
}
