// ABOUTME: Runtime configuration read from the environment
// ABOUTME: Database location, site identity for mail variables, and log filter

use std::env;
use std::path::PathBuf;

use inactive_user_config::constants::{
    DEFAULT_LOG_FILTER, DEFAULT_SITE_NAME, DEFAULT_SITE_URL, INACTIVE_USER_DB_PATH,
    INACTIVE_USER_LOG, INACTIVE_USER_SITE_MAIL, INACTIVE_USER_SITE_NAME, INACTIVE_USER_SITE_URL,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unable to determine a home directory; set {}", INACTIVE_USER_DB_PATH)]
    NoDataDir,
    #[error("Invalid site URL: {0}. Must start with http:// or https://")]
    InvalidSiteUrl(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: PathBuf,
    pub site_name: String,
    pub site_url: String,
    pub site_mail: Option<String>,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let db_path = match non_empty_var(INACTIVE_USER_DB_PATH) {
            Some(path) => PathBuf::from(path),
            None => inactive_user_config::default_db_path().ok_or(ConfigError::NoDataDir)?,
        };

        let site_name =
            non_empty_var(INACTIVE_USER_SITE_NAME).unwrap_or_else(|| DEFAULT_SITE_NAME.to_string());

        let site_url =
            non_empty_var(INACTIVE_USER_SITE_URL).unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
        if !site_url.starts_with("http://") && !site_url.starts_with("https://") {
            return Err(ConfigError::InvalidSiteUrl(site_url));
        }

        let site_mail = non_empty_var(INACTIVE_USER_SITE_MAIL);

        let log_filter =
            non_empty_var(INACTIVE_USER_LOG).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Config {
            db_path,
            site_name,
            site_url,
            site_mail,
            log_filter,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_env() {
        for name in [
            INACTIVE_USER_DB_PATH,
            INACTIVE_USER_SITE_NAME,
            INACTIVE_USER_SITE_URL,
            INACTIVE_USER_SITE_MAIL,
            INACTIVE_USER_LOG,
        ] {
            env::remove_var(name);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let previous_home = env::var_os("HOME");
        env::set_var("HOME", "/tmp/inactive-user-home");

        let config = Config::from_env();

        match previous_home {
            Some(home) => env::set_var("HOME", home),
            None => env::remove_var("HOME"),
        }

        let config = config.unwrap();

        assert_eq!(
            config.db_path,
            PathBuf::from("/tmp/inactive-user-home/.inactive_user/settings.db")
        );
        assert_eq!(config.site_name, "Site");
        assert_eq!(config.site_url, "http://localhost");
        assert_eq!(config.site_mail, None);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear_env();
        env::set_var(INACTIVE_USER_DB_PATH, "/var/lib/inactive_user/policy.db");
        env::set_var(INACTIVE_USER_SITE_NAME, "Example");
        env::set_var(INACTIVE_USER_SITE_URL, "https://example.com");
        env::set_var(INACTIVE_USER_SITE_MAIL, " admin@example.com ");
        env::set_var(INACTIVE_USER_LOG, "debug");

        let config = Config::from_env().unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/inactive_user/policy.db"));
        assert_eq!(config.site_name, "Example");
        assert_eq!(config.site_url, "https://example.com");
        assert_eq!(config.site_mail.as_deref(), Some("admin@example.com"));
        assert_eq!(config.log_filter, "debug");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_rejects_non_http_site_url() {
        clear_env();
        env::set_var(INACTIVE_USER_SITE_URL, "ftp://example.com");

        let result = Config::from_env();
        assert!(matches!(result, Err(ConfigError::InvalidSiteUrl(_))));

        clear_env();
    }
}
