// ABOUTME: Integration tests for building the policy store from configuration
// ABOUTME: Database creation on first use and persistence across reopen

use inactive_user_cli::{open_store, Config};
use inactive_user_settings::PolicyKey;
use pretty_assertions::assert_eq;

fn config_in(dir: &std::path::Path) -> Config {
    Config {
        db_path: dir.join("data").join("settings.db"),
        site_name: "Example".to_string(),
        site_url: "https://example.com".to_string(),
        site_mail: Some("webmaster@example.com".to_string()),
        log_filter: "info".to_string(),
    }
}

#[tokio::test]
async fn test_open_store_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let store = open_store(&config).await.unwrap();

    assert!(config.db_path.exists());
    let policy = store.load_policy().await;
    assert_eq!(policy.admin_email, vec!["webmaster@example.com"]);
}

#[tokio::test]
async fn test_installed_defaults_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let store = open_store(&config).await.unwrap();
    assert_eq!(
        store.install_defaults().await.unwrap(),
        PolicyKey::ALL.len()
    );
    drop(store);

    let mut without_site_mail = config.clone();
    without_site_mail.site_mail = None;
    let reopened = open_store(&without_site_mail).await.unwrap();

    // the stored list wins over the (now absent) site mail default
    assert_eq!(
        reopened.load_policy().await.admin_email,
        vec!["webmaster@example.com"]
    );
    assert_eq!(reopened.install_defaults().await.unwrap(), 0);
}
