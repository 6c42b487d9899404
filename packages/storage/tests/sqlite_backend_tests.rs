// ABOUTME: Integration tests for the SQLite configuration backend
// ABOUTME: Staging semantics, upserts, JSON round trips and on-disk persistence

use inactive_user_storage::{ConfigBackend, SqliteConfigBackend};
use serde_json::json;

#[tokio::test]
async fn test_get_missing_key_returns_none() {
    let backend = SqliteConfigBackend::in_memory().await.unwrap();

    let value = backend.get("inactive_user.settings", "missing").await.unwrap();
    assert!(value.is_none());
}

#[tokio::test]
async fn test_staged_write_not_visible_before_save() {
    let backend = SqliteConfigBackend::in_memory().await.unwrap();

    backend
        .set("inactive_user.settings", "inactive_user_auto_block", json!(604800))
        .await
        .unwrap();
    assert!(backend
        .get("inactive_user.settings", "inactive_user_auto_block")
        .await
        .unwrap()
        .is_none());

    backend.save().await.unwrap();
    assert_eq!(
        backend
            .get("inactive_user.settings", "inactive_user_auto_block")
            .await
            .unwrap(),
        Some(json!(604800))
    );
}

#[tokio::test]
async fn test_save_overwrites_existing_value() {
    let backend = SqliteConfigBackend::in_memory().await.unwrap();

    backend.set("ns", "flag", json!(false)).await.unwrap();
    backend.save().await.unwrap();
    backend.set("ns", "flag", json!(true)).await.unwrap();
    backend.save().await.unwrap();

    assert_eq!(backend.get("ns", "flag").await.unwrap(), Some(json!(true)));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM config_store")
        .fetch_one(backend.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn test_structured_values_round_trip() {
    let backend = SqliteConfigBackend::in_memory().await.unwrap();
    let emails = json!(["admin@example.com", "ops@example.com"]);
    let text = json!("Hello %username,\n\n  it's been a while.");

    backend.set("ns", "emails", emails.clone()).await.unwrap();
    backend.set("ns", "text", text.clone()).await.unwrap();
    backend.save().await.unwrap();

    assert_eq!(backend.get("ns", "emails").await.unwrap(), Some(emails));
    assert_eq!(backend.get("ns", "text").await.unwrap(), Some(text));
}

#[tokio::test]
async fn test_save_without_pending_writes_is_noop() {
    let backend = SqliteConfigBackend::in_memory().await.unwrap();
    assert!(backend.save().await.is_ok());
}

#[tokio::test]
async fn test_values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.db");

    {
        let backend = SqliteConfigBackend::open(&path).await.unwrap();
        backend.set("ns", "key", json!("kept")).await.unwrap();
        backend.save().await.unwrap();
        backend.pool().close().await;
    }

    let reopened = SqliteConfigBackend::open(&path).await.unwrap();
    assert_eq!(reopened.get("ns", "key").await.unwrap(), Some(json!("kept")));
}
