//! FileStore integration tests — durability, atomic replacement, key handling

use tempfile::TempDir;

use mealplan_identity::store::{FileStore, KeyValueStore};
use mealplan_identity::IdentityError;

#[tokio::test]
async fn test_open_creates_directory() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("state").join("identity");

    let store = FileStore::open(&nested).await.unwrap();
    assert!(nested.is_dir());
    assert!(store.get("user").await.unwrap().is_none());
}

#[tokio::test]
async fn test_put_get_remove() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();

    store.put("user", r#"{"id":"1"}"#).await.unwrap();
    assert_eq!(store.get("user").await.unwrap().as_deref(), Some(r#"{"id":"1"}"#));

    store.put("user", r#"{"id":"2"}"#).await.unwrap();
    assert_eq!(store.get("user").await.unwrap().as_deref(), Some(r#"{"id":"2"}"#));

    store.remove("user").await.unwrap();
    assert!(store.get("user").await.unwrap().is_none());
    store.remove("user").await.unwrap();
}

#[tokio::test]
async fn test_write_visible_to_fresh_store() {
    let dir = TempDir::new().unwrap();
    FileStore::open(dir.path())
        .await
        .unwrap()
        .put("user", "persisted")
        .await
        .unwrap();

    let reopened = FileStore::open(dir.path()).await.unwrap();
    assert_eq!(reopened.get("user").await.unwrap().as_deref(), Some("persisted"));
}

#[tokio::test]
async fn test_no_temporary_files_left_behind() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();

    for i in 0..5 {
        store.put("user", &format!("v{i}")).await.unwrap();
    }

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["user.json".to_string()]);
}

#[tokio::test]
async fn test_rejects_path_like_keys() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::open(dir.path()).await.unwrap();

    let err = store.put("../escape", "x").await.unwrap_err();
    assert!(matches!(err, IdentityError::Config(_)));
    assert!(store.get("a/b").await.is_err());
}
