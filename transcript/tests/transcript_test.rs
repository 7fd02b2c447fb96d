//! Integration tests for the transcript store: persistence round-trips and archive indexing.

use tempfile::TempDir;
use transcript::{Entry, TranscriptStore, AUTO_INDEX};

fn store_in(dir: &TempDir) -> TranscriptStore {
    TranscriptStore::new(dir.path().join("history.json"), None)
}

/// **Test: A saved transcript loads back as the identical ordered sequence.**
#[tokio::test]
async fn test_save_then_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    let original = vec![Entry::system("p")];

    store.save(&original).await.unwrap();

    assert_eq!(store.load().await.unwrap(), original);
}

/// **Test: Appending a user then an assistant entry keeps the originals and both appends in order.**
#[tokio::test]
async fn test_append_preserves_order() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store.save(&[Entry::system("p")]).await.unwrap();

    store.append(&[Entry::user("question")]).await.unwrap();
    store.append(&[Entry::assistant("answer")]).await.unwrap();

    let reloaded = TranscriptStore::new(store.path(), None).load().await.unwrap();
    assert_eq!(
        reloaded,
        vec![
            Entry::system("p"),
            Entry::user("question"),
            Entry::assistant("answer"),
        ]
    );
}

/// **Test: Auto index picks 1, then 2, and auto load restores the highest archive.**
#[tokio::test]
async fn test_auto_archive_indexing() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    store.save(&[Entry::user("first")]).await.unwrap();
    assert_eq!(store.save_archive(AUTO_INDEX).await.unwrap(), 1);

    store.save(&[Entry::user("second")]).await.unwrap();
    assert_eq!(store.save_archive(AUTO_INDEX).await.unwrap(), 2);

    store.save(&[Entry::user("scratch")]).await.unwrap();
    assert_eq!(store.load_archive(AUTO_INDEX).await.unwrap(), 2);
    assert_eq!(store.load().await.unwrap(), vec![Entry::user("second")]);

    assert_eq!(store.load_archive(1).await.unwrap(), 1);
    assert_eq!(store.load().await.unwrap(), vec![Entry::user("first")]);
}

/// **Test: Auto save continues after the highest index even when lower slots are free.**
#[tokio::test]
async fn test_auto_archive_after_explicit_index() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);

    assert_eq!(store.save_archive(40).await.unwrap(), 40);
    assert_eq!(store.save_archive(AUTO_INDEX).await.unwrap(), 41);
    assert_eq!(store.archive_indices().await.unwrap(), vec![40, 41]);
}

/// **Test: The on-disk format is a JSON array of {role, content} objects.**
#[tokio::test]
async fn test_file_format() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    store
        .save(&[Entry::system("p"), Entry::user("u")])
        .await
        .unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([
            {"role": "system", "content": "p"},
            {"role": "user", "content": "u"}
        ])
    );
}
