use std::sync::Arc;

use oatrack_core::record::{NewRecord, RecordPatch};
use oatrack_core::store::{StoreAdapter, StoreKind};
use oatrack_infrastructure::{DocumentCollection, LocalStore, StaticFileStore};
use tempfile::TempDir;

async fn exercise_writable(store: Arc<dyn StoreAdapter>) {
    store.ready().await.expect("store should be ready");
    let mut subscription = store.subscribe().await.expect("subscribe");
    let initial = subscription.next().await.expect("initial snapshot");
    assert!(initial.is_empty());

    let first = store
        .add(NewRecord::new("Acme", "2024-01-15", "Reverse a list", "Two pointers"))
        .await
        .expect("add first");
    let second = store
        .add(NewRecord::new("Globex", "2024-01-16", "Docker vs VM", "Shared kernel"))
        .await
        .expect("add second");
    assert_ne!(first, second, "ids must be unique");

    // Two writes may coalesce into one snapshot; the newest must hold both.
    let mut latest = subscription.next().await.expect("snapshot after add");
    while latest.len() < 2 {
        latest = subscription.next().await.expect("snapshot after add");
    }
    assert_eq!(latest[0].id, first);
    assert_eq!(latest[1].id, second);

    store
        .update(&first, RecordPatch::favorite(true))
        .await
        .expect("update");
    store.remove(&second).await.expect("remove");

    let records = store.list().await.expect("list");
    assert_eq!(records.len(), 1);
    assert!(records[0].favorite);

    assert!(store.remove(&second).await.unwrap_err().is_persistence());
}

#[tokio::test]
async fn test_document_collection_contract() {
    let collection = Arc::new(DocumentCollection::new("answers"));
    collection.connect();
    assert_eq!(collection.kind(), StoreKind::Document);
    exercise_writable(collection).await;
}

#[tokio::test]
async fn test_local_store_contract() {
    let temp_dir = TempDir::new().unwrap();
    let store = Arc::new(
        LocalStore::open(temp_dir.path().join("answers.json"))
            .await
            .unwrap(),
    );
    assert_eq!(store.kind(), StoreKind::Local);
    exercise_writable(store).await;
}

#[tokio::test]
async fn test_local_store_export_feeds_static_store() {
    let temp_dir = TempDir::new().unwrap();
    let local = LocalStore::open(temp_dir.path().join("answers.json"))
        .await
        .unwrap();
    local
        .add(NewRecord::new("Acme", "2024-01-15", "Q", "A"))
        .await
        .unwrap();

    let exported = oatrack_infrastructure::write_export(
        &temp_dir.path().join("exports"),
        &local.list().await.unwrap(),
    )
    .await
    .unwrap();

    let static_store = StaticFileStore::open(exported).await.unwrap();
    let records = static_store.list().await.unwrap();
    assert_eq!(records, local.list().await.unwrap());
}
