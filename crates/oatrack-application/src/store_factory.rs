//! Builds the configured store adapter.

use oatrack_core::config::TrackerConfig;
use oatrack_core::error::{OatrackError, Result};
use oatrack_core::store::{StoreAdapter, StoreKind};
use oatrack_infrastructure::paths::LOCAL_STORE_KEY;
use oatrack_infrastructure::{DocumentCollection, LocalStore, OatrackPaths, StaticFileStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Opens the backend named by `config.store.backend`.
///
/// The records file defaults to the local store file under `paths`. For the
/// document backend that file only seeds the collection, and the collection
/// is connected before it is returned.
///
/// # Errors
///
/// Fails if the records file cannot be read or parsed. A missing file is an
/// error only for the static backend.
pub async fn open_store(
    config: &TrackerConfig,
    paths: &OatrackPaths,
) -> Result<Arc<dyn StoreAdapter>> {
    let path = records_path(config, paths)?;
    tracing::debug!(
        "[StoreFactory] Opening {} store at {:?}",
        config.store.backend,
        path
    );

    let store: Arc<dyn StoreAdapter> = match config.store.backend {
        StoreKind::Local => Arc::new(LocalStore::open(path).await?),
        StoreKind::Static => Arc::new(StaticFileStore::open(path).await?),
        StoreKind::Document => {
            let seed_exists = tokio::fs::try_exists(&path).await.map_err(|e| {
                OatrackError::io(format!("Failed to inspect {:?}: {}", path, e))
            })?;
            let seed = if seed_exists {
                StaticFileStore::open(&path).await?.list().await?
            } else {
                Vec::new()
            };
            let collection = DocumentCollection::with_documents(LOCAL_STORE_KEY, seed);
            collection.connect();
            Arc::new(collection)
        }
    };

    Ok(store)
}

fn records_path(config: &TrackerConfig, paths: &OatrackPaths) -> Result<PathBuf> {
    match &config.store.path {
        Some(path) => Ok(path.clone()),
        None => Ok(paths.local_store_file()?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oatrack_core::record::NewRecord;
    use tempfile::TempDir;

    fn config(backend: StoreKind) -> TrackerConfig {
        let mut config = TrackerConfig::default();
        config.store.backend = backend;
        config
    }

    #[tokio::test]
    async fn test_local_backend_uses_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OatrackPaths::new(Some(temp_dir.path()));

        let store = open_store(&config(StoreKind::Local), &paths).await.unwrap();
        assert_eq!(store.kind(), StoreKind::Local);

        store
            .add(NewRecord::new("Acme", "2024-01-15", "Q", "A"))
            .await
            .unwrap();
        assert!(paths.local_store_file().unwrap().exists());
    }

    #[tokio::test]
    async fn test_static_backend_requires_file() {
        let temp_dir = TempDir::new().unwrap();
        let paths = OatrackPaths::new(Some(temp_dir.path()));

        assert!(open_store(&config(StoreKind::Static), &paths).await.is_err());
    }

    #[tokio::test]
    async fn test_document_backend_is_seeded_and_connected() {
        let temp_dir = TempDir::new().unwrap();
        let seed = temp_dir.path().join("seed.json");
        std::fs::write(
            &seed,
            r#"[{"company":"Acme","date":"2024-01-15","question":"Q","answer":"A"}]"#,
        )
        .unwrap();

        let mut config = config(StoreKind::Document);
        config.store.path = Some(seed);
        let store = open_store(&config, &OatrackPaths::new(Some(temp_dir.path())))
            .await
            .unwrap();

        store.ready().await.unwrap();
        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].id.is_empty());
    }

    #[tokio::test]
    async fn test_document_backend_seed_ids_stay_unique() {
        let temp_dir = TempDir::new().unwrap();
        let seed = temp_dir.path().join("seed.json");
        std::fs::write(
            &seed,
            r#"[
  {"company":"Acme","date":"2024-01-15","question":"Q1","answer":"A1"},
  {"id":"1","company":"Globex","date":"2024-01-16","question":"Q2","answer":"A2"}
]"#,
        )
        .unwrap();

        let mut config = config(StoreKind::Document);
        config.store.path = Some(seed);
        let store = open_store(&config, &OatrackPaths::new(Some(temp_dir.path())))
            .await
            .unwrap();

        store.remove("1").await.unwrap();
        let records = store.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].company, "Acme");
    }

    #[tokio::test]
    async fn test_document_backend_without_seed_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = open_store(
            &config(StoreKind::Document),
            &OatrackPaths::new(Some(temp_dir.path())),
        )
        .await
        .unwrap();

        assert!(store.list().await.unwrap().is_empty());
    }
}
