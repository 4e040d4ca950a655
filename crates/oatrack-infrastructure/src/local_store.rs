//! Local key-value store adapter.
//!
//! All records live in one keyed blob: a single JSON array file. The blob is
//! read once when the store opens and rewritten in full on every mutation,
//! after which the new contents are pushed to subscribers.
//!
//! File location: `{data_dir}/answers.json`

use async_trait::async_trait;
use oatrack_core::error::{OatrackError, Result};
use oatrack_core::record::{NewRecord, Record, RecordPatch};
use oatrack_core::store::{SnapshotPublisher, StoreAdapter, StoreKind, Subscription};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::storage::AtomicJsonFile;

/// File-backed store holding every record in one JSON blob.
pub struct LocalStore {
    file: Arc<AtomicJsonFile<Vec<Record>>>,
    /// Held for the whole read-modify-write so snapshots follow write order.
    write_lock: Mutex<()>,
    publisher: SnapshotPublisher,
}

impl LocalStore {
    /// Opens the store backed by `path`, reading the blob if it exists.
    ///
    /// # Errors
    ///
    /// Returns `OatrackError::Serialization` if the file exists but is not a
    /// JSON array of records.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let file = Arc::new(AtomicJsonFile::<Vec<Record>>::new(path.into()));

        let loader = file.clone();
        let records = tokio::task::spawn_blocking(move || loader.load())
            .await
            .map_err(|e| OatrackError::internal(format!("Failed to join task: {}", e)))??
            .unwrap_or_default();

        tracing::info!(
            "[LocalStore] Opened {:?} with {} records",
            file.path(),
            records.len()
        );

        Ok(Self {
            file,
            write_lock: Mutex::new(()),
            publisher: SnapshotPublisher::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Runs `mutate` against the stored blob and publishes the result.
    ///
    /// Nothing is written or published when `mutate` fails.
    async fn write<R, F>(&self, mutate: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&mut Vec<Record>) -> Result<R> + Send + 'static,
    {
        let _guard = self.write_lock.lock().await;

        let file = self.file.clone();
        let (result, records) = tokio::task::spawn_blocking(move || {
            file.update(Vec::new(), |records| {
                let result = mutate(records)?;
                Ok::<_, OatrackError>((result, records.clone()))
            })
        })
        .await
        .map_err(|e| OatrackError::internal(format!("Failed to join task: {}", e)))?
        .map_err(|e| match e {
            OatrackError::Persistence(_) => e,
            other => OatrackError::persistence(format!("Failed to write local store: {}", other)),
        })?;

        self.publisher.publish(records);
        Ok(result)
    }
}

#[async_trait]
impl StoreAdapter for LocalStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Local
    }

    async fn ready(&self) -> Result<()> {
        // The blob was read in `open`.
        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription> {
        Ok(self.publisher.subscribe())
    }

    async fn list(&self) -> Result<Vec<Record>> {
        Ok(self.publisher.current().as_ref().clone())
    }

    async fn add(&self, record: NewRecord) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        let stored = Record::from_draft(record, id.clone(), created_at);

        self.write(move |records| {
            records.push(stored);
            Ok(())
        })
        .await?;

        tracing::debug!("[LocalStore] Added record {}", id);
        Ok(id)
    }

    async fn update(&self, id: &str, patch: RecordPatch) -> Result<()> {
        let target = id.to_string();
        self.write(move |records| {
            let record = records
                .iter_mut()
                .find(|r| r.id == target)
                .ok_or_else(|| OatrackError::persistence(format!("unknown record '{}'", target)))?;
            patch.apply_to(record);
            Ok(())
        })
        .await?;

        tracing::debug!("[LocalStore] Updated record {}", id);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let target = id.to_string();
        self.write(move |records| {
            let before = records.len();
            records.retain(|r| r.id != target);
            if records.len() == before {
                return Err(OatrackError::persistence(format!(
                    "unknown record '{}'",
                    target
                )));
            }
            Ok(())
        })
        .await?;

        tracing::debug!("[LocalStore] Removed record {}", id);
        Ok(())
    }
}
