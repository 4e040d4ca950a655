//! Read-only store over a static JSON file.
//!
//! The file is fetched once at open. Browsing, filtering and export work;
//! every write is rejected.

use async_trait::async_trait;
use oatrack_core::error::{OatrackError, Result};
use oatrack_core::record::{NewRecord, Record, RecordPatch};
use oatrack_core::store::{SnapshotPublisher, StoreAdapter, StoreKind, Subscription};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

pub struct StaticFileStore {
    path: PathBuf,
    publisher: SnapshotPublisher,
}

impl StaticFileStore {
    /// Reads `path` as a JSON array of records.
    ///
    /// Records without an id are numbered by their 1-based position so the
    /// working set still has unique identities.
    ///
    /// # Errors
    ///
    /// - `OatrackError::Io` if the file cannot be read
    /// - `OatrackError::Serialization` if it is not a JSON array of records
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| OatrackError::io(format!("Failed to read {:?}: {}", path, e)))?;

        let mut records: Vec<Record> = serde_json::from_str(&content)?;
        assign_missing_ids(&mut records);

        tracing::info!(
            "[StaticFileStore] Loaded {} records from {:?}",
            records.len(),
            path
        );

        Ok(Self {
            path,
            publisher: SnapshotPublisher::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_only(&self) -> OatrackError {
        OatrackError::persistence(format!("{:?} is a read-only static file", self.path))
    }
}

/// Gives every record without an id (or with a repeated one) a unique id.
///
/// The 1-based position is used unless another record already claims it, in
/// which case a uuid is generated.
fn assign_missing_ids(records: &mut [Record]) {
    let mut taken: HashSet<String> = records
        .iter()
        .filter(|record| !record.id.is_empty())
        .map(|record| record.id.clone())
        .collect();
    let mut seen = HashSet::new();

    for (index, record) in records.iter_mut().enumerate() {
        if !record.id.is_empty() && seen.insert(record.id.clone()) {
            continue;
        }

        let position = (index + 1).to_string();
        let id = if taken.contains(&position) {
            Uuid::new_v4().simple().to_string()
        } else {
            position
        };

        if !record.id.is_empty() {
            tracing::warn!(
                "[StaticFileStore] Duplicate id '{}' renamed to '{}'",
                record.id,
                id
            );
        }
        taken.insert(id.clone());
        seen.insert(id.clone());
        record.id = id;
    }
}

#[async_trait]
impl StoreAdapter for StaticFileStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Static
    }

    async fn ready(&self) -> Result<()> {
        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription> {
        Ok(self.publisher.subscribe())
    }

    async fn list(&self) -> Result<Vec<Record>> {
        Ok(self.publisher.current().as_ref().clone())
    }

    async fn add(&self, _record: NewRecord) -> Result<String> {
        Err(self.read_only())
    }

    async fn update(&self, _id: &str, _patch: RecordPatch) -> Result<()> {
        Err(self.read_only())
    }

    async fn remove(&self, _id: &str) -> Result<()> {
        Err(self.read_only())
    }
}
