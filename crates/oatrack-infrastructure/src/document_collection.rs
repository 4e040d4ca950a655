//! In-process realtime document collection.
//!
//! Stands in for a hosted document store: the handle is unusable until the
//! connection comes up, every accepted write is followed by a full snapshot
//! push to all listeners, and ids are generated by the collection.

use async_trait::async_trait;
use oatrack_core::error::{OatrackError, Result};
use oatrack_core::record::{NewRecord, Record, RecordPatch};
use oatrack_core::store::{SnapshotPublisher, StoreAdapter, StoreKind, Subscription};
use tokio::sync::{Mutex, watch};
use uuid::Uuid;

/// Realtime collection of answer documents.
///
/// ```ignore
/// let collection = Arc::new(DocumentCollection::new("answers"));
/// collection.connect();
/// let id = collection.add(NewRecord::new("Acme", "2024-01-15", "Q", "A")).await?;
/// ```
pub struct DocumentCollection {
    name: String,
    /// Serializes writes so snapshots go out in write order.
    documents: Mutex<Vec<Record>>,
    publisher: SnapshotPublisher,
    connected: watch::Sender<bool>,
}

impl DocumentCollection {
    /// Creates an empty, not yet connected collection.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_documents(name, Vec::new())
    }

    /// Creates a not yet connected collection seeded with `documents`.
    ///
    /// Documents without an id get one generated.
    pub fn with_documents(name: impl Into<String>, documents: Vec<Record>) -> Self {
        let documents: Vec<Record> = documents
            .into_iter()
            .map(|mut doc| {
                if doc.id.is_empty() {
                    doc.id = Self::generate_id();
                }
                doc
            })
            .collect();

        let (connected, _) = watch::channel(false);

        Self {
            name: name.into(),
            publisher: SnapshotPublisher::new(documents.clone()),
            documents: Mutex::new(documents),
            connected,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Marks the backend handle as usable and wakes everyone waiting in `ready`.
    pub fn connect(&self) {
        tracing::info!("[DocumentCollection] '{}' connected", self.name);
        self.connected.send_replace(true);
    }

    pub fn is_connected(&self) -> bool {
        *self.connected.borrow()
    }

    fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(OatrackError::persistence(format!(
                "collection '{}' is not connected",
                self.name
            )))
        }
    }

    fn unknown_id(&self, id: &str) -> OatrackError {
        OatrackError::persistence(format!(
            "no document '{}' in collection '{}'",
            id, self.name
        ))
    }
}

#[async_trait]
impl StoreAdapter for DocumentCollection {
    fn kind(&self) -> StoreKind {
        StoreKind::Document
    }

    async fn ready(&self) -> Result<()> {
        let mut receiver = self.connected.subscribe();
        receiver.wait_for(|connected| *connected).await.map_err(|_| {
            OatrackError::backend_unavailable(format!("collection '{}' was dropped", self.name))
        })?;
        Ok(())
    }

    async fn subscribe(&self) -> Result<Subscription> {
        self.ensure_connected()
            .map_err(|e| OatrackError::backend_unavailable(e.to_string()))?;
        tracing::debug!(
            "[DocumentCollection] New listener on '{}' ({} already attached)",
            self.name,
            self.publisher.subscriber_count()
        );
        Ok(self.publisher.subscribe())
    }

    async fn list(&self) -> Result<Vec<Record>> {
        Ok(self.documents.lock().await.clone())
    }

    async fn add(&self, record: NewRecord) -> Result<String> {
        self.ensure_connected()?;

        let id = Self::generate_id();
        let created_at = chrono::Utc::now().to_rfc3339();

        let mut documents = self.documents.lock().await;
        documents.push(Record::from_draft(record, id.clone(), created_at));
        self.publisher.publish(documents.clone());

        tracing::debug!("[DocumentCollection] Added document {} to '{}'", id, self.name);
        Ok(id)
    }

    async fn update(&self, id: &str, patch: RecordPatch) -> Result<()> {
        self.ensure_connected()?;

        let mut documents = self.documents.lock().await;
        let document = documents
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| self.unknown_id(id))?;
        patch.apply_to(document);
        self.publisher.publish(documents.clone());

        tracing::debug!("[DocumentCollection] Updated document {} in '{}'", id, self.name);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        self.ensure_connected()?;

        let mut documents = self.documents.lock().await;
        let position = documents
            .iter()
            .position(|doc| doc.id == id)
            .ok_or_else(|| self.unknown_id(id))?;
        documents.remove(position);
        self.publisher.publish(documents.clone());

        tracing::debug!("[DocumentCollection] Removed document {} from '{}'", id, self.name);
        Ok(())
    }
}
