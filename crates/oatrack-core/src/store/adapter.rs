//! Store adapter trait.
//!
//! Defines the capability surface every record backend exposes to the sync
//! controller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::subscription::Subscription;
use crate::error::Result;
use crate::record::{NewRecord, Record, RecordPatch};

/// The kind of backend behind a `StoreAdapter`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoreKind {
    /// Realtime document collection (hosted document store).
    Document,
    /// Single keyed blob in local key-value storage.
    #[default]
    Local,
    /// Read-only JSON file fetched once.
    Static,
}

/// An abstract record backend.
///
/// Implementations push a full snapshot of the collection after every change
/// they accept. Callers never patch their own copy of the records: the next
/// snapshot is the only source of truth.
///
/// # Implementation Notes
///
/// - `add` assigns `id` and `created_at`.
/// - `update` and `remove` fail with `OatrackError::Persistence` for unknown ids.
/// - Every rejected call leaves the collection untouched and emits no snapshot.
#[async_trait]
pub trait StoreAdapter: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> StoreKind;

    /// Resolves once the backend handle is usable.
    ///
    /// Never resolves for a backend that never comes up; callers bound the
    /// wait with their own timeout.
    async fn ready(&self) -> Result<()>;

    /// Opens the push channel of full snapshots.
    ///
    /// The first `Subscription::next` yields the current contents.
    async fn subscribe(&self) -> Result<Subscription>;

    /// Lists the current contents in collection order.
    async fn list(&self) -> Result<Vec<Record>>;

    /// Persists a new record and returns its assigned id.
    async fn add(&self, record: NewRecord) -> Result<String>;

    /// Applies a patch to the record with the given id.
    async fn update(&self, id: &str, patch: RecordPatch) -> Result<()>;

    /// Removes the record with the given id.
    async fn remove(&self, id: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_store_kind_round_trips_through_str() {
        assert_eq!(StoreKind::Document.to_string(), "document");
        assert_eq!(StoreKind::from_str("static").unwrap(), StoreKind::Static);
        assert!(StoreKind::from_str("firebase").is_err());
    }

    #[test]
    fn test_store_kind_default_is_local() {
        assert_eq!(StoreKind::default(), StoreKind::Local);
    }
}
