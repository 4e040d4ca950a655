//! Store adapter module.
//!
//! The record backend is an external collaborator. This module fixes the
//! surface the rest of the tracker consumes: readiness, a snapshot push
//! channel, and add/update/remove.

pub mod adapter;
mod subscription;

pub use adapter::{StoreAdapter, StoreKind};
pub use subscription::{Snapshot, SnapshotPublisher, Subscription};
