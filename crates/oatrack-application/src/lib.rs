//! Application layer of oatrack.
//!
//! Wires a configured store adapter to the `SyncController`, which keeps the
//! rendered answer list in step with the store's snapshots.

pub mod store_factory;
pub mod sync_controller;

pub use store_factory::open_store;
pub use sync_controller::{SyncController, SyncPhase, SyncSettings, TrackerView};
