use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{OatrackError, Result};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::store::StoreKind;

/// Default bound on waiting for the store to become ready.
pub const DEFAULT_READY_TIMEOUT_MS: u64 = 5_000;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct TrackerConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreKind,
    /// Overrides the default data file location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ViewConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct SyncConfig {
    #[serde(default = "default_ready_timeout_ms")]
    pub ready_timeout_ms: u64,
}

fn default_ready_timeout_ms() -> u64 {
    DEFAULT_READY_TIMEOUT_MS
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            ready_timeout_ms: default_ready_timeout_ms(),
        }
    }
}

impl SyncConfig {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_millis(self.ready_timeout_ms)
    }
}

impl TrackerConfig {
    /// Rejects values the tracker cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.view.page_size == 0 {
            return Err(OatrackError::config("view.page_size must be greater than zero"));
        }
        if self.sync.ready_timeout_ms == 0 {
            return Err(OatrackError::config(
                "sync.ready_timeout_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}
