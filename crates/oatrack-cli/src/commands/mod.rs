pub mod add;
pub mod companies;
pub mod delete;
pub mod export;
pub mod favorite;
pub mod list;

use anyhow::{Context, Result};
use oatrack_application::{SyncController, SyncSettings, TrackerView, open_store};
use oatrack_core::OatrackError;
use oatrack_core::store::StoreKind;
use oatrack_infrastructure::{ConfigService, OatrackPaths};
use std::path::Path;
use std::time::Duration;

/// How long a mutation waits for the store to push the confirming snapshot.
const CONFIRM_TIMEOUT: Duration = Duration::from_secs(5);

/// A running controller against the configured store.
pub struct Session {
    pub paths: OatrackPaths,
    pub backend: StoreKind,
    pub controller: SyncController,
}

impl Session {
    pub async fn open(config_dir: Option<&Path>) -> Result<Self> {
        let paths = OatrackPaths::new(config_dir);
        let config = ConfigService::new(&paths)?
            .get_config()
            .context("Failed to load configuration")?;

        let adapter = open_store(&config, &paths).await?;
        let controller = SyncController::new(adapter, SyncSettings::from(&config))?;

        if let Err(e) = controller.start().await {
            anyhow::bail!("{}", e.user_message());
        }

        Ok(Self {
            paths,
            backend: config.store.backend,
            controller,
        })
    }

    pub async fn close(&self) {
        self.controller.stop().await;
    }

    /// Runs `mutation`, then waits until a newer snapshot has been rendered.
    pub async fn mutate<T, F>(&self, mutation: F) -> Result<T, OatrackError>
    where
        F: std::future::Future<Output = Result<T, OatrackError>>,
    {
        let mut rx = self.controller.watch_view();
        let before = rx.borrow_and_update().revision;

        let value = mutation.await?;

        let confirmed = tokio::time::timeout(
            CONFIRM_TIMEOUT,
            rx.wait_for(|view| view.revision > before),
        )
        .await;
        match confirmed {
            Ok(Ok(_)) => {}
            Ok(Err(_)) => tracing::warn!("[CLI] Controller stopped before confirming the change"),
            Err(_) => tracing::warn!(
                "[CLI] No snapshot confirmed the change within {:?}",
                CONFIRM_TIMEOUT
            ),
        }

        if self.backend == StoreKind::Document {
            tracing::warn!("[CLI] Document backend is in-process; the change is not persisted");
        }

        Ok(value)
    }

    pub fn view(&self) -> TrackerView {
        self.controller.view()
    }
}
