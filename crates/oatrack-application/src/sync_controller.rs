//! Sync controller.
//!
//! Owns the working set: the in-memory copy of the store's records. The
//! working set is written only by the snapshot listener; user mutations are
//! forwarded to the store and show up once the store pushes the next
//! snapshot.
//!
//! ```text
//! Uninitialized --start--> Subscribed <--> Updating
//!                               |
//!                             stop
//!                               v
//!                           TornDown
//! ```

use oatrack_core::config::TrackerConfig;
use oatrack_core::error::{OatrackError, Result};
use oatrack_core::export::export_snapshot;
use oatrack_core::filter::{CompanySelector, RecordFilter, company_options, filter_records};
use oatrack_core::pagination::paginate;
use oatrack_core::record::{NewRecord, Record, RecordPatch};
use oatrack_core::store::{Snapshot, StoreAdapter, Subscription};
use oatrack_core::view::{CardView, TableView, project_cards, project_table};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use strum::Display;
use tokio::sync::{Mutex, RwLock, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Lifecycle phase of a `SyncController`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
pub enum SyncPhase {
    /// Created, not yet subscribed.
    Uninitialized,
    /// Listening for snapshots.
    Subscribed,
    /// Applying a snapshot.
    Updating,
    /// Stopped; no snapshot will be applied again.
    TornDown,
}

/// Tuning knobs of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    pub page_size: usize,
    /// Upper bound on waiting for the store to become ready.
    pub ready_timeout: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self::from(&TrackerConfig::default())
    }
}

impl From<&TrackerConfig> for SyncSettings {
    fn from(config: &TrackerConfig) -> Self {
        Self {
            page_size: config.view.page_size,
            ready_timeout: config.sync.ready_timeout(),
        }
    }
}

/// What the front end draws: the current page in both layouts plus the
/// inputs that produced it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TrackerView {
    pub table: TableView,
    pub cards: Vec<CardView>,
    pub filter: RecordFilter,
    /// Number of snapshots applied so far.
    pub revision: u64,
    /// Size of the working set, before filtering.
    pub total_records: usize,
    /// Size of the filtered view, before paging.
    pub matching_records: usize,
}

struct ControllerState {
    phase: SyncPhase,
    working_set: Vec<Record>,
    filter: RecordFilter,
    page: usize,
    revision: u64,
}

impl ControllerState {
    fn new() -> Self {
        Self {
            phase: SyncPhase::Uninitialized,
            working_set: Vec::new(),
            filter: RecordFilter::default(),
            page: 1,
            revision: 0,
        }
    }

    /// Runs filter → paginate → project over the current inputs.
    ///
    /// The company filter is used as given, even when no record carries that
    /// name. Only the page is clamped.
    fn render(&mut self, page_size: usize) -> Result<TrackerView> {
        let companies = CompanySelector {
            options: company_options(&self.working_set, "").options,
            selected: self.filter.company.clone(),
        };

        let filtered = filter_records(&self.working_set, &self.filter);
        let page = paginate(&filtered, page_size, self.page)?;
        self.page = page.page;

        Ok(TrackerView {
            table: project_table(&page, &companies),
            cards: project_cards(&page),
            filter: self.filter.clone(),
            revision: self.revision,
            total_records: self.working_set.len(),
            matching_records: filtered.len(),
        })
    }
}

/// Keeps a rendered view of a store's records in sync with its snapshots.
pub struct SyncController {
    adapter: Arc<dyn StoreAdapter>,
    settings: SyncSettings,
    state: Arc<RwLock<ControllerState>>,
    view_tx: Arc<watch::Sender<TrackerView>>,
    cancel: CancellationToken,
    /// Snapshot listener task. Also serializes `start` against `stop`.
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl SyncController {
    /// Creates a controller for `adapter`. Nothing happens until `start`.
    ///
    /// # Errors
    ///
    /// Returns `OatrackError::Config` when `settings.page_size` is zero.
    pub fn new(adapter: Arc<dyn StoreAdapter>, settings: SyncSettings) -> Result<Self> {
        if settings.page_size == 0 {
            return Err(OatrackError::config("page size must be greater than zero"));
        }

        let mut state = ControllerState::new();
        let initial_view = state.render(settings.page_size)?;
        let (view_tx, _) = watch::channel(initial_view);

        Ok(Self {
            adapter,
            settings,
            state: Arc::new(RwLock::new(state)),
            view_tx: Arc::new(view_tx),
            cancel: CancellationToken::new(),
            listener: Mutex::new(None),
        })
    }

    pub fn settings(&self) -> SyncSettings {
        self.settings
    }

    // ============================================================================
    // Lifecycle
    // ============================================================================

    /// Waits for the store, subscribes, and applies the first snapshot.
    ///
    /// When this returns `Ok`, `view()` already reflects the store contents.
    ///
    /// # Errors
    ///
    /// - `OatrackError::InvalidState` if called more than once
    /// - `OatrackError::BackendUnavailable` if the store is not ready within
    ///   `ready_timeout`, refuses the subscription, or `stop` is called first
    pub async fn start(&self) -> Result<()> {
        let mut listener = self.listener.lock().await;

        {
            let state = self.state.read().await;
            if state.phase == SyncPhase::TornDown || self.cancel.is_cancelled() {
                return Err(OatrackError::backend_unavailable(
                    "controller was stopped before it started",
                ));
            }
            if state.phase != SyncPhase::Uninitialized {
                return Err(OatrackError::invalid_state(format!(
                    "cannot start a controller in phase {}",
                    state.phase
                )));
            }
        }

        tracing::info!(
            "[SyncController] Waiting up to {:?} for {} store",
            self.settings.ready_timeout,
            self.adapter.kind()
        );
        self.wait_until_ready().await?;

        let mut subscription = self
            .adapter
            .subscribe()
            .await
            .map_err(|e| OatrackError::backend_unavailable(e.to_string()))?;

        self.state.write().await.phase = SyncPhase::Subscribed;
        tracing::info!("[SyncController] Subscribed to {} store", self.adapter.kind());

        if let Some(snapshot) = subscription.next().await {
            apply_snapshot(
                &self.state,
                &self.view_tx,
                &self.cancel,
                self.settings.page_size,
                snapshot,
            )
            .await;
        }

        *listener = Some(self.spawn_listener(subscription));
        Ok(())
    }

    async fn wait_until_ready(&self) -> Result<()> {
        let timeout = self.settings.ready_timeout;

        tokio::select! {
            _ = self.cancel.cancelled() => Err(OatrackError::backend_unavailable(
                "startup cancelled before the store became ready",
            )),
            result = tokio::time::timeout(timeout, self.adapter.ready()) => match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => {
                    tracing::error!("[SyncController] Store failed to come up: {}", e);
                    Err(OatrackError::backend_unavailable(e.to_string()))
                }
                Err(_) => {
                    tracing::error!("[SyncController] Store not ready after {:?}", timeout);
                    Err(OatrackError::backend_unavailable(format!(
                        "store not ready after {:?}",
                        timeout
                    )))
                }
            },
        }
    }

    fn spawn_listener(&self, mut subscription: Subscription) -> JoinHandle<()> {
        let state = self.state.clone();
        let view_tx = self.view_tx.clone();
        let cancel = self.cancel.clone();
        let page_size = self.settings.page_size;

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => break,
                    next = subscription.next() => match next {
                        Some(snapshot) => {
                            apply_snapshot(&state, &view_tx, &cancel, page_size, snapshot).await;
                        }
                        None => {
                            tracing::warn!("[SyncController] Store closed the snapshot channel");
                            break;
                        }
                    },
                }
            }
            tracing::debug!("[SyncController] Snapshot listener exited");
        })
    }

    /// Unsubscribes and waits for the listener to finish.
    ///
    /// Also aborts a `start` still waiting for readiness. In-flight mutations
    /// are not cancelled. Calling `stop` twice is a no-op.
    pub async fn stop(&self) {
        self.cancel.cancel();

        let handle = self.listener.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                tracing::warn!("[SyncController] Listener task failed: {}", e);
            }
        }

        let mut state = self.state.write().await;
        if state.phase != SyncPhase::TornDown {
            state.phase = SyncPhase::TornDown;
            tracing::info!("[SyncController] Torn down");
        }
    }

    // ============================================================================
    // Mutations (forwarded, never applied locally)
    // ============================================================================

    /// Validates `draft` and forwards it to the store.
    ///
    /// # Errors
    ///
    /// - `OatrackError::Validation` before any store call
    /// - `OatrackError::InvalidState` outside `Subscribed`/`Updating`
    /// - `OatrackError::Persistence` if the store rejects the record
    pub async fn add(&self, draft: NewRecord) -> Result<String> {
        draft.validate()?;
        self.ensure_active().await?;

        let id = self.adapter.add(draft).await.map_err(as_persistence)?;
        tracing::debug!("[SyncController] Store accepted record {}", id);
        Ok(id)
    }

    /// Forwards a delete of `id` to the store.
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.ensure_active().await?;

        self.adapter.remove(id).await.map_err(as_persistence)?;
        tracing::debug!("[SyncController] Store deleted record {}", id);
        Ok(())
    }

    /// Flips the favorite flag of `id` as currently shown and forwards it.
    ///
    /// Returns the flag that was requested.
    ///
    /// The flag is read from the working set, which only changes when a
    /// snapshot arrives. Two toggles issued before the first one is confirmed
    /// both request the same value, so callers wait on `watch_view()` for the
    /// confirming revision before toggling the same record again.
    ///
    /// # Errors
    ///
    /// `OatrackError::NotFound` if `id` is not in the working set.
    pub async fn toggle_favorite(&self, id: &str) -> Result<bool> {
        self.ensure_active().await?;

        let requested = {
            let state = self.state.read().await;
            let record = state
                .working_set
                .iter()
                .find(|record| record.id == id)
                .ok_or_else(|| OatrackError::not_found("Record", id))?;
            !record.favorite
        };

        self.adapter
            .update(id, RecordPatch::favorite(requested))
            .await
            .map_err(as_persistence)?;
        tracing::debug!(
            "[SyncController] Store set favorite={} on {}",
            requested,
            id
        );
        Ok(requested)
    }

    async fn ensure_active(&self) -> Result<()> {
        let phase = self.state.read().await.phase;
        match phase {
            SyncPhase::Subscribed | SyncPhase::Updating => Ok(()),
            other => Err(OatrackError::invalid_state(format!(
                "store is not connected (phase {})",
                other
            ))),
        }
    }

    // ============================================================================
    // View inputs
    // ============================================================================

    /// Replaces the filter inputs and goes back to page 1.
    pub async fn set_filter(&self, filter: RecordFilter) -> Result<TrackerView> {
        self.rerender(|state| {
            state.filter = filter;
            state.page = 1;
        })
        .await
    }

    /// Jumps to `page`, clamped into the valid range.
    pub async fn set_page(&self, page: usize) -> Result<TrackerView> {
        self.rerender(|state| state.page = page).await
    }

    pub async fn next_page(&self) -> Result<TrackerView> {
        self.rerender(|state| state.page = state.page.saturating_add(1))
            .await
    }

    pub async fn prev_page(&self) -> Result<TrackerView> {
        self.rerender(|state| state.page = state.page.saturating_sub(1))
            .await
    }

    async fn rerender<F>(&self, change: F) -> Result<TrackerView>
    where
        F: FnOnce(&mut ControllerState),
    {
        let mut state = self.state.write().await;
        change(&mut state);
        let view = state.render(self.settings.page_size)?;
        self.view_tx.send_replace(view.clone());
        Ok(view)
    }

    // ============================================================================
    // Readers
    // ============================================================================

    /// Latest rendered view.
    pub fn view(&self) -> TrackerView {
        self.view_tx.borrow().clone()
    }

    /// Receiver notified on every re-render.
    pub fn watch_view(&self) -> watch::Receiver<TrackerView> {
        self.view_tx.subscribe()
    }

    pub async fn working_set(&self) -> Vec<Record> {
        self.state.read().await.working_set.clone()
    }

    pub async fn phase(&self) -> SyncPhase {
        self.state.read().await.phase
    }

    /// Number of snapshots applied so far.
    pub async fn revision(&self) -> u64 {
        self.state.read().await.revision
    }

    /// Pretty JSON of the current working set.
    pub async fn export(&self) -> Result<Vec<u8>> {
        let state = self.state.read().await;
        export_snapshot(&state.working_set)
    }
}

impl Drop for SyncController {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Replaces the working set with `snapshot` and publishes a fresh view.
///
/// The user's page position is reset to 1 on every snapshot.
async fn apply_snapshot(
    state: &RwLock<ControllerState>,
    view_tx: &watch::Sender<TrackerView>,
    cancel: &CancellationToken,
    page_size: usize,
    snapshot: Snapshot,
) {
    let mut state = state.write().await;
    if cancel.is_cancelled() || state.phase == SyncPhase::TornDown {
        return;
    }

    state.phase = SyncPhase::Updating;
    state.working_set = snapshot.as_ref().clone();
    state.page = 1;
    state.revision += 1;

    // A selected company whose last record is gone falls back to "all".
    let selector = company_options(&state.working_set, &state.filter.company);
    if selector.selected != state.filter.company {
        tracing::debug!(
            "[SyncController] Company '{}' left the working set, showing all",
            state.filter.company
        );
        state.filter.company = selector.selected;
    }

    match state.render(page_size) {
        Ok(view) => {
            tracing::debug!(
                "[SyncController] Applied snapshot #{} ({} records, {} shown)",
                state.revision,
                view.total_records,
                view.table.rows.len()
            );
            view_tx.send_replace(view);
        }
        Err(e) => tracing::error!("[SyncController] Failed to render snapshot: {}", e),
    }

    state.phase = SyncPhase::Subscribed;
}

fn as_persistence(err: OatrackError) -> OatrackError {
    match err {
        OatrackError::Persistence(_) => err,
        other => {
            tracing::warn!("[SyncController] Store call failed: {}", other);
            OatrackError::persistence(other.to_string())
        }
    }
}
