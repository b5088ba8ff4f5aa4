//! Event loop that feeds user and map events into a [`ViewController`].
//!
//! Events are applied one at a time. Free-text input goes through a
//! [`Debouncer`] and comes back on an internal channel as a committed query.

use std::time::Duration;

use kpp_core::{CheckpointStatus, CheckpointType, LngLat};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::debounce::Debouncer;
use crate::error::ViewError;
use crate::filter::CategoryFilter;
use crate::reconcile::ViewController;
use crate::surface::{MapSurface, Panel};

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Raw keystrokes in the search box; debounced.
    QueryInput(String),
    TypeFilter(CategoryFilter<CheckpointType>),
    StatusFilter(CategoryFilter<CheckpointStatus>),
    ListItemClicked(String),
    MapPointClicked { id: String, at: LngLat },
    ClusterClicked { cluster_id: u64, center: LngLat },
    Focus(String),
    ClearSelection,
    ToggleHeatmap,
    MapReady,
    MapReadyTimedOut(Duration),
    Shutdown,
}

pub struct Session<M, P> {
    controller: ViewController<M, P>,
    debouncer: Debouncer,
    /// Text handed to the debouncer and not yet committed.
    uncommitted: Option<String>,
    commits_tx: mpsc::UnboundedSender<String>,
    commits_rx: mpsc::UnboundedReceiver<String>,
}

impl<M: MapSurface, P: Panel> Session<M, P> {
    #[must_use]
    pub fn new(controller: ViewController<M, P>, search_debounce: Duration) -> Self {
        let (commits_tx, commits_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            debouncer: Debouncer::new(search_debounce),
            uncommitted: None,
            commits_tx,
            commits_rx,
        }
    }

    #[must_use]
    pub fn controller(&self) -> &ViewController<M, P> {
        &self.controller
    }

    /// Runs until `Shutdown` arrives or every sender is dropped, then hands
    /// the controller back. Text still waiting on the debouncer is applied
    /// before returning.
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) -> ViewController<M, P> {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    None | Some(UiEvent::Shutdown) => break,
                    Some(event) => self.handle(event),
                },
                Some(text) = self.commits_rx.recv() => self.commit(text),
            }
        }

        self.debouncer.cancel();
        while let Ok(text) = self.commits_rx.try_recv() {
            self.commit(text);
        }
        if let Some(text) = self.uncommitted.take() {
            tracing::debug!(text = %text, "applying pending query on shutdown");
            self.controller.set_text(&text);
        }
        tracing::debug!("view session stopped");
        self.controller
    }

    fn commit(&mut self, text: String) {
        if self.uncommitted.as_deref() == Some(text.as_str()) {
            self.uncommitted = None;
        }
        self.controller.set_text(&text);
    }

    /// Applies one event synchronously, except `QueryInput`, which is
    /// deferred until the input settles.
    pub fn handle(&mut self, event: UiEvent) {
        match event {
            UiEvent::QueryInput(text) => {
                self.uncommitted = Some(text.clone());
                let commits = self.commits_tx.clone();
                self.debouncer.schedule(move || {
                    let _ = commits.send(text);
                });
            }
            UiEvent::TypeFilter(filter) => {
                self.controller.set_type_filter(filter);
            }
            UiEvent::StatusFilter(filter) => {
                self.controller.set_status_filter(filter);
            }
            UiEvent::ListItemClicked(id) => {
                self.controller.click_list_item(&id);
            }
            UiEvent::MapPointClicked { id, at } => {
                self.controller.click_map_point(&id, at);
            }
            UiEvent::ClusterClicked { cluster_id, center } => {
                self.controller.expand_cluster(cluster_id, center);
            }
            UiEvent::Focus(id) => {
                self.controller.focus(&id);
            }
            UiEvent::ClearSelection => {
                self.controller.clear_selection();
            }
            UiEvent::ToggleHeatmap => {
                self.controller.toggle_heatmap();
            }
            UiEvent::MapReady => self.controller.on_map_ready(),
            UiEvent::MapReadyTimedOut(waited) => self.controller.map_ready_timed_out(waited),
            UiEvent::Shutdown => {}
        }
    }
}

/// Waits for the readiness flag to turn `true`, optionally bounded.
///
/// # Errors
///
/// Returns [`ViewError::MapReadyTimeout`] if `timeout` elapses first and
/// [`ViewError::MapReadySignalClosed`] if the sender is dropped.
pub async fn wait_for_map_ready(
    mut ready: watch::Receiver<bool>,
    timeout: Option<Duration>,
) -> Result<(), ViewError> {
    let wait = async move {
        ready
            .wait_for(|is_ready| *is_ready)
            .await
            .map(|_| ())
            .map_err(|_| ViewError::MapReadySignalClosed)
    };

    match timeout {
        None => wait.await,
        Some(limit) => tokio::time::timeout(limit, wait)
            .await
            .map_err(|_| ViewError::MapReadyTimeout { waited: limit })?,
    }
}

/// Spawns a task that turns the readiness flag into a session event.
pub fn forward_map_ready(
    ready: watch::Receiver<bool>,
    timeout: Option<Duration>,
    events: mpsc::Sender<UiEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let event = match wait_for_map_ready(ready, timeout).await {
            Ok(()) => UiEvent::MapReady,
            Err(ViewError::MapReadyTimeout { waited }) => UiEvent::MapReadyTimedOut(waited),
            Err(err @ ViewError::MapReadySignalClosed) => {
                tracing::warn!(error = %err, "map readiness unavailable");
                return;
            }
        };
        if events.send(event).await.is_err() {
            tracing::debug!("session closed before map readiness was delivered");
        }
    })
}
