//! Refresh orchestration.
//!
//! A [`Refresher`] owns one board: it fetches the upstream page, runs the
//! pipeline, and publishes the outcome to a single display cell. Every write
//! to the cell goes through [`watch::Sender::send_modify`], so presentation
//! code only ever reads consistent snapshots.
//!
//! Refreshes are never cancelled. Each one carries a generation id. A success
//! is discarded when a newer refresh has already completed, or when the board
//! switched station after it started.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::client::DeparturesClient;
use crate::config::BoardConfig;
use crate::error::BoardError;
use crate::models::{AggregationResult, BoardState, RefreshMode, Station};
use crate::pipeline::Pipeline;

/// Outcome of one refresh and whether it reached the board.
#[derive(Debug)]
pub struct Completion {
    pub generation: u64,
    pub applied: bool,
    pub outcome: Result<AggregationResult, BoardError>,
}

pub struct Refresher {
    client: DeparturesClient,
    pipeline: Pipeline,
    /// Last generation handed out.
    started: AtomicU64,
    /// Generation of the most recent visible refresh.
    latest_visible: AtomicU64,
    /// A success must be newer than this to reach the board.
    settled: AtomicU64,
    state: watch::Sender<BoardState>,
}

impl Refresher {
    pub fn new(client: DeparturesClient, pipeline: Pipeline, station: Station) -> Self {
        let (state, _) = watch::channel(BoardState::new(station));
        Self {
            client,
            pipeline,
            started: AtomicU64::new(0),
            latest_visible: AtomicU64::new(0),
            settled: AtomicU64::new(0),
            state,
        }
    }

    pub fn from_config(config: &BoardConfig) -> Result<Self, BoardError> {
        let client = DeparturesClient::from_config(config)?;
        let pipeline = Pipeline::with_keyword(config.inbound_keyword.clone());
        Ok(Self::new(client, pipeline, config.station))
    }

    /// Snapshot of what the board currently displays.
    pub fn state(&self) -> BoardState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every change to the display cell.
    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.state.subscribe()
    }

    pub fn station(&self) -> Station {
        self.state.borrow().station
    }

    /// Follow a different station from the next refresh on.
    ///
    /// Refreshes already in flight can no longer change the board.
    pub fn set_station(&self, station: Station) {
        self.state.send_modify(|s| {
            self.settled
                .fetch_max(self.started.load(Ordering::SeqCst), Ordering::SeqCst);
            s.station = station;
        });
        tracing::info!("Board switched to {}", station);
    }

    /// Follow a different station and load it with a visible refresh.
    pub async fn select_station(
        &self,
        station: Station,
    ) -> Result<AggregationResult, BoardError> {
        self.set_station(station);
        self.refresh(station, RefreshMode::Visible).await
    }

    /// Refresh the station the board currently follows.
    pub async fn refresh_selected(&self, mode: RefreshMode) -> Result<AggregationResult, BoardError> {
        self.refresh(self.station(), mode).await
    }

    /// Run one refresh cycle for `station` and publish its outcome.
    ///
    /// The caller always receives the outcome, even when a newer refresh has
    /// already replaced it on the board.
    pub async fn refresh(
        &self,
        station: Station,
        mode: RefreshMode,
    ) -> Result<AggregationResult, BoardError> {
        self.refresh_tracked(station, mode).await.outcome
    }

    /// Same as [`refresh`](Self::refresh), also reporting whether the outcome
    /// reached the board.
    pub async fn refresh_tracked(&self, station: Station, mode: RefreshMode) -> Completion {
        let generation = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        if mode.shows_loading() {
            self.latest_visible.fetch_max(generation, Ordering::SeqCst);
            self.state.send_modify(|s| {
                s.loading = true;
                s.error = None;
            });
        }

        tracing::debug!(generation, mode = mode.as_str(), "Refreshing {}", station);
        let outcome = self.fetch_and_run(station).await;
        let applied = self.apply(generation, mode, &outcome);
        Completion {
            generation,
            applied,
            outcome,
        }
    }

    async fn fetch_and_run(&self, station: Station) -> Result<AggregationResult, BoardError> {
        let html = self.client.fetch(station).await?;
        self.pipeline.run(&html, station, Utc::now())
    }

    fn apply(
        &self,
        generation: u64,
        mode: RefreshMode,
        outcome: &Result<AggregationResult, BoardError>,
    ) -> bool {
        let latest_started = self.started.load(Ordering::SeqCst);
        let latest_visible = self.latest_visible.load(Ordering::SeqCst);
        let mut applied = false;

        self.state.send_modify(|s| {
            if mode.shows_loading() && generation == latest_visible {
                s.loading = false;
            }

            let settled = self.settled.fetch_max(generation, Ordering::SeqCst);
            match outcome {
                Ok(result) if generation > settled => {
                    tracing::info!(
                        generation,
                        inbound = result.inbound.len(),
                        outbound = result.outbound.len(),
                        "Refreshed {}",
                        result.station
                    );
                    s.result = Some(result.clone());
                    s.generation = generation;
                    s.error = None;
                    applied = true;
                }
                Ok(_) => {
                    tracing::debug!(generation, settled, "Discarding stale refresh");
                }
                Err(e) => {
                    tracing::warn!(generation, "Refresh failed: {}", e);
                    if generation == latest_started {
                        s.error = Some(e.to_string());
                        applied = true;
                    }
                }
            }
        });
        applied
    }

    /// Refresh the selected station every `interval` until the task is aborted.
    ///
    /// The first refresh is visible; the rest are silent.
    pub fn spawn_auto_refresh(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut mode = RefreshMode::Visible;
            loop {
                ticker.tick().await;
                if let Err(e) = this.refresh_selected(mode).await {
                    tracing::debug!("Auto-refresh failed: {}", e);
                }
                mode = RefreshMode::Silent;
            }
        })
    }
}
