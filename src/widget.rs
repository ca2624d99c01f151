//! Compact "next train" projection.
//!
//! A widget runs its own [`Refresher`], independent of any board, and keeps
//! only the next departure in each direction.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::BoardConfig;
use crate::error::BoardError;
use crate::models::{RefreshMode, Station, WidgetSnapshot};
use crate::refresh::Refresher;

pub struct WidgetProjection {
    refresher: Refresher,
    snapshot: watch::Sender<WidgetSnapshot>,
    /// Generation of the refresh behind the current snapshot.
    published: AtomicU64,
}

impl WidgetProjection {
    pub fn new(refresher: Refresher) -> Self {
        let (snapshot, _) = watch::channel(WidgetSnapshot::placeholder(refresher.station()));
        Self {
            refresher,
            snapshot,
            published: AtomicU64::new(0),
        }
    }

    /// Widget on its own refresher, following `station`.
    pub fn from_config(config: &BoardConfig, station: Station) -> Result<Self, BoardError> {
        let config = BoardConfig {
            station,
            ..config.clone()
        };
        Ok(Self::new(Refresher::from_config(&config)?))
    }

    pub fn station(&self) -> Station {
        self.refresher.station()
    }

    /// Last snapshot produced, or the placeholder before the first refresh.
    pub fn snapshot(&self) -> WidgetSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<WidgetSnapshot> {
        self.snapshot.subscribe()
    }

    /// Follow a different station and refresh right away.
    pub async fn select_station(&self, station: Station) -> WidgetSnapshot {
        self.refresher.set_station(station);
        self.refresh().await
    }

    /// Refresh and project. Never fails.
    ///
    /// On error the last snapshot for this station is kept, or a placeholder
    /// is returned when there is none. A refresh superseded by a newer one
    /// leaves the snapshot alone and returns the current one.
    pub async fn refresh(&self) -> WidgetSnapshot {
        let station = self.station();
        let completion = self
            .refresher
            .refresh_tracked(station, RefreshMode::Silent)
            .await;
        if !completion.applied {
            tracing::debug!(
                generation = completion.generation,
                "Widget refresh for {} superseded",
                station
            );
            return self.snapshot();
        }

        match completion.outcome {
            Ok(result) => self.publish(completion.generation, WidgetSnapshot::project(&result)),
            Err(e) => {
                tracing::warn!("Widget refresh failed, keeping last snapshot: {}", e);
                let last = self.snapshot();
                if last.station == station {
                    return last;
                }
                self.publish(completion.generation, WidgetSnapshot::placeholder(station))
            }
        }
    }

    fn publish(&self, generation: u64, next: WidgetSnapshot) -> WidgetSnapshot {
        self.snapshot.send_if_modified(|s| {
            if self.published.fetch_max(generation, Ordering::SeqCst) < generation {
                *s = next;
                true
            } else {
                false
            }
        });
        self.snapshot()
    }

    /// Refresh every `interval` on a background task until it is aborted.
    pub fn spawn(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let snapshot = this.refresh().await;
                tracing::debug!(
                    inbound = snapshot.inbound_display(),
                    outbound = snapshot.outbound_display(),
                    "Widget refreshed for {}",
                    snapshot.station
                );
            }
        })
    }
}
