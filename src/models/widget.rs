use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::departure::{AggregationResult, DepartureGroup};
use super::station::Station;

/// Text shown wherever a departure or timestamp is missing.
pub const PLACEHOLDER: &str = "N/A";

/// The next departure in each direction, for compact displays.
///
/// Snapshots are recomputed on every widget refresh and never mutated.
/// `refreshed_at` is `None` only for the placeholder snapshot used before any
/// refresh has succeeded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WidgetSnapshot {
    pub station: Station,
    pub inbound_next: Option<String>,
    pub outbound_next: Option<String>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl WidgetSnapshot {
    /// Reduce a full result to the first departure of the first group in each bucket.
    pub fn project(result: &AggregationResult) -> Self {
        Self {
            station: result.station,
            inbound_next: first_departure(&result.inbound),
            outbound_next: first_departure(&result.outbound),
            refreshed_at: Some(result.refreshed_at),
        }
    }

    pub fn placeholder(station: Station) -> Self {
        Self {
            station,
            inbound_next: None,
            outbound_next: None,
            refreshed_at: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.refreshed_at.is_none()
    }

    pub fn inbound_display(&self) -> &str {
        self.inbound_next.as_deref().unwrap_or(PLACEHOLDER)
    }

    pub fn outbound_display(&self) -> &str {
        self.outbound_next.as_deref().unwrap_or(PLACEHOLDER)
    }
}

fn first_departure(groups: &[DepartureGroup]) -> Option<String> {
    groups.first().and_then(|g| g.next_time()).map(str::to_string)
}
