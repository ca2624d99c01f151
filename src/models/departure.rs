use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::station::Station;

/// One row scraped from the departures table.
///
/// Rows only live for the duration of a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepartureRow {
    pub destination: String,
    /// Estimated departure time as printed upstream. Empty when the row had no time cell.
    pub estimated_time: String,
    /// Position of the row on the table path, in document order.
    pub row_index: usize,
}

/// All departures sharing a destination, times kept in the order rows appeared.
///
/// The first row seen for a destination always records its time, even an
/// empty one; later empty times are not recorded. A group therefore can hold
/// a leading `""`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DepartureGroup {
    pub destination: String,
    pub estimated_times: Vec<String>,
}

impl DepartureGroup {
    /// True when at least one recorded time carries text.
    pub fn has_times(&self) -> bool {
        self.estimated_times.iter().any(|t| !t.is_empty())
    }

    /// First non-empty time, the next departure towards this destination.
    pub fn next_time(&self) -> Option<&str> {
        self.estimated_times
            .iter()
            .map(String::as_str)
            .find(|t| !t.is_empty())
    }
}

/// Which way a train runs relative to the terminal city station.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Inbound,
    Outbound,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

/// Groups partitioned by direction, without the refresh metadata.
///
/// Produced by the classifier; every group with times lands in exactly one bucket.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Partition {
    pub inbound: Vec<DepartureGroup>,
    pub outbound: Vec<DepartureGroup>,
}

impl Partition {
    pub fn is_empty(&self) -> bool {
        self.inbound.is_empty() && self.outbound.is_empty()
    }
}

/// The outcome of one successful refresh cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregationResult {
    pub station: Station,
    pub inbound: Vec<DepartureGroup>,
    pub outbound: Vec<DepartureGroup>,
    pub refreshed_at: DateTime<Utc>,
}

impl AggregationResult {
    pub fn new(station: Station, partition: Partition, refreshed_at: DateTime<Utc>) -> Self {
        Self {
            station,
            inbound: partition.inbound,
            outbound: partition.outbound,
            refreshed_at,
        }
    }

    pub fn bucket(&self, direction: Direction) -> &[DepartureGroup] {
        match direction {
            Direction::Inbound => &self.inbound,
            Direction::Outbound => &self.outbound,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.inbound.is_empty() && self.outbound.is_empty()
    }
}
