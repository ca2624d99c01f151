//! Direction classification.
//!
//! The pipeline only sees a [`DirectionPredicate`]; which keyword or rule
//! decides the direction is up to the line being served.

use crate::models::{DepartureGroup, Direction, Partition};

/// Keyword marking trains bound for the city terminal on the Belgrano Norte line.
pub const DEFAULT_INBOUND_KEYWORD: &str = "RETIRO";

/// Decides which bucket a destination belongs to.
pub trait DirectionPredicate: Send + Sync {
    fn direction(&self, destination: &str) -> Direction;
}

impl<F> DirectionPredicate for F
where
    F: Fn(&str) -> Direction + Send + Sync,
{
    fn direction(&self, destination: &str) -> Direction {
        self(destination)
    }
}

/// Inbound when the destination contains `keyword`, outbound otherwise.
///
/// Containment rather than equality: destinations carry qualifiers such as
/// `RETIRO (EXPRESO)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordClassifier {
    keyword: String,
}

impl KeywordClassifier {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
        }
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_INBOUND_KEYWORD)
    }
}

impl DirectionPredicate for KeywordClassifier {
    fn direction(&self, destination: &str) -> Direction {
        if destination.contains(&self.keyword) {
            Direction::Inbound
        } else {
            Direction::Outbound
        }
    }
}

/// Split groups into inbound and outbound, dropping groups with no times.
///
/// Order within each bucket follows the input order.
pub fn classify<P>(groups: impl IntoIterator<Item = DepartureGroup>, predicate: &P) -> Partition
where
    P: DirectionPredicate + ?Sized,
{
    let mut partition = Partition::default();
    let mut dropped = 0usize;

    for group in groups {
        if !group.has_times() {
            dropped += 1;
            continue;
        }
        match predicate.direction(&group.destination) {
            Direction::Inbound => partition.inbound.push(group),
            Direction::Outbound => partition.outbound.push(group),
        }
    }

    tracing::debug!(
        inbound = partition.inbound.len(),
        outbound = partition.outbound.len(),
        dropped,
        "Classified departure groups"
    );
    partition
}
