//! The departure pipeline: extract → group → classify.
//!
//! Everything here is synchronous and deterministic. The only suspension point
//! of a refresh is the upstream fetch, which happens before the pipeline runs.

mod classify;
mod extract;
mod group;

use std::sync::Arc;

use chrono::{DateTime, Utc};

pub use classify::*;
pub use extract::*;
pub use group::*;

use crate::error::BoardError;
use crate::models::{AggregationResult, Partition, Station};

/// Table layout plus direction rule, shared by every refresh of a board.
#[derive(Clone)]
pub struct Pipeline {
    layout: TableLayout,
    predicate: Arc<dyn DirectionPredicate>,
}

impl Pipeline {
    pub fn new(layout: TableLayout, predicate: Arc<dyn DirectionPredicate>) -> Self {
        Self { layout, predicate }
    }

    /// Default layout, classifying on `keyword`.
    pub fn with_keyword(keyword: impl Into<String>) -> Self {
        Self::new(
            TableLayout::default(),
            Arc::new(KeywordClassifier::new(keyword)),
        )
    }

    pub fn layout(&self) -> &TableLayout {
        &self.layout
    }

    /// Extract, group and classify without stamping a result.
    pub fn partition(&self, html: &str) -> Result<Partition, BoardError> {
        let rows = extract_rows(html, &self.layout)?;
        let groups = group_departures(rows);
        Ok(classify(groups, self.predicate.as_ref()))
    }

    /// Run the full pipeline and stamp the result with `refreshed_at`.
    pub fn run(
        &self,
        html: &str,
        station: Station,
        refreshed_at: DateTime<Utc>,
    ) -> Result<AggregationResult, BoardError> {
        let partition = self.partition(html)?;
        Ok(AggregationResult::new(station, partition, refreshed_at))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::with_keyword(DEFAULT_INBOUND_KEYWORD)
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}
