use serde::{Deserialize, Serialize};

use super::departure::AggregationResult;
use super::station::Station;

/// How a refresh presents itself while it runs.
///
/// - `Visible`: the display shows a loading state until the fetch completes
/// - `Silent`: pull-to-refresh style; results and timestamp still update on completion
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RefreshMode {
    #[default]
    Visible,
    Silent,
}

impl RefreshMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Silent => "silent",
        }
    }

    pub fn shows_loading(&self) -> bool {
        matches!(self, Self::Visible)
    }
}

/// What a board currently displays.
///
/// Written only by the refresher that owns it. A failed refresh records its
/// message in `error` and leaves `result` untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardState {
    pub station: Station,
    pub loading: bool,
    pub result: Option<AggregationResult>,
    pub error: Option<String>,
    /// Generation of the refresh that produced `result`. Zero before any success.
    pub generation: u64,
}

impl BoardState {
    pub fn new(station: Station) -> Self {
        Self {
            station,
            loading: false,
            result: None,
            error: None,
            generation: 0,
        }
    }
}

/// Input for changing the station a board follows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectStationInput {
    pub station: String,
}

/// Input for triggering a refresh. Mode defaults to `Visible`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshInput {
    #[serde(default)]
    pub mode: RefreshMode,
}
