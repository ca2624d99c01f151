use axum::{body::Bytes, extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use super::AppState;
use crate::error::BoardError;
use crate::models::*;

// ============================================================
// Error Handling
// ============================================================

type ApiError = (StatusCode, Json<Value>);

/// A failed refresh is the upstream's fault, not the caller's: report it as a
/// bad gateway with the human-readable cause.
fn refresh_error(e: BoardError) -> ApiError {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({ "error": e.to_string(), "kind": e.kind() })),
    )
}

fn bad_request(msg: impl std::fmt::Display) -> ApiError {
    tracing::warn!("Validation error: {}", msg);
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": msg.to_string() })),
    )
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// ============================================================
// Stations
// ============================================================

pub async fn list_stations() -> Json<Vec<StationInfo>> {
    Json(Station::ALL.into_iter().map(StationInfo::from).collect())
}

// ============================================================
// Board
// ============================================================

pub async fn get_board(State(state): State<AppState>) -> Json<BoardState> {
    Json(state.board.state())
}

pub async fn refresh_board(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<AggregationResult>, ApiError> {
    // An empty body means a plain visible refresh.
    let input: RefreshInput = if body.is_empty() {
        RefreshInput::default()
    } else {
        serde_json::from_slice(&body).map_err(bad_request)?
    };
    let mode = input.mode;
    state
        .board
        .refresh_selected(mode)
        .await
        .map(Json)
        .map_err(refresh_error)
}

pub async fn select_station(
    State(state): State<AppState>,
    Json(input): Json<SelectStationInput>,
) -> Result<Json<AggregationResult>, ApiError> {
    let station: Station = input.station.parse().map_err(bad_request)?;
    state
        .board
        .select_station(station)
        .await
        .map(Json)
        .map_err(refresh_error)
}

// ============================================================
// Widget
// ============================================================

pub async fn get_widget(State(state): State<AppState>) -> Json<WidgetSnapshot> {
    Json(state.widget.snapshot())
}

pub async fn refresh_widget(State(state): State<AppState>) -> Json<WidgetSnapshot> {
    Json(state.widget.refresh().await)
}
