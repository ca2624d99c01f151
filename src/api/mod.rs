mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::refresh::Refresher;
use crate::widget::WidgetProjection;

/// Shared state behind every handler: one board and one widget, each with its
/// own refresh cycle.
#[derive(Clone)]
pub struct AppState {
    pub board: Arc<Refresher>,
    pub widget: Arc<WidgetProjection>,
}

impl AppState {
    pub fn new(board: Arc<Refresher>, widget: Arc<WidgetProjection>) -> Self {
        Self { board, widget }
    }
}

pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        // Stations
        .route("/stations", get(handlers::list_stations))
        // Board
        .route("/board", get(handlers::get_board))
        .route("/board/refresh", post(handlers::refresh_board))
        .route("/board/station", put(handlers::select_station))
        // Widget
        .route("/widget", get(handlers::get_widget))
        .route("/widget/refresh", post(handlers::refresh_widget));

    Router::new()
        .nest("/api/v1", api)
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
