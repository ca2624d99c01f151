mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use common::{dead_endpoint, Reply, Upstream, TIMEOUT, VILLA_ADELINA};
use ferroboard::api::{create_router, AppState};
use ferroboard::client::DeparturesClient;
use ferroboard::models::*;
use ferroboard::pipeline::Pipeline;
use ferroboard::refresh::Refresher;
use ferroboard::widget::WidgetProjection;
use serde_json::{json, Value};

fn server_for(board: Refresher, widget: Refresher) -> TestServer {
    let state = AppState::new(Arc::new(board), Arc::new(WidgetProjection::new(widget)));
    TestServer::new(create_router(state)).expect("Failed to create test server")
}

async fn setup() -> (TestServer, Upstream) {
    let upstream = Upstream::start(Reply::Html(VILLA_ADELINA)).await;
    let server = server_for(
        upstream.refresher(Station::VillaAdelina),
        upstream.refresher(Station::VillaAdelina),
    );
    (server, upstream)
}

mod health {
    use super::*;

    #[tokio::test]
    async fn reports_ok() {
        let (server, _upstream) = setup().await;

        let response = server.get("/health").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }
}

mod stations {
    use super::*;

    #[tokio::test]
    async fn lists_every_station_with_its_code() {
        let (server, _upstream) = setup().await;

        let response = server.get("/api/v1/stations").await;

        response.assert_status_ok();
        let stations: Vec<StationInfo> = response.json();
        assert_eq!(stations.len(), 23);
        assert_eq!(stations[0].name, "Retiro");
        assert_eq!(stations[0].code, 75);
        let grierson = stations
            .iter()
            .find(|s| s.slug == "cecilia-grierson")
            .expect("Cecilia Grierson missing");
        assert_eq!(grierson.code, 135);
    }
}

mod board {
    use super::*;

    #[tokio::test]
    async fn is_empty_before_the_first_refresh() {
        let (server, _upstream) = setup().await;

        let response = server.get("/api/v1/board").await;

        response.assert_status_ok();
        let state: BoardState = response.json();
        assert_eq!(state.station, Station::VillaAdelina);
        assert!(state.result.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn refresh_returns_and_publishes_the_result() {
        let (server, _upstream) = setup().await;

        let response = server.post("/api/v1/board/refresh").await;

        response.assert_status_ok();
        let result: AggregationResult = response.json();
        assert_eq!(result.inbound[0].destination, "RETIRO");
        assert_eq!(result.outbound[0].destination, "VILLA ROSA");

        let state: BoardState = server.get("/api/v1/board").await.json();
        assert_eq!(state.result, Some(result));
    }

    #[tokio::test]
    async fn refresh_accepts_a_silent_mode() {
        let (server, _upstream) = setup().await;

        let response = server
            .post("/api/v1/board/refresh")
            .json(&RefreshInput {
                mode: RefreshMode::Silent,
            })
            .await;

        response.assert_status_ok();
    }

    #[tokio::test]
    async fn refresh_rejects_an_unknown_mode() {
        let (server, _upstream) = setup().await;

        let response = server
            .post("/api/v1/board/refresh")
            .json(&json!({ "mode": "loud" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn select_station_refreshes_the_new_station() {
        let (server, upstream) = setup().await;

        let response = server
            .put("/api/v1/board/station")
            .json(&SelectStationInput {
                station: "don-torcuato".to_string(),
            })
            .await;

        response.assert_status_ok();
        let result: AggregationResult = response.json();
        assert_eq!(result.station, Station::DonTorcuato);
        assert_eq!(upstream.requests()[0].body, "idEst=100&adm=1");

        let state: BoardState = server.get("/api/v1/board").await.json();
        assert_eq!(state.station, Station::DonTorcuato);
    }

    #[tokio::test]
    async fn select_station_rejects_unknown_names() {
        let (server, upstream) = setup().await;

        let response = server
            .put("/api/v1/board/station")
            .json(&SelectStationInput {
                station: "Constitucion".to_string(),
            })
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(upstream.request_count(), 0);
    }

    #[tokio::test]
    async fn failed_refresh_is_a_bad_gateway_and_keeps_the_board() {
        let (server, upstream) = setup().await;
        let first: AggregationResult = server.post("/api/v1/board/refresh").await.json();

        upstream.set_reply(Reply::Bytes(vec![0xff, 0xfe]));
        let response = server.post("/api/v1/board/refresh").await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        let body: Value = response.json();
        assert_eq!(body["kind"], "invalid_response_encoding");

        let state: BoardState = server.get("/api/v1/board").await.json();
        assert_eq!(state.result, Some(first));
        assert!(state.error.is_some());
    }
}

mod widget {
    use super::*;

    #[tokio::test]
    async fn starts_as_a_placeholder() {
        let (server, _upstream) = setup().await;

        let snapshot: WidgetSnapshot = server.get("/api/v1/widget").await.json();

        assert!(snapshot.is_placeholder());
    }

    #[tokio::test]
    async fn refresh_projects_the_next_departures() {
        let (server, _upstream) = setup().await;

        let response = server.post("/api/v1/widget/refresh").await;

        response.assert_status_ok();
        let snapshot: WidgetSnapshot = response.json();
        assert_eq!(snapshot.inbound_next.as_deref(), Some("10:05"));
        assert_eq!(snapshot.outbound_next.as_deref(), Some("10:10"));

        let current: WidgetSnapshot = server.get("/api/v1/widget").await.json();
        assert_eq!(current, snapshot);
    }

    #[tokio::test]
    async fn refresh_never_fails() {
        let client = DeparturesClient::new(dead_endpoint().await, TIMEOUT).unwrap();
        let upstream = Upstream::start(Reply::Html(VILLA_ADELINA)).await;
        let server = server_for(
            upstream.refresher(Station::Retiro),
            Refresher::new(client, Pipeline::default(), Station::Padilla),
        );

        let response = server.post("/api/v1/widget/refresh").await;

        response.assert_status_ok();
        let snapshot: WidgetSnapshot = response.json();
        assert_eq!(snapshot, WidgetSnapshot::placeholder(Station::Padilla));
    }
}
