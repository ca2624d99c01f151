//! A stand-in for the upstream departures page, served from a local port.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use ferroboard::client::DeparturesClient;
use ferroboard::models::Station;
use ferroboard::pipeline::Pipeline;
use ferroboard::refresh::Refresher;

pub const VILLA_ADELINA: &str = include_str!("../fixtures/villa_adelina.html");
pub const MAINTENANCE: &str = include_str!("../fixtures/maintenance.html");

/// Client timeout used against the stub. Stalled responses exceed it.
pub const TIMEOUT: Duration = Duration::from_millis(300);

/// What the stub answers with.
#[derive(Clone)]
pub enum Reply {
    Html(&'static str),
    Bytes(Vec<u8>),
    Status(StatusCode),
}

#[derive(Default)]
struct Behaviour {
    reply: Mutex<Option<Reply>>,
    /// Hold every response past the client timeout.
    stall: AtomicBool,
    /// Per-request delay in milliseconds, keyed by `idEst` code.
    delays: Mutex<Vec<(i32, u64)>>,
    /// Status answered instead of the reply, keyed by `idEst` code.
    failures: Mutex<Vec<(i32, StatusCode)>>,
    requests: Mutex<Vec<Request>>,
    count: AtomicU64,
}

#[derive(Debug, Clone)]
pub struct Request {
    pub body: String,
    pub content_type: Option<String>,
}

#[derive(Clone)]
pub struct Upstream {
    pub url: String,
    behaviour: Arc<Behaviour>,
}

impl Upstream {
    pub async fn start(reply: Reply) -> Self {
        let behaviour = Arc::new(Behaviour::default());
        *behaviour.reply.lock().unwrap() = Some(reply);

        let app = Router::new()
            .route("/estaciones.asp", post(answer))
            .with_state(behaviour.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind upstream stub");
        let addr = listener.local_addr().expect("No local address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Upstream stub failed");
        });

        Self {
            url: format!("http://{}/estaciones.asp", addr),
            behaviour,
        }
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.behaviour.reply.lock().unwrap() = Some(reply);
    }

    pub fn set_stalled(&self, stalled: bool) {
        self.behaviour.stall.store(stalled, Ordering::SeqCst);
    }

    pub fn delay_station(&self, station: Station, millis: u64) {
        self.behaviour
            .delays
            .lock()
            .unwrap()
            .push((station.code(), millis));
    }

    pub fn fail_station(&self, station: Station, status: StatusCode) {
        self.behaviour
            .failures
            .lock()
            .unwrap()
            .push((station.code(), status));
    }

    pub fn requests(&self) -> Vec<Request> {
        self.behaviour.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> u64 {
        self.behaviour.count.load(Ordering::SeqCst)
    }

    pub fn client(&self) -> DeparturesClient {
        DeparturesClient::new(self.url.clone(), TIMEOUT).expect("Failed to build client")
    }

    pub fn refresher(&self, station: Station) -> Refresher {
        Refresher::new(self.client(), Pipeline::default(), station)
    }
}

/// A URL nothing listens on.
pub async fn dead_endpoint() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    drop(listener);
    format!("http://{}/estaciones.asp", addr)
}

async fn answer(
    State(behaviour): State<Arc<Behaviour>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    behaviour.count.fetch_add(1, Ordering::SeqCst);
    let code: Option<i32> = body
        .split('&')
        .find_map(|pair| pair.strip_prefix("idEst="))
        .and_then(|c| c.parse().ok());
    behaviour.requests.lock().unwrap().push(Request {
        body,
        content_type: headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let delay = behaviour
        .delays
        .lock()
        .unwrap()
        .iter()
        .find(|(c, _)| Some(*c) == code)
        .map(|(_, millis)| *millis);
    if let Some(millis) = delay {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }
    if behaviour.stall.load(Ordering::SeqCst) {
        tokio::time::sleep(TIMEOUT * 5).await;
    }

    let failure = behaviour
        .failures
        .lock()
        .unwrap()
        .iter()
        .find(|(c, _)| Some(*c) == code)
        .map(|(_, status)| *status);
    if let Some(status) = failure {
        return status.into_response();
    }

    let reply = behaviour.reply.lock().unwrap().clone();
    match reply {
        Some(Reply::Html(html)) => ([(header::CONTENT_TYPE, "text/html")], html).into_response(),
        Some(Reply::Bytes(bytes)) => ([(header::CONTENT_TYPE, "text/html")], bytes).into_response(),
        Some(Reply::Status(status)) => status.into_response(),
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
