//! HTTP client for the upstream departures page.
//!
//! The page is requested with a form-encoded `POST` carrying the station's
//! `idEst` code and the fixed `adm=1` flag, and answers with an HTML document.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::config::{BoardConfig, DEFAULT_ENDPOINT};
use crate::error::BoardError;
use crate::models::Station;

/// Fixed mode flag the upstream page expects alongside the station code.
const ADMIN_FLAG: &str = "1";

/// Form body for a station, exactly as the upstream page expects it.
pub fn request_body(station: Station) -> String {
    format!("idEst={}&adm={}", station.code(), ADMIN_FLAG)
}

/// HTTP client for the departures page.
#[derive(Debug, Clone)]
pub struct DeparturesClient {
    endpoint: String,
    client: Client,
}

impl DeparturesClient {
    /// Create client from the endpoint and timeout in `config`.
    pub fn from_config(config: &BoardConfig) -> Result<Self, BoardError> {
        Self::new(config.endpoint.clone(), config.timeout)
    }

    /// Create with explicit configuration.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, BoardError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ferroboard/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BoardError::NetworkFailure(format!("could not build client: {}", e)))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self) -> Result<Url, BoardError> {
        Url::parse(&self.endpoint)
            .map_err(|e| BoardError::InvalidEndpoint(format!("{}: {}", self.endpoint, e)))
    }

    /// Fetch the departures page for `station` and decode it as UTF-8.
    pub async fn fetch(&self, station: Station) -> Result<String, BoardError> {
        let url = self.url()?;
        tracing::debug!("Fetching departures for {} ({})", station, url);

        let response = self
            .client
            .post(url)
            .header(
                reqwest::header::CONTENT_TYPE,
                "application/x-www-form-urlencoded",
            )
            .body(request_body(station))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BoardError::NetworkFailure(format!(
                "upstream returned {}",
                status
            )));
        }

        let bytes = response.bytes().await?;
        String::from_utf8(bytes.to_vec()).map_err(|_| BoardError::InvalidResponseEncoding)
    }
}

impl Default for DeparturesClient {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            client: Client::new(),
        }
    }
}
