use thiserror::Error;

/// Why a refresh cycle failed.
///
/// None of these are fatal: the board keeps its last good result and the next
/// refresh starts from scratch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("Network error: {0}")]
    NetworkFailure(String),

    #[error("Invalid data received: response is not valid UTF-8")]
    InvalidResponseEncoding,

    #[error("Error parsing data: {0}")]
    ParseFailure(String),
}

impl From<reqwest::Error> for BoardError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            return Self::InvalidEndpoint(e.to_string());
        }
        let kind = if e.is_timeout() { "timed out" } else { "request failed" };
        Self::NetworkFailure(format!("{}: {}", kind, e))
    }
}

impl BoardError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidEndpoint(_) => "invalid_endpoint",
            Self::NetworkFailure(_) => "network_failure",
            Self::InvalidResponseEncoding => "invalid_response_encoding",
            Self::ParseFailure(_) => "parse_failure",
        }
    }
}
