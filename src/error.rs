use reqwest::StatusCode;
use thiserror::Error;

/// Failures on the way from an inbound request to a mapped envelope.
///
/// Every variant is reported to the caller as `code: -1` with the display text as `msg`.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("missing apiurl parameter")]
    MissingApiUrl,

    #[error("Request failed: {0}")]
    UpstreamStatus(StatusCode),

    #[error("Request error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Empty response from API")]
    EmptyResponse,

    #[error("XML Parse Error: {0}")]
    MalformedSource(#[from] roxmltree::Error),
}

impl BridgeError {
    /// Envelope `code` reported for this failure.
    pub fn code(&self) -> i32 {
        -1
    }
}
