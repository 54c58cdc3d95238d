//! SINAICA client error types.

use crate::domain::InvalidArgument;

/// Errors from the SINAICA client.
///
/// An empty upstream response is not an error; it becomes an empty table.
#[derive(Debug, thiserror::Error)]
pub enum SinaicaError {
    /// Caller input failed validation; no request was made
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] InvalidArgument),

    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("request to {url} failed with HTTP status {status}")]
    Api { url: String, status: u16 },

    /// Upstream answered with something other than JSON or text
    #[error("request to {url} returned unexpected content type {content_type:?}")]
    ContentType { url: String, content_type: String },

    /// Response body was not the JSON we expected
    #[error("JSON parse error from {url}: {message}")]
    Json {
        url: String,
        message: String,
        body: Option<String>,
    },
}

impl SinaicaError {
    /// Whether the error came from caller input rather than the transport.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SinaicaError::InvalidArgument(_))
    }
}
