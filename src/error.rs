//! Errors shared by the remote data clients

use thiserror::Error;

/// Failure talking to a remote data source (catalog or order book)
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, TLS)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success HTTP status
    #[error("{source_name} returned {status}: {body}")]
    Status {
        source_name: &'static str,
        status: u16,
        body: String,
    },
    /// Response body could not be decoded
    #[error("failed to decode {source_name} response: {message}")]
    Decode {
        source_name: &'static str,
        message: String,
    },
}
