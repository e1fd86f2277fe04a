//! Error taxonomy for quote operations.
//!
//! Infrastructure code (file IO, config) returns `anyhow::Result` with context
//! strings. Operations whose callers react differently per failure kind return
//! [`QuoteError`] instead.

/// Errors surfaced to the user by quote store, transfer and sync operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    /// Empty text or category on add. No state change.
    #[error("Invalid quote: {0}")]
    Validation(String),

    /// Import payload is not JSON or not a top-level array.
    #[error("Malformed quotes file: {0}")]
    Format(String),

    /// Remote fetch or push failed.
    #[error("Network request failed: {0}")]
    Network(String),

    /// Persisted data could not be read or written.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl QuoteError {
    /// Wrap an `anyhow` chain as a storage error, keeping every context layer.
    pub fn storage(err: &anyhow::Error) -> Self {
        Self::Storage(format!("{err:#}"))
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Network(format!("unexpected response body: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}
