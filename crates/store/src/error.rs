//! Store error taxonomy.
//!
//! Every failure is non-fatal to the process: callers surface the error at
//! the point of the failed operation and local state stays correctable by a
//! reload. Nothing here retries.

use thiserror::Error;

/// Errors that can occur when talking to the remote resource store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport-level failure (connection refused, timeout, DNS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-success status.
    #[error("store returned {status} for {collection}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Collection the request addressed.
        collection: String,
    },

    /// The addressed record does not exist.
    #[error("not found: {collection}/{id}")]
    NotFound {
        /// Collection the request addressed.
        collection: String,
        /// Record id.
        id: String,
    },

    /// The store returned JSON that does not parse.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record parsed as JSON but does not match the expected shape.
    #[error("data corruption: {0}")]
    Data(String),
}

impl StoreError {
    /// Whether this error means the record simply was not there.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
