//! Client-side error taxonomy.

use thiserror::Error;

/// Errors surfaced to callers of the auth client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No usable credential: the request was rejected and could not be
    /// recovered by a refresh. The caller is responsible for routing this
    /// to a login prompt.
    #[error("unauthenticated")]
    Unauthenticated,
    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server rejected a request with a non-recoverable status.
    #[error("api error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Server-provided message.
        message: String,
    },
}
