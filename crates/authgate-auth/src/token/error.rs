//! Codec-level error taxonomy.

use thiserror::Error;

/// Errors produced by the credential codec.
///
/// The service and middleware layers collapse these into HTTP status
/// families, but the distinction is kept internally: only [`Expired`]
/// marks a credential the client coordinator may refresh.
///
/// [`Expired`]: TokenError::Expired
#[derive(Debug, Error)]
pub enum TokenError {
    /// The token could not be parsed, or its claims are not the expected
    /// shape for the requested credential kind.
    #[error("token is malformed")]
    Malformed,
    /// The token's expiry has passed.
    #[error("token has expired")]
    Expired,
    /// The signature does not verify under the expected secret.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Signing failed (key misconfiguration).
    #[error("failed to encode token: {0}")]
    Encoding(#[source] jsonwebtoken::errors::Error),
}
