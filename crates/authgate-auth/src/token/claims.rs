//! Claims structures embedded in access and refresh tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Distinguishes access tokens from refresh tokens.
///
/// The two credential kinds are already separated by signing secret; the
/// type claim is checked as well so a decoded payload is never mistaken
/// for the other kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived access token for API requests.
    Access,
    /// Long-lived refresh token for obtaining new access tokens.
    Refresh,
}

/// Claims payload of an access token.
///
/// Validity is fully determined by signature and expiry; verification
/// requires no server-side lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject — the principal ID.
    pub sub: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token type, always [`TokenType::Access`].
    pub token_type: TokenType,
}

/// Claims payload of a refresh token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Subject — the principal ID.
    pub sub: Uuid,
    /// Session this token belongs to.
    pub sid: Uuid,
    /// Token ID, unique per issued refresh token. Under rotation, only the
    /// session's current token ID is accepted.
    pub jti: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token type, always [`TokenType::Refresh`].
    pub token_type: TokenType,
}

impl AccessClaims {
    /// Returns the principal ID from the subject claim.
    pub fn principal_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }
}

impl RefreshClaims {
    /// Returns the principal ID from the subject claim.
    pub fn principal_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the session ID.
    pub fn session_id(&self) -> Uuid {
        self.sid
    }
}
