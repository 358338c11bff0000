//! Token creation with configurable signing and TTL.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use authgate_core::clock::{Clock, SystemClock};
use authgate_core::config::auth::AuthConfig;

use super::claims::{AccessClaims, RefreshClaims, TokenType};
use super::error::TokenError;

/// Creates signed access and refresh tokens.
///
/// Access and refresh tokens are signed with distinct secrets; a token of
/// one kind can never verify as the other.
#[derive(Clone)]
pub struct TokenEncoder {
    /// HMAC secret key for access token signing.
    access_key: EncodingKey,
    /// HMAC secret key for refresh token signing.
    refresh_key: EncodingKey,
    /// Access token TTL in minutes.
    access_ttl_minutes: i64,
    /// Refresh token TTL in days.
    refresh_ttl_days: i64,
    /// Time source for issued-at/expiry stamps.
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for TokenEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenEncoder")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .finish()
    }
}

/// Result of a successful token pair generation.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CredentialPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates an encoder with an explicit time source.
    pub fn with_clock(config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            access_key: EncodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            access_ttl_minutes: config.access_ttl_minutes as i64,
            refresh_ttl_days: config.refresh_ttl_days as i64,
            clock,
        }
    }

    /// Generates an access + refresh token pair for the given principal,
    /// bound to the given session and refresh token ID.
    pub fn issue_pair(
        &self,
        principal_id: Uuid,
        session_id: Uuid,
        jti: Uuid,
    ) -> Result<CredentialPair, TokenError> {
        let now = self.clock.now();
        let access_exp = now + chrono::Duration::minutes(self.access_ttl_minutes);
        let refresh_exp = now + chrono::Duration::days(self.refresh_ttl_days);

        let access_claims = AccessClaims {
            sub: principal_id,
            iat: now.timestamp(),
            exp: access_exp.timestamp(),
            token_type: TokenType::Access,
        };

        let refresh_claims = RefreshClaims {
            sub: principal_id,
            sid: session_id,
            jti,
            iat: now.timestamp(),
            exp: refresh_exp.timestamp(),
            token_type: TokenType::Refresh,
        };

        let access_token = encode(&Header::default(), &access_claims, &self.access_key)
            .map_err(TokenError::Encoding)?;

        let refresh_token = encode(&Header::default(), &refresh_claims, &self.refresh_key)
            .map_err(TokenError::Encoding)?;

        Ok(CredentialPair {
            access_token,
            refresh_token,
            access_expires_at: access_exp,
            refresh_expires_at: refresh_exp,
        })
    }

    /// Generates a standalone access token (e.g., after refresh).
    pub fn issue_access(
        &self,
        principal_id: Uuid,
    ) -> Result<(String, DateTime<Utc>), TokenError> {
        let now = self.clock.now();
        let exp = now + chrono::Duration::minutes(self.access_ttl_minutes);

        let claims = AccessClaims {
            sub: principal_id,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            token_type: TokenType::Access,
        };

        let token =
            encode(&Header::default(), &claims, &self.access_key).map_err(TokenError::Encoding)?;

        Ok((token, exp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::decoder::TokenDecoder;

    /// Clock pinned at a fixed offset from the real time.
    struct OffsetClock(chrono::Duration);

    impl Clock for OffsetClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now() + self.0
        }
    }

    fn test_config() -> AuthConfig {
        AuthConfig {
            access_secret: "access-test-secret".to_string(),
            refresh_secret: "refresh-test-secret".to_string(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn test_access_round_trip() {
        let config = test_config();
        let encoder = TokenEncoder::new(&config);
        let decoder = TokenDecoder::new(&config);

        let principal_id = Uuid::new_v4();
        let (token, _) = encoder.issue_access(principal_id).expect("encode");
        let claims = decoder.decode_access(&token).expect("decode");
        assert_eq!(claims.principal_id(), principal_id);
        assert_eq!(claims.token_type, TokenType::Access);
    }

    #[test]
    fn test_refresh_round_trip() {
        let config = test_config();
        let encoder = TokenEncoder::new(&config);
        let decoder = TokenDecoder::new(&config);

        let principal_id = Uuid::new_v4();
        let session_id = Uuid::new_v4();
        let jti = Uuid::new_v4();
        let pair = encoder
            .issue_pair(principal_id, session_id, jti)
            .expect("encode");
        let claims = decoder.decode_refresh(&pair.refresh_token).expect("decode");
        assert_eq!(claims.principal_id(), principal_id);
        assert_eq!(claims.session_id(), session_id);
        assert_eq!(claims.jti, jti);
    }

    #[test]
    fn test_expired_access_token_rejected() {
        let config = test_config();
        // Minted an hour in the past: a 15-minute access token is long gone.
        let encoder =
            TokenEncoder::with_clock(&config, Arc::new(OffsetClock(chrono::Duration::hours(-1))));
        let decoder = TokenDecoder::new(&config);

        let (token, _) = encoder.issue_access(Uuid::new_v4()).expect("encode");
        let err = decoder.decode_access(&token).expect_err("should be expired");
        assert!(matches!(err, TokenError::Expired));
    }

    #[test]
    fn test_unexpired_access_token_accepted() {
        let config = test_config();
        let encoder = TokenEncoder::new(&config);
        let decoder = TokenDecoder::new(&config);

        let (token, expires_at) = encoder.issue_access(Uuid::new_v4()).expect("encode");
        assert!(expires_at > Utc::now());
        assert!(decoder.decode_access(&token).is_ok());
    }

    #[test]
    fn test_secret_separation() {
        let config = test_config();
        let encoder = TokenEncoder::new(&config);
        let decoder = TokenDecoder::new(&config);

        let principal_id = Uuid::new_v4();
        let pair = encoder
            .issue_pair(principal_id, Uuid::new_v4(), Uuid::new_v4())
            .expect("encode");

        // A refresh token presented as an access token fails on signature,
        // and vice versa.
        let err = decoder
            .decode_access(&pair.refresh_token)
            .expect_err("refresh token must not verify as access");
        assert!(matches!(err, TokenError::InvalidSignature));

        let err = decoder
            .decode_refresh(&pair.access_token)
            .expect_err("access token must not verify as refresh");
        assert!(matches!(err, TokenError::InvalidSignature));
    }

    #[test]
    fn test_garbage_token_malformed() {
        let config = test_config();
        let decoder = TokenDecoder::new(&config);

        let err = decoder
            .decode_access("not-a-token")
            .expect_err("garbage must not decode");
        assert!(matches!(err, TokenError::Malformed));
    }
}
