//! Token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use authgate_core::config::auth::AuthConfig;

use super::claims::{AccessClaims, RefreshClaims, TokenType};
use super::error::TokenError;

/// Validates signed tokens.
///
/// Holds one decoding key per credential kind; the expiry boundary is
/// exact (no leeway), so a token is rejected from the instant its `exp`
/// passes.
#[derive(Clone)]
pub struct TokenDecoder {
    /// HMAC secret key for access token verification.
    access_key: DecodingKey,
    /// HMAC secret key for refresh token verification.
    refresh_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for TokenDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            access_key: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_key: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks:
    /// 1. Signature validity under the access secret
    /// 2. Expiration
    /// 3. Token type is Access
    pub fn decode_access(&self, token: &str) -> Result<AccessClaims, TokenError> {
        let token_data = decode::<AccessClaims>(token, &self.access_key, &self.validation)
            .map_err(map_decode_error)?;

        if token_data.claims.token_type != TokenType::Access {
            return Err(TokenError::Malformed);
        }

        Ok(token_data.claims)
    }

    /// Decodes and validates a refresh token string.
    pub fn decode_refresh(&self, token: &str) -> Result<RefreshClaims, TokenError> {
        let token_data = decode::<RefreshClaims>(token, &self.refresh_key, &self.validation)
            .map_err(map_decode_error)?;

        if token_data.claims.token_type != TokenType::Refresh {
            return Err(TokenError::Malformed);
        }

        Ok(token_data.claims)
    }
}

/// Maps jsonwebtoken failures onto the codec taxonomy.
fn map_decode_error(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        _ => TokenError::Malformed,
    }
}
