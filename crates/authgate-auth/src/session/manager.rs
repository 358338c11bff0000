//! Session lifecycle manager — login, logout, refresh token flows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use authgate_core::config::auth::AuthConfig;
use authgate_core::error::AppError;
use authgate_core::types::Principal;

use crate::directory::UserDirectory;
use crate::token::encoder::CredentialPair;
use crate::token::{TokenDecoder, TokenEncoder};

use super::store::SessionStore;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    /// Generated token pair.
    pub pair: CredentialPair,
    /// Created session.
    pub session: super::store::Session,
    /// The authenticated principal.
    pub principal: Principal,
}

/// Result of a successful refresh.
#[derive(Debug, Clone)]
pub struct RefreshOutcome {
    /// Newly minted access token.
    pub access_token: String,
    /// Its expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Replacement refresh token, present only when rotation is enabled.
    pub rotated: Option<RotatedRefresh>,
}

/// Replacement refresh token issued under the rotation policy.
#[derive(Debug, Clone)]
pub struct RotatedRefresh {
    /// The replacement refresh token.
    pub refresh_token: String,
    /// Its expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

/// Manages the complete session lifecycle.
#[derive(Clone)]
pub struct SessionManager {
    /// Token encoder for issuance.
    encoder: Arc<TokenEncoder>,
    /// Token decoder for refresh validation.
    decoder: Arc<TokenDecoder>,
    /// Session persistence.
    sessions: Arc<SessionStore>,
    /// User directory.
    directory: Arc<UserDirectory>,
    /// Whether refresh tokens rotate on use.
    rotate_refresh_tokens: bool,
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("rotate_refresh_tokens", &self.rotate_refresh_tokens)
            .finish()
    }
}

impl SessionManager {
    /// Creates a new session manager with all required dependencies.
    pub fn new(
        encoder: Arc<TokenEncoder>,
        decoder: Arc<TokenDecoder>,
        sessions: Arc<SessionStore>,
        directory: Arc<UserDirectory>,
        config: &AuthConfig,
    ) -> Self {
        Self {
            encoder,
            decoder,
            sessions,
            directory,
            rotate_refresh_tokens: config.rotate_refresh_tokens,
        }
    }

    /// Performs the complete login flow:
    ///
    /// 1. Verify credentials against the directory (exact match)
    /// 2. Create a session
    /// 3. Mint the access + refresh token pair bound to it
    ///
    /// The failure is constant-shape: it does not reveal whether the
    /// username or the password was wrong.
    pub fn login(&self, username: &str, password: &str) -> Result<LoginResult, AppError> {
        let principal = self
            .directory
            .verify(username, password)
            .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

        let jti = Uuid::new_v4();
        let session = self.sessions.create(principal.id, jti);

        let pair = self
            .encoder
            .issue_pair(principal.id, session.id, jti)
            .map_err(|e| AppError::internal(format!("Failed to mint credential pair: {e}")))?;

        info!(
            principal_id = %principal.id,
            session_id = %session.id,
            "Login successful"
        );

        Ok(LoginResult {
            pair,
            session,
            principal,
        })
    }

    /// Refreshes an access token using a valid refresh token.
    ///
    /// 1. Decode the refresh token; any codec failure is rejected
    /// 2. Check the session exists and is unrevoked
    /// 3. Under rotation, check the token is the session's current one;
    ///    a stale token is treated as reuse and revokes the session
    /// 4. Mint a new access token (and, under rotation, a replacement
    ///    refresh token)
    pub fn refresh(&self, refresh_token: &str) -> Result<RefreshOutcome, AppError> {
        let claims = self.decoder.decode_refresh(refresh_token).map_err(|e| {
            warn!(reason = %e, "Refresh token rejected");
            AppError::forbidden("Invalid refresh token")
        })?;

        let session_id = claims.session_id();
        let session = self
            .sessions
            .find(session_id)
            .ok_or_else(|| AppError::forbidden("Session has been revoked"))?;

        if session.revoked {
            return Err(AppError::forbidden("Session has been revoked"));
        }

        if self.rotate_refresh_tokens && claims.jti != session.current_jti {
            warn!(
                session_id = %session_id,
                "Refresh token reuse detected, revoking session"
            );
            self.sessions.revoke(session_id);
            return Err(AppError::forbidden("Invalid refresh token"));
        }

        let principal = self
            .directory
            .find_by_id(claims.principal_id())
            .ok_or_else(|| AppError::forbidden("Invalid refresh token"))?;

        let outcome = if self.rotate_refresh_tokens {
            let new_jti = Uuid::new_v4();
            let pair = self
                .encoder
                .issue_pair(principal.id, session_id, new_jti)
                .map_err(|e| AppError::internal(format!("Failed to mint credential pair: {e}")))?;
            self.sessions.record_refresh(session_id, new_jti);
            RefreshOutcome {
                access_token: pair.access_token,
                access_expires_at: pair.access_expires_at,
                rotated: Some(RotatedRefresh {
                    refresh_token: pair.refresh_token,
                    refresh_expires_at: pair.refresh_expires_at,
                }),
            }
        } else {
            let (access_token, access_expires_at) = self
                .encoder
                .issue_access(principal.id)
                .map_err(|e| AppError::internal(format!("Failed to mint access token: {e}")))?;
            self.sessions.record_refresh(session_id, session.current_jti);
            RefreshOutcome {
                access_token,
                access_expires_at,
                rotated: None,
            }
        };

        info!(
            principal_id = %principal.id,
            session_id = %session_id,
            "Token refreshed"
        );

        Ok(outcome)
    }

    /// Marks the session revoked. Idempotent; logging out an unknown or
    /// already-revoked session succeeds.
    pub fn logout(&self, session_id: Uuid) {
        self.sessions.revoke(session_id);
        info!(session_id = %session_id, "Session revoked");
    }
}
