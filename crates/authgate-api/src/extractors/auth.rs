//! `AuthPrincipal` extractor — pulls the bearer token from the
//! Authorization header, validates it, and resolves the principal.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use authgate_auth::token::TokenError;
use authgate_core::error::AppError;
use authgate_core::types::Principal;

use crate::error::ApiError;
use crate::state::AppState;

/// The authenticated principal, resolved per request and handed to
/// handlers as an explicit argument.
///
/// Missing, malformed, and expired credentials are rejected with
/// distinguishable codes; only the expired class is refreshable by the
/// client coordinator.
#[derive(Debug, Clone)]
pub struct AuthPrincipal(pub Principal);

impl std::ops::Deref for AuthPrincipal {
    type Target = Principal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthPrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid authorization header format"))?;

        let claims = state.token_decoder.decode_access(token).map_err(|e| match e {
            TokenError::Expired => AppError::token_expired("Access token has expired"),
            _ => AppError::unauthorized("Invalid access token"),
        })?;

        let principal = state
            .directory
            .find_by_id(claims.principal_id())
            .ok_or_else(|| AppError::unauthorized("Invalid access token"))?;

        Ok(AuthPrincipal(principal))
    }
}
