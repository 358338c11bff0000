//! Protected resource handler.

use axum::Json;

use crate::dto::response::{ProtectedResponse, UserResponse};
use crate::extractors::AuthPrincipal;

/// GET /api/protected
///
/// The demo protected resource: requires a valid bearer access token and
/// echoes the resolved principal.
pub async fn protected(principal: AuthPrincipal) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "This is protected data!".to_string(),
        user: UserResponse::from(principal.0),
    })
}
