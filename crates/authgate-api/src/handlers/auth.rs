//! Auth handlers — login, refresh, logout.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use validator::Validate;

use authgate_core::error::AppError;

use crate::cookie::{clear_refresh_cookie, refresh_cookie};
use crate::dto::request::LoginRequest;
use crate::dto::response::{LoginResponse, MessageResponse, RefreshResponse, UserResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /auth/login
///
/// Verifies the credentials, mints the token pair, and sets the refresh
/// cookie. The access token is the only credential exposed in the body.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<LoginResponse>), ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let result = state.session_manager.login(&req.username, &req.password)?;

    let jar = jar.add(refresh_cookie(
        &state.config.auth,
        &result.pair.refresh_token,
    ));

    Ok((
        jar,
        Json(LoginResponse {
            access_token: result.pair.access_token,
            user: UserResponse::from(result.principal),
        }),
    ))
}

/// POST /auth/refresh
///
/// Reads the refresh token from its cookie, never from the body, and
/// mints a new access token. A missing cookie is 401; a rejected token is
/// 403. When rotation is enabled the replacement refresh cookie rides
/// along on the response.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<RefreshResponse>), ApiError> {
    let token = jar
        .get(&state.config.auth.refresh_cookie_name)
        .map(|c| c.value().to_string())
        .ok_or_else(|| AppError::unauthorized("Refresh token not found"))?;

    let outcome = state.session_manager.refresh(&token)?;

    let jar = match &outcome.rotated {
        Some(rotated) => jar.add(refresh_cookie(&state.config.auth, &rotated.refresh_token)),
        None => jar,
    };

    Ok((
        jar,
        Json(RefreshResponse {
            access_token: outcome.access_token,
        }),
    ))
}

/// POST /auth/logout
///
/// Revokes the session named by the refresh cookie (when present and
/// decodable) and clears the cookie with identical attributes. Always
/// succeeds; logging out twice is not an error.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<MessageResponse>) {
    if let Some(cookie) = jar.get(&state.config.auth.refresh_cookie_name) {
        if let Ok(claims) = state.token_decoder.decode_refresh(cookie.value()) {
            state.session_manager.logout(claims.session_id());
        }
    }

    let jar = jar.add(clear_refresh_cookie(&state.config.auth));

    (
        jar,
        Json(MessageResponse {
            message: "Logged out".to_string(),
        }),
    )
}
