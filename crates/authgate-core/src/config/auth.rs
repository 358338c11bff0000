//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
///
/// Access and refresh tokens are signed with distinct secrets so a refresh
/// token can never pass access-token verification and vice versa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for access token signing (HMAC-SHA256).
    #[serde(default = "default_access_secret")]
    pub access_secret: String,
    /// Secret key for refresh token signing (HMAC-SHA256).
    #[serde(default = "default_refresh_secret")]
    pub refresh_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Name of the refresh token cookie.
    #[serde(default = "default_cookie_name")]
    pub refresh_cookie_name: String,
    /// Path scope of the refresh token cookie. Keeps the cookie off every
    /// request except the refresh/logout round-trips.
    #[serde(default = "default_cookie_path")]
    pub refresh_cookie_path: String,
    /// Whether the refresh cookie is marked `Secure` (HTTPS only).
    #[serde(default)]
    pub cookie_secure: bool,
    /// Whether a successful refresh also rotates the refresh token and
    /// revokes the session on detected reuse of a consumed token.
    #[serde(default)]
    pub rotate_refresh_tokens: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_secret: default_access_secret(),
            refresh_secret: default_refresh_secret(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            refresh_cookie_name: default_cookie_name(),
            refresh_cookie_path: default_cookie_path(),
            cookie_secure: false,
            rotate_refresh_tokens: false,
        }
    }
}

fn default_access_secret() -> String {
    "CHANGE_ME_ACCESS_SECRET".to_string()
}

fn default_refresh_secret() -> String {
    "CHANGE_ME_REFRESH_SECRET".to_string()
}

fn default_access_ttl() -> u64 {
    15
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_cookie_name() -> String {
    "refreshToken".to_string()
}

fn default_cookie_path() -> String {
    "/auth".to_string()
}
