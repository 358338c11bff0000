//! Refresh token cookie construction.
//!
//! The cookie attributes are a security contract: HTTP-only so the token is
//! never readable by request-issuing code, SameSite=Strict, path-scoped to
//! the auth endpoints, Max-Age equal to the refresh TTL. The removal cookie
//! must carry the same attributes; a mismatched clear fails to remove the
//! cookie in standards-compliant clients.

use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

use authgate_core::config::auth::AuthConfig;

/// Builds the refresh token cookie set on login (and on refresh when
/// rotation is enabled).
pub fn refresh_cookie(config: &AuthConfig, token: &str) -> Cookie<'static> {
    Cookie::build((config.refresh_cookie_name.clone(), token.to_string()))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Strict)
        .path(config.refresh_cookie_path.clone())
        .max_age(Duration::days(config.refresh_ttl_days as i64))
        .build()
}

/// Builds the removal cookie set on logout.
pub fn clear_refresh_cookie(config: &AuthConfig) -> Cookie<'static> {
    Cookie::build((config.refresh_cookie_name.clone(), ""))
        .http_only(true)
        .secure(config.cookie_secure)
        .same_site(SameSite::Strict)
        .path(config.refresh_cookie_path.clone())
        .max_age(Duration::ZERO)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_cookie_attributes() {
        let config = AuthConfig::default();
        let cookie = refresh_cookie(&config, "tok");

        assert_eq!(cookie.name(), "refreshToken");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));
        assert_eq!(cookie.path(), Some("/auth"));
        assert_eq!(cookie.max_age(), Some(Duration::days(7)));
    }

    #[test]
    fn test_clear_cookie_matches_attributes() {
        let config = AuthConfig::default();
        let set = refresh_cookie(&config, "tok");
        let clear = clear_refresh_cookie(&config);

        assert_eq!(clear.name(), set.name());
        assert_eq!(clear.path(), set.path());
        assert_eq!(clear.http_only(), set.http_only());
        assert_eq!(clear.same_site(), set.same_site());
        assert_eq!(clear.value(), "");
        assert_eq!(clear.max_age(), Some(Duration::ZERO));
    }
}
