//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::{DateTime, Utc};
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use authgate_api::state::AppState;
use authgate_auth::directory::UserDirectory;
use authgate_auth::session::manager::SessionManager;
use authgate_auth::session::store::SessionStore;
use authgate_auth::token::decoder::TokenDecoder;
use authgate_auth::token::encoder::TokenEncoder;
use authgate_core::clock::Clock;
use authgate_core::config::AppConfig;
use authgate_core::types::Principal;

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Application config
    pub config: AppConfig,
    /// Session store handle for direct inspection
    pub sessions: Arc<SessionStore>,
    /// The seeded demo principal
    pub principal: Principal,
}

impl TestApp {
    /// Create a test application with default (non-rotating) config
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application with an explicit config
    pub fn with_config(config: AppConfig) -> Self {
        let directory = Arc::new(UserDirectory::new());
        let principal = directory.insert("user", "password", "Demo User");

        let token_encoder = Arc::new(TokenEncoder::new(&config.auth));
        let token_decoder = Arc::new(TokenDecoder::new(&config.auth));
        let sessions = Arc::new(SessionStore::new());
        let session_manager = Arc::new(SessionManager::new(
            Arc::clone(&token_encoder),
            Arc::clone(&token_decoder),
            Arc::clone(&sessions),
            Arc::clone(&directory),
            &config.auth,
        ));

        let app_state = AppState {
            config: Arc::new(config.clone()),
            token_decoder,
            session_manager,
            directory,
        };

        let router = authgate_api::router::build_router(app_state);

        Self {
            router,
            config,
            sessions,
            principal,
        }
    }

    /// Login and return the access token plus the refresh cookie value
    pub async fn login(&self, username: &str, password: &str) -> (String, String) {
        let response = self
            .request(
                "POST",
                "/auth/login",
                Some(serde_json::json!({
                    "username": username,
                    "password": password,
                })),
                None,
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        let access_token = response
            .body
            .get("accessToken")
            .and_then(|v| v.as_str())
            .expect("No accessToken in login response")
            .to_string();

        let refresh_cookie = response
            .refresh_cookie_value()
            .expect("No refresh cookie in login response");

        (access_token, refresh_cookie)
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        cookie: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        if let Some(cookie) = cookie {
            req = req.header("Cookie", format!("refreshToken={}", cookie));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();

        let set_cookies = response
            .headers()
            .get_all(http::header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(String::from)
            .collect();

        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse {
            status,
            body,
            set_cookies,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
    /// Raw Set-Cookie header values
    pub set_cookies: Vec<String>,
}

impl TestResponse {
    /// The value of the refresh cookie set on this response, if any
    pub fn refresh_cookie_value(&self) -> Option<String> {
        self.set_cookies
            .iter()
            .find(|c| c.starts_with("refreshToken="))
            .and_then(|c| c.split(';').next())
            .and_then(|pair| pair.strip_prefix("refreshToken="))
            .map(String::from)
    }
}

/// Config with distinct test secrets, rotation off
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.access_secret = "access-test-secret".to_string();
    config.auth.refresh_secret = "refresh-test-secret".to_string();
    config
}

/// Config with refresh token rotation enabled
pub fn rotating_config() -> AppConfig {
    let mut config = test_config();
    config.auth.rotate_refresh_tokens = true;
    config
}

/// Clock pinned two hours in the past, for minting expired credentials
struct PastClock;

impl Clock for PastClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now() - chrono::Duration::hours(2)
    }
}

/// Mints an access token that is already expired under the given config
pub fn expired_access_token(config: &AppConfig, principal_id: Uuid) -> String {
    let encoder = TokenEncoder::with_clock(&config.auth, Arc::new(PastClock));
    let (token, _) = encoder.issue_access(principal_id).expect("encode");
    token
}

/// Serves the router on an ephemeral local port, returning its address
pub async fn spawn_server(router: Router) -> std::net::SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");

    tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server error");
    });

    addr
}
