//! Request wrapper with single-flight refresh coordination.
//!
//! Any number of in-flight requests may discover an expired access token
//! at arbitrary times relative to one another. The first discoverer
//! becomes the leader and performs the one refresh round-trip; everyone
//! else attaches as a follower to the pending outcome. Every registered
//! follower receives exactly one resolution, in arrival order, even if the
//! leader's future is dropped mid-flight.

use std::sync::{Arc, Mutex, MutexGuard};

use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use authgate_core::types::Principal;

use crate::error::ClientError;
use crate::state::AuthState;

/// Wire code the server attaches to the one refreshable failure class.
const TOKEN_EXPIRED_CODE: &str = "TOKEN_EXPIRED";

/// Resolution of a refresh round-trip, delivered to the leader and every
/// follower exactly once.
#[derive(Debug, Clone)]
enum RefreshResolution {
    /// Refresh succeeded; the new access token is already in the state
    /// cell.
    Refreshed,
    /// Refresh failed; the state cell has been cleared.
    Failed,
}

/// Coordinator phase. At most one refresh round-trip is in flight at any
/// time.
#[derive(Default)]
enum Phase {
    #[default]
    Idle,
    Refreshing {
        waiters: Vec<oneshot::Sender<RefreshResolution>>,
    },
}

/// Shared single-flight state.
#[derive(Default)]
struct Flight {
    phase: Mutex<Phase>,
}

impl Flight {
    /// Locks the phase, recovering from a poisoned mutex.
    fn lock_phase(&self) -> MutexGuard<'_, Phase> {
        match self.phase.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Drains and fails all waiters if the leader never resolved them
/// (transport abort, task cancellation). Disarmed on the normal path.
struct FlightGuard {
    flight: Arc<Flight>,
    armed: bool,
}

impl FlightGuard {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let waiters = {
            let mut phase = self.flight.lock_phase();
            match std::mem::take(&mut *phase) {
                Phase::Refreshing { waiters } => waiters,
                Phase::Idle => Vec::new(),
            }
        };
        for waiter in waiters {
            let _ = waiter.send(RefreshResolution::Failed);
        }
    }
}

/// Authenticated HTTP client.
///
/// Attaches the current access token to every request, and on an expired
/// credential drives exactly one refresh round-trip before replaying the
/// failed request once. The refresh token lives in the cookie jar and is
/// only ever sent to the auth endpoints.
#[derive(Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    state: AuthState,
    flight: Arc<Flight>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ApiFailure {
    #[serde(default)]
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginBody {
    access_token: String,
    user: Principal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody {
    access_token: String,
}

impl AuthClient {
    /// Creates a client for the given server base URL (no trailing slash).
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            state: AuthState::new(),
            flight: Arc::new(Flight::default()),
        })
    }

    /// The observable auth state cell.
    pub fn auth_state(&self) -> &AuthState {
        &self.state
    }

    /// Logs in, storing the access token and principal in the state cell.
    /// The refresh cookie is captured by the cookie jar.
    pub async fn login(&self, username: &str, password: &str) -> Result<Principal, ClientError> {
        let response = self
            .http
            .post(format!("{}/auth/login", self.base_url))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let failure: ApiFailure = response.json().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: failure.message,
            });
        }

        let body: LoginBody = response.json().await?;
        self.state.set(body.access_token, body.user.clone());
        Ok(body.user)
    }

    /// Logs out: best-effort server round-trip (revokes the session and
    /// clears the cookie), then clears the local state unconditionally.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self
            .http
            .post(format!("{}/auth/logout", self.base_url))
            .send()
            .await;
        self.state.clear();
        result?;
        Ok(())
    }

    /// Issues a GET against a protected path, refreshing and replaying
    /// once if the access token has expired.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response, ClientError> {
        self.send(Method::GET, path).await
    }

    async fn send(&self, method: Method, path: &str) -> Result<reqwest::Response, ClientError> {
        let response = self.dispatch(method.clone(), path).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let failure: ApiFailure = response.json().await.unwrap_or_default();
        if failure.error != TOKEN_EXPIRED_CODE {
            // Not the refreshable class: terminal for this credential.
            self.state.clear();
            return Err(ClientError::Unauthenticated);
        }

        match self.refresh_once().await {
            // One replay with the new credential; its response is
            // surfaced as-is, success or not.
            RefreshResolution::Refreshed => self.dispatch(method, path).await,
            RefreshResolution::Failed => Err(ClientError::Unauthenticated),
        }
    }

    async fn dispatch(&self, method: Method, path: &str) -> Result<reqwest::Response, ClientError> {
        let mut request = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(token) = self.state.current().access_token {
            request = request.bearer_auth(token);
        }
        Ok(request.send().await?)
    }

    /// Joins (or starts) the single refresh round-trip.
    ///
    /// The first caller to observe expiry becomes the leader; all others
    /// queue as waiters on the pending outcome and are resolved in arrival
    /// order once the round-trip settles.
    async fn refresh_once(&self) -> RefreshResolution {
        enum Role {
            Leader,
            Follower(oneshot::Receiver<RefreshResolution>),
        }

        let role = {
            let mut phase = self.flight.lock_phase();
            match &mut *phase {
                Phase::Idle => {
                    *phase = Phase::Refreshing {
                        waiters: Vec::new(),
                    };
                    Role::Leader
                }
                Phase::Refreshing { waiters } => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Role::Follower(rx)
                }
            }
        };

        match role {
            Role::Leader => {
                let guard = FlightGuard {
                    flight: Arc::clone(&self.flight),
                    armed: true,
                };

                debug!("Access token expired, refreshing");
                let resolution = match self.call_refresh().await {
                    Ok(access_token) => {
                        self.state.set_access_token(access_token);
                        RefreshResolution::Refreshed
                    }
                    Err(e) => {
                        warn!(error = %e, "Refresh failed, clearing auth state");
                        self.state.clear();
                        RefreshResolution::Failed
                    }
                };

                // The state cell is already updated; release the waiters
                // in arrival order and return to idle.
                let waiters = {
                    let mut phase = self.flight.lock_phase();
                    match std::mem::take(&mut *phase) {
                        Phase::Refreshing { waiters } => waiters,
                        Phase::Idle => Vec::new(),
                    }
                };
                for waiter in waiters {
                    let _ = waiter.send(resolution.clone());
                }

                guard.disarm();
                resolution
            }
            // A dropped sender resolves as failure rather than hanging.
            Role::Follower(rx) => rx.await.unwrap_or(RefreshResolution::Failed),
        }
    }

    /// The refresh round-trip itself. The cookie jar supplies the refresh
    /// token; the body carries nothing.
    async fn call_refresh(&self) -> Result<String, ClientError> {
        let response = self
            .http
            .post(format!("{}/auth/refresh", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let failure: ApiFailure = response.json().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: failure.message,
            });
        }

        let body: RefreshBody = response.json().await?;
        Ok(body.access_token)
    }
}
