//! Process-wide, observable client auth state.

use std::sync::Arc;

use tokio::sync::watch;

use authgate_core::types::Principal;

/// A point-in-time view of the client's auth state.
///
/// This is a cache of the server-issued access credential, not the source
/// of truth. The refresh token is never stored here; it lives in the
/// transport's cookie jar.
#[derive(Debug, Clone, Default)]
pub struct AuthSnapshot {
    /// The current access token, if logged in.
    pub access_token: Option<String>,
    /// The authenticated principal, if logged in.
    pub principal: Option<Principal>,
}

impl AuthSnapshot {
    /// Whether a credential is currently held.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Observable auth state cell.
///
/// Written only by the login, refresh, and logout flows; concurrent writes
/// are serialized through the refresh coordinator. UI layers observe
/// changes via [`AuthState::subscribe`].
#[derive(Debug, Clone)]
pub struct AuthState {
    cell: Arc<watch::Sender<AuthSnapshot>>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthState {
    /// Creates an empty (logged-out) state cell.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthSnapshot::default());
        Self { cell: Arc::new(tx) }
    }

    /// Replaces the state with a fresh credential and principal.
    pub fn set(&self, access_token: String, principal: Principal) {
        self.cell.send_replace(AuthSnapshot {
            access_token: Some(access_token),
            principal: Some(principal),
        });
    }

    /// Swaps in a new access token, keeping the principal.
    pub(crate) fn set_access_token(&self, access_token: String) {
        self.cell.send_modify(|snapshot| {
            snapshot.access_token = Some(access_token);
        });
    }

    /// Clears the state (logout or unrecoverable refresh failure).
    pub fn clear(&self) {
        self.cell.send_replace(AuthSnapshot::default());
    }

    /// Returns the current snapshot.
    pub fn current(&self) -> AuthSnapshot {
        self.cell.borrow().clone()
    }

    /// Subscribes to state changes (for UI observation).
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.cell.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let state = AuthState::new();
        assert!(!state.current().is_authenticated());

        state.set("token".to_string(), Principal::new("user", "Demo User"));
        let snapshot = state.current();
        assert_eq!(snapshot.access_token.as_deref(), Some("token"));
        assert_eq!(snapshot.principal.expect("principal").username, "user");

        state.clear();
        assert!(!state.current().is_authenticated());
        assert!(state.current().principal.is_none());
    }

    #[test]
    fn test_set_access_token_keeps_principal() {
        let state = AuthState::new();
        state.set("old".to_string(), Principal::new("user", "Demo User"));

        state.set_access_token("new".to_string());
        let snapshot = state.current();
        assert_eq!(snapshot.access_token.as_deref(), Some("new"));
        assert!(snapshot.principal.is_some());
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        let state = AuthState::new();
        let mut rx = state.subscribe();

        state.set("token".to_string(), Principal::new("user", "Demo User"));
        rx.changed().await.expect("sender alive");
        assert!(rx.borrow().is_authenticated());
    }
}
