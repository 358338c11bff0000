//! In-memory session and revocation store.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// A login session.
///
/// One session is created per login. Sessions are mutated (revoked, refresh
/// bookkeeping) but never deleted; they are retained for audit and
/// refresh-token reuse detection.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Session {
    /// Session ID.
    pub id: Uuid,
    /// Principal this session belongs to.
    pub principal_id: Uuid,
    /// Whether the session has been revoked (logout or detected reuse).
    pub revoked: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// ID of the refresh token currently accepted for this session.
    pub current_jti: Uuid,
    /// Number of successful refreshes performed against this session.
    pub refresh_count: u32,
}

/// Concurrent in-memory session store.
///
/// Reads dominate; writes are session creation, refresh bookkeeping, and
/// revocation. Entries are never pruned; only the correctness of the
/// revoked flag matters, not storage growth.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<Uuid, Session>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new session for the given principal, bound to the given
    /// refresh token ID.
    pub fn create(&self, principal_id: Uuid, jti: Uuid) -> Session {
        let session = Session {
            id: Uuid::new_v4(),
            principal_id,
            revoked: false,
            created_at: Utc::now(),
            current_jti: jti,
            refresh_count: 0,
        };
        self.sessions.insert(session.id, session.clone());
        session
    }

    /// Finds a session by ID.
    pub fn find(&self, session_id: Uuid) -> Option<Session> {
        self.sessions.get(&session_id).map(|s| s.value().clone())
    }

    /// Reports whether a session is revoked. Unknown sessions report
    /// revoked: the store never deletes entries, so an unknown ID is
    /// foreign or forged.
    pub fn is_revoked(&self, session_id: Uuid) -> bool {
        self.sessions
            .get(&session_id)
            .map(|s| s.revoked)
            .unwrap_or(true)
    }

    /// Marks a session revoked. Idempotent; revoking an unknown or
    /// already-revoked session is not an error.
    pub fn revoke(&self, session_id: Uuid) {
        if let Some(mut session) = self.sessions.get_mut(&session_id) {
            session.revoked = true;
        }
    }

    /// Finds all sessions belonging to a principal (audit view).
    pub fn find_by_principal(&self, principal_id: Uuid) -> Vec<Session> {
        self.sessions
            .iter()
            .filter(|entry| entry.principal_id == principal_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Records a successful refresh: bumps the refresh counter and swaps in
    /// the now-current refresh token ID.
    pub fn record_refresh(&self, session_id: Uuid, new_jti: Uuid) {
        if let Some(mut session) = self.sessions.get_mut(&session_id) {
            session.refresh_count += 1;
            session.current_jti = new_jti;
        }
    }
}
