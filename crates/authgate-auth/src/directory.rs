//! In-memory user directory.
//!
//! Stands in for a real user store; only the read/write contract matters
//! to the rest of the system. Passwords are compared exactly; hashing and
//! storage hardening are out of scope here.

use dashmap::DashMap;
use uuid::Uuid;

use authgate_core::types::Principal;

/// A directory entry.
#[derive(Debug, Clone)]
struct UserRecord {
    principal: Principal,
    password: String,
}

/// In-memory username-keyed user directory.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: DashMap<String, UserRecord>,
}

impl UserDirectory {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user and returns the created principal.
    ///
    /// An existing entry under the same username is replaced.
    pub fn insert(
        &self,
        username: impl Into<String>,
        password: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Principal {
        let username = username.into();
        let principal = Principal {
            id: Uuid::new_v4(),
            username: username.clone(),
            display_name: display_name.into(),
        };
        self.users.insert(
            username,
            UserRecord {
                principal: principal.clone(),
                password: password.into(),
            },
        );
        principal
    }

    /// Verifies a username/password pair, returning the principal on an
    /// exact match. Unknown username and wrong password are
    /// indistinguishable to the caller.
    pub fn verify(&self, username: &str, password: &str) -> Option<Principal> {
        self.users
            .get(username)
            .filter(|record| record.password == password)
            .map(|record| record.principal.clone())
    }

    /// Looks up a principal by ID.
    pub fn find_by_id(&self, id: Uuid) -> Option<Principal> {
        self.users
            .iter()
            .find(|entry| entry.principal.id == id)
            .map(|entry| entry.principal.clone())
    }
}
