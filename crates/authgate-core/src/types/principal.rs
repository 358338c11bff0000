//! The authenticated principal.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated principal. Immutable once created; user management is
/// out of scope for this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    /// Unique, stable identifier.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Human-readable display name.
    pub display_name: String,
}

impl Principal {
    /// Creates a principal with a fresh identifier.
    pub fn new(username: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            display_name: display_name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_assigns_unique_ids() {
        let a = Principal::new("user", "Demo User");
        let b = Principal::new("user", "Demo User");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_serde_camel_case() {
        let p = Principal::new("user", "Demo User");
        let json = serde_json::to_value(&p).expect("serialize");
        assert_eq!(json["username"], "user");
        assert_eq!(json["displayName"], "Demo User");
    }
}
