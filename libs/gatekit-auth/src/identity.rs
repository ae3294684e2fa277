use gatekit_access::Role;
use serde::{Deserialize, Serialize};

/// Subject id attached to requests authenticated with the shared API key.
pub const SERVICE_SUBJECT: &str = "api-key-user";

/// Stored user record as surfaced by the identity store.
///
/// Only the fields the gateway needs; the full profile stays in the
/// directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl UserRecord {
    #[must_use]
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
            email: None,
            first_name: None,
            last_name: None,
        }
    }
}

/// Result of a successful authentication, attached to the request
/// extensions for the rest of the request's lifetime and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    /// Synthetic service identity from the API-key path. Carries no role:
    /// API-key callers bypass role-based checks entirely.
    Service,
    /// Resolved user from the identity-token path.
    User(UserRecord),
}

impl Identity {
    /// Stable subject identifier for logging.
    #[must_use]
    pub fn subject(&self) -> &str {
        match self {
            Identity::Service => SERVICE_SUBJECT,
            Identity::User(user) => &user.id,
        }
    }

    /// The role, if this identity carries one.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        match self {
            Identity::Service => None,
            Identity::User(user) => Some(user.role),
        }
    }

    #[must_use]
    pub fn is_service(&self) -> bool {
        matches!(self, Identity::Service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_identity_has_no_role() {
        let id = Identity::Service;
        assert!(id.is_service());
        assert_eq!(id.role(), None);
        assert_eq!(id.subject(), SERVICE_SUBJECT);
    }

    #[test]
    fn user_identity_exposes_role() {
        let id = Identity::User(UserRecord::new("u-1", Role::Member));
        assert_eq!(id.role(), Some(Role::Member));
        assert_eq!(id.subject(), "u-1");
    }
}
