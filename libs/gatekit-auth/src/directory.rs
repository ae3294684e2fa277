use crate::identity::UserRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use thiserror::Error;

/// Failure while consulting the identity store.
///
/// This is the unexpected class: the store being unreachable is not an
/// authentication verdict and must not be silently downgraded to one,
/// except by the optional-auth variant.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    #[error("identity store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only lookup of user records by token subject.
///
/// The authenticators only ever read; nothing in the authentication path
/// writes to the directory.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Find the user record for a subject identifier.
    ///
    /// `Ok(None)` means the directory answered and no such user exists —
    /// a distinct outcome from the directory failing to answer.
    ///
    /// # Errors
    ///
    /// [`DirectoryError::Unavailable`] if the store cannot be consulted.
    async fn find_user(&self, subject: &str) -> Result<Option<UserRecord>, DirectoryError>;
}

/// Static in-memory directory for tests and the demo gateway.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    users: HashMap<String, UserRecord>,
}

impl InMemoryDirectory {
    #[must_use]
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: UserRecord) -> Self {
        self.users.insert(user.id.clone(), user);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_user(&self, subject: &str) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self.users.get(subject).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatekit_access::Role;

    #[tokio::test]
    async fn lookup_hits_and_misses() {
        let dir = InMemoryDirectory::default().with_user(UserRecord::new("u-1", Role::Member));
        assert_eq!(dir.len(), 1);

        let found = dir.find_user("u-1").await.unwrap();
        assert_eq!(found.map(|u| u.role), Some(Role::Member));

        let missing = dir.find_user("nobody").await.unwrap();
        assert!(missing.is_none());
    }
}
