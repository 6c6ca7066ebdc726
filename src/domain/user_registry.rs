//! User directory keyed by id and by email.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::UserId;
use super::user::User;
use crate::error::LedgerError;

#[derive(Debug, Default)]
struct Directory {
    by_id: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
}

/// Registered users.
#[derive(Debug, Default)]
pub struct UserRegistry {
    inner: RwLock<Directory>,
}

impl UserRegistry {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EmailTaken`] if the email is already
    /// registered.
    pub async fn insert(&self, user: User) -> Result<User, LedgerError> {
        let mut dir = self.inner.write().await;
        if dir.by_email.contains_key(&user.email) {
            return Err(LedgerError::EmailTaken(user.email));
        }
        dir.by_email.insert(user.email.clone(), user.id);
        dir.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::UserNotFound`] for an unknown id.
    pub async fn get(&self, id: UserId) -> Result<User, LedgerError> {
        self.inner
            .read()
            .await
            .by_id
            .get(&id)
            .cloned()
            .ok_or(LedgerError::UserNotFound(id))
    }

    /// Looks up a user by email, case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> Option<User> {
        let key = email.trim().to_lowercase();
        let dir = self.inner.read().await;
        dir.by_email
            .get(&key)
            .and_then(|id| dir.by_id.get(id))
            .cloned()
    }

    /// Returns the number of registered users.
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    /// Returns `true` if no users are registered.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Role;

    #[tokio::test]
    async fn insert_then_lookup_by_email() {
        let registry = UserRegistry::new();
        let user = User::new("demo@example.com", "Jordan Rivera", None, Role::Customer);
        let id = user.id;
        assert!(registry.insert(user).await.is_ok());

        let found = registry.find_by_email("DEMO@example.com").await;
        assert_eq!(found.map(|u| u.id), Some(id));
        assert!(registry.get(id).await.is_ok());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let registry = UserRegistry::new();
        let _ = registry
            .insert(User::new("a@b.io", "A", None, Role::Customer))
            .await;
        let second = registry
            .insert(User::new("A@B.io", "Other", None, Role::Customer))
            .await;
        assert!(matches!(second, Err(LedgerError::EmailTaken(_))));
    }

    #[tokio::test]
    async fn unknown_user() {
        let registry = UserRegistry::new();
        assert!(registry.is_empty().await);
        assert!(registry.find_by_email("nobody@x.io").await.is_none());
        assert!(matches!(
            registry.get(UserId::new()).await,
            Err(LedgerError::UserNotFound(_))
        ));
    }
}
