//! Sign-up, login and caller resolution.
//!
//! Credentials are validated for shape only and never stored. Seeded
//! admin accounts additionally require the configured admin password.

use std::sync::Arc;

use crate::domain::user::name_from_email;
use crate::domain::{Actor, Role, User, UserId, UserRegistry};
use crate::error::LedgerError;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Account operations over the [`UserRegistry`].
#[derive(Debug, Clone)]
pub struct AccountService {
    users: Arc<UserRegistry>,
    admin_password: String,
}

impl AccountService {
    /// Creates a new `AccountService`.
    #[must_use]
    pub fn new(users: Arc<UserRegistry>, admin_password: String) -> Self {
        Self {
            users,
            admin_password,
        }
    }

    /// Returns a reference to the user registry.
    #[must_use]
    pub fn users(&self) -> &Arc<UserRegistry> {
        &self.users
    }

    /// Registers a new customer account.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidRequest`] for an empty email or name, or a
    ///   password shorter than [`MIN_PASSWORD_LEN`].
    /// - [`LedgerError::EmailTaken`] if the email is already registered.
    pub async fn signup(
        &self,
        email: &str,
        name: &str,
        password: &str,
        phone: Option<String>,
    ) -> Result<User, LedgerError> {
        validate_email(email)?;
        if name.trim().is_empty() {
            return Err(LedgerError::InvalidRequest("name is required".to_string()));
        }
        validate_password(password)?;

        let phone = phone.filter(|p| !p.trim().is_empty());
        let user = self
            .users
            .insert(User::new(email, name, phone, Role::Customer))
            .await?;
        tracing::info!(user_id = %user.id, "account created");
        Ok(user)
    }

    /// Logs a user in by email. Unknown emails are registered as
    /// customers on the fly.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::InvalidRequest`] for a malformed email or a short
    ///   password.
    /// - [`LedgerError::NotAuthenticated`] for an admin account presented
    ///   with the wrong password.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, LedgerError> {
        validate_email(email)?;
        validate_password(password)?;

        if let Some(user) = self.users.find_by_email(email).await {
            if user.role == Role::Admin && password != self.admin_password {
                tracing::debug!(user_id = %user.id, "admin login rejected");
                return Err(LedgerError::NotAuthenticated);
            }
            tracing::info!(user_id = %user.id, "logged in");
            return Ok(user);
        }

        let user = User::new(email, &name_from_email(email), None, Role::Customer);
        let user = match self.users.insert(user).await {
            Ok(user) => user,
            // Lost a race with a concurrent login for the same email.
            Err(LedgerError::EmailTaken(_)) => self
                .users
                .find_by_email(email)
                .await
                .ok_or_else(|| LedgerError::Internal("user vanished after insert".to_string()))?,
            Err(e) => return Err(e),
        };
        tracing::info!(user_id = %user.id, "logged in as new member");
        Ok(user)
    }

    /// Resolves a presented user id into an [`Actor`]. Unknown ids
    /// resolve to `None`.
    pub async fn resolve(&self, user_id: UserId) -> Option<Actor> {
        self.users.get(user_id).await.ok().map(|u| u.actor())
    }

    /// Returns the user behind `actor`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] without a caller.
    /// - [`LedgerError::UserNotFound`] if the account no longer exists.
    pub async fn me(&self, actor: Option<&Actor>) -> Result<User, LedgerError> {
        let actor = actor.ok_or(LedgerError::NotAuthenticated)?;
        self.users.get(actor.user_id).await
    }

    /// Registers a pre-built user, used for seeding.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::EmailTaken`] if the email is already
    /// registered.
    pub async fn register(&self, user: User) -> Result<User, LedgerError> {
        self.users.insert(user).await
    }
}

fn validate_email(email: &str) -> Result<(), LedgerError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(LedgerError::InvalidRequest(format!(
            "invalid email address: {email:?}"
        ))),
    }
}

fn validate_password(password: &str) -> Result<(), LedgerError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(LedgerError::InvalidRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}
