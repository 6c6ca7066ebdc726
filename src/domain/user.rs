//! Studio users and the caller identity presented to the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Access role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Studio member.
    Customer,
    /// Back-office administrator.
    Admin,
}

/// A registered user.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    /// User identifier.
    pub id: UserId,
    /// Login email, stored lowercase.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Optional phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Access role.
    pub role: Role,
    /// Registration instant.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Creates a user with a fresh id.
    #[must_use]
    pub fn new(email: &str, name: &str, phone: Option<String>, role: Role) -> Self {
        Self {
            id: UserId::new(),
            email: email.trim().to_lowercase(),
            name: name.trim().to_string(),
            phone,
            role,
            created_at: Utc::now(),
        }
    }

    /// Identity this user presents to the ledger.
    #[must_use]
    pub const fn actor(&self) -> Actor {
        Actor {
            user_id: self.id,
            role: self.role,
        }
    }
}

/// Authenticated caller of a ledger operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// Calling user.
    pub user_id: UserId,
    /// Calling user's role.
    pub role: Role,
}

impl Actor {
    /// A customer actor.
    #[must_use]
    pub const fn customer(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Customer,
        }
    }

    /// An admin actor.
    #[must_use]
    pub const fn admin(user_id: UserId) -> Self {
        Self {
            user_id,
            role: Role::Admin,
        }
    }

    /// Returns `true` for administrators.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Derives a display name from an email's local part: `jane.doe@x.io`
/// becomes `Jane Doe`.
#[must_use]
pub fn name_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    local
        .split(['.', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect::<String>()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_email() {
        let u = User::new("  Demo@Example.com ", "Jordan", None, Role::Customer);
        assert_eq!(u.email, "demo@example.com");
        assert_eq!(u.actor().user_id, u.id);
    }

    #[test]
    fn admin_check() {
        assert!(Actor::admin(UserId::new()).is_admin());
        assert!(!Actor::customer(UserId::new()).is_admin());
    }

    #[test]
    fn display_name_from_email() {
        assert_eq!(name_from_email("jane.doe@example.com"), "Jane Doe");
        assert_eq!(name_from_email("sam_lee@studio.io"), "Sam Lee");
        assert_eq!(name_from_email("solo@x.io"), "Solo");
    }
}
