//! Per-user membership storage.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::UserId;
use super::membership::Membership;
use crate::error::LedgerError;

/// One membership record per user. Only the ledger mutates it.
#[derive(Debug, Default)]
pub struct MembershipRegistry {
    memberships: RwLock<HashMap<UserId, Membership>>,
}

impl MembershipRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `membership`, replacing any prior record of the same user.
    /// Returns the replaced record.
    pub async fn replace(&self, membership: Membership) -> Option<Membership> {
        self.memberships
            .write()
            .await
            .insert(membership.user_id, membership)
    }

    /// Returns a copy of the user's membership.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::MembershipNotFound`] if the user has none.
    pub async fn get(&self, user_id: UserId) -> Result<Membership, LedgerError> {
        self.memberships
            .read()
            .await
            .get(&user_id)
            .cloned()
            .ok_or(LedgerError::MembershipNotFound(user_id))
    }

    /// Applies `f` to the user's membership under the write lock and
    /// returns its result, or `None` if the user has no membership.
    pub async fn update<R>(&self, user_id: UserId, f: impl FnOnce(&mut Membership) -> R) -> Option<R> {
        self.memberships.write().await.get_mut(&user_id).map(f)
    }

    /// Returns the number of stored memberships.
    pub async fn len(&self) -> usize {
        self.memberships.read().await.len()
    }

    /// Returns `true` if no memberships are stored.
    pub async fn is_empty(&self) -> bool {
        self.memberships.read().await.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::PlanId;
    use crate::domain::membership::{MembershipPlan, MembershipStatus, PlanType};

    fn plan() -> MembershipPlan {
        MembershipPlan {
            id: PlanId::new(),
            name: "10-Class Pack".to_string(),
            description: String::new(),
            price_cents: 15_000,
            plan_type: PlanType::Pack,
            credits: Some(10),
            duration_days: Some(90),
            features: vec![],
            popular: true,
        }
    }

    #[tokio::test]
    async fn replace_returns_previous() {
        let registry = MembershipRegistry::new();
        let user = UserId::new();
        let first = Membership::purchase(user, &plan(), Utc::now());
        let first_id = first.id;
        assert!(registry.replace(first).await.is_none());

        let second = Membership::purchase(user, &plan(), Utc::now());
        let replaced = registry.replace(second).await;
        assert_eq!(replaced.map(|m| m.id), Some(first_id));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let registry = MembershipRegistry::new();
        assert!(registry.is_empty().await);
        assert!(matches!(
            registry.get(UserId::new()).await,
            Err(LedgerError::MembershipNotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_mutates_in_place() {
        let registry = MembershipRegistry::new();
        let user = UserId::new();
        registry
            .replace(Membership::purchase(user, &plan(), Utc::now()))
            .await;

        let charged = registry
            .update(user, |m| m.charge_credit(Utc::now()))
            .await;
        assert_eq!(charged, Some(true));
        assert!(registry.update(UserId::new(), |m| m.cancel()).await.is_none());

        let Ok(stored) = registry.get(user).await else {
            panic!("membership missing");
        };
        assert_eq!(stored.credits_remaining, Some(9));
        assert_eq!(stored.status, MembershipStatus::Active);
    }
}
