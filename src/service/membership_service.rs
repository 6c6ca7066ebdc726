//! Membership purchase and cancellation.

use chrono::Utc;

use super::ledger_service::LedgerService;
use crate::domain::{Actor, LedgerEvent, Membership, MembershipPlan, PlanId};
use crate::error::LedgerError;

impl LedgerService {
    /// Creates a membership for the caller on `plan_id`, replacing any
    /// prior membership. Pack plans start with the plan's credits and
    /// zero used.
    ///
    /// Payment is settled by the caller before this is invoked.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] without a caller.
    /// - [`LedgerError::PlanNotFound`] for an unknown plan.
    pub async fn purchase_membership(
        &self,
        actor: Option<&Actor>,
        plan_id: PlanId,
    ) -> Result<Membership, LedgerError> {
        let actor = actor.ok_or(LedgerError::NotAuthenticated)?;
        let plan = self.catalog.plan(plan_id).await?;
        let now = Utc::now();

        let membership = Membership::purchase(actor.user_id, &plan, now);
        let replaced = self.memberships.replace(membership.clone()).await;

        let _ = self.event_bus.publish(LedgerEvent::MembershipPurchased {
            user_id: actor.user_id,
            membership_id: membership.id,
            plan_id,
            timestamp: now,
        });
        tracing::info!(
            user_id = %actor.user_id,
            membership_id = %membership.id,
            plan = %plan.name,
            replaced = replaced.is_some(),
            "membership purchased"
        );
        Ok(membership)
    }

    /// Marks the caller's membership cancelled. Access is not revoked: a
    /// cancelled pack keeps drawing its remaining credits until its
    /// `end_date`. Cancelling an already cancelled membership returns it
    /// unchanged.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] without a caller.
    /// - [`LedgerError::MembershipNotFound`] if the caller has none.
    pub async fn cancel_membership(
        &self,
        actor: Option<&Actor>,
    ) -> Result<Membership, LedgerError> {
        let actor = actor.ok_or(LedgerError::NotAuthenticated)?;
        let membership = self
            .memberships
            .update(actor.user_id, |m| {
                m.cancel();
                m.clone()
            })
            .await
            .ok_or(LedgerError::MembershipNotFound(actor.user_id))?;

        let _ = self.event_bus.publish(LedgerEvent::MembershipCancelled {
            user_id: actor.user_id,
            membership_id: membership.id,
            timestamp: Utc::now(),
        });
        tracing::info!(user_id = %actor.user_id, membership_id = %membership.id, "membership cancelled");
        Ok(membership)
    }

    /// The caller's membership with its status evaluated as of now.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] without a caller.
    /// - [`LedgerError::MembershipNotFound`] if the caller has none.
    pub async fn membership(&self, actor: Option<&Actor>) -> Result<Membership, LedgerError> {
        let actor = actor.ok_or(LedgerError::NotAuthenticated)?;
        let membership = self.memberships.get(actor.user_id).await?;
        Ok(membership.as_of(Utc::now()))
    }

    /// Every purchasable plan, cheapest first.
    pub async fn plans(&self) -> Vec<MembershipPlan> {
        self.catalog.plans().await
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::LedgerPolicy;
    use crate::domain::membership::MembershipStatus;
    use crate::service::test_support::{fixture, member};

    #[tokio::test]
    async fn purchase_pack_grants_credits() {
        let fx = fixture(LedgerPolicy::default()).await;
        let user = member();
        let Ok(membership) = fx.service.purchase_membership(Some(&user), fx.pack_plan).await
        else {
            panic!("purchase should succeed");
        };
        assert_eq!(membership.status, MembershipStatus::Active);
        assert_eq!(membership.credits_remaining, Some(10));
        assert_eq!(membership.credits_used, Some(0));
        assert!(membership.end_date.is_some());
    }

    #[tokio::test]
    async fn purchase_replaces_previous_membership() {
        let fx = fixture(LedgerPolicy::default()).await;
        let user = member();
        let _ = fx.service.purchase_membership(Some(&user), fx.pack_plan).await;
        let Ok(unlimited) = fx
            .service
            .purchase_membership(Some(&user), fx.unlimited_plan)
            .await
        else {
            panic!("purchase should succeed");
        };
        let Ok(current) = fx.service.membership(Some(&user)).await else {
            panic!("membership should exist");
        };
        assert_eq!(current.id, unlimited.id);
        assert!(current.credits_remaining.is_none());
        assert_eq!(fx.service.memberships().len().await, 1);
    }

    #[tokio::test]
    async fn unknown_plan_is_rejected() {
        let fx = fixture(LedgerPolicy::default()).await;
        assert!(matches!(
            fx.service
                .purchase_membership(Some(&member()), PlanId::new())
                .await,
            Err(LedgerError::PlanNotFound(_))
        ));
    }

    #[tokio::test]
    async fn cancel_keeps_credits_on_record() {
        let fx = fixture(LedgerPolicy::default()).await;
        let user = member();
        let _ = fx.service.purchase_membership(Some(&user), fx.pack_plan).await;
        let mut rx = fx.service.event_bus().subscribe();

        let Ok(cancelled) = fx.service.cancel_membership(Some(&user)).await else {
            panic!("cancel should succeed");
        };
        assert_eq!(cancelled.status, MembershipStatus::Cancelled);
        assert_eq!(cancelled.credits_remaining, Some(10));
        assert!(matches!(
            rx.recv().await,
            Ok(LedgerEvent::MembershipCancelled { .. })
        ));
    }

    #[tokio::test]
    async fn plans_are_sorted_by_price() {
        let fx = fixture(LedgerPolicy::default()).await;
        let plans = fx.service.plans().await;
        assert_eq!(plans.len(), 2);
        assert!(plans.windows(2).all(|w| match w {
            [a, b] => a.price_cents <= b.price_cents,
            _ => true,
        }));
    }
}
