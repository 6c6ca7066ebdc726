//! Membership plans and per-user membership records with credit
//! accounting.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{MembershipId, PlanId, UserId};

/// Kind of entitlement a plan grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlanType {
    /// Single-class pass.
    Dropin,
    /// Prepaid bundle of class credits.
    Pack,
    /// Unlimited classes for the plan's duration.
    Unlimited,
}

/// A purchasable membership plan.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MembershipPlan {
    /// Plan identifier.
    pub id: PlanId,
    /// Display name, e.g. `"10-Class Pack"`.
    pub name: String,
    /// Marketing description.
    pub description: String,
    /// Price in US cents.
    pub price_cents: u64,
    /// Entitlement kind.
    pub plan_type: PlanType,
    /// Total credits granted (pack plans only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits: Option<u32>,
    /// Validity in days from purchase, if the plan expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
    /// Feature bullet points.
    pub features: Vec<String>,
    /// Highlighted in the plan picker.
    pub popular: bool,
}

/// Status of a membership record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    /// In good standing.
    Active,
    /// Cancelled by the member; access lapses at `end_date`.
    Cancelled,
    /// Past its `end_date`.
    Expired,
}

/// A user's current entitlement. One per user; a purchase replaces any
/// prior record wholesale.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Membership {
    /// Membership identifier.
    pub id: MembershipId,
    /// Owning user.
    pub user_id: UserId,
    /// Plan purchased.
    pub plan_id: PlanId,
    /// Plan name at purchase time.
    pub plan_name: String,
    /// Plan kind at purchase time.
    pub plan_type: PlanType,
    /// Stored status. See [`Membership::effective_status`].
    pub status: MembershipStatus,
    /// Purchase instant.
    pub start_date: DateTime<Utc>,
    /// Expiry instant, if the plan expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// Unused credits (pack plans only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_remaining: Option<u32>,
    /// Consumed credits (pack plans only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_used: Option<u32>,
}

impl Membership {
    /// Creates an active membership for `user_id` on `plan`, starting at
    /// `now`.
    #[must_use]
    pub fn purchase(user_id: UserId, plan: &MembershipPlan, now: DateTime<Utc>) -> Self {
        let is_pack = plan.plan_type == PlanType::Pack;
        Self {
            id: MembershipId::new(),
            user_id,
            plan_id: plan.id,
            plan_name: plan.name.clone(),
            plan_type: plan.plan_type,
            status: MembershipStatus::Active,
            start_date: now,
            end_date: plan
                .duration_days
                .map(|days| now + Duration::days(i64::from(days))),
            credits_remaining: if is_pack { plan.credits } else { None },
            credits_used: if is_pack { Some(0) } else { None },
        }
    }

    /// Status as of `now`: a record past its `end_date` reads as
    /// `Expired` whatever its stored status.
    #[must_use]
    pub fn effective_status(&self, now: DateTime<Utc>) -> MembershipStatus {
        match self.end_date {
            Some(end) if now >= end => MembershipStatus::Expired,
            _ => self.status,
        }
    }

    /// Draws one credit if this is an unexpired pack with credits left.
    /// A cancelled pack still draws credits until its `end_date`. Returns
    /// whether a credit was charged. A pack with zero credits is left
    /// untouched and the caller proceeds uncharged.
    pub fn charge_credit(&mut self, now: DateTime<Utc>) -> bool {
        if self.plan_type != PlanType::Pack
            || self.effective_status(now) == MembershipStatus::Expired
        {
            return false;
        }
        match self.credits_remaining {
            Some(remaining) if remaining > 0 => {
                self.credits_remaining = Some(remaining - 1);
                self.credits_used = Some(self.credits_used.unwrap_or(0).saturating_add(1));
                true
            }
            _ => false,
        }
    }

    /// Marks the membership cancelled. Remaining credits and `end_date`
    /// are untouched.
    pub fn cancel(&mut self) {
        self.status = MembershipStatus::Cancelled;
    }

    /// Returns a copy with `status` replaced by the effective status at
    /// `now`, for display.
    #[must_use]
    pub fn as_of(&self, now: DateTime<Utc>) -> Self {
        let mut view = self.clone();
        view.status = self.effective_status(now);
        view
    }
}
