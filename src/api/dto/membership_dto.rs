//! Membership purchase DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Membership, PlanId};

/// Request body for `POST /membership`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PurchaseRequest {
    /// Plan to purchase.
    pub plan_id: PlanId,
}

/// Response body for `POST /membership` (201 Created).
#[derive(Debug, Serialize, ToSchema)]
pub struct PurchaseResponse {
    /// The new membership.
    pub membership: Membership,
    /// Settled payment reference.
    pub payment_id: String,
}
