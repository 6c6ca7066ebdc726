//! Membership handlers: plans, purchase, status and cancellation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{PurchaseRequest, PurchaseResponse};
use crate::api::extract::CurrentUser;
use crate::api::notify;
use crate::app_state::AppState;
use crate::domain::{Membership, MembershipPlan};
use crate::error::{ErrorResponse, LedgerError};

/// `GET /plans`: Purchasable plans, cheapest first.
#[utoipa::path(
    get,
    path = "/api/v1/plans",
    tag = "Memberships",
    summary = "List plans",
    responses(
        (status = 200, description = "Plans", body = Vec<MembershipPlan>),
    )
)]
pub async fn list_plans(State(state): State<AppState>) -> Json<Vec<MembershipPlan>> {
    Json(state.ledger.plans().await)
}

/// `GET /membership`: The caller's membership.
///
/// # Errors
///
/// Returns [`LedgerError`] for anonymous callers or callers without a
/// membership.
#[utoipa::path(
    get,
    path = "/api/v1/membership",
    tag = "Memberships",
    summary = "Current membership",
    description = "Returns the caller's membership with its status evaluated as of now; a lapsed pack reports `expired`.",
    responses(
        (status = 200, description = "Membership", body = Membership),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "No membership", body = ErrorResponse),
    )
)]
pub async fn get_membership(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<Membership>, LedgerError> {
    Ok(Json(state.ledger.membership(caller.actor()).await?))
}

/// `POST /membership`: Pay for and start a membership.
///
/// # Errors
///
/// Returns [`LedgerError`] for anonymous callers, unknown plans and
/// declined payments.
#[utoipa::path(
    post,
    path = "/api/v1/membership",
    tag = "Memberships",
    summary = "Purchase membership",
    description = "Charges the plan price and replaces any existing membership. Nothing is recorded when the payment is declined.",
    request_body = PurchaseRequest,
    responses(
        (status = 201, description = "Membership purchased", body = PurchaseResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 402, description = "Payment declined", body = ErrorResponse),
        (status = 404, description = "Unknown plan", body = ErrorResponse),
    )
)]
pub async fn purchase_membership(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(req): Json<PurchaseRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let actor = caller.actor().ok_or(LedgerError::NotAuthenticated)?;
    let plan = state.ledger.catalog().plan(req.plan_id).await?;
    let payment = state.payments.charge(plan.price_cents)?;
    let membership = state
        .ledger
        .purchase_membership(Some(actor), plan.id)
        .await?;
    if let Ok(user) = state.accounts.users().get(actor.user_id).await {
        notify::membership(&state, &user, &plan);
    }
    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            membership,
            payment_id: payment.id,
        }),
    ))
}

/// `DELETE /membership`: Cancel the caller's membership.
///
/// # Errors
///
/// Returns [`LedgerError`] for anonymous callers or callers without a
/// membership.
#[utoipa::path(
    delete,
    path = "/api/v1/membership",
    tag = "Memberships",
    summary = "Cancel membership",
    responses(
        (status = 200, description = "Membership cancelled", body = Membership),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "No membership", body = ErrorResponse),
    )
)]
pub async fn cancel_membership(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<Membership>, LedgerError> {
    Ok(Json(state.ledger.cancel_membership(caller.actor()).await?))
}

/// Membership routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/plans", get(list_plans)).route(
        "/membership",
        get(get_membership)
            .post(purchase_membership)
            .delete(cancel_membership),
    )
}
