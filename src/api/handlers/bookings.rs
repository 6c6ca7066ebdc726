//! Handlers for the caller's own bookings.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::extract::CurrentUser;
use crate::api::notify::{self, BookingNotice};
use crate::app_state::AppState;
use crate::domain::booking::CancellationOutcome;
use crate::domain::{Booking, BookingId};
use crate::error::{ErrorResponse, LedgerError};

/// `GET /bookings`: The caller's bookings, newest first.
///
/// # Errors
///
/// Returns [`LedgerError::NotAuthenticated`] without a caller.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    summary = "My bookings",
    responses(
        (status = 200, description = "Bookings", body = Vec<Booking>),
        (status = 401, description = "Not logged in", body = ErrorResponse),
    )
)]
pub async fn my_bookings(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<Vec<Booking>>, LedgerError> {
    Ok(Json(state.ledger.my_bookings(caller.actor()).await?))
}

/// `GET /bookings/{id}`: One booking, visible to its owner and admins.
///
/// # Errors
///
/// Returns [`LedgerError`] for anonymous callers, unknown bookings and
/// other members' bookings.
#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    summary = "Get booking",
    params(("id" = BookingId, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking", body = Booking),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Another member's booking", body = ErrorResponse),
        (status = 404, description = "Unknown booking", body = ErrorResponse),
    )
)]
pub async fn get_booking(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<BookingId>,
) -> Result<Json<Booking>, LedgerError> {
    Ok(Json(state.ledger.booking(caller.actor(), id).await?))
}

/// `POST /bookings/{id}/cancel`: Cancel a confirmed booking.
///
/// # Errors
///
/// Returns [`LedgerError`] when the booking is unknown, not the caller's,
/// not confirmed, or inside the cancellation window.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "Bookings",
    summary = "Cancel booking",
    description = "Cancels a confirmed booking and frees its spot. Members must cancel before the notice window; admins are exempt. When auto-promotion is on, the earliest waitlist entry takes the spot.",
    params(("id" = BookingId, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking cancelled", body = CancellationOutcome),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Another member's booking", body = ErrorResponse),
        (status = 404, description = "Unknown booking", body = ErrorResponse),
        (status = 409, description = "Booking is not confirmed", body = ErrorResponse),
        (status = 422, description = "Inside the cancellation window", body = ErrorResponse),
    )
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<BookingId>,
) -> Result<Json<CancellationOutcome>, LedgerError> {
    let outcome = state.ledger.cancel_booking(caller.actor(), id).await?;
    notify::booking(&state, &outcome.booking, BookingNotice::Cancelled).await;
    if let Some(promoted) = &outcome.promoted {
        notify::booking(&state, promoted, BookingNotice::Confirmed).await;
    }
    Ok(Json(outcome))
}

/// Booking routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", get(my_bookings))
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}/cancel", post(cancel_booking))
}
