//! Admin handlers: timetable management and the booking overview.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};

use crate::api::dto::{
    BookingListResponse, BookingQuery, EventLogQuery, PaginationParams, ScheduleDto,
};
use crate::api::extract::CurrentUser;
use crate::api::handlers::schedules::to_dto;
use crate::app_state::AppState;
use crate::domain::booking::BookingFilter;
use crate::domain::schedule::{NewSchedule, ScheduleUpdate};
use crate::domain::ScheduleId;
use crate::error::{ErrorResponse, LedgerError};
use crate::persistence::models::StoredEvent;
use crate::service::require_admin;

/// `POST /admin/schedules`: Add a class to the timetable.
///
/// # Errors
///
/// Returns [`LedgerError`] for non-admins, unknown class or instructor,
/// inverted times or a zero capacity.
#[utoipa::path(
    post,
    path = "/api/v1/admin/schedules",
    tag = "Admin",
    summary = "Add schedule",
    description = "Schedules a class. Capacity defaults to the class definition's capacity.",
    request_body = NewSchedule,
    responses(
        (status = 201, description = "Schedule added", body = ScheduleDto),
        (status = 400, description = "Invalid times or capacity", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown class or instructor", body = ErrorResponse),
    )
)]
pub async fn add_schedule(
    State(state): State<AppState>,
    caller: CurrentUser,
    Json(req): Json<NewSchedule>,
) -> Result<impl IntoResponse, LedgerError> {
    let schedule = state.ledger.add_schedule(caller.actor(), req).await?;
    Ok((StatusCode::CREATED, Json(to_dto(&state, schedule).await)))
}

/// `PATCH /admin/schedules/{id}`: Edit a schedule.
///
/// # Errors
///
/// Returns [`LedgerError`] for non-admins, unknown or cancelled
/// schedules, and invalid times or capacity.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/schedules/{id}",
    tag = "Admin",
    summary = "Update schedule",
    description = "Changes the instructor, times or capacity. Capacity cannot drop below the confirmed bookings held.",
    params(("id" = ScheduleId, Path, description = "Schedule id")),
    request_body = ScheduleUpdate,
    responses(
        (status = 200, description = "Schedule updated", body = ScheduleDto),
        (status = 400, description = "Invalid times or capacity", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown schedule", body = ErrorResponse),
        (status = 409, description = "Schedule cancelled", body = ErrorResponse),
    )
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<ScheduleId>,
    Json(req): Json<ScheduleUpdate>,
) -> Result<Json<ScheduleDto>, LedgerError> {
    let schedule = state.ledger.update_schedule(caller.actor(), id, req).await?;
    Ok(Json(to_dto(&state, schedule).await))
}

/// `DELETE /admin/schedules/{id}`: Remove a schedule. Its bookings stay in
/// members' history.
///
/// # Errors
///
/// Returns [`LedgerError`] for non-admins or unknown schedules.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/schedules/{id}",
    tag = "Admin",
    summary = "Delete schedule",
    params(("id" = ScheduleId, Path, description = "Schedule id")),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown schedule", body = ErrorResponse),
    )
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<ScheduleId>,
) -> Result<StatusCode, LedgerError> {
    state.ledger.delete_schedule(caller.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /admin/schedules/{id}/cancel`: Cancel a scheduled class.
///
/// # Errors
///
/// Returns [`LedgerError`] for non-admins, unknown schedules or a class
/// that is already cancelled.
#[utoipa::path(
    post,
    path = "/api/v1/admin/schedules/{id}/cancel",
    tag = "Admin",
    summary = "Cancel scheduled class",
    description = "Marks the class cancelled. Existing bookings keep their status; new bookings are refused.",
    params(("id" = ScheduleId, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "Schedule cancelled", body = ScheduleDto),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "Unknown schedule", body = ErrorResponse),
        (status = 409, description = "Already cancelled", body = ErrorResponse),
    )
)]
pub async fn cancel_scheduled_class(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<ScheduleId>,
) -> Result<Json<ScheduleDto>, LedgerError> {
    let schedule = state.ledger.cancel_scheduled_class(caller.actor(), id).await?;
    Ok(Json(to_dto(&state, schedule).await))
}

/// `GET /admin/bookings`: All bookings with per-status totals.
///
/// # Errors
///
/// Returns [`LedgerError`] for non-admins.
#[utoipa::path(
    get,
    path = "/api/v1/admin/bookings",
    tag = "Admin",
    summary = "List bookings",
    description = "Returns bookings newest first, filtered by status, schedule or user. Totals ignore the status filter.",
    params(BookingQuery, PaginationParams),
    responses(
        (status = 200, description = "Bookings", body = BookingListResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
    )
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    caller: CurrentUser,
    Query(query): Query<BookingQuery>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<BookingListResponse>, LedgerError> {
    let (bookings, counts) = state
        .ledger
        .list_bookings(caller.actor(), &BookingFilter::from(query))
        .await?;
    let (data, pagination) = pagination.paginate(bookings);
    Ok(Json(BookingListResponse {
        data,
        counts,
        pagination,
    }))
}

/// `GET /admin/events`: Recorded ledger events, oldest first.
///
/// # Errors
///
/// Returns [`LedgerError`] for non-admins, when the event log is disabled,
/// or on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/events",
    tag = "Admin",
    summary = "Event log",
    description = "Reads the PostgreSQL audit trail. Only available when persistence is enabled.",
    params(EventLogQuery),
    responses(
        (status = 200, description = "Recorded events", body = Vec<StoredEvent>),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 503, description = "Event log disabled", body = ErrorResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    caller: CurrentUser,
    Query(query): Query<EventLogQuery>,
) -> Result<Json<Vec<StoredEvent>>, LedgerError> {
    require_admin(caller.actor())?;
    let log = state.event_log.as_ref().ok_or(LedgerError::EventLogDisabled)?;
    let since = query
        .since
        .unwrap_or_else(|| Utc::now() - Duration::hours(24));
    Ok(Json(log.load_events_after(since, query.entity_id).await?))
}

/// Admin routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/schedules", post(add_schedule))
        .route(
            "/admin/schedules/{id}",
            patch(update_schedule).delete(delete_schedule),
        )
        .route("/admin/schedules/{id}/cancel", post(cancel_scheduled_class))
        .route("/admin/bookings", get(list_bookings))
        .route("/admin/events", get(list_events))
}
