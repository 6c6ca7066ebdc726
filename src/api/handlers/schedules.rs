//! Timetable and booking handlers for members.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{ScheduleDto, ScheduleQuery};
use crate::api::extract::CurrentUser;
use crate::api::notify::{self, BookingNotice};
use crate::app_state::AppState;
use crate::domain::booking::BookingOutcome;
use crate::domain::schedule::ScheduleFilter;
use crate::domain::{Booking, Schedule, ScheduleId};
use crate::error::{ErrorResponse, LedgerError};

/// Attaches class and instructor names to `schedules`.
pub(crate) async fn to_dtos(state: &AppState, schedules: Vec<Schedule>) -> Vec<ScheduleDto> {
    let catalog = state.ledger.catalog();
    let classes: HashMap<_, _> = catalog
        .classes()
        .await
        .into_iter()
        .map(|c| (c.id, c))
        .collect();
    let instructors: HashMap<_, _> = catalog
        .instructors()
        .await
        .into_iter()
        .map(|i| (i.id, i))
        .collect();
    schedules
        .into_iter()
        .map(|s| {
            let class = classes.get(&s.class_id);
            let instructor = instructors.get(&s.instructor_id);
            ScheduleDto::new(s, class, instructor)
        })
        .collect()
}

/// Attaches class and instructor names to one schedule.
pub(crate) async fn to_dto(state: &AppState, schedule: Schedule) -> ScheduleDto {
    let catalog = state.ledger.catalog();
    let class = catalog.class(schedule.class_id).await.ok();
    let instructor = catalog.instructor(schedule.instructor_id).await.ok();
    ScheduleDto::new(schedule, class.as_ref(), instructor.as_ref())
}

/// `GET /schedules`: List the timetable.
#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    tag = "Schedules",
    summary = "List schedules",
    description = "Returns scheduled classes ordered by start time, optionally filtered by class, status and start window.",
    params(ScheduleQuery),
    responses(
        (status = 200, description = "Schedules", body = Vec<ScheduleDto>),
    )
)]
pub async fn list_schedules(
    State(state): State<AppState>,
    Query(query): Query<ScheduleQuery>,
) -> impl IntoResponse {
    let schedules = state
        .ledger
        .list_schedules(&ScheduleFilter::from(query))
        .await;
    Json(to_dtos(&state, schedules).await)
}

/// `GET /schedules/{id}`: One schedule.
///
/// # Errors
///
/// Returns [`LedgerError::ScheduleNotFound`] for an unknown id.
#[utoipa::path(
    get,
    path = "/api/v1/schedules/{id}",
    tag = "Schedules",
    summary = "Get schedule",
    params(("id" = ScheduleId, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "Schedule", body = ScheduleDto),
        (status = 404, description = "Unknown schedule", body = ErrorResponse),
    )
)]
pub async fn get_schedule(
    State(state): State<AppState>,
    Path(id): Path<ScheduleId>,
) -> Result<Json<ScheduleDto>, LedgerError> {
    let schedule = state.ledger.schedule(id).await?;
    Ok(Json(to_dto(&state, schedule).await))
}

/// `POST /schedules/{id}/book`: Book a spot, or join the waitlist if the
/// class is full.
///
/// # Errors
///
/// Returns [`LedgerError`] when the caller is anonymous, already booked,
/// or the schedule is unknown or cancelled.
#[utoipa::path(
    post,
    path = "/api/v1/schedules/{id}/book",
    tag = "Bookings",
    summary = "Book a class",
    description = "Confirms a spot when one is available, otherwise records a waitlist entry. A pack membership is charged one credit per confirmed spot.",
    params(("id" = ScheduleId, Path, description = "Schedule id")),
    responses(
        (status = 201, description = "Booking recorded", body = BookingOutcome),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Unknown schedule", body = ErrorResponse),
        (status = 409, description = "Already booked or class cancelled", body = ErrorResponse),
    )
)]
pub async fn book_class(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<ScheduleId>,
) -> Result<impl IntoResponse, LedgerError> {
    let outcome = state.ledger.book_class(caller.actor(), id).await?;
    if !outcome.on_waitlist {
        notify::booking(&state, &outcome.booking, BookingNotice::Confirmed).await;
    }
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// `POST /schedules/{id}/waitlist`: Join the waitlist.
///
/// # Errors
///
/// Returns [`LedgerError`] when the caller is anonymous, already holds an
/// active booking, or the schedule is unknown or cancelled.
#[utoipa::path(
    post,
    path = "/api/v1/schedules/{id}/waitlist",
    tag = "Bookings",
    summary = "Join waitlist",
    params(("id" = ScheduleId, Path, description = "Schedule id")),
    responses(
        (status = 201, description = "Waitlist entry", body = Booking),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Unknown schedule", body = ErrorResponse),
        (status = 409, description = "Already booked or class cancelled", body = ErrorResponse),
    )
)]
pub async fn join_waitlist(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<ScheduleId>,
) -> Result<impl IntoResponse, LedgerError> {
    let booking = state.ledger.join_waitlist(caller.actor(), id).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// `DELETE /schedules/{id}/waitlist`: Leave the waitlist.
///
/// # Errors
///
/// Returns [`LedgerError::NotOnWaitlist`] if the caller has no entry.
#[utoipa::path(
    delete,
    path = "/api/v1/schedules/{id}/waitlist",
    tag = "Bookings",
    summary = "Leave waitlist",
    params(("id" = ScheduleId, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "Removed waitlist entry", body = Booking),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Not on the waitlist", body = ErrorResponse),
    )
)]
pub async fn leave_waitlist(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<ScheduleId>,
) -> Result<Json<Booking>, LedgerError> {
    Ok(Json(state.ledger.leave_waitlist(caller.actor(), id).await?))
}

/// Schedule routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/schedules", get(list_schedules))
        .route("/schedules/{id}", get(get_schedule))
        .route("/schedules/{id}/book", post(book_class))
        .route(
            "/schedules/{id}/waitlist",
            post(join_waitlist).delete(leave_waitlist),
        )
}
