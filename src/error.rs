//! Ledger error types with HTTP status code mapping.
//!
//! [`LedgerError`] is the single error type of the crate. Every ledger
//! operation returns it as the `Err` arm of a `Result`; nothing is raised
//! as a panic. Each variant maps to a numeric code and an HTTP status.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BookingId, BookingStatus, ClassId, InstructorId, PlanId, ScheduleId, UserId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "success": false,
///   "error": {
///     "code": 2101,
///     "message": "You have already booked this class",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see [`LedgerError`] for ranges).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Crate-wide error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category                 | HTTP Status               |
/// |-----------|--------------------------|---------------------------|
/// | 1000–1099 | Validation               | 400 Bad Request           |
/// | 1100–1199 | Authorization            | 401 / 403                 |
/// | 2000–2099 | Not found                | 404 Not Found             |
/// | 2100–2199 | Conflict                 | 409 Conflict              |
/// | 3000–3999 | Server                   | 500 / 503                 |
/// | 4000–4099 | Booking state            | 409 / 422                 |
/// | 4100–4199 | Payment                  | 402 Payment Required      |
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No signed-in identity was presented.
    #[error("please log in to continue")]
    NotAuthenticated,

    /// The caller is signed in but may not perform this action.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Schedule with the given id does not exist.
    #[error("class not found: {0}")]
    ScheduleNotFound(ScheduleId),

    /// Booking with the given id does not exist.
    #[error("booking not found: {0}")]
    BookingNotFound(BookingId),

    /// The user holds no membership.
    #[error("no membership for user {0}")]
    MembershipNotFound(UserId),

    /// Membership plan with the given id does not exist.
    #[error("plan not found: {0}")]
    PlanNotFound(PlanId),

    /// Class definition with the given id does not exist.
    #[error("class definition not found: {0}")]
    ClassNotFound(ClassId),

    /// Instructor with the given id does not exist.
    #[error("instructor not found: {0}")]
    InstructorNotFound(InstructorId),

    /// User with the given id does not exist.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// The user has no waitlist entry for the schedule.
    #[error("not on waitlist for class {0}")]
    NotOnWaitlist(ScheduleId),

    /// The user already holds an active booking for the schedule.
    #[error("you have already booked this class")]
    AlreadyBooked(ScheduleId),

    /// Another account already uses this email.
    #[error("email already registered: {0}")]
    EmailTaken(String),

    /// The schedule has been cancelled and accepts no bookings.
    #[error("class {0} has been cancelled")]
    ScheduleCancelled(ScheduleId),

    /// Only `confirmed` bookings can be cancelled.
    #[error("booking {booking_id} cannot be cancelled while {status:?}")]
    BookingNotCancellable {
        /// Booking that was targeted.
        booking_id: BookingId,
        /// Its current status.
        status: BookingStatus,
    },

    /// The class starts too soon to cancel.
    #[error("cancellation window has passed ({notice_minutes} minutes before class)")]
    CancellationWindowClosed {
        /// Required notice in minutes.
        notice_minutes: i64,
    },

    /// The payment provider declined the charge.
    #[error("payment declined: {0}")]
    PaymentDeclined(String),

    /// Event log failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// The event log is not configured on this instance.
    #[error("event log is disabled")]
    EventLogDisabled,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl LedgerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::NotAuthenticated => 1101,
            Self::Forbidden(_) => 1102,
            Self::ScheduleNotFound(_) => 2001,
            Self::BookingNotFound(_) => 2002,
            Self::MembershipNotFound(_) => 2003,
            Self::PlanNotFound(_) => 2004,
            Self::ClassNotFound(_) => 2005,
            Self::InstructorNotFound(_) => 2006,
            Self::UserNotFound(_) => 2007,
            Self::NotOnWaitlist(_) => 2008,
            Self::AlreadyBooked(_) => 2101,
            Self::EmailTaken(_) => 2102,
            Self::ScheduleCancelled(_) => 4001,
            Self::BookingNotCancellable { .. } => 4002,
            Self::CancellationWindowClosed { .. } => 4003,
            Self::PaymentDeclined(_) => 4101,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::EventLogDisabled => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::ScheduleNotFound(_)
            | Self::BookingNotFound(_)
            | Self::MembershipNotFound(_)
            | Self::PlanNotFound(_)
            | Self::ClassNotFound(_)
            | Self::InstructorNotFound(_)
            | Self::UserNotFound(_)
            | Self::NotOnWaitlist(_) => StatusCode::NOT_FOUND,
            Self::AlreadyBooked(_)
            | Self::EmailTaken(_)
            | Self::ScheduleCancelled(_)
            | Self::BookingNotCancellable { .. } => StatusCode::CONFLICT,
            Self::CancellationWindowClosed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::PaymentDeclined(_) => StatusCode::PAYMENT_REQUIRED,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::EventLogDisabled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Machine-readable extra context for some variants.
    #[must_use]
    pub fn details(&self) -> Option<String> {
        match self {
            Self::BookingNotCancellable { status, .. } => Some(status.as_str().to_string()),
            Self::AlreadyBooked(schedule_id) => Some(schedule_id.to_string()),
            _ => None,
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, code = self.error_code(), "request rejected");
        }
        let body = ErrorResponse {
            success: false,
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_authenticated_maps_to_401() {
        let err = LedgerError::NotAuthenticated;
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.error_code(), 1101);
    }

    #[test]
    fn conflicts_map_to_409() {
        let id = ScheduleId::new();
        assert_eq!(
            LedgerError::AlreadyBooked(id).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            LedgerError::ScheduleCancelled(id).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn not_cancellable_carries_status_detail() {
        let err = LedgerError::BookingNotCancellable {
            booking_id: BookingId::new(),
            status: BookingStatus::Cancelled,
        };
        assert_eq!(err.details().as_deref(), Some("cancelled"));
    }

    #[test]
    fn disabled_event_log_is_unavailable() {
        let err = LedgerError::EventLogDisabled;
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.error_code(), 3002);
    }

    #[test]
    fn response_has_status_and_body() {
        let response = LedgerError::NotOnWaitlist(ScheduleId::new()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
