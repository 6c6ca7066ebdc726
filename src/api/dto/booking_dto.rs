//! Booking and event log listing DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::common_dto::PaginationMeta;
use crate::domain::booking::{BookingCounts, BookingFilter};
use crate::domain::{Booking, BookingStatus, ScheduleId, UserId};

/// Query parameters for `GET /admin/bookings`.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingQuery {
    /// Only bookings in this status.
    #[serde(default)]
    pub status: Option<BookingStatus>,
    /// Only bookings for this schedule.
    #[serde(default)]
    pub schedule_id: Option<ScheduleId>,
    /// Only bookings owned by this user.
    #[serde(default)]
    pub user_id: Option<UserId>,
}

impl From<BookingQuery> for BookingFilter {
    fn from(q: BookingQuery) -> Self {
        Self {
            status: q.status,
            schedule_id: q.schedule_id,
            user_id: q.user_id,
        }
    }
}

/// Response body for `GET /admin/bookings`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingListResponse {
    /// Bookings on this page, newest first.
    pub data: Vec<Booking>,
    /// Per-status totals over the whole selection, ignoring the status
    /// filter.
    pub counts: BookingCounts,
    /// Page metadata.
    pub pagination: PaginationMeta,
}

/// Query parameters for `GET /admin/events`.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventLogQuery {
    /// Only events recorded after this instant. Defaults to 24 hours ago.
    #[serde(default)]
    pub since: Option<DateTime<Utc>>,
    /// Only events about this schedule or member.
    #[serde(default)]
    pub entity_id: Option<Uuid>,
}
