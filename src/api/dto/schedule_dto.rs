//! Schedule listing DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::catalog::{FitnessClass, Instructor};
use crate::domain::schedule::ScheduleFilter;
use crate::domain::{ClassId, InstructorId, Schedule, ScheduleId, ScheduleStatus};

/// Query parameters for `GET /schedules`.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleQuery {
    /// Only schedules of this class.
    #[serde(default)]
    pub class_id: Option<ClassId>,
    /// Only schedules in this status.
    #[serde(default)]
    pub status: Option<ScheduleStatus>,
    /// Only schedules starting at or after this instant.
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Only schedules starting before this instant.
    #[serde(default)]
    pub until: Option<DateTime<Utc>>,
}

impl From<ScheduleQuery> for ScheduleFilter {
    fn from(q: ScheduleQuery) -> Self {
        Self {
            class_id: q.class_id,
            status: q.status,
            from: q.from,
            until: q.until,
        }
    }
}

/// A schedule with its derived availability and display names.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScheduleDto {
    /// Schedule identifier.
    pub id: ScheduleId,
    /// Class scheduled.
    pub class_id: ClassId,
    /// Class display name, if the class still exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Instructor teaching.
    pub instructor_id: InstructorId,
    /// Instructor display name, if the instructor still exists.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructor_name: Option<String>,
    /// Start of the class.
    pub start_time: DateTime<Utc>,
    /// End of the class.
    pub end_time: DateTime<Utc>,
    /// Lifecycle state.
    pub status: ScheduleStatus,
    /// Maximum confirmed bookings.
    pub capacity: u32,
    /// Confirmed bookings held.
    pub booked_count: u32,
    /// Waitlist entries held.
    pub waitlist_count: u32,
    /// `capacity - booked_count`, never negative.
    pub available_spots: u32,
}

impl ScheduleDto {
    /// Builds the DTO, attaching class and instructor names when known.
    #[must_use]
    pub fn new(
        schedule: Schedule,
        class: Option<&FitnessClass>,
        instructor: Option<&Instructor>,
    ) -> Self {
        Self {
            available_spots: schedule.available_spots(),
            id: schedule.id,
            class_id: schedule.class_id,
            class_name: class.map(|c| c.name.clone()),
            instructor_id: schedule.instructor_id,
            instructor_name: instructor.map(|i| i.name.clone()),
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            status: schedule.status,
            capacity: schedule.capacity,
            booked_count: schedule.booked_count,
            waitlist_count: schedule.waitlist_count,
        }
    }
}
