//! Bookable class occurrences and their occupancy counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{ClassId, InstructorId, ScheduleId};

/// Lifecycle status of a schedule. `Cancelled` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    /// Open for bookings.
    Active,
    /// Cancelled by an administrator; accepts no further bookings.
    Cancelled,
}

/// One bookable occurrence of a class.
///
/// `booked_count` and `waitlist_count` are only ever changed by the
/// ledger. Available spots are derived from `capacity` and
/// `booked_count` rather than stored, so they cannot drift.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Schedule {
    /// Schedule identifier.
    pub id: ScheduleId,
    /// Class definition this occurrence belongs to.
    pub class_id: ClassId,
    /// Instructor teaching this occurrence.
    pub instructor_id: InstructorId,
    /// Start of the class.
    pub start_time: DateTime<Utc>,
    /// End of the class.
    pub end_time: DateTime<Utc>,
    /// Lifecycle status.
    pub status: ScheduleStatus,
    /// Maximum number of confirmed attendees.
    pub capacity: u32,
    /// Number of confirmed spots taken.
    pub booked_count: u32,
    /// Number of waitlist entries.
    pub waitlist_count: u32,
}

impl Schedule {
    /// Creates an active schedule with empty counters.
    #[must_use]
    pub fn new(
        class_id: ClassId,
        instructor_id: InstructorId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        capacity: u32,
    ) -> Self {
        Self {
            id: ScheduleId::new(),
            class_id,
            instructor_id,
            start_time,
            end_time,
            status: ScheduleStatus::Active,
            capacity,
            booked_count: 0,
            waitlist_count: 0,
        }
    }

    /// Spots still open for a confirmed booking. Never negative.
    #[must_use]
    pub const fn available_spots(&self) -> u32 {
        self.capacity.saturating_sub(self.booked_count)
    }

    /// Returns `true` if the schedule can no longer be booked.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status == ScheduleStatus::Cancelled
    }

    /// Takes one confirmed spot. Returns `false` without mutating when the
    /// schedule is full.
    pub fn take_spot(&mut self) -> bool {
        if self.available_spots() == 0 {
            return false;
        }
        self.booked_count += 1;
        true
    }

    /// Releases one confirmed spot, flooring at zero.
    pub fn release_spot(&mut self) {
        self.booked_count = self.booked_count.saturating_sub(1);
    }

    /// Adds one waitlist entry.
    pub fn push_waitlist(&mut self) {
        self.waitlist_count = self.waitlist_count.saturating_add(1);
    }

    /// Removes one waitlist entry, flooring at zero.
    pub fn pop_waitlist(&mut self) {
        self.waitlist_count = self.waitlist_count.saturating_sub(1);
    }
}

/// Admin input for creating a schedule.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewSchedule {
    /// Class definition to schedule.
    pub class_id: ClassId,
    /// Instructor teaching the class.
    pub instructor_id: InstructorId,
    /// Start of the class.
    pub start_time: DateTime<Utc>,
    /// End of the class.
    pub end_time: DateTime<Utc>,
    /// Capacity override. Defaults to the class definition's capacity.
    #[serde(default)]
    pub capacity: Option<u32>,
}

/// Admin partial update of a schedule. Counters and status are not
/// editable here.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ScheduleUpdate {
    /// New instructor.
    #[serde(default)]
    pub instructor_id: Option<InstructorId>,
    /// New start time.
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    /// New end time.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    /// New capacity; may not drop below the current booked count.
    #[serde(default)]
    pub capacity: Option<u32>,
}

/// Filter for schedule listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScheduleFilter {
    /// Only schedules of this class.
    pub class_id: Option<ClassId>,
    /// Only schedules in this status.
    pub status: Option<ScheduleStatus>,
    /// Only schedules starting at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Only schedules starting before this instant.
    pub until: Option<DateTime<Utc>>,
}

impl ScheduleFilter {
    /// Returns `true` if `schedule` passes every set criterion.
    #[must_use]
    pub fn matches(&self, schedule: &Schedule) -> bool {
        self.class_id.is_none_or(|id| schedule.class_id == id)
            && self.status.is_none_or(|s| schedule.status == s)
            && self.from.is_none_or(|t| schedule.start_time >= t)
            && self.until.is_none_or(|t| schedule.start_time < t)
    }
}
