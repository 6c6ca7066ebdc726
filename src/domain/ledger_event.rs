//! Domain events reflecting ledger mutations.
//!
//! Every committed mutation emits a [`LedgerEvent`] through the
//! [`super::EventBus`]. Events are broadcast to WebSocket subscribers and
//! optionally appended to the PostgreSQL event log.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{BookingId, ClassId, MembershipId, PlanId, ScheduleId, UserId};

/// Domain event emitted after every committed ledger mutation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A schedule was added by an administrator.
    ScheduleCreated {
        /// Schedule identifier.
        schedule_id: ScheduleId,
        /// Class scheduled.
        class_id: ClassId,
        /// Start of the class.
        start_time: DateTime<Utc>,
        /// Capacity snapshot.
        capacity: u32,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A schedule's time, instructor or capacity changed.
    ScheduleUpdated {
        /// Schedule identifier.
        schedule_id: ScheduleId,
        /// Capacity after the update.
        capacity: u32,
        /// Open spots after the update.
        available_spots: u32,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A schedule was cancelled. Bookings are left untouched.
    ScheduleCancelled {
        /// Schedule identifier.
        schedule_id: ScheduleId,
        /// Active bookings still held against the schedule.
        affected_bookings: u32,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A schedule was removed from the timetable.
    ScheduleDeleted {
        /// Schedule identifier.
        schedule_id: ScheduleId,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A confirmed spot was taken.
    BookingConfirmed {
        /// Schedule identifier.
        schedule_id: ScheduleId,
        /// Booking identifier.
        booking_id: BookingId,
        /// Booking owner.
        user_id: UserId,
        /// Open spots after the booking.
        available_spots: u32,
        /// Whether a pack credit was drawn.
        credit_charged: bool,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A waitlist entry was added.
    BookingWaitlisted {
        /// Schedule identifier.
        schedule_id: ScheduleId,
        /// Booking identifier.
        booking_id: BookingId,
        /// Booking owner.
        user_id: UserId,
        /// Waitlist length after the entry.
        waitlist_count: u32,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A confirmed booking was cancelled.
    BookingCancelled {
        /// Schedule identifier.
        schedule_id: ScheduleId,
        /// Booking identifier.
        booking_id: BookingId,
        /// Booking owner.
        user_id: UserId,
        /// Open spots after the cancellation.
        available_spots: u32,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A waitlist entry was converted to a confirmed booking.
    BookingPromoted {
        /// Schedule identifier.
        schedule_id: ScheduleId,
        /// Booking identifier.
        booking_id: BookingId,
        /// Booking owner.
        user_id: UserId,
        /// Waitlist length after the promotion.
        waitlist_count: u32,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A waitlist entry was withdrawn.
    WaitlistLeft {
        /// Schedule identifier.
        schedule_id: ScheduleId,
        /// Removed booking identifier.
        booking_id: BookingId,
        /// Booking owner.
        user_id: UserId,
        /// Waitlist length after the removal.
        waitlist_count: u32,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A membership was purchased, replacing any prior one.
    MembershipPurchased {
        /// Member.
        user_id: UserId,
        /// New membership identifier.
        membership_id: MembershipId,
        /// Plan purchased.
        plan_id: PlanId,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A membership was cancelled.
    MembershipCancelled {
        /// Member.
        user_id: UserId,
        /// Membership identifier.
        membership_id: MembershipId,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl LedgerEvent {
    /// Returns the schedule this event concerns, if any.
    #[must_use]
    pub const fn schedule_id(&self) -> Option<ScheduleId> {
        match self {
            Self::ScheduleCreated { schedule_id, .. }
            | Self::ScheduleUpdated { schedule_id, .. }
            | Self::ScheduleCancelled { schedule_id, .. }
            | Self::ScheduleDeleted { schedule_id, .. }
            | Self::BookingConfirmed { schedule_id, .. }
            | Self::BookingWaitlisted { schedule_id, .. }
            | Self::BookingCancelled { schedule_id, .. }
            | Self::BookingPromoted { schedule_id, .. }
            | Self::WaitlistLeft { schedule_id, .. } => Some(*schedule_id),
            Self::MembershipPurchased { .. } | Self::MembershipCancelled { .. } => None,
        }
    }

    /// Returns the aggregate the event is keyed on: the schedule for
    /// occupancy events, the member for membership events.
    #[must_use]
    pub fn entity_id(&self) -> uuid::Uuid {
        match self {
            Self::MembershipPurchased { user_id, .. } | Self::MembershipCancelled { user_id, .. } => {
                (*user_id).into()
            }
            other => other
                .schedule_id()
                .map(uuid::Uuid::from)
                .unwrap_or_default(),
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::ScheduleCreated { .. } => "schedule_created",
            Self::ScheduleUpdated { .. } => "schedule_updated",
            Self::ScheduleCancelled { .. } => "schedule_cancelled",
            Self::ScheduleDeleted { .. } => "schedule_deleted",
            Self::BookingConfirmed { .. } => "booking_confirmed",
            Self::BookingWaitlisted { .. } => "booking_waitlisted",
            Self::BookingCancelled { .. } => "booking_cancelled",
            Self::BookingPromoted { .. } => "booking_promoted",
            Self::WaitlistLeft { .. } => "waitlist_left",
            Self::MembershipPurchased { .. } => "membership_purchased",
            Self::MembershipCancelled { .. } => "membership_cancelled",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_confirmed_serializes_with_tag() {
        let event = LedgerEvent::BookingConfirmed {
            schedule_id: ScheduleId::new(),
            booking_id: BookingId::new(),
            user_id: UserId::new(),
            available_spots: 3,
            credit_charged: true,
            timestamp: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap_or_default();
        assert!(json.contains("\"event_type\":\"booking_confirmed\""));
        assert!(json.contains("\"available_spots\":3"));
        assert_eq!(event.event_type_str(), "booking_confirmed");
    }

    #[test]
    fn membership_events_have_no_schedule() {
        let user_id = UserId::new();
        let event = LedgerEvent::MembershipCancelled {
            user_id,
            membership_id: MembershipId::new(),
            timestamp: Utc::now(),
        };
        assert_eq!(event.schedule_id(), None);
        assert_eq!(event.entity_id(), uuid::Uuid::from(user_id));
    }

    #[test]
    fn schedule_events_keyed_by_schedule() {
        let id = ScheduleId::new();
        let event = LedgerEvent::ScheduleDeleted {
            schedule_id: id,
            timestamp: Utc::now(),
        };
        assert_eq!(event.schedule_id(), Some(id));
        assert_eq!(event.entity_id(), uuid::Uuid::from(id));
    }
}
