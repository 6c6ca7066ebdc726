//! Booking records: one user's claim on a schedule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{BookingId, ScheduleId, UserId};

/// Status of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Holds a confirmed spot in the class.
    Confirmed,
    /// Queued behind a full class.
    Waitlist,
    /// Cancelled by the member. Terminal.
    Cancelled,
    /// Attended the class. Never set automatically.
    Attended,
}

impl BookingStatus {
    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Waitlist => "waitlist",
            Self::Cancelled => "cancelled",
            Self::Attended => "attended",
        }
    }
}

/// One user's claim against a schedule.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Booking {
    /// Booking identifier.
    pub id: BookingId,
    /// Owning user.
    pub user_id: UserId,
    /// Schedule the booking is for.
    pub schedule_id: ScheduleId,
    /// Current status.
    pub status: BookingStatus,
    /// When the booking was created.
    pub booked_at: DateTime<Utc>,
    /// When the booking was cancelled, if it was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Booking {
    /// Creates a booking in the given initial status, timestamped now.
    #[must_use]
    pub fn new(user_id: UserId, schedule_id: ScheduleId, status: BookingStatus) -> Self {
        Self {
            id: BookingId::new(),
            user_id,
            schedule_id,
            status,
            booked_at: Utc::now(),
            cancelled_at: None,
        }
    }

    /// Returns `true` for `confirmed` and `waitlist` bookings.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, BookingStatus::Confirmed | BookingStatus::Waitlist)
    }

    /// Marks the booking cancelled at `now`.
    pub fn cancel(&mut self, now: DateTime<Utc>) {
        self.status = BookingStatus::Cancelled;
        self.cancelled_at = Some(now);
    }
}

/// Result of a successful `book_class` call.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookingOutcome {
    /// The created (or upgraded) booking.
    pub booking: Booking,
    /// Whether the booking landed on the waitlist.
    pub on_waitlist: bool,
}

/// Result of a successful `cancel_booking` call.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CancellationOutcome {
    /// The cancelled booking.
    pub booking: Booking,
    /// Waitlist entry promoted into the freed spot, when auto-promotion
    /// is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promoted: Option<Booking>,
}

/// Filter for admin booking listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingFilter {
    /// Only bookings in this status.
    pub status: Option<BookingStatus>,
    /// Only bookings for this schedule.
    pub schedule_id: Option<ScheduleId>,
    /// Only bookings owned by this user.
    pub user_id: Option<UserId>,
}

impl BookingFilter {
    /// Returns `true` if `booking` passes every set criterion.
    #[must_use]
    pub fn matches(&self, booking: &Booking) -> bool {
        self.status.is_none_or(|s| booking.status == s)
            && self.schedule_id.is_none_or(|id| booking.schedule_id == id)
            && self.user_id.is_none_or(|id| booking.user_id == id)
    }
}

/// Per-status booking totals for the admin overview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct BookingCounts {
    /// Confirmed bookings.
    pub confirmed: u32,
    /// Waitlisted bookings.
    pub waitlist: u32,
    /// Cancelled bookings.
    pub cancelled: u32,
    /// Attended bookings.
    pub attended: u32,
}

impl BookingCounts {
    /// Adds one booking to the matching bucket.
    pub fn record(&mut self, status: BookingStatus) {
        let bucket = match status {
            BookingStatus::Confirmed => &mut self.confirmed,
            BookingStatus::Waitlist => &mut self.waitlist,
            BookingStatus::Cancelled => &mut self.cancelled,
            BookingStatus::Attended => &mut self.attended,
        };
        *bucket = bucket.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_statuses() {
        let mut b = Booking::new(UserId::new(), ScheduleId::new(), BookingStatus::Confirmed);
        assert!(b.is_active());
        b.status = BookingStatus::Waitlist;
        assert!(b.is_active());
        b.status = BookingStatus::Attended;
        assert!(!b.is_active());
    }

    #[test]
    fn cancel_records_timestamp() {
        let mut b = Booking::new(UserId::new(), ScheduleId::new(), BookingStatus::Confirmed);
        let now = Utc::now();
        b.cancel(now);
        assert_eq!(b.status, BookingStatus::Cancelled);
        assert_eq!(b.cancelled_at, Some(now));
        assert!(!b.is_active());
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&BookingStatus::Waitlist).unwrap_or_default();
        assert_eq!(json, "\"waitlist\"");
        assert_eq!(BookingStatus::Waitlist.as_str(), "waitlist");
    }

    #[test]
    fn counts_bucket_by_status() {
        let mut counts = BookingCounts::default();
        counts.record(BookingStatus::Confirmed);
        counts.record(BookingStatus::Confirmed);
        counts.record(BookingStatus::Cancelled);
        assert_eq!(counts.confirmed, 2);
        assert_eq!(counts.cancelled, 1);
        assert_eq!(counts.waitlist, 0);
    }

    #[test]
    fn filter_by_user_and_status() {
        let user = UserId::new();
        let b = Booking::new(user, ScheduleId::new(), BookingStatus::Waitlist);
        let mine = BookingFilter {
            user_id: Some(user),
            status: Some(BookingStatus::Waitlist),
            ..BookingFilter::default()
        };
        assert!(mine.matches(&b));
        let other = BookingFilter {
            user_id: Some(UserId::new()),
            ..BookingFilter::default()
        };
        assert!(!other.matches(&b));
    }
}
