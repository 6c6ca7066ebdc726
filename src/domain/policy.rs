//! Booking policy knobs: cancellation window and waitlist handling.

use chrono::{DateTime, Duration, Utc};

/// Default minimum notice for cancelling a confirmed booking.
pub const DEFAULT_CANCELLATION_NOTICE_MINUTES: i64 = 120;

/// What happens to the waitlist when a confirmed spot frees up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitlistPolicy {
    /// The freed spot is simply reopened; waitlisted members must book
    /// again.
    #[default]
    Manual,
    /// The earliest waitlist entry is promoted to `confirmed` together
    /// with the cancellation.
    AutoPromote,
}

/// Policy applied by the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerPolicy {
    /// Confirmed bookings may be cancelled only while at least this much
    /// time remains before the class starts. Zero disables the check.
    pub cancellation_notice: Duration,
    /// Waitlist handling on cancellation.
    pub waitlist: WaitlistPolicy,
}

impl LedgerPolicy {
    /// Returns `true` if a class starting at `start` may still be
    /// cancelled at `now`.
    #[must_use]
    pub fn can_cancel(&self, start: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.cancellation_notice <= Duration::zero() || start - now >= self.cancellation_notice
    }
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            cancellation_notice: Duration::minutes(DEFAULT_CANCELLATION_NOTICE_MINUTES),
            waitlist: WaitlistPolicy::Manual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_two_hours() {
        let policy = LedgerPolicy::default();
        let now = Utc::now();
        assert!(policy.can_cancel(now + Duration::hours(2), now));
        assert!(policy.can_cancel(now + Duration::days(1), now));
        assert!(!policy.can_cancel(now + Duration::minutes(119), now));
        assert!(!policy.can_cancel(now - Duration::hours(1), now));
    }

    #[test]
    fn zero_notice_disables_window() {
        let policy = LedgerPolicy {
            cancellation_notice: Duration::zero(),
            ..LedgerPolicy::default()
        };
        let now = Utc::now();
        assert!(policy.can_cancel(now - Duration::hours(1), now));
    }

    #[test]
    fn waitlist_defaults_to_manual() {
        assert_eq!(LedgerPolicy::default().waitlist, WaitlistPolicy::Manual);
    }
}
