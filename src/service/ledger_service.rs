//! Booking ledger: the sole authority over schedule occupancy, booking
//! records and membership credit balances.
//!
//! Every mutation follows the same shape: resolve the caller, take the
//! schedule's write lock, check every precondition, then commit all
//! changes before releasing the lock and emitting events. A failed
//! precondition returns before anything is written.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::booking::{BookingCounts, BookingFilter, BookingOutcome, CancellationOutcome};
use crate::domain::schedule::ScheduleFilter;
use crate::domain::{
    Actor, Booking, BookingId, BookingStatus, Catalog, EventBus, LedgerEvent, LedgerPolicy,
    MembershipRegistry, Schedule, ScheduleId, ScheduleRegistry, UserId, WaitlistPolicy,
};
use crate::error::LedgerError;

/// Orchestration layer for all ledger operations.
///
/// Owns references to the registries holding state and to the
/// [`EventBus`] for event emission. Membership and schedule-admin
/// operations live in sibling modules as further `impl` blocks.
#[derive(Debug, Clone)]
pub struct LedgerService {
    pub(super) schedules: Arc<ScheduleRegistry>,
    pub(super) memberships: Arc<MembershipRegistry>,
    pub(super) catalog: Arc<Catalog>,
    pub(super) event_bus: EventBus,
    pub(super) policy: LedgerPolicy,
}

impl LedgerService {
    /// Creates a new `LedgerService`.
    #[must_use]
    pub fn new(
        schedules: Arc<ScheduleRegistry>,
        memberships: Arc<MembershipRegistry>,
        catalog: Arc<Catalog>,
        event_bus: EventBus,
        policy: LedgerPolicy,
    ) -> Self {
        Self {
            schedules,
            memberships,
            catalog,
            event_bus,
            policy,
        }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the schedule registry.
    #[must_use]
    pub fn schedules(&self) -> &Arc<ScheduleRegistry> {
        &self.schedules
    }

    /// Returns a reference to the membership registry.
    #[must_use]
    pub fn memberships(&self) -> &Arc<MembershipRegistry> {
        &self.memberships
    }

    /// Returns a reference to the studio catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Returns the active booking policy.
    #[must_use]
    pub const fn policy(&self) -> &LedgerPolicy {
        &self.policy
    }

    /// Books `schedule_id` for the caller.
    ///
    /// With an open spot the booking is `confirmed`, `booked_count` grows
    /// by one and an active pack membership with credits left is charged
    /// one credit (a pack with no credits left is not charged and does
    /// not block). A full schedule yields a `waitlist` booking and grows
    /// `waitlist_count` instead. A caller already on the waitlist who
    /// books once a spot has opened has that entry upgraded in place.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] without a caller.
    /// - [`LedgerError::ScheduleNotFound`] for an unknown schedule.
    /// - [`LedgerError::AlreadyBooked`] if the caller holds a confirmed
    ///   booking, or a waitlist entry while the class is still full.
    /// - [`LedgerError::ScheduleCancelled`] for a cancelled schedule.
    pub async fn book_class(
        &self,
        actor: Option<&Actor>,
        schedule_id: ScheduleId,
    ) -> Result<BookingOutcome, LedgerError> {
        let actor = actor.ok_or(LedgerError::NotAuthenticated)?;
        let Ok(entry_lock) = self.schedules.get(schedule_id).await else {
            return Err(self.missing_schedule(actor, schedule_id).await);
        };
        let mut entry = entry_lock.write().await;
        if entry.is_removed() {
            drop(entry);
            return Err(self.missing_schedule(actor, schedule_id).await);
        }

        let existing = entry
            .active_booking_of(actor.user_id)
            .map(|b| (b.id, b.status));
        if let Some((_, BookingStatus::Confirmed)) = existing {
            return Err(LedgerError::AlreadyBooked(schedule_id));
        }
        if entry.schedule.is_cancelled() {
            return Err(LedgerError::ScheduleCancelled(schedule_id));
        }
        if existing.is_some() && entry.schedule.available_spots() == 0 {
            return Err(LedgerError::AlreadyBooked(schedule_id));
        }
        let waitlisted_idx =
            existing.and_then(|(id, _)| entry.bookings.iter().position(|b| b.id == id));

        let now = Utc::now();

        if !entry.schedule.take_spot() {
            entry.schedule.push_waitlist();
            let booking = Booking::new(actor.user_id, schedule_id, BookingStatus::Waitlist);
            entry.bookings.push(booking.clone());
            self.schedules.index_booking(booking.id, schedule_id).await;
            let waitlist_count = entry.schedule.waitlist_count;
            drop(entry);

            let _ = self.event_bus.publish(LedgerEvent::BookingWaitlisted {
                schedule_id,
                booking_id: booking.id,
                user_id: actor.user_id,
                waitlist_count,
                timestamp: now,
            });
            tracing::info!(%schedule_id, booking_id = %booking.id, waitlist_count, "class full, added to waitlist");
            return Ok(BookingOutcome {
                booking,
                on_waitlist: true,
            });
        }

        let upgraded = match waitlisted_idx.and_then(|idx| entry.bookings.get_mut(idx)) {
            Some(record) => {
                record.status = BookingStatus::Confirmed;
                Some(record.clone())
            }
            None => None,
        };
        let booking = match upgraded {
            Some(record) => {
                entry.schedule.pop_waitlist();
                record
            }
            None => {
                let booking = Booking::new(actor.user_id, schedule_id, BookingStatus::Confirmed);
                entry.bookings.push(booking.clone());
                self.schedules.index_booking(booking.id, schedule_id).await;
                booking
            }
        };
        let credit_charged = self.charge_credit(actor.user_id, now).await;
        let available_spots = entry.schedule.available_spots();
        drop(entry);

        let _ = self.event_bus.publish(LedgerEvent::BookingConfirmed {
            schedule_id,
            booking_id: booking.id,
            user_id: actor.user_id,
            available_spots,
            credit_charged,
            timestamp: now,
        });
        tracing::info!(%schedule_id, booking_id = %booking.id, available_spots, credit_charged, "class booked");

        Ok(BookingOutcome {
            booking,
            on_waitlist: false,
        })
    }

    /// Cancels a confirmed booking and releases its spot.
    ///
    /// No credit is refunded. Under [`WaitlistPolicy::AutoPromote`] the
    /// earliest waitlist entry takes the freed spot in the same critical
    /// section; otherwise the spot simply reopens.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] without a caller.
    /// - [`LedgerError::BookingNotFound`] for an unknown booking.
    /// - [`LedgerError::Forbidden`] if the caller neither owns the booking
    ///   nor is an admin.
    /// - [`LedgerError::BookingNotCancellable`] unless the booking is
    ///   `confirmed` (a second cancel therefore fails cleanly).
    /// - [`LedgerError::CancellationWindowClosed`] when a member cancels
    ///   inside the notice window.
    pub async fn cancel_booking(
        &self,
        actor: Option<&Actor>,
        booking_id: BookingId,
    ) -> Result<CancellationOutcome, LedgerError> {
        let actor = actor.ok_or(LedgerError::NotAuthenticated)?;
        let schedule_id = self.schedules.locate_booking(booking_id).await?;
        let entry_lock = self
            .schedules
            .get(schedule_id)
            .await
            .map_err(|_| LedgerError::BookingNotFound(booking_id))?;
        let mut entry = entry_lock.write().await;
        if entry.is_removed() {
            return Err(LedgerError::BookingNotFound(booking_id));
        }

        let now = Utc::now();
        let start_time = entry.schedule.start_time;
        let booking = entry
            .booking_mut(booking_id)
            .ok_or(LedgerError::BookingNotFound(booking_id))?;
        if booking.user_id != actor.user_id && !actor.is_admin() {
            return Err(LedgerError::Forbidden(
                "booking belongs to another member".to_string(),
            ));
        }
        if booking.status != BookingStatus::Confirmed {
            return Err(LedgerError::BookingNotCancellable {
                booking_id,
                status: booking.status,
            });
        }
        if !actor.is_admin() && !self.policy.can_cancel(start_time, now) {
            return Err(LedgerError::CancellationWindowClosed {
                notice_minutes: self.policy.cancellation_notice.num_minutes(),
            });
        }

        booking.cancel(now);
        let cancelled = booking.clone();
        entry.schedule.release_spot();

        let mut promoted = None;
        if self.policy.waitlist == WaitlistPolicy::AutoPromote && !entry.schedule.is_cancelled() {
            let next = entry
                .earliest_waitlisted()
                .and_then(|idx| entry.bookings.get(idx).map(|b| (idx, b.user_id)));
            if let Some((idx, next_user)) = next {
                if entry.schedule.take_spot() {
                    entry.schedule.pop_waitlist();
                    self.charge_credit(next_user, now).await;
                    if let Some(next) = entry.bookings.get_mut(idx) {
                        next.status = BookingStatus::Confirmed;
                        promoted = Some(next.clone());
                    }
                }
            }
        }

        let available_spots = entry.schedule.available_spots();
        let waitlist_count = entry.schedule.waitlist_count;
        drop(entry);

        let _ = self.event_bus.publish(LedgerEvent::BookingCancelled {
            schedule_id,
            booking_id,
            user_id: cancelled.user_id,
            available_spots,
            timestamp: now,
        });
        tracing::info!(%schedule_id, %booking_id, available_spots, "booking cancelled");

        if let Some(next) = &promoted {
            let _ = self.event_bus.publish(LedgerEvent::BookingPromoted {
                schedule_id,
                booking_id: next.id,
                user_id: next.user_id,
                waitlist_count,
                timestamp: now,
            });
            tracing::info!(%schedule_id, booking_id = %next.id, waitlist_count, "waitlist entry promoted");
        }

        Ok(CancellationOutcome {
            booking: cancelled,
            promoted,
        })
    }

    /// Puts the caller on the waitlist for `schedule_id`, whether or not
    /// the class is currently full.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] without a caller.
    /// - [`LedgerError::ScheduleNotFound`] for an unknown schedule.
    /// - [`LedgerError::AlreadyBooked`] if the caller already holds an
    ///   active booking for it.
    /// - [`LedgerError::ScheduleCancelled`] for a cancelled schedule.
    pub async fn join_waitlist(
        &self,
        actor: Option<&Actor>,
        schedule_id: ScheduleId,
    ) -> Result<Booking, LedgerError> {
        let actor = actor.ok_or(LedgerError::NotAuthenticated)?;
        let entry_lock = self.schedules.get(schedule_id).await?;
        let mut entry = entry_lock.write().await;
        if entry.is_removed() {
            return Err(LedgerError::ScheduleNotFound(schedule_id));
        }
        if entry.active_booking_of(actor.user_id).is_some() {
            return Err(LedgerError::AlreadyBooked(schedule_id));
        }
        if entry.schedule.is_cancelled() {
            return Err(LedgerError::ScheduleCancelled(schedule_id));
        }

        entry.schedule.push_waitlist();
        let booking = Booking::new(actor.user_id, schedule_id, BookingStatus::Waitlist);
        entry.bookings.push(booking.clone());
        self.schedules.index_booking(booking.id, schedule_id).await;
        let waitlist_count = entry.schedule.waitlist_count;
        drop(entry);

        let _ = self.event_bus.publish(LedgerEvent::BookingWaitlisted {
            schedule_id,
            booking_id: booking.id,
            user_id: actor.user_id,
            waitlist_count,
            timestamp: booking.booked_at,
        });
        tracing::info!(%schedule_id, booking_id = %booking.id, waitlist_count, "joined waitlist");
        Ok(booking)
    }

    /// Removes the caller's waitlist entry for `schedule_id` and returns
    /// the removed record.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] without a caller.
    /// - [`LedgerError::ScheduleNotFound`] for an unknown schedule.
    /// - [`LedgerError::NotOnWaitlist`] if the caller has no entry.
    pub async fn leave_waitlist(
        &self,
        actor: Option<&Actor>,
        schedule_id: ScheduleId,
    ) -> Result<Booking, LedgerError> {
        let actor = actor.ok_or(LedgerError::NotAuthenticated)?;
        let entry_lock = self.schedules.get(schedule_id).await?;
        let mut entry = entry_lock.write().await;
        if entry.is_removed() {
            return Err(LedgerError::ScheduleNotFound(schedule_id));
        }
        let idx = entry
            .waitlist_position_of(actor.user_id)
            .ok_or(LedgerError::NotOnWaitlist(schedule_id))?;

        let removed = entry.bookings.remove(idx);
        entry.schedule.pop_waitlist();
        self.schedules.unindex_booking(removed.id).await;
        let waitlist_count = entry.schedule.waitlist_count;
        drop(entry);

        let _ = self.event_bus.publish(LedgerEvent::WaitlistLeft {
            schedule_id,
            booking_id: removed.id,
            user_id: actor.user_id,
            waitlist_count,
            timestamp: Utc::now(),
        });
        tracing::info!(%schedule_id, booking_id = %removed.id, waitlist_count, "left waitlist");
        Ok(removed)
    }

    /// Returns a snapshot of one schedule.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ScheduleNotFound`] for an unknown schedule.
    pub async fn schedule(&self, schedule_id: ScheduleId) -> Result<Schedule, LedgerError> {
        self.schedules.schedule(schedule_id).await
    }

    /// Returns the schedules passing `filter`, ordered by start time.
    pub async fn list_schedules(&self, filter: &ScheduleFilter) -> Vec<Schedule> {
        self.schedules.list(filter).await
    }

    /// Returns one booking, visible to its owner and to admins.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] without a caller.
    /// - [`LedgerError::BookingNotFound`] for an unknown booking.
    /// - [`LedgerError::Forbidden`] for another member's booking.
    pub async fn booking(
        &self,
        actor: Option<&Actor>,
        booking_id: BookingId,
    ) -> Result<Booking, LedgerError> {
        let actor = actor.ok_or(LedgerError::NotAuthenticated)?;
        let booking = match self.schedules.locate_booking(booking_id).await {
            Ok(schedule_id) => {
                let entry_lock = self
                    .schedules
                    .get(schedule_id)
                    .await
                    .map_err(|_| LedgerError::BookingNotFound(booking_id))?;
                let entry = entry_lock.read().await;
                entry.bookings.iter().find(|b| b.id == booking_id).cloned()
            }
            Err(_) => self.schedules.archived_booking(booking_id).await,
        }
        .ok_or(LedgerError::BookingNotFound(booking_id))?;
        if booking.user_id != actor.user_id && !actor.is_admin() {
            return Err(LedgerError::Forbidden(
                "booking belongs to another member".to_string(),
            ));
        }
        Ok(booking)
    }

    /// Returns the caller's own bookings, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotAuthenticated`] without a caller.
    pub async fn my_bookings(&self, actor: Option<&Actor>) -> Result<Vec<Booking>, LedgerError> {
        let actor = actor.ok_or(LedgerError::NotAuthenticated)?;
        Ok(self.bookings_for_user(actor.user_id).await)
    }

    /// Returns every booking owned by `user_id`, newest first.
    pub async fn bookings_for_user(&self, user_id: UserId) -> Vec<Booking> {
        self.schedules
            .bookings(&BookingFilter {
                user_id: Some(user_id),
                ..BookingFilter::default()
            })
            .await
    }

    /// Admin listing of bookings passing `filter`, with per-status totals
    /// over the same selection.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] without a caller.
    /// - [`LedgerError::Forbidden`] for non-admin callers.
    pub async fn list_bookings(
        &self,
        actor: Option<&Actor>,
        filter: &BookingFilter,
    ) -> Result<(Vec<Booking>, BookingCounts), LedgerError> {
        require_admin(actor)?;
        let counted = self
            .schedules
            .bookings(&BookingFilter {
                status: None,
                ..*filter
            })
            .await;
        let mut counts = BookingCounts::default();
        for booking in &counted {
            counts.record(booking.status);
        }
        let bookings = counted.into_iter().filter(|b| filter.matches(b)).collect();
        Ok((bookings, counts))
    }

    /// Error for a booking attempt on an unknown or deleted schedule. A
    /// caller who held an active booking on a deleted schedule is told it
    /// is already booked.
    async fn missing_schedule(&self, actor: &Actor, schedule_id: ScheduleId) -> LedgerError {
        if self
            .schedules
            .had_active_booking(actor.user_id, schedule_id)
            .await
        {
            LedgerError::AlreadyBooked(schedule_id)
        } else {
            LedgerError::ScheduleNotFound(schedule_id)
        }
    }

    /// Draws one pack credit from the user's membership if it is eligible.
    async fn charge_credit(&self, user_id: UserId, now: DateTime<Utc>) -> bool {
        self.memberships
            .update(user_id, |m| m.charge_credit(now))
            .await
            .unwrap_or(false)
    }
}

/// Resolves an admin caller.
///
/// # Errors
///
/// Returns [`LedgerError::NotAuthenticated`] without a caller and
/// [`LedgerError::Forbidden`] for non-admins.
pub fn require_admin(actor: Option<&Actor>) -> Result<&Actor, LedgerError> {
    let actor = actor.ok_or(LedgerError::NotAuthenticated)?;
    if !actor.is_admin() {
        return Err(LedgerError::Forbidden("admin access required".to_string()));
    }
    Ok(actor)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::membership::MembershipStatus;
    use crate::service::test_support::{admin, fixture, member};

    #[tokio::test]
    async fn booking_with_open_spot_confirms() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(20, 48).await;
        let user = member();

        let outcome = tokio_test::assert_ok!(fx.service.book_class(Some(&user), schedule_id).await);
        assert!(!outcome.on_waitlist);
        assert_eq!(outcome.booking.status, BookingStatus::Confirmed);
        assert_eq!(outcome.booking.user_id, user.user_id);

        let Ok(schedule) = fx.service.schedule(schedule_id).await else {
            panic!("schedule should exist");
        };
        assert_eq!(schedule.booked_count, 1);
        assert_eq!(schedule.available_spots(), 19);
    }

    #[tokio::test]
    async fn full_class_puts_second_member_on_waitlist() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(1, 48).await;

        let first = tokio_test::assert_ok!(fx.service.book_class(Some(&member()), schedule_id).await);
        let second =
            tokio_test::assert_ok!(fx.service.book_class(Some(&member()), schedule_id).await);
        assert!(!first.on_waitlist);
        assert!(second.on_waitlist);
        assert_eq!(second.booking.status, BookingStatus::Waitlist);

        let Ok(schedule) = fx.service.schedule(schedule_id).await else {
            panic!("schedule should exist");
        };
        assert_eq!(schedule.booked_count, 1);
        assert_eq!(schedule.waitlist_count, 1);
        assert_eq!(schedule.available_spots(), 0);
    }

    #[tokio::test]
    async fn cancel_reopens_spot_without_promoting_by_default() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(1, 48).await;
        let (u1, u2) = (member(), member());
        let Ok(first) = fx.service.book_class(Some(&u1), schedule_id).await else {
            panic!("book should succeed");
        };
        let Ok(second) = fx.service.book_class(Some(&u2), schedule_id).await else {
            panic!("book should succeed");
        };

        let Ok(outcome) = fx.service.cancel_booking(Some(&u1), first.booking.id).await else {
            panic!("cancel should succeed");
        };
        assert_eq!(outcome.booking.status, BookingStatus::Cancelled);
        assert!(outcome.booking.cancelled_at.is_some());
        assert!(outcome.promoted.is_none());

        let Ok(schedule) = fx.service.schedule(schedule_id).await else {
            panic!("schedule should exist");
        };
        assert_eq!(schedule.booked_count, 0);
        assert_eq!(schedule.waitlist_count, 1);
        assert_eq!(schedule.available_spots(), 1);

        let Ok(waiting) = fx.service.booking(Some(&u2), second.booking.id).await else {
            panic!("booking should exist");
        };
        assert_eq!(waiting.status, BookingStatus::Waitlist);
    }

    #[tokio::test]
    async fn auto_promote_moves_earliest_waitlist_entry() {
        let policy = LedgerPolicy {
            waitlist: WaitlistPolicy::AutoPromote,
            ..LedgerPolicy::default()
        };
        let fx = fixture(policy).await;
        let schedule_id = fx.schedule(1, 48).await;
        let (u1, u2, u3) = (member(), member(), member());
        let Ok(first) = fx.service.book_class(Some(&u1), schedule_id).await else {
            panic!("book should succeed");
        };
        let Ok(second) = fx.service.book_class(Some(&u2), schedule_id).await else {
            panic!("book should succeed");
        };
        let _ = fx.service.book_class(Some(&u3), schedule_id).await;

        let Ok(outcome) = fx.service.cancel_booking(Some(&u1), first.booking.id).await else {
            panic!("cancel should succeed");
        };
        let Some(promoted) = outcome.promoted else {
            panic!("expected a promotion");
        };
        assert_eq!(promoted.id, second.booking.id);
        assert_eq!(promoted.status, BookingStatus::Confirmed);

        let Ok(schedule) = fx.service.schedule(schedule_id).await else {
            panic!("schedule should exist");
        };
        assert_eq!(schedule.booked_count, 1);
        assert_eq!(schedule.waitlist_count, 1);
    }

    #[tokio::test]
    async fn pack_credits_track_bookings() {
        let fx = fixture(LedgerPolicy::default()).await;
        let user = member();
        let _ = fx.service.purchase_membership(Some(&user), fx.pack_plan).await;

        for _ in 0..3 {
            let schedule_id = fx.schedule(10, 48).await;
            let Ok(outcome) = fx.service.book_class(Some(&user), schedule_id).await else {
                panic!("book should succeed");
            };
            assert!(!outcome.on_waitlist);
        }

        let Ok(membership) = fx.service.membership(Some(&user)).await else {
            panic!("membership should exist");
        };
        assert_eq!(membership.credits_remaining, Some(7));
        assert_eq!(membership.credits_used, Some(3));
    }

    #[tokio::test]
    async fn waitlisting_does_not_charge_credit() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(1, 48).await;
        let _ = fx.service.book_class(Some(&member()), schedule_id).await;
        let user = member();
        let _ = fx.service.purchase_membership(Some(&user), fx.pack_plan).await;

        let Ok(outcome) = fx.service.book_class(Some(&user), schedule_id).await else {
            panic!("book should succeed");
        };
        assert!(outcome.on_waitlist);
        let Ok(membership) = fx.service.membership(Some(&user)).await else {
            panic!("membership should exist");
        };
        assert_eq!(membership.credits_remaining, Some(10));
    }

    #[tokio::test]
    async fn cancelled_pack_keeps_drawing_credits() {
        let fx = fixture(LedgerPolicy::default()).await;
        let user = member();
        let _ = fx.service.purchase_membership(Some(&user), fx.pack_plan).await;
        let _ = fx.service.cancel_membership(Some(&user)).await;

        let schedule_id = fx.schedule(5, 48).await;
        let Ok(outcome) = fx.service.book_class(Some(&user), schedule_id).await else {
            panic!("book should succeed");
        };
        assert_eq!(outcome.booking.status, BookingStatus::Confirmed);

        let Ok(membership) = fx.service.membership(Some(&user)).await else {
            panic!("membership should exist");
        };
        assert_eq!(membership.status, MembershipStatus::Cancelled);
        assert_eq!(membership.credits_remaining, Some(9));
        assert_eq!(membership.credits_used, Some(1));
    }

    #[tokio::test]
    async fn exhausted_pack_still_confirms() {
        let fx = fixture(LedgerPolicy::default()).await;
        let user = member();
        let _ = fx.service.purchase_membership(Some(&user), fx.pack_plan).await;

        for hours in 0..10 {
            let schedule_id = fx.schedule(5, 48 + hours).await;
            tokio_test::assert_ok!(fx.service.book_class(Some(&user), schedule_id).await);
        }

        let schedule_id = fx.schedule(5, 72).await;
        let Ok(outcome) = fx.service.book_class(Some(&user), schedule_id).await else {
            panic!("eleventh booking should succeed");
        };
        assert!(!outcome.on_waitlist);
        assert_eq!(outcome.booking.status, BookingStatus::Confirmed);

        let Ok(membership) = fx.service.membership(Some(&user)).await else {
            panic!("membership should exist");
        };
        assert_eq!(membership.credits_remaining, Some(0));
        assert_eq!(membership.credits_used, Some(10));
    }

    #[tokio::test]
    async fn cancelling_twice_fails_cleanly() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(5, 48).await;
        let user = member();
        let Ok(outcome) = fx.service.book_class(Some(&user), schedule_id).await else {
            panic!("book should succeed");
        };
        let _ = fx.service.cancel_booking(Some(&user), outcome.booking.id).await;

        let result = fx.service.cancel_booking(Some(&user), outcome.booking.id).await;
        assert!(matches!(
            result,
            Err(LedgerError::BookingNotCancellable {
                status: BookingStatus::Cancelled,
                ..
            })
        ));
        let Ok(schedule) = fx.service.schedule(schedule_id).await else {
            panic!("schedule should exist");
        };
        assert_eq!(schedule.booked_count, 0);
    }

    #[tokio::test]
    async fn waitlist_booking_cannot_be_cancelled() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(1, 48).await;
        let _ = fx.service.book_class(Some(&member()), schedule_id).await;
        let user = member();
        let Ok(outcome) = fx.service.book_class(Some(&user), schedule_id).await else {
            panic!("book should succeed");
        };
        let result = fx.service.cancel_booking(Some(&user), outcome.booking.id).await;
        assert!(matches!(
            result,
            Err(LedgerError::BookingNotCancellable { .. })
        ));
    }

    #[tokio::test]
    async fn double_booking_is_rejected() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(5, 48).await;
        let user = member();
        let _ = fx.service.book_class(Some(&user), schedule_id).await;

        let result = fx.service.book_class(Some(&user), schedule_id).await;
        assert!(matches!(result, Err(LedgerError::AlreadyBooked(id)) if id == schedule_id));
        let Ok(schedule) = fx.service.schedule(schedule_id).await else {
            panic!("schedule should exist");
        };
        assert_eq!(schedule.booked_count, 1);
    }

    #[tokio::test]
    async fn anonymous_callers_are_rejected() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(5, 48).await;
        tokio_test::assert_err!(fx.service.book_class(None, schedule_id).await);
        assert!(matches!(
            fx.service.join_waitlist(None, schedule_id).await,
            Err(LedgerError::NotAuthenticated)
        ));
        assert!(matches!(
            fx.service.cancel_booking(None, BookingId::new()).await,
            Err(LedgerError::NotAuthenticated)
        ));
        assert!(matches!(
            fx.service.cancel_membership(None).await,
            Err(LedgerError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let fx = fixture(LedgerPolicy::default()).await;
        let user = member();
        assert!(matches!(
            fx.service.book_class(Some(&user), ScheduleId::new()).await,
            Err(LedgerError::ScheduleNotFound(_))
        ));
        assert!(matches!(
            fx.service.cancel_booking(Some(&user), BookingId::new()).await,
            Err(LedgerError::BookingNotFound(_))
        ));
        assert!(matches!(
            fx.service.cancel_membership(Some(&user)).await,
            Err(LedgerError::MembershipNotFound(_))
        ));
    }

    #[tokio::test]
    async fn cancellation_window_blocks_late_member_cancel() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(5, 1).await;
        let user = member();
        let Ok(outcome) = fx.service.book_class(Some(&user), schedule_id).await else {
            panic!("book should succeed");
        };

        let result = fx.service.cancel_booking(Some(&user), outcome.booking.id).await;
        assert!(matches!(
            result,
            Err(LedgerError::CancellationWindowClosed { notice_minutes: 120 })
        ));

        let staff = admin();
        let Ok(cancelled) = fx.service.cancel_booking(Some(&staff), outcome.booking.id).await
        else {
            panic!("admin cancel should succeed");
        };
        assert_eq!(cancelled.booking.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn members_cannot_touch_other_bookings() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(5, 48).await;
        let owner = member();
        let Ok(outcome) = fx.service.book_class(Some(&owner), schedule_id).await else {
            panic!("book should succeed");
        };
        let stranger = member();
        assert!(matches!(
            fx.service.cancel_booking(Some(&stranger), outcome.booking.id).await,
            Err(LedgerError::Forbidden(_))
        ));
        assert!(matches!(
            fx.service.booking(Some(&stranger), outcome.booking.id).await,
            Err(LedgerError::Forbidden(_))
        ));
        tokio_test::assert_ok!(fx.service.booking(Some(&admin()), outcome.booking.id).await);
    }

    #[tokio::test]
    async fn join_and_leave_waitlist() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(5, 48).await;
        let user = member();

        let Ok(entry) = fx.service.join_waitlist(Some(&user), schedule_id).await else {
            panic!("join should succeed");
        };
        assert_eq!(entry.status, BookingStatus::Waitlist);
        assert!(matches!(
            fx.service.join_waitlist(Some(&user), schedule_id).await,
            Err(LedgerError::AlreadyBooked(_))
        ));

        let Ok(removed) = fx.service.leave_waitlist(Some(&user), schedule_id).await else {
            panic!("leave should succeed");
        };
        assert_eq!(removed.id, entry.id);
        assert!(matches!(
            fx.service.leave_waitlist(Some(&user), schedule_id).await,
            Err(LedgerError::NotOnWaitlist(_))
        ));
        assert!(matches!(
            fx.service.booking(Some(&user), entry.id).await,
            Err(LedgerError::BookingNotFound(_))
        ));

        let Ok(schedule) = fx.service.schedule(schedule_id).await else {
            panic!("schedule should exist");
        };
        assert_eq!(schedule.waitlist_count, 0);
        assert_eq!(schedule.booked_count, 0);
    }

    #[tokio::test]
    async fn confirmed_member_cannot_leave_waitlist() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(5, 48).await;
        let user = member();
        let _ = fx.service.book_class(Some(&user), schedule_id).await;
        assert!(matches!(
            fx.service.leave_waitlist(Some(&user), schedule_id).await,
            Err(LedgerError::NotOnWaitlist(_))
        ));
    }

    #[tokio::test]
    async fn waitlisted_member_upgrades_when_spot_opens() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(1, 48).await;
        let (u1, u2) = (member(), member());
        let Ok(first) = fx.service.book_class(Some(&u1), schedule_id).await else {
            panic!("book should succeed");
        };
        let Ok(waiting) = fx.service.book_class(Some(&u2), schedule_id).await else {
            panic!("book should succeed");
        };
        assert!(matches!(
            fx.service.book_class(Some(&u2), schedule_id).await,
            Err(LedgerError::AlreadyBooked(_))
        ));

        let _ = fx.service.cancel_booking(Some(&u1), first.booking.id).await;
        let Ok(upgraded) = fx.service.book_class(Some(&u2), schedule_id).await else {
            panic!("upgrade should succeed");
        };
        assert_eq!(upgraded.booking.id, waiting.booking.id);
        assert_eq!(upgraded.booking.status, BookingStatus::Confirmed);

        let Ok(schedule) = fx.service.schedule(schedule_id).await else {
            panic!("schedule should exist");
        };
        assert_eq!(schedule.booked_count, 1);
        assert_eq!(schedule.waitlist_count, 0);
    }

    #[tokio::test]
    async fn concurrent_bookings_never_overfill() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(5, 48).await;

        let mut handles = Vec::new();
        for _ in 0..25 {
            let service = fx.service.clone();
            handles.push(tokio::spawn(async move {
                service.book_class(Some(&member()), schedule_id).await
            }));
        }
        let mut confirmed = 0;
        let mut waitlisted = 0;
        for handle in handles {
            let Ok(Ok(outcome)) = handle.await else {
                panic!("booking task failed");
            };
            if outcome.on_waitlist {
                waitlisted += 1;
            } else {
                confirmed += 1;
            }
        }
        assert_eq!(confirmed, 5);
        assert_eq!(waitlisted, 20);

        let Ok(schedule) = fx.service.schedule(schedule_id).await else {
            panic!("schedule should exist");
        };
        assert_eq!(schedule.booked_count, 5);
        assert_eq!(schedule.waitlist_count, 20);
    }

    #[tokio::test]
    async fn mutations_emit_events() {
        let fx = fixture(LedgerPolicy::default()).await;
        let mut rx = fx.service.event_bus().subscribe();
        let schedule_id = fx.schedule(1, 48).await;
        let user = member();

        let Ok(outcome) = fx.service.book_class(Some(&user), schedule_id).await else {
            panic!("book should succeed");
        };
        let Ok(LedgerEvent::BookingConfirmed {
            booking_id,
            available_spots,
            credit_charged,
            ..
        }) = rx.recv().await
        else {
            panic!("expected BookingConfirmed");
        };
        assert_eq!(booking_id, outcome.booking.id);
        assert_eq!(available_spots, 0);
        assert!(!credit_charged);

        let _ = fx.service.book_class(Some(&member()), schedule_id).await;
        let Ok(LedgerEvent::BookingWaitlisted { waitlist_count, .. }) = rx.recv().await else {
            panic!("expected BookingWaitlisted");
        };
        assert_eq!(waitlist_count, 1);
    }

    #[tokio::test]
    async fn failed_operations_emit_nothing() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(5, 48).await;
        let user = member();
        let _ = fx.service.book_class(Some(&user), schedule_id).await;

        let mut rx = fx.service.event_bus().subscribe();
        let _ = fx.service.book_class(Some(&user), schedule_id).await;
        let _ = fx.service.leave_waitlist(Some(&user), schedule_id).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn admin_listing_counts_statuses() {
        let fx = fixture(LedgerPolicy::default()).await;
        let schedule_id = fx.schedule(1, 48).await;
        let user = member();
        let Ok(first) = fx.service.book_class(Some(&user), schedule_id).await else {
            panic!("book should succeed");
        };
        let _ = fx.service.book_class(Some(&member()), schedule_id).await;
        let _ = fx.service.cancel_booking(Some(&user), first.booking.id).await;

        assert!(matches!(
            fx.service
                .list_bookings(Some(&user), &BookingFilter::default())
                .await,
            Err(LedgerError::Forbidden(_))
        ));

        let filter = BookingFilter {
            status: Some(BookingStatus::Waitlist),
            ..BookingFilter::default()
        };
        let Ok((bookings, counts)) = fx.service.list_bookings(Some(&admin()), &filter).await
        else {
            panic!("admin listing should succeed");
        };
        assert_eq!(bookings.len(), 1);
        assert_eq!(counts.waitlist, 1);
        assert_eq!(counts.cancelled, 1);
        assert_eq!(counts.confirmed, 0);

        let mine = fx.service.bookings_for_user(user.user_id).await;
        assert_eq!(mine.len(), 1);
    }
}
