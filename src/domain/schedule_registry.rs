//! Concurrent schedule storage with per-schedule locking.
//!
//! [`ScheduleRegistry`] stores every schedule together with the bookings
//! made against it. Each [`ScheduleEntry`] sits behind its own
//! [`tokio::sync::RwLock`], so a ledger operation that holds the entry's
//! write lock sees and updates the counters and booking records of that
//! schedule atomically, while operations on different schedules proceed
//! concurrently.
//!
//! # Lock order
//!
//! outer map → schedule entry → booking index → archive → membership
//! registry.
//! The outer map lock is never held while waiting on an entry for write.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::booking::{Booking, BookingFilter, BookingStatus};
use super::schedule::{Schedule, ScheduleFilter};
use super::{BookingId, ScheduleId, UserId};
use crate::error::LedgerError;

/// A schedule and the bookings held against it.
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    /// The schedule and its counters.
    pub schedule: Schedule,
    /// Every booking made against this schedule, in creation order.
    pub bookings: Vec<Booking>,
    removed: bool,
}

impl ScheduleEntry {
    /// Wraps a schedule with no bookings.
    #[must_use]
    pub const fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            bookings: Vec::new(),
            removed: false,
        }
    }

    /// Returns `true` once the entry has been deleted from the registry.
    /// Callers that obtained the entry before deletion must treat it as
    /// missing.
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        self.removed
    }

    /// The user's active (`confirmed` or `waitlist`) booking, if any.
    #[must_use]
    pub fn active_booking_of(&self, user_id: UserId) -> Option<&Booking> {
        self.bookings
            .iter()
            .find(|b| b.user_id == user_id && b.is_active())
    }

    /// Mutable access to a booking by id.
    pub fn booking_mut(&mut self, booking_id: BookingId) -> Option<&mut Booking> {
        self.bookings.iter_mut().find(|b| b.id == booking_id)
    }

    /// Position of the user's waitlist entry, if any.
    #[must_use]
    pub fn waitlist_position_of(&self, user_id: UserId) -> Option<usize> {
        self.bookings
            .iter()
            .position(|b| b.user_id == user_id && b.status == BookingStatus::Waitlist)
    }

    /// Position of the earliest waitlist entry by `booked_at`.
    #[must_use]
    pub fn earliest_waitlisted(&self) -> Option<usize> {
        self.bookings
            .iter()
            .enumerate()
            .filter(|(_, b)| b.status == BookingStatus::Waitlist)
            .min_by_key(|(_, b)| b.booked_at)
            .map(|(idx, _)| idx)
    }

    /// Number of `confirmed` and `waitlist` bookings.
    #[must_use]
    pub fn active_bookings(&self) -> u32 {
        let n = self.bookings.iter().filter(|b| b.is_active()).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }
}

/// Central store for all schedules and their bookings.
///
/// # Concurrency
///
/// - Reads of the same schedule proceed concurrently.
/// - Writes to different schedules proceed concurrently.
/// - Writes to the same schedule are serialized, which keeps
///   `0 ≤ booked_count ≤ capacity` under concurrent booking attempts.
#[derive(Debug, Default)]
pub struct ScheduleRegistry {
    schedules: RwLock<HashMap<ScheduleId, Arc<RwLock<ScheduleEntry>>>>,
    booking_index: RwLock<HashMap<BookingId, ScheduleId>>,
    archive: RwLock<HashMap<BookingId, Booking>>,
}

impl ScheduleRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new schedule.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidRequest`] if a schedule with the same
    /// id already exists.
    pub async fn insert(&self, schedule: Schedule) -> Result<ScheduleId, LedgerError> {
        let id = schedule.id;
        let mut map = self.schedules.write().await;
        if map.contains_key(&id) {
            return Err(LedgerError::InvalidRequest(format!(
                "schedule {id} already exists"
            )));
        }
        map.insert(id, Arc::new(RwLock::new(ScheduleEntry::new(schedule))));
        Ok(id)
    }

    /// Returns the per-schedule lock for `id`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ScheduleNotFound`] if no such schedule exists.
    pub async fn get(&self, id: ScheduleId) -> Result<Arc<RwLock<ScheduleEntry>>, LedgerError> {
        let map = self.schedules.read().await;
        map.get(&id)
            .map(Arc::clone)
            .ok_or(LedgerError::ScheduleNotFound(id))
    }

    /// Returns a snapshot of one schedule.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ScheduleNotFound`] if no such schedule exists.
    pub async fn schedule(&self, id: ScheduleId) -> Result<Schedule, LedgerError> {
        let entry_lock = self.get(id).await?;
        let entry = entry_lock.read().await;
        Ok(entry.schedule.clone())
    }

    /// Removes a schedule, returning the final state of the entry. Its
    /// bookings leave the booking index and move to the archive, where
    /// they stay readable but can no longer change.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ScheduleNotFound`] if no such schedule exists.
    pub async fn remove(&self, id: ScheduleId) -> Result<ScheduleEntry, LedgerError> {
        let entry_lock = self
            .schedules
            .write()
            .await
            .remove(&id)
            .ok_or(LedgerError::ScheduleNotFound(id))?;

        let mut entry = entry_lock.write().await;
        entry.removed = true;

        let mut index = self.booking_index.write().await;
        let mut archive = self.archive.write().await;
        for booking in &entry.bookings {
            index.remove(&booking.id);
            archive.insert(booking.id, booking.clone());
        }
        Ok(entry.clone())
    }

    /// A booking of a deleted schedule.
    pub async fn archived_booking(&self, booking_id: BookingId) -> Option<Booking> {
        self.archive.read().await.get(&booking_id).cloned()
    }

    /// Returns `true` if `user_id` held an active booking on the deleted
    /// schedule `schedule_id`.
    pub async fn had_active_booking(&self, user_id: UserId, schedule_id: ScheduleId) -> bool {
        self.archive
            .read()
            .await
            .values()
            .any(|b| b.schedule_id == schedule_id && b.user_id == user_id && b.is_active())
    }

    /// Records which schedule a booking belongs to.
    pub async fn index_booking(&self, booking_id: BookingId, schedule_id: ScheduleId) {
        self.booking_index
            .write()
            .await
            .insert(booking_id, schedule_id);
    }

    /// Forgets a booking id.
    pub async fn unindex_booking(&self, booking_id: BookingId) {
        self.booking_index.write().await.remove(&booking_id);
    }

    /// Resolves the schedule a booking belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::BookingNotFound`] for an unknown booking.
    pub async fn locate_booking(&self, booking_id: BookingId) -> Result<ScheduleId, LedgerError> {
        self.booking_index
            .read()
            .await
            .get(&booking_id)
            .copied()
            .ok_or(LedgerError::BookingNotFound(booking_id))
    }

    /// Snapshots of every schedule passing `filter`, ordered by start time.
    pub async fn list(&self, filter: &ScheduleFilter) -> Vec<Schedule> {
        let map = self.schedules.read().await;
        let mut schedules = Vec::with_capacity(map.len());
        for entry_lock in map.values() {
            let entry = entry_lock.read().await;
            if filter.matches(&entry.schedule) {
                schedules.push(entry.schedule.clone());
            }
        }
        schedules.sort_by_key(|s| s.start_time);
        schedules
    }

    /// Every booking passing `filter`, newest first.
    pub async fn bookings(&self, filter: &BookingFilter) -> Vec<Booking> {
        let mut bookings = Vec::new();
        if let Some(schedule_id) = filter.schedule_id {
            if let Ok(entry_lock) = self.get(schedule_id).await {
                let entry = entry_lock.read().await;
                bookings.extend(entry.bookings.iter().filter(|b| filter.matches(b)).cloned());
            }
        } else {
            let map = self.schedules.read().await;
            for entry_lock in map.values() {
                let entry = entry_lock.read().await;
                bookings.extend(entry.bookings.iter().filter(|b| filter.matches(b)).cloned());
            }
        }
        bookings.extend(
            self.archive
                .read()
                .await
                .values()
                .filter(|b| filter.matches(b))
                .cloned(),
        );
        bookings.sort_by(|a, b| b.booked_at.cmp(&a.booked_at));
        bookings
    }

    /// Returns the number of schedules.
    pub async fn len(&self) -> usize {
        self.schedules.read().await.len()
    }

    /// Returns `true` if the registry holds no schedules.
    pub async fn is_empty(&self) -> bool {
        self.schedules.read().await.is_empty()
    }
}
