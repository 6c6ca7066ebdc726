//! Administrator operations on the timetable.

use chrono::Utc;

use super::ledger_service::{LedgerService, require_admin};
use crate::domain::schedule::{NewSchedule, ScheduleStatus, ScheduleUpdate};
use crate::domain::{Actor, LedgerEvent, Schedule, ScheduleId};
use crate::error::LedgerError;

impl LedgerService {
    /// Adds a schedule for an existing class and instructor.
    ///
    /// Capacity defaults to the class definition's capacity.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] / [`LedgerError::Forbidden`]
    ///   unless the caller is an admin.
    /// - [`LedgerError::ClassNotFound`] / [`LedgerError::InstructorNotFound`]
    ///   for unknown references.
    /// - [`LedgerError::InvalidRequest`] if the class does not end after it
    ///   starts or the capacity is zero.
    pub async fn add_schedule(
        &self,
        actor: Option<&Actor>,
        input: NewSchedule,
    ) -> Result<Schedule, LedgerError> {
        require_admin(actor)?;
        let class = self.catalog.class(input.class_id).await?;
        self.catalog.instructor(input.instructor_id).await?;

        if input.end_time <= input.start_time {
            return Err(LedgerError::InvalidRequest(
                "end_time must be after start_time".to_string(),
            ));
        }
        let capacity = input.capacity.unwrap_or(class.capacity);
        if capacity == 0 {
            return Err(LedgerError::InvalidRequest(
                "capacity must be positive".to_string(),
            ));
        }

        let schedule = Schedule::new(
            input.class_id,
            input.instructor_id,
            input.start_time,
            input.end_time,
            capacity,
        );
        self.schedules.insert(schedule.clone()).await?;

        let _ = self.event_bus.publish(LedgerEvent::ScheduleCreated {
            schedule_id: schedule.id,
            class_id: schedule.class_id,
            start_time: schedule.start_time,
            capacity,
            timestamp: Utc::now(),
        });
        tracing::info!(schedule_id = %schedule.id, class = %class.name, capacity, "schedule added");
        Ok(schedule)
    }

    /// Applies a partial update to a schedule's time, instructor or
    /// capacity. Counters are never edited directly.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] / [`LedgerError::Forbidden`]
    ///   unless the caller is an admin.
    /// - [`LedgerError::ScheduleNotFound`] for an unknown schedule.
    /// - [`LedgerError::ScheduleCancelled`] for a cancelled schedule.
    /// - [`LedgerError::InstructorNotFound`] for an unknown instructor.
    /// - [`LedgerError::InvalidRequest`] if the new capacity is below the
    ///   booked count or the times are inverted.
    pub async fn update_schedule(
        &self,
        actor: Option<&Actor>,
        schedule_id: ScheduleId,
        update: ScheduleUpdate,
    ) -> Result<Schedule, LedgerError> {
        require_admin(actor)?;
        if let Some(instructor_id) = update.instructor_id {
            self.catalog.instructor(instructor_id).await?;
        }

        let entry_lock = self.schedules.get(schedule_id).await?;
        let mut entry = entry_lock.write().await;
        if entry.is_removed() {
            return Err(LedgerError::ScheduleNotFound(schedule_id));
        }
        if entry.schedule.is_cancelled() {
            return Err(LedgerError::ScheduleCancelled(schedule_id));
        }

        let start_time = update.start_time.unwrap_or(entry.schedule.start_time);
        let end_time = update.end_time.unwrap_or(entry.schedule.end_time);
        if end_time <= start_time {
            return Err(LedgerError::InvalidRequest(
                "end_time must be after start_time".to_string(),
            ));
        }
        let capacity = update.capacity.unwrap_or(entry.schedule.capacity);
        if capacity == 0 || capacity < entry.schedule.booked_count {
            return Err(LedgerError::InvalidRequest(format!(
                "capacity {capacity} is below the {} confirmed bookings",
                entry.schedule.booked_count
            )));
        }

        entry.schedule.start_time = start_time;
        entry.schedule.end_time = end_time;
        entry.schedule.capacity = capacity;
        if let Some(instructor_id) = update.instructor_id {
            entry.schedule.instructor_id = instructor_id;
        }
        let snapshot = entry.schedule.clone();
        drop(entry);

        let _ = self.event_bus.publish(LedgerEvent::ScheduleUpdated {
            schedule_id,
            capacity,
            available_spots: snapshot.available_spots(),
            timestamp: Utc::now(),
        });
        tracing::info!(%schedule_id, capacity, "schedule updated");
        Ok(snapshot)
    }

    /// Removes a schedule from the timetable. Its bookings stay readable
    /// in members' history but can no longer be cancelled.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] / [`LedgerError::Forbidden`]
    ///   unless the caller is an admin.
    /// - [`LedgerError::ScheduleNotFound`] for an unknown schedule.
    pub async fn delete_schedule(
        &self,
        actor: Option<&Actor>,
        schedule_id: ScheduleId,
    ) -> Result<Schedule, LedgerError> {
        require_admin(actor)?;
        let removed = self.schedules.remove(schedule_id).await?;

        let _ = self.event_bus.publish(LedgerEvent::ScheduleDeleted {
            schedule_id,
            timestamp: Utc::now(),
        });
        tracing::info!(
            %schedule_id,
            dropped_bookings = removed.bookings.len(),
            "schedule deleted"
        );
        Ok(removed.schedule)
    }

    /// Marks a scheduled class cancelled so it accepts no further bookings
    /// or waitlist entries. Existing bookings keep their status and no
    /// credits are refunded.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotAuthenticated`] / [`LedgerError::Forbidden`]
    ///   unless the caller is an admin.
    /// - [`LedgerError::ScheduleNotFound`] for an unknown schedule.
    /// - [`LedgerError::ScheduleCancelled`] if it is already cancelled.
    pub async fn cancel_scheduled_class(
        &self,
        actor: Option<&Actor>,
        schedule_id: ScheduleId,
    ) -> Result<Schedule, LedgerError> {
        require_admin(actor)?;
        let entry_lock = self.schedules.get(schedule_id).await?;
        let mut entry = entry_lock.write().await;
        if entry.is_removed() {
            return Err(LedgerError::ScheduleNotFound(schedule_id));
        }
        if entry.schedule.is_cancelled() {
            return Err(LedgerError::ScheduleCancelled(schedule_id));
        }

        entry.schedule.status = ScheduleStatus::Cancelled;
        let affected_bookings = entry.active_bookings();
        let snapshot = entry.schedule.clone();
        drop(entry);

        let _ = self.event_bus.publish(LedgerEvent::ScheduleCancelled {
            schedule_id,
            affected_bookings,
            timestamp: Utc::now(),
        });
        tracing::info!(%schedule_id, affected_bookings, "scheduled class cancelled");
        Ok(snapshot)
    }
}
