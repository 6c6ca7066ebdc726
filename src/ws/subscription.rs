//! Per-connection subscription manager.
//!
//! Tracks which schedule IDs a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::HashSet;

use crate::domain::{LedgerEvent, ScheduleId};

/// Manages the set of schedule subscriptions for a single WebSocket
/// connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed schedule IDs. If `subscribe_all` is true, this set is
    /// ignored.
    schedule_ids: HashSet<ScheduleId>,
    /// Whether the client subscribes to everything (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds schedule IDs to the subscription set.
    pub fn subscribe(&mut self, ids: &[ScheduleId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.schedule_ids.extend(ids.iter().copied());
    }

    /// Removes schedule IDs from the subscription set. Removing `"*"`
    /// turns the wildcard off.
    pub fn unsubscribe(&mut self, ids: &[ScheduleId], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for id in ids {
            self.schedule_ids.remove(id);
        }
    }

    /// Returns `true` if `event` passes the subscription filter. Events
    /// not tied to a schedule reach wildcard subscribers only.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        if self.subscribe_all {
            return true;
        }
        event
            .schedule_id()
            .is_some_and(|id| self.schedule_ids.contains(&id))
    }

    /// Returns the number of explicitly subscribed schedule IDs.
    #[must_use]
    pub fn count(&self) -> usize {
        self.schedule_ids.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
