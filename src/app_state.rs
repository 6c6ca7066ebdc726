//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::domain::EventBus;
use crate::integrations::{Notifier, PaymentGateway};
use crate::persistence::PostgresPersistence;
use crate::service::{AccountService, LedgerService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Booking ledger for all schedule, booking and membership logic.
    pub ledger: Arc<LedgerService>,
    /// Sign-up, login and caller resolution.
    pub accounts: Arc<AccountService>,
    /// Member notifications, sent after successful mutations.
    pub notifier: Arc<dyn Notifier>,
    /// Card payments for membership purchases.
    pub payments: Arc<dyn PaymentGateway>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// PostgreSQL event log, when persistence is enabled.
    pub event_log: Option<PostgresPersistence>,
}
