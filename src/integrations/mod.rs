//! Outbound integrations consumed by the HTTP layer.
//!
//! The ledger never calls these. Handlers invoke them around a ledger
//! mutation: payments are settled before a membership purchase, and
//! notifications go out on a spawned task after a successful mutation.

pub mod notifier;
pub mod payment;

pub use notifier::{LogNotifier, Notification, Notifier};
pub use payment::{PaymentGateway, SimulatedPayments};
