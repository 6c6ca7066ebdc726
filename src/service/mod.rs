//! Service layer: business logic orchestration.
//!
//! [`LedgerService`] is the booking ledger. It coordinates the schedule
//! and membership registries and emits events through the
//! [`super::domain::EventBus`]. [`AccountService`] handles sign-up,
//! login and caller resolution.

pub mod account_service;
pub mod ledger_service;
mod membership_service;
mod schedule_admin;

#[cfg(test)]
pub(crate) mod test_support;

pub use account_service::AccountService;
pub use ledger_service::{LedgerService, require_admin};
