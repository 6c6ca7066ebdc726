//! Persistence layer: PostgreSQL audit log of ledger events.
//!
//! The in-memory registries are the source of truth. When enabled, a
//! recorder task drains the [`crate::domain::EventBus`] into the
//! `ledger_events` table through `sqlx::PgPool`.

pub mod models;
pub mod postgres;
pub mod recorder;

pub use postgres::PostgresPersistence;
pub use recorder::spawn_event_recorder;
