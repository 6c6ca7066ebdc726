//! WebSocket layer: connection handling, message routing, subscriptions.
//!
//! The WebSocket endpoint at `/ws` streams [`crate::domain::LedgerEvent`]s
//! for the schedules a client subscribes to, and answers schedule
//! snapshot requests.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
