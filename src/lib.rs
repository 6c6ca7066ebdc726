//! # studio-ledger
//!
//! Booking, waitlist and membership ledger for a fitness studio, served
//! over REST and WebSocket.
//!
//! The ledger decides whether a booking is confirmed or waitlisted,
//! draws pack credits, keeps each schedule's booked and waitlist
//! counters consistent under cancellation, and enforces the
//! cancellation-notice window. Every operation on one schedule runs
//! under that schedule's lock, so `0 <= booked_count <= capacity` holds
//! under concurrent requests.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)      ── Notifier, PaymentGateway (integrations/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── LedgerService, AccountService (service/)
//!     ├── EventBus (domain/)
//!     │
//!     ├── ScheduleRegistry, MembershipRegistry, Catalog, UserRegistry (domain/)
//!     │
//!     └── PostgreSQL event log (persistence/, optional)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod integrations;
pub mod persistence;
pub mod seed;
pub mod service;
pub mod ws;
