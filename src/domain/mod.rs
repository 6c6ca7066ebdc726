//! Domain layer: entities, registries, policy and the event system.
//!
//! This module holds the ledger's state model: schedules with their
//! occupancy counters and bookings, per-user memberships, the studio
//! catalog, users, the event bus broadcasting committed mutations, and
//! the registries that own all of it.

pub mod booking;
pub mod catalog;
pub mod event_bus;
pub mod ids;
pub mod ledger_event;
pub mod membership;
pub mod membership_registry;
pub mod policy;
pub mod schedule;
pub mod schedule_registry;
pub mod user;
pub mod user_registry;

pub use booking::{Booking, BookingStatus};
pub use catalog::Catalog;
pub use event_bus::EventBus;
pub use ids::{BookingId, ClassId, InstructorId, MembershipId, PlanId, ScheduleId, UserId};
pub use ledger_event::LedgerEvent;
pub use membership::{Membership, MembershipPlan};
pub use membership_registry::MembershipRegistry;
pub use policy::{LedgerPolicy, WaitlistPolicy};
pub use schedule::{Schedule, ScheduleStatus};
pub use schedule_registry::ScheduleRegistry;
pub use user::{Actor, Role, User};
pub use user_registry::UserRegistry;
