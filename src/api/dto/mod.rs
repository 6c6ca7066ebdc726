//! Data Transfer Objects for REST request/response serialization.
//!
//! Domain records that already carry `Serialize + ToSchema` (bookings,
//! memberships, plans) are returned as-is. The types here cover request
//! bodies, query strings and composite responses.

pub mod account_dto;
pub mod booking_dto;
pub mod common_dto;
pub mod membership_dto;
pub mod schedule_dto;

pub use account_dto::*;
pub use booking_dto::*;
pub use common_dto::*;
pub use membership_dto::*;
pub use schedule_dto::*;
