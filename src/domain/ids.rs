//! Type-safe identifiers for every ledger entity.
//!
//! Each identifier is a newtype wrapper around [`uuid::Uuid`] (v4) so a
//! booking id can never be passed where a schedule id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random identifier (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Creates an identifier from an existing [`uuid::Uuid`].
            #[must_use]
            pub const fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner [`uuid::Uuid`].
            #[must_use]
            pub const fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<uuid::Uuid> for $name {
            fn from(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for uuid::Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

typed_id!(
    /// Identifier of one dated occurrence of a class.
    ScheduleId
);
typed_id!(
    /// Identifier of a single booking record.
    BookingId
);
typed_id!(
    /// Identifier of a studio member or administrator.
    UserId
);
typed_id!(
    /// Identifier of a class definition in the catalog.
    ClassId
);
typed_id!(
    /// Identifier of an instructor in the catalog.
    InstructorId
);
typed_id!(
    /// Identifier of a purchasable membership plan.
    PlanId
);
typed_id!(
    /// Identifier of a purchased membership record.
    MembershipId
);
