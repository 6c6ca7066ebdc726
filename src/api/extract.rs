//! Caller identity extraction.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::app_state::AppState;
use crate::domain::{Actor, UserId};

/// Header carrying the signed-in user's id.
pub const USER_ID_HEADER: &str = "x-user-id";

/// The caller resolved from the `x-user-id` header.
///
/// Missing, malformed or unknown ids yield `CurrentUser(None)`; each
/// operation decides whether an anonymous caller is acceptable.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Option<Actor>);

impl CurrentUser {
    /// The resolved caller, if any.
    #[must_use]
    pub const fn actor(&self) -> Option<&Actor> {
        self.0.as_ref()
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(user_id) = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s.trim()).ok())
            .map(UserId::from_uuid)
        else {
            return Ok(Self(None));
        };
        Ok(Self(state.accounts.resolve(user_id).await))
    }
}
