//! Sign-up and login DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::User;

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SignupRequest {
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Password, at least 6 characters.
    pub password: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// Login email.
    pub email: String,
    /// Password, at least 6 characters.
    pub password: String,
}

/// Response body for sign-up and login.
///
/// Subsequent requests identify the caller by sending `user.id` in the
/// `x-user-id` header.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    /// The signed-in user.
    pub user: User,
}
