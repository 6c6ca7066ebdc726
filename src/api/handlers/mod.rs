//! REST endpoint handlers organized by resource.

pub mod accounts;
pub mod admin;
pub mod bookings;
pub mod catalog;
pub mod memberships;
pub mod schedules;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(accounts::routes())
        .merge(schedules::routes())
        .merge(bookings::routes())
        .merge(memberships::routes())
        .merge(catalog::routes())
        .merge(admin::routes())
}
