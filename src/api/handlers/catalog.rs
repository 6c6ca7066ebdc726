//! Read-only catalog handlers.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::domain::catalog::{FitnessClass, Instructor};

/// `GET /classes`: Class definitions.
#[utoipa::path(
    get,
    path = "/api/v1/classes",
    tag = "Catalog",
    summary = "List classes",
    responses(
        (status = 200, description = "Class definitions", body = Vec<FitnessClass>),
    )
)]
pub async fn list_classes(State(state): State<AppState>) -> Json<Vec<FitnessClass>> {
    Json(state.ledger.catalog().classes().await)
}

/// `GET /instructors`: Instructors.
#[utoipa::path(
    get,
    path = "/api/v1/instructors",
    tag = "Catalog",
    summary = "List instructors",
    responses(
        (status = 200, description = "Instructors", body = Vec<Instructor>),
    )
)]
pub async fn list_instructors(State(state): State<AppState>) -> Json<Vec<Instructor>> {
    Json(state.ledger.catalog().instructors().await)
}

/// Catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list_classes))
        .route("/instructors", get(list_instructors))
}
