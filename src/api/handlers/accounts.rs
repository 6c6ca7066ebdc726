//! Account handlers: sign-up, login and the current-user lookup.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{LoginRequest, SessionResponse, SignupRequest};
use crate::api::extract::CurrentUser;
use crate::api::notify;
use crate::app_state::AppState;
use crate::domain::User;
use crate::error::{ErrorResponse, LedgerError};

/// `POST /auth/signup`: Create a customer account.
///
/// # Errors
///
/// Returns [`LedgerError`] on invalid input or a duplicate email.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    tag = "Accounts",
    summary = "Sign up",
    description = "Creates a customer account and sends a welcome message. Send the returned user id in the `x-user-id` header on later requests.",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Invalid email, name or password", body = ErrorResponse),
        (status = 409, description = "Email already registered", body = ErrorResponse),
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let user = state
        .accounts
        .signup(&req.email, &req.name, &req.password, req.phone)
        .await?;
    notify::welcome(&state, &user);
    Ok((StatusCode::CREATED, Json(SessionResponse { user })))
}

/// `POST /auth/login`: Log in by email.
///
/// # Errors
///
/// Returns [`LedgerError`] on invalid input or a rejected admin password.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Accounts",
    summary = "Log in",
    description = "Logs in by email. Unknown emails are registered as customers on the fly. Admin accounts require the configured admin password.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = SessionResponse),
        (status = 400, description = "Invalid email or password", body = ErrorResponse),
        (status = 401, description = "Wrong admin password", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, LedgerError> {
    let user = state.accounts.login(&req.email, &req.password).await?;
    Ok(Json(SessionResponse { user }))
}

/// `GET /me`: The signed-in user.
///
/// # Errors
///
/// Returns [`LedgerError::NotAuthenticated`] without a valid `x-user-id`.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    tag = "Accounts",
    summary = "Current user",
    responses(
        (status = 200, description = "Signed-in user", body = User),
        (status = 401, description = "Not logged in", body = ErrorResponse),
    )
)]
pub async fn me(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<User>, LedgerError> {
    Ok(Json(state.accounts.me(caller.actor()).await?))
}

/// Account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/me", get(me))
}
