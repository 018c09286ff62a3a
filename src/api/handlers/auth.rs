//! Authentication handlers: login, logout, current session.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::LoginRequest;
use crate::api::extract::{ApiJson, RequireSession};
use crate::app_state::AppState;
use crate::domain::Session;
use crate::error::{DashboardError, ErrorResponse};

/// `POST /auth/login` — Verify credentials and open a session.
///
/// # Errors
///
/// Returns [`DashboardError::InvalidRequest`] for malformed input and
/// [`DashboardError::InvalidCredentials`] when verification fails.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    summary = "Log in",
    description = "Validates the email pattern and password length, verifies the password against the stored hash, and returns a bearer session.",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = Session),
        (status = 400, description = "Malformed email or short password", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, DashboardError> {
    let session = state.auth.login(&req.email, &req.password).await?;
    Ok(Json(session))
}

/// `POST /auth/logout` — Close the caller's session.
///
/// # Errors
///
/// Returns [`DashboardError::Unauthorized`] without a live session.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    summary = "Log out",
    responses(
        (status = 204, description = "Session closed"),
        (status = 401, description = "Missing or expired session", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn logout(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
) -> Result<impl IntoResponse, DashboardError> {
    state.auth.logout(session.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /auth/session` — The caller's current session.
///
/// # Errors
///
/// Returns [`DashboardError::Unauthorized`] without a live session.
#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    tag = "Auth",
    summary = "Current session",
    responses(
        (status = 200, description = "Live session", body = Session),
        (status = 401, description = "Missing or expired session", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn current_session(RequireSession(session): RequireSession) -> impl IntoResponse {
    Json(session)
}

/// Auth routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .route("/auth/session", get(current_session))
}
