//! Camera handlers: list, add, update.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::api::extract::{ApiJson, ApiPath, RequireSession};
use crate::app_state::AppState;
use crate::domain::{CameraRecord, CameraUpdate, NewCamera};
use crate::error::{DashboardError, ErrorResponse};

/// `GET /cameras` — All cameras ordered by name.
///
/// # Errors
///
/// Returns [`DashboardError`] if the store query fails.
#[utoipa::path(
    get,
    path = "/api/v1/cameras",
    tag = "Cameras",
    summary = "List cameras",
    description = "Returns every camera ordered by name. Point locations render as `(x, y)`; text locations pass through; a missing maintenance date reads `Not recorded`.",
    responses(
        (status = 200, description = "Camera list", body = Vec<CameraRecord>),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_cameras(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DashboardError> {
    Ok(Json(state.monitoring.list_cameras().await?))
}

/// `POST /cameras` — Install a new camera.
///
/// # Errors
///
/// Returns [`DashboardError`] on validation failure or store rejection.
#[utoipa::path(
    post,
    path = "/api/v1/cameras",
    tag = "Cameras",
    summary = "Add a camera",
    description = "Inserts a camera from separate latitude and longitude inputs, stored as a point.",
    request_body = NewCamera,
    responses(
        (status = 201, description = "Camera created", body = CameraRecord),
        (status = 400, description = "Invalid coordinates or threshold", body = ErrorResponse),
        (status = 401, description = "Missing or expired session", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn add_camera(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    ApiJson(camera): ApiJson<NewCamera>,
) -> Result<impl IntoResponse, DashboardError> {
    let record = state.monitoring.add_camera(&camera).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// `PATCH /cameras/:id` — Change status and/or detection threshold.
///
/// # Errors
///
/// Returns [`DashboardError::CameraNotFound`] if the camera does not exist.
#[utoipa::path(
    patch,
    path = "/api/v1/cameras/{id}",
    tag = "Cameras",
    summary = "Update a camera",
    description = "Updates only `status` and `detection_threshold`; other fields are ignored.",
    params(
        ("id" = i64, Path, description = "Camera id"),
    ),
    request_body = CameraUpdate,
    responses(
        (status = 200, description = "Updated camera", body = CameraRecord),
        (status = 400, description = "Empty or invalid update", body = ErrorResponse),
        (status = 401, description = "Missing or expired session", body = ErrorResponse),
        (status = 404, description = "Camera not found", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn update_camera(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    ApiPath(id): ApiPath<i64>,
    ApiJson(update): ApiJson<CameraUpdate>,
) -> Result<impl IntoResponse, DashboardError> {
    Ok(Json(state.monitoring.update_camera(id, &update).await?))
}

/// Camera routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cameras", get(list_cameras).post(add_camera))
        .route("/cameras/{id}", patch(update_camera))
}
