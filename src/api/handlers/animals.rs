//! Animal handlers: list and add.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::extract::{ApiJson, RequireSession};
use crate::app_state::AppState;
use crate::domain::{AnimalRecord, NewAnimal};
use crate::error::{DashboardError, ErrorResponse};

/// `GET /animals` — All animals ordered by name.
///
/// # Errors
///
/// Returns [`DashboardError`] if the store query fails.
#[utoipa::path(
    get,
    path = "/api/v1/animals",
    tag = "Animals",
    summary = "List animals",
    description = "Returns every tracked animal ordered by name, with the species name joined and the last sighting rendered for display (`Unknown` when never seen).",
    responses(
        (status = 200, description = "Animal list", body = Vec<AnimalRecord>),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_animals(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DashboardError> {
    Ok(Json(state.monitoring.list_animals().await?))
}

/// `POST /animals` — Register a new animal.
///
/// # Errors
///
/// Returns [`DashboardError`] on validation failure or store rejection.
#[utoipa::path(
    post,
    path = "/api/v1/animals",
    tag = "Animals",
    summary = "Add an animal",
    description = "Inserts one animal. The id is assigned by the store; the response carries it together with the joined species name.",
    request_body = NewAnimal,
    responses(
        (status = 201, description = "Animal created", body = AnimalRecord),
        (status = 400, description = "Missing required field", body = ErrorResponse),
        (status = 401, description = "Missing or expired session", body = ErrorResponse),
        (status = 500, description = "Store rejected the insert", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn add_animal(
    State(state): State<AppState>,
    RequireSession(_session): RequireSession,
    ApiJson(animal): ApiJson<NewAnimal>,
) -> Result<impl IntoResponse, DashboardError> {
    let record = state.monitoring.add_animal(&animal).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Animal routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/animals", get(list_animals).post(add_animal))
}
