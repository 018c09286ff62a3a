//! Species and dashboard summary handlers.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::domain::{DashboardSummary, SpeciesRecord};
use crate::error::{DashboardError, ErrorResponse};

/// `GET /species` — All species ordered by name.
///
/// # Errors
///
/// Returns [`DashboardError`] if the store query fails.
#[utoipa::path(
    get,
    path = "/api/v1/species",
    tag = "Species",
    summary = "List species",
    responses(
        (status = 200, description = "Species list", body = Vec<SpeciesRecord>),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_species(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, DashboardError> {
    Ok(Json(state.monitoring.list_species().await?))
}

/// `GET /summary` — Header counts.
///
/// # Errors
///
/// Returns [`DashboardError`] if the store query fails.
#[utoipa::path(
    get,
    path = "/api/v1/summary",
    tag = "Dashboard",
    summary = "Dashboard summary",
    description = "Counts of animals, species, cameras (total and online) and active alerts by severity.",
    responses(
        (status = 200, description = "Summary counts", body = DashboardSummary),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn summary(State(state): State<AppState>) -> Result<impl IntoResponse, DashboardError> {
    Ok(Json(state.monitoring.summary().await?))
}

/// Species and summary routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/species", get(list_species))
        .route("/summary", get(summary))
}
