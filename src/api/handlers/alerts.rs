//! Alert handlers: list and resolve.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::AlertListParams;
use crate::api::extract::{ApiPath, ApiQuery, RequireSession};
use crate::app_state::AppState;
use crate::domain::{AlertQuery, AlertRecord};
use crate::error::{DashboardError, ErrorResponse};

/// `GET /alerts` — Most recent alerts, newest first.
///
/// # Errors
///
/// Returns [`DashboardError`] if the store query fails.
#[utoipa::path(
    get,
    path = "/api/v1/alerts",
    tag = "Alerts",
    summary = "List alerts",
    description = "Returns the most recent alerts ordered newest first, with the animal name joined. Only active alerts unless `include_resolved` is set.",
    params(AlertListParams),
    responses(
        (status = 200, description = "Alert list", body = Vec<AlertRecord>),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_alerts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<AlertListParams>,
) -> Result<impl IntoResponse, DashboardError> {
    let query = AlertQuery::new(params.limit, params.include_resolved);
    let records = state.monitoring.list_alerts(query).await?;
    Ok(Json(records))
}

/// `POST /alerts/:id/resolve` — Mark an alert resolved.
///
/// # Errors
///
/// Returns [`DashboardError::AlertNotFound`] if the alert does not exist.
#[utoipa::path(
    post,
    path = "/api/v1/alerts/{id}/resolve",
    tag = "Alerts",
    summary = "Resolve an alert",
    description = "Sets the alert status to `resolved` and stamps the resolution time. Resolving twice rewrites the timestamp.",
    params(
        ("id" = i64, Path, description = "Alert id"),
    ),
    responses(
        (status = 200, description = "Updated alert", body = AlertRecord),
        (status = 401, description = "Missing or expired session", body = ErrorResponse),
        (status = 404, description = "Alert not found", body = ErrorResponse),
    ),
    security(("bearer" = []))
)]
pub async fn resolve_alert(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    ApiPath(id): ApiPath<i64>,
) -> Result<impl IntoResponse, DashboardError> {
    tracing::debug!(alert_id = id, user_id = session.user_id, "resolving alert");
    let record = state.monitoring.resolve_alert(id).await?;
    Ok(Json(record))
}

/// Alert routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/alerts", get(list_alerts))
        .route("/alerts/{id}/resolve", post(resolve_alert))
}
