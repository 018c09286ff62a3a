//! Request extractors shared by the handlers.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::app_state::AppState;
use crate::domain::{Session, SessionToken};
use crate::error::DashboardError;

/// A live session taken from the `Authorization: Bearer <token>` header.
///
/// Rejects the request with `401` when the header is missing, malformed,
/// or names an unknown or expired session.
#[derive(Debug, Clone)]
pub struct RequireSession(pub Session);

impl FromRequestParts<AppState> for RequireSession {
    type Rejection = DashboardError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        state.auth.current_session(token).await.map(Self)
    }
}

fn bearer_token(parts: &Parts) -> Result<SessionToken, DashboardError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| DashboardError::Unauthorized("missing bearer token".to_string()))?
        .to_str()
        .map_err(|_| DashboardError::Unauthorized("malformed authorization header".to_string()))?;

    let raw = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| DashboardError::Unauthorized("expected a bearer token".to_string()))?;

    raw.parse()
        .map_err(|_| DashboardError::Unauthorized("malformed bearer token".to_string()))
}

/// `axum::Json` whose rejection is a [`DashboardError::InvalidRequest`].
#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = DashboardError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| DashboardError::InvalidRequest(e.body_text()))?;
        Ok(Self(value))
    }
}

/// `axum::extract::Path` whose rejection is a
/// [`DashboardError::InvalidRequest`].
#[derive(Debug, Clone)]
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = DashboardError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Path(value) = axum::extract::Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: PathRejection| DashboardError::InvalidRequest(e.body_text()))?;
        Ok(Self(value))
    }
}

/// `axum::extract::Query` whose rejection is a
/// [`DashboardError::InvalidRequest`].
#[derive(Debug, Clone)]
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = DashboardError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) = axum::extract::Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| DashboardError::InvalidRequest(e.body_text()))?;
        Ok(Self(value))
    }
}
