//! Dashboard error types with HTTP status code mapping.
//!
//! [`DashboardError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! Read and write operations share this type: an empty list means "no data",
//! an `Err` means the store (or a collaborator) failed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "alert not found: 42",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see the ranges on [`DashboardError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category            | HTTP Status                    |
/// |-----------|---------------------|--------------------------------|
/// | 1000–1999 | Validation / Auth   | 400 Bad Request / 401          |
/// | 2000–2999 | Not Found           | 404 Not Found                  |
/// | 3000–3099 | Server / Store      | 500 Internal Server Error      |
/// | 3100–3199 | Chat relay          | 502 Bad Gateway / 503          |
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Email or password did not match a known account.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Missing, unknown, or expired session token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Alert with the given id does not exist.
    #[error("alert not found: {0}")]
    AlertNotFound(i64),

    /// Camera with the given id does not exist.
    #[error("camera not found: {0}")]
    CameraNotFound(i64),

    /// The relational store rejected or failed a query.
    #[error("store error: {0}")]
    StoreError(String),

    /// The chat relay has no upstream configured.
    #[error("chat assistant unavailable: {0}")]
    ChatUnavailable(String),

    /// The upstream chat-completion endpoint failed.
    #[error("chat upstream error: {0}")]
    ChatUpstream(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DashboardError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidCredentials => 1002,
            Self::Unauthorized(_) => 1003,
            Self::AlertNotFound(_) => 2001,
            Self::CameraNotFound(_) => 2002,
            Self::Internal(_) => 3000,
            Self::StoreError(_) => 3001,
            Self::ChatUnavailable(_) => 3101,
            Self::ChatUpstream(_) => 3102,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::AlertNotFound(_) | Self::CameraNotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ChatUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::ChatUpstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<sqlx::Error> for DashboardError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreError(err.to_string())
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
