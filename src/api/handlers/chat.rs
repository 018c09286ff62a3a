//! Chat assistant relay handler.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

use crate::api::dto::ChatRequest;
use crate::api::extract::ApiJson;
use crate::app_state::AppState;
use crate::error::{DashboardError, ErrorResponse};

/// `POST /chat` — Relay a conversation to the chat-completion endpoint.
///
/// # Errors
///
/// Returns [`DashboardError::ChatUnavailable`] when no upstream is configured
/// and [`DashboardError::ChatUpstream`] when the upstream fails.
#[utoipa::path(
    post,
    path = "/api/v1/chat",
    tag = "Chat",
    summary = "Chat with the assistant",
    description = "Forwards the conversation upstream with streaming enabled and relays the response body as it arrives.",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Streamed completion", content_type = "text/event-stream"),
        (status = 400, description = "Empty conversation", body = ErrorResponse),
        (status = 502, description = "Upstream failure", body = ErrorResponse),
        (status = 503, description = "Relay not configured", body = ErrorResponse),
    )
)]
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> Result<Response, DashboardError> {
    let upstream = state.chat.stream(&req.messages).await?;

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| HeaderValue::from_bytes(v.as_bytes()).ok())
        .unwrap_or_else(|| HeaderValue::from_static("text/event-stream"));

    let body = Body::from_stream(upstream.bytes_stream());
    let mut response = (StatusCode::OK, body).into_response();
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Ok(response)
}

/// Chat routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/chat", post(chat))
}
