//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All resource endpoints are mounted under `/api/v1`.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}

/// Builds the full application: REST, WebSocket, docs, and middleware.
pub fn build_app(state: AppState) -> Router {
    let router = Router::new()
        .merge(build_router())
        .route("/ws", get(ws_handler));

    #[cfg(feature = "swagger-ui")]
    let router = {
        use utoipa::OpenApi;
        router.merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", openapi::ApiDoc::openapi()),
        )
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::panic, clippy::indexing_slicing)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::chat::ChatRelay;
    use crate::domain::{EventBus, SessionManager};
    use crate::persistence::MemoryStore;

    fn app_with(store: Arc<MemoryStore>) -> Router {
        let state = AppState::new(
            store,
            EventBus::new(16),
            Arc::new(SessionManager::new(60)),
            ChatRelay::new(None),
        );
        build_app(state)
    }

    async fn status_of(app: Router, request: Request<Body>) -> StatusCode {
        let Ok(response) = app.oneshot(request).await;
        response.status()
    }

    fn get(uri: &str) -> Request<Body> {
        let Ok(request) = Request::get(uri).body(Body::empty()) else {
            panic!("valid request");
        };
        request
    }

    #[tokio::test]
    async fn health_reflects_store_state() {
        let store = Arc::new(MemoryStore::new());
        assert_eq!(status_of(app_with(Arc::clone(&store)), get("/health")).await, StatusCode::OK);
        store.set_offline(true);
        assert_eq!(
            status_of(app_with(store), get("/health")).await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn reads_are_public() {
        let app = app_with(Arc::new(MemoryStore::new()));
        for uri in ["/api/v1/alerts", "/api/v1/animals", "/api/v1/cameras", "/api/v1/species", "/api/v1/summary"] {
            assert_eq!(status_of(app.clone(), get(uri)).await, StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn writes_require_a_session() {
        let app = app_with(Arc::new(MemoryStore::new()));
        let Ok(request) = Request::post("/api/v1/alerts/1/resolve").body(Body::empty()) else {
            panic!("valid request");
        };
        assert_eq!(status_of(app.clone(), request).await, StatusCode::UNAUTHORIZED);

        let Ok(request) = Request::post("/api/v1/alerts/1/resolve")
            .header("authorization", "Bearer not-a-uuid")
            .body(Body::empty())
        else {
            panic!("valid request");
        };
        assert_eq!(status_of(app, request).await, StatusCode::UNAUTHORIZED);
    }

    async fn error_code_of(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let Ok(response) = app.oneshot(request).await;
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let Ok(body) = serde_json::from_slice::<serde_json::Value>(&bytes) else {
            panic!("error body should be JSON");
        };
        (status, body["error"]["code"].clone())
    }

    #[tokio::test]
    async fn malformed_input_gets_the_error_envelope() {
        let sessions = Arc::new(SessionManager::new(60));
        let session = sessions.open(1, "ranger@park.org", "Ranger").await;
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            EventBus::new(16),
            sessions,
            ChatRelay::new(None),
        );
        let app = build_app(state);
        let bearer = format!("Bearer {}", session.token);

        let Ok(request) = Request::post("/api/v1/animals")
            .header("authorization", &bearer)
            .header("content-type", "application/json")
            .body(Body::from("{\"name\": "))
        else {
            panic!("valid request");
        };
        let (status, code) = error_code_of(app.clone(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, 1001);

        let Ok(request) = Request::patch("/api/v1/cameras/north-ridge")
            .header("authorization", &bearer)
            .header("content-type", "application/json")
            .body(Body::from("{\"status\": \"offline\"}"))
        else {
            panic!("valid request");
        };
        let (status, code) = error_code_of(app.clone(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, 1001);

        let (status, code) = error_code_of(app, get("/api/v1/alerts?limit=many")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(code, 1001);
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_500() {
        let store = Arc::new(MemoryStore::new());
        store.set_offline(true);
        assert_eq!(
            status_of(app_with(store), get("/api/v1/species")).await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
