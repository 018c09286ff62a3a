//! OpenAPI document for the REST API.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::dto::{ChatRequest, LoginRequest};
use super::handlers;
use crate::chat::{ChatMessage, ChatRole};
use crate::domain::{
    AlertRecord, AlertStatus, AnimalRecord, CameraRecord, CameraUpdate, DashboardSummary,
    NewAnimal, NewCamera, Session, SessionToken, SpeciesRecord,
};
use crate::error::{ErrorBody, ErrorResponse};

/// Generated OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "Wildwatch API",
        description = "Alerts, animals, cameras and species for the wildlife-conservation monitoring dashboard."
    ),
    paths(
        handlers::system::health_handler,
        handlers::alerts::list_alerts,
        handlers::alerts::resolve_alert,
        handlers::animals::list_animals,
        handlers::animals::add_animal,
        handlers::cameras::list_cameras,
        handlers::cameras::add_camera,
        handlers::cameras::update_camera,
        handlers::species::list_species,
        handlers::species::summary,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::current_session,
        handlers::chat::chat,
    ),
    components(schemas(
        AlertRecord,
        AlertStatus,
        AnimalRecord,
        NewAnimal,
        CameraRecord,
        NewCamera,
        CameraUpdate,
        SpeciesRecord,
        DashboardSummary,
        Session,
        SessionToken,
        LoginRequest,
        ChatRequest,
        ChatMessage,
        ChatRole,
        ErrorResponse,
        ErrorBody,
        handlers::system::HealthResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Alerts", description = "Alert feed and resolution"),
        (name = "Animals", description = "Tracked animals"),
        (name = "Cameras", description = "Camera-trap inventory"),
        (name = "Species", description = "Species reference data"),
        (name = "Dashboard", description = "Header counts"),
        (name = "Auth", description = "Login sessions"),
        (name = "Chat", description = "Assistant relay"),
        (name = "System", description = "Health"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer` security scheme used by write endpoints.
#[derive(Debug)]
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_write_endpoints() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/alerts/{id}/resolve"));
        assert!(doc.paths.paths.contains_key("/api/v1/cameras/{id}"));
        assert!(doc.paths.paths.contains_key("/health"));
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let has_bearer = doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer"));
        assert!(has_bearer);
    }
}
