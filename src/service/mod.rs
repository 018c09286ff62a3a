//! Service layer: business logic between the HTTP API and the store.
//!
//! [`MonitoringService`] owns the data-access operations, [`AuthService`]
//! owns credential checks and sessions.

pub mod auth_service;
pub mod monitoring_service;

pub use auth_service::AuthService;
pub use monitoring_service::MonitoringService;
