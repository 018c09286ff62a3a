//! Data Transfer Objects for REST request/response serialization.
//!
//! Entity records and write payloads live in [`crate::domain`] and are used
//! directly as bodies; this module holds the request shapes that exist only
//! at the HTTP edge.

pub mod alert_dto;
pub mod auth_dto;
pub mod chat_dto;

pub use alert_dto::*;
pub use auth_dto::*;
pub use chat_dto::*;
