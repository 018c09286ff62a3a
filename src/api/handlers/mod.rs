//! REST endpoint handlers organized by resource.

pub mod alerts;
pub mod animals;
pub mod auth;
pub mod cameras;
pub mod chat;
pub mod species;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(alerts::routes())
        .merge(animals::routes())
        .merge(cameras::routes())
        .merge(species::routes())
        .merge(auth::routes())
        .merge(chat::routes())
}
