//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::chat::ChatRelay;
use crate::domain::{EventBus, SessionManager};
use crate::persistence::WildlifeStore;
use crate::service::{AuthService, MonitoringService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Data-access operations.
    pub monitoring: Arc<MonitoringService>,
    /// Login, logout and session lookup.
    pub auth: Arc<AuthService>,
    /// Chat assistant relay.
    pub chat: Arc<ChatRelay>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
}

impl AppState {
    /// Wires the services around a store.
    #[must_use]
    pub fn new(
        store: Arc<dyn WildlifeStore>,
        event_bus: EventBus,
        sessions: Arc<SessionManager>,
        chat: ChatRelay,
    ) -> Self {
        let monitoring = Arc::new(MonitoringService::new(
            Arc::clone(&store),
            event_bus.clone(),
        ));
        let auth = Arc::new(AuthService::new(store, sessions));
        Self {
            monitoring,
            auth,
            chat: Arc::new(chat),
            event_bus,
        }
    }
}
