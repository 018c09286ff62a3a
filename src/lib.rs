//! # wildwatch-api
//!
//! HTTP back end for a wildlife-monitoring dashboard.
//!
//! Rangers read alerts, tracked animals, camera traps and species from a
//! hosted PostgreSQL store, resolve alerts, register animals and cameras,
//! and tune camera detection thresholds. Every write is broadcast to
//! WebSocket subscribers so open dashboards refresh live.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Handler (ws/)
//!     │
//!     ├── MonitoringService / AuthService (service/)
//!     ├── ChatRelay (chat/)
//!     ├── EventBus, SessionManager (domain/)
//!     │
//!     └── WildlifeStore (persistence/)
//!           ├── PostgresStore
//!           └── MemoryStore
//! ```

pub mod api;
pub mod app_state;
pub mod chat;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;
