//! WebSocket layer: live dashboard events.
//!
//! The endpoint at `/ws` pushes [`DashboardEvent`](crate::domain::DashboardEvent)s
//! to clients that subscribed to the matching topics.

pub mod connection;
pub mod handler;
pub mod messages;
pub mod subscription;
