//! Domain layer: records, write payloads, sessions, and the event system.
//!
//! This module contains the flat records handed to the dashboard, the
//! validated payloads for inserts and updates, display formatting, the
//! session table, and the event bus for broadcasting writes.

pub mod alert;
pub mod animal;
pub mod camera;
pub mod credentials;
pub mod display;
pub mod event;
pub mod event_bus;
pub mod session;
pub mod species;
pub mod summary;

pub use alert::{AlertQuery, AlertRecord, AlertStatus};
pub use animal::{AnimalRecord, NewAnimal};
pub use camera::{CameraLocation, CameraRecord, CameraUpdate, NewCamera};
pub use credentials::Credentials;
pub use event::{DashboardEvent, Topic};
pub use event_bus::EventBus;
pub use session::{Session, SessionManager, SessionToken};
pub use species::SpeciesRecord;
pub use summary::DashboardSummary;
