//! Persistence layer: the hosted relational store behind one trait.
//!
//! [`WildlifeStore`] is the seam between the services and the store. Each
//! method issues a single query and hands back raw rows; services reshape
//! them into records. [`postgres::PostgresStore`] talks to PostgreSQL via
//! `sqlx::PgPool`; [`memory::MemoryStore`] keeps the same tables in process
//! for tests and local demos.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AlertQuery, CameraUpdate, NewAnimal, NewCamera};
use crate::error::DashboardError;
use models::{AlertRow, AnimalRow, CameraRow, SpeciesRow, SummaryCounts, UserAccount};

pub use memory::{AlertSeed, MemoryStore};
pub use postgres::PostgresStore;

/// Table-level access to the wildlife store.
///
/// Implementations own no caching and impose no ordering beyond what each
/// method documents; consistency is the store's job.
#[async_trait]
pub trait WildlifeStore: Send + Sync + std::fmt::Debug {
    /// Most recent alerts, newest first (ties by descending id), with the
    /// animal name joined, filtered and limited by `query`.
    async fn list_alerts(&self, query: &AlertQuery) -> Result<Vec<AlertRow>, DashboardError>;

    /// Marks an alert resolved at `resolved_at`. Returns `None` when no alert
    /// has that id.
    async fn resolve_alert(
        &self,
        id: i64,
        resolved_at: DateTime<Utc>,
    ) -> Result<Option<AlertRow>, DashboardError>;

    /// All animals ordered by name, species name joined.
    async fn list_animals(&self) -> Result<Vec<AnimalRow>, DashboardError>;

    /// Inserts an animal and returns the stored row, species name joined.
    async fn insert_animal(&self, animal: &NewAnimal) -> Result<AnimalRow, DashboardError>;

    /// All cameras ordered by name.
    async fn list_cameras(&self) -> Result<Vec<CameraRow>, DashboardError>;

    /// Inserts a camera, storing its coordinates as a point.
    async fn insert_camera(&self, camera: &NewCamera) -> Result<CameraRow, DashboardError>;

    /// Applies status / threshold changes. Returns `None` when no camera has
    /// that id.
    async fn update_camera(
        &self,
        id: i64,
        update: &CameraUpdate,
    ) -> Result<Option<CameraRow>, DashboardError>;

    /// All species ordered by name.
    async fn list_species(&self) -> Result<Vec<SpeciesRow>, DashboardError>;

    /// Looks up a user by lowercase email.
    async fn find_user_by_email(&self, email: &str)
    -> Result<Option<UserAccount>, DashboardError>;

    /// Entity counts for the dashboard header.
    async fn summary_counts(&self) -> Result<SummaryCounts, DashboardError>;

    /// Cheap connectivity probe.
    async fn ping(&self) -> Result<(), DashboardError>;
}
