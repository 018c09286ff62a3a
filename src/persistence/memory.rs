//! In-process implementation of the wildlife store.
//!
//! [`MemoryStore`] mirrors the PostgreSQL tables, joins, orderings and
//! constraints closely enough to exercise the services and the HTTP layer
//! without a database. It can also be switched offline to simulate a store
//! outage.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;

use super::WildlifeStore;
use super::models::{AlertRow, AnimalRow, CameraRow, SpeciesRow, SummaryCounts, UserAccount};
use crate::domain::{AlertQuery, AlertStatus, CameraLocation, CameraUpdate, NewAnimal, NewCamera};
use crate::error::DashboardError;

#[derive(Debug, Default)]
struct Tables {
    species: Vec<SpeciesRow>,
    animals: Vec<AnimalRow>,
    cameras: Vec<CameraRow>,
    alerts: Vec<AlertRow>,
    users: Vec<UserAccount>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn species_name(&self, species_id: i64) -> Option<String> {
        self.species
            .iter()
            .find(|s| s.id == species_id)
            .map(|s| s.name.clone())
    }

    fn animal_name(&self, animal_id: Option<i64>) -> Option<String> {
        let animal_id = animal_id?;
        self.animals
            .iter()
            .find(|a| a.id == animal_id)
            .map(|a| a.name.clone())
    }

    fn joined_alert(&self, row: &AlertRow) -> AlertRow {
        AlertRow {
            animal_name: self.animal_name(row.animal_id),
            ..row.clone()
        }
    }

    fn joined_animal(&self, row: &AnimalRow) -> AnimalRow {
        AnimalRow {
            species_name: self.species_name(row.species_id),
            ..row.clone()
        }
    }
}

/// Seed data for an alert inserted directly into [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct AlertSeed {
    /// Referenced animal.
    pub animal_id: Option<i64>,
    /// Alert category.
    pub alert_type: String,
    /// Severity label.
    pub severity: String,
    /// Message text.
    pub message: String,
    /// Initial status.
    pub status: AlertStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// In-memory store with the same observable behavior as the PostgreSQL one.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    offline: AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every subsequent call fail as if the store were unreachable.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), DashboardError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(DashboardError::StoreError(
                "connection refused: store unreachable".to_string(),
            ));
        }
        Ok(())
    }

    /// Inserts a species and returns its id.
    pub async fn seed_species(
        &self,
        name: &str,
        scientific_name: &str,
        conservation_status: &str,
    ) -> i64 {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        tables.species.push(SpeciesRow {
            id,
            name: name.to_string(),
            scientific_name: Some(scientific_name.to_string()),
            conservation_status: Some(conservation_status.to_string()),
            description: None,
        });
        id
    }

    /// Inserts an alert and returns its id.
    pub async fn seed_alert(&self, seed: AlertSeed) -> i64 {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        tables.alerts.push(AlertRow {
            id,
            animal_id: seed.animal_id,
            animal_name: None,
            alert_type: seed.alert_type,
            severity: seed.severity,
            message: seed.message,
            location: None,
            status: seed.status.as_str().to_string(),
            created_at: seed.created_at,
            resolved_at: (seed.status == AlertStatus::Resolved).then_some(seed.created_at),
            latitude: None,
            longitude: None,
        });
        id
    }

    /// Inserts a camera with an arbitrary stored location and returns its id.
    pub async fn seed_camera(
        &self,
        name: &str,
        location: Option<CameraLocation>,
        status: &str,
        last_maintenance: Option<NaiveDate>,
    ) -> i64 {
        let location = location.and_then(|l| serde_json::to_value(l).ok());
        self.seed_camera_json(name, location, status, last_maintenance)
            .await
    }

    /// Inserts a camera whose `location` column holds arbitrary JSON, as a
    /// row written by another client might.
    pub async fn seed_camera_json(
        &self,
        name: &str,
        location: Option<serde_json::Value>,
        status: &str,
        last_maintenance: Option<NaiveDate>,
    ) -> i64 {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        tables.cameras.push(CameraRow {
            id,
            name: name.to_string(),
            location,
            location_description: None,
            camera_type: "trail".to_string(),
            status: status.to_string(),
            detection_threshold: 0.5,
            last_maintenance,
        });
        id
    }

    /// Inserts a user with an already hashed password and returns its id.
    pub async fn seed_user(&self, email: &str, display_name: &str, password_hash: &str) -> i64 {
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        tables.users.push(UserAccount {
            id,
            email: email.to_lowercase(),
            display_name: display_name.to_string(),
            password_hash: password_hash.to_string(),
        });
        id
    }
}

#[async_trait]
impl WildlifeStore for MemoryStore {
    async fn list_alerts(&self, query: &AlertQuery) -> Result<Vec<AlertRow>, DashboardError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<AlertRow> = tables
            .alerts
            .iter()
            .filter(|a| query.include_resolved || a.status == AlertStatus::Active.as_str())
            .map(|a| tables.joined_alert(a))
            .collect();
        rows.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        rows.truncate(usize::try_from(query.limit).unwrap_or(usize::MAX));
        Ok(rows)
    }

    async fn resolve_alert(
        &self,
        id: i64,
        resolved_at: DateTime<Utc>,
    ) -> Result<Option<AlertRow>, DashboardError> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        let Some(alert) = tables.alerts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        alert.status = AlertStatus::Resolved.as_str().to_string();
        alert.resolved_at = Some(resolved_at);
        let updated = alert.clone();
        Ok(Some(tables.joined_alert(&updated)))
    }

    async fn list_animals(&self) -> Result<Vec<AnimalRow>, DashboardError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        let mut rows: Vec<AnimalRow> = tables
            .animals
            .iter()
            .map(|a| tables.joined_animal(a))
            .collect();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn insert_animal(&self, animal: &NewAnimal) -> Result<AnimalRow, DashboardError> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        if tables.species_name(animal.species_id).is_none() {
            return Err(DashboardError::StoreError(format!(
                "insert or update on table \"animals\" violates foreign key constraint: \
                 species {} does not exist",
                animal.species_id
            )));
        }
        if tables.animals.iter().any(|a| a.tag_id == animal.tag_id) {
            return Err(DashboardError::StoreError(format!(
                "duplicate key value violates unique constraint \"animals_tag_id_key\": {}",
                animal.tag_id
            )));
        }
        let id = tables.next_id();
        let row = AnimalRow {
            id,
            name: animal.name.clone(),
            tag_id: animal.tag_id.clone(),
            species_id: animal.species_id,
            species_name: None,
            gender: animal.gender.clone(),
            age_estimate: animal.age_estimate.clone(),
            health_status: animal.health_status.clone(),
            last_seen: animal.last_seen,
            notes: animal.notes.clone(),
            image_url: animal.image_url.clone(),
        };
        tables.animals.push(row.clone());
        Ok(tables.joined_animal(&row))
    }

    async fn list_cameras(&self) -> Result<Vec<CameraRow>, DashboardError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        let mut rows = tables.cameras.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn insert_camera(&self, camera: &NewCamera) -> Result<CameraRow, DashboardError> {
        self.check_online()?;
        let location = serde_json::to_value(camera.location())
            .map_err(|e| DashboardError::StoreError(e.to_string()))?;
        let mut tables = self.tables.write().await;
        let id = tables.next_id();
        let row = CameraRow {
            id,
            name: camera.name.clone(),
            location: Some(location),
            location_description: camera.location_description.clone(),
            camera_type: camera.camera_type.clone(),
            status: camera.status.clone(),
            detection_threshold: camera.detection_threshold,
            last_maintenance: camera.last_maintenance,
        };
        tables.cameras.push(row.clone());
        Ok(row)
    }

    async fn update_camera(
        &self,
        id: i64,
        update: &CameraUpdate,
    ) -> Result<Option<CameraRow>, DashboardError> {
        self.check_online()?;
        let mut tables = self.tables.write().await;
        let Some(camera) = tables.cameras.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(status) = &update.status {
            camera.status.clone_from(status);
        }
        if let Some(threshold) = update.detection_threshold {
            camera.detection_threshold = threshold;
        }
        Ok(Some(camera.clone()))
    }

    async fn list_species(&self) -> Result<Vec<SpeciesRow>, DashboardError> {
        self.check_online()?;
        let mut rows = self.tables.read().await.species.clone();
        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, DashboardError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn summary_counts(&self) -> Result<SummaryCounts, DashboardError> {
        self.check_online()?;
        let tables = self.tables.read().await;
        let count = |n: usize| i64::try_from(n).unwrap_or(i64::MAX);

        let mut active_by_severity: Vec<(String, i64)> = Vec::new();
        for alert in tables
            .alerts
            .iter()
            .filter(|a| a.status == AlertStatus::Active.as_str())
        {
            match active_by_severity
                .iter_mut()
                .find(|(severity, _)| *severity == alert.severity)
            {
                Some((_, n)) => *n += 1,
                None => active_by_severity.push((alert.severity.clone(), 1)),
            }
        }
        active_by_severity.sort();

        Ok(SummaryCounts {
            total_animals: count(tables.animals.len()),
            total_species: count(tables.species.len()),
            total_cameras: count(tables.cameras.len()),
            cameras_online: count(
                tables
                    .cameras
                    .iter()
                    .filter(|c| c.status == "online")
                    .count(),
            ),
            active_by_severity,
        })
    }

    async fn ping(&self) -> Result<(), DashboardError> {
        self.check_online()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::animal::fixtures::raja;

    fn seed(status: AlertStatus, created_at: DateTime<Utc>) -> AlertSeed {
        AlertSeed {
            animal_id: None,
            alert_type: "motion".to_string(),
            severity: "low".to_string(),
            message: "Movement detected".to_string(),
            status,
            created_at,
        }
    }

    #[tokio::test]
    async fn alerts_are_newest_first_and_filtered() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let old = store.seed_alert(seed(AlertStatus::Active, now - Duration::hours(2))).await;
        let _resolved = store.seed_alert(seed(AlertStatus::Resolved, now)).await;
        let recent = store.seed_alert(seed(AlertStatus::Active, now - Duration::minutes(5))).await;

        let Ok(rows) = store.list_alerts(&AlertQuery::new(None, false)).await else {
            panic!("list should succeed");
        };
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![recent, old]);
    }

    #[tokio::test]
    async fn insert_animal_checks_foreign_key_and_tag() {
        let store = MemoryStore::new();
        assert!(store.insert_animal(&raja(99)).await.is_err());

        let species = store.seed_species("Bengal Tiger", "Panthera tigris tigris", "Endangered").await;
        let Ok(row) = store.insert_animal(&raja(species)).await else {
            panic!("insert should succeed");
        };
        assert_eq!(row.species_name.as_deref(), Some("Bengal Tiger"));

        let Err(DashboardError::StoreError(msg)) = store.insert_animal(&raja(species)).await else {
            panic!("duplicate tag should fail");
        };
        assert!(msg.contains("duplicate key"));
    }

    #[tokio::test]
    async fn offline_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_offline(true);
        assert!(store.ping().await.is_err());
        assert!(store.list_species().await.is_err());
        store.set_offline(false);
        assert!(store.ping().await.is_ok());
    }

    #[tokio::test]
    async fn update_unknown_camera_returns_none() {
        let store = MemoryStore::new();
        let update = CameraUpdate {
            status: Some("offline".to_string()),
            detection_threshold: None,
        };
        let Ok(row) = store.update_camera(42, &update).await else {
            panic!("update should not error");
        };
        assert!(row.is_none());
    }
}
