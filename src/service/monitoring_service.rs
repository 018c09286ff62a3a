//! Monitoring service: the dashboard's data-access operations.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{
    AlertQuery, AlertRecord, AnimalRecord, CameraRecord, CameraUpdate, DashboardEvent,
    DashboardSummary, EventBus, NewAnimal, NewCamera, SpeciesRecord,
};
use crate::error::DashboardError;
use crate::persistence::WildlifeStore;

/// Data-access layer for alerts, animals, cameras and species.
///
/// Stateless coordinator: every method issues one store call, reshapes the
/// rows into flat records and returns them. Store failures are logged here
/// and returned as `Err`; an empty `Vec` always means "no data". Successful
/// writes publish a [`DashboardEvent`].
#[derive(Debug, Clone)]
pub struct MonitoringService {
    store: Arc<dyn WildlifeStore>,
    event_bus: EventBus,
}

impl MonitoringService {
    /// Creates a new `MonitoringService`.
    #[must_use]
    pub fn new(store: Arc<dyn WildlifeStore>, event_bus: EventBus) -> Self {
        Self { store, event_bus }
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Lists the most recent alerts, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::StoreError`] if the query fails or a row
    /// carries an unknown status.
    pub async fn list_alerts(&self, query: AlertQuery) -> Result<Vec<AlertRecord>, DashboardError> {
        let rows = self
            .store
            .list_alerts(&query)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to list alerts"))?;
        rows.into_iter().map(AlertRecord::try_from).collect()
    }

    /// Marks an alert resolved and returns the updated record.
    ///
    /// Resolving an already resolved alert writes again and restamps the
    /// resolution time.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::AlertNotFound`] if no alert has that id and
    /// [`DashboardError::StoreError`] if the update is rejected.
    pub async fn resolve_alert(&self, id: i64) -> Result<AlertRecord, DashboardError> {
        let resolved_at = Utc::now();
        let row = self
            .store
            .resolve_alert(id, resolved_at)
            .await
            .inspect_err(|e| tracing::error!(alert_id = id, error = %e, "failed to resolve alert"))?
            .ok_or(DashboardError::AlertNotFound(id))?;
        let record = AlertRecord::try_from(row)?;

        let _ = self.event_bus.publish(DashboardEvent::AlertResolved {
            alert_id: record.id,
            resolved_at: record.resolved_at.unwrap_or(resolved_at),
            timestamp: Utc::now(),
        });

        tracing::info!(alert_id = id, "alert resolved");
        Ok(record)
    }

    /// Lists all animals ordered by name, with species names joined.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::StoreError`] if the query fails.
    pub async fn list_animals(&self) -> Result<Vec<AnimalRecord>, DashboardError> {
        let rows = self
            .store
            .list_animals()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to list animals"))?;
        Ok(rows.into_iter().map(AnimalRecord::from).collect())
    }

    /// Inserts an animal and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] if a required field is blank
    /// and [`DashboardError::StoreError`] with the store's message on a
    /// constraint violation or connectivity failure.
    pub async fn add_animal(&self, animal: &NewAnimal) -> Result<AnimalRecord, DashboardError> {
        animal.validate()?;
        let row = self
            .store
            .insert_animal(animal)
            .await
            .inspect_err(|e| {
                tracing::error!(tag_id = %animal.tag_id, error = %e, "failed to add animal");
            })?;
        let record = AnimalRecord::from(row);

        let _ = self.event_bus.publish(DashboardEvent::AnimalAdded {
            animal_id: record.id,
            name: record.name.clone(),
            species_id: record.species_id,
            timestamp: Utc::now(),
        });

        tracing::info!(animal_id = record.id, tag_id = %record.tag_id, "animal added");
        Ok(record)
    }

    /// Lists all cameras ordered by name with normalized locations.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::StoreError`] if the query fails. A stored
    /// location of unknown shape is rendered as raw JSON, not an error.
    pub async fn list_cameras(&self) -> Result<Vec<CameraRecord>, DashboardError> {
        let rows = self
            .store
            .list_cameras()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to list cameras"))?;
        Ok(rows.into_iter().map(CameraRecord::from).collect())
    }

    /// Inserts a camera from latitude / longitude inputs.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] on out-of-range input and
    /// [`DashboardError::StoreError`] if the insert is rejected.
    pub async fn add_camera(&self, camera: &NewCamera) -> Result<CameraRecord, DashboardError> {
        camera.validate()?;
        let row = self
            .store
            .insert_camera(camera)
            .await
            .inspect_err(|e| tracing::error!(name = %camera.name, error = %e, "failed to add camera"))?;
        let record = CameraRecord::from(row);

        let _ = self.event_bus.publish(DashboardEvent::CameraAdded {
            camera_id: record.id,
            name: record.name.clone(),
            location: record.location.clone(),
            timestamp: Utc::now(),
        });

        tracing::info!(camera_id = record.id, "camera added");
        Ok(record)
    }

    /// Updates a camera's status and/or detection threshold.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] for an empty or out-of-range
    /// update, [`DashboardError::CameraNotFound`] for an unknown id, and
    /// [`DashboardError::StoreError`] if the update is rejected.
    pub async fn update_camera(
        &self,
        id: i64,
        update: &CameraUpdate,
    ) -> Result<CameraRecord, DashboardError> {
        update.validate()?;
        let row = self
            .store
            .update_camera(id, update)
            .await
            .inspect_err(|e| tracing::error!(camera_id = id, error = %e, "failed to update camera"))?
            .ok_or(DashboardError::CameraNotFound(id))?;
        let record = CameraRecord::from(row);

        let _ = self.event_bus.publish(DashboardEvent::CameraUpdated {
            camera_id: record.id,
            status: record.status.clone(),
            detection_threshold: record.detection_threshold,
            timestamp: Utc::now(),
        });

        tracing::info!(camera_id = id, status = %record.status, "camera updated");
        Ok(record)
    }

    /// Lists all species ordered by name.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::StoreError`] if the query fails.
    pub async fn list_species(&self) -> Result<Vec<SpeciesRecord>, DashboardError> {
        let rows = self
            .store
            .list_species()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to list species"))?;
        Ok(rows.into_iter().map(SpeciesRecord::from).collect())
    }

    /// Returns the header counts for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::StoreError`] if the query fails.
    pub async fn summary(&self) -> Result<DashboardSummary, DashboardError> {
        let counts = self
            .store
            .summary_counts()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to load summary"))?;
        Ok(DashboardSummary::from(counts))
    }

    /// Probes store connectivity.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::StoreError`] if the store is unreachable.
    pub async fn ping_store(&self) -> Result<(), DashboardError> {
        self.store.ping().await
    }
}
