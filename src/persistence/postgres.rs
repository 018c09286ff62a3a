//! PostgreSQL implementation of the wildlife store.

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::types::Json;

use super::WildlifeStore;
use super::models::{AlertRow, AnimalRow, CameraRow, SpeciesRow, SummaryCounts, UserAccount};
use crate::config::DashboardConfig;
use crate::domain::{AlertQuery, CameraUpdate, NewAnimal, NewCamera};
use crate::error::DashboardError;

const ALERT_COLUMNS: &str = "a.id, a.animal_id, an.name AS animal_name, a.alert_type, a.severity, \
     a.message, a.location, a.status, a.created_at, a.resolved_at, a.latitude, a.longitude";

const ANIMAL_COLUMNS: &str = "a.id, a.name, a.tag_id, a.species_id, s.name AS species_name, \
     a.gender, a.age_estimate, a.health_status, a.last_seen, a.notes, a.image_url";

const CAMERA_COLUMNS: &str = "id, name, location, location_description, camera_type, status, \
     detection_threshold, last_maintenance";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Wraps an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool from the store URL and access key.
    ///
    /// The access key is used as the connection password, overriding any
    /// password embedded in the URL.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::StoreError`] if the URL cannot be parsed or
    /// no connection can be established within the configured timeout.
    pub async fn connect(config: &DashboardConfig) -> Result<Self, DashboardError> {
        let options = PgConnectOptions::from_str(&config.store_url)?.password(&config.store_key);

        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Applies the embedded migrations in `migrations/`.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::StoreError`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), DashboardError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DashboardError::StoreError(format!("migration failed: {e}")))
    }

    /// Returns the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl WildlifeStore for PostgresStore {
    async fn list_alerts(&self, query: &AlertQuery) -> Result<Vec<AlertRow>, DashboardError> {
        let sql = format!(
            "SELECT {ALERT_COLUMNS} FROM alerts a \
             LEFT JOIN animals an ON an.id = a.animal_id \
             WHERE ($1 OR a.status = 'active') \
             ORDER BY a.created_at DESC, a.id DESC \
             LIMIT $2"
        );
        let rows = sqlx::query_as::<_, AlertRow>(&sql)
            .bind(query.include_resolved)
            .bind(i64::from(query.limit))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn resolve_alert(
        &self,
        id: i64,
        resolved_at: DateTime<Utc>,
    ) -> Result<Option<AlertRow>, DashboardError> {
        let sql = format!(
            "WITH a AS ( \
                 UPDATE alerts SET status = 'resolved', resolved_at = $2 \
                 WHERE id = $1 RETURNING * \
             ) \
             SELECT {ALERT_COLUMNS} FROM a \
             LEFT JOIN animals an ON an.id = a.animal_id"
        );
        let row = sqlx::query_as::<_, AlertRow>(&sql)
            .bind(id)
            .bind(resolved_at)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_animals(&self) -> Result<Vec<AnimalRow>, DashboardError> {
        let sql = format!(
            "SELECT {ANIMAL_COLUMNS} FROM animals a \
             LEFT JOIN species s ON s.id = a.species_id \
             ORDER BY a.name ASC, a.id ASC"
        );
        let rows = sqlx::query_as::<_, AnimalRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_animal(&self, animal: &NewAnimal) -> Result<AnimalRow, DashboardError> {
        let sql = format!(
            "WITH a AS ( \
                 INSERT INTO animals \
                     (name, tag_id, species_id, gender, age_estimate, health_status, \
                      last_seen, notes, image_url) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
                 RETURNING * \
             ) \
             SELECT {ANIMAL_COLUMNS} FROM a \
             LEFT JOIN species s ON s.id = a.species_id"
        );
        let row = sqlx::query_as::<_, AnimalRow>(&sql)
            .bind(&animal.name)
            .bind(&animal.tag_id)
            .bind(animal.species_id)
            .bind(&animal.gender)
            .bind(&animal.age_estimate)
            .bind(&animal.health_status)
            .bind(animal.last_seen)
            .bind(&animal.notes)
            .bind(&animal.image_url)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_cameras(&self) -> Result<Vec<CameraRow>, DashboardError> {
        let sql = format!("SELECT {CAMERA_COLUMNS} FROM cameras ORDER BY name ASC, id ASC");
        let rows = sqlx::query_as::<_, CameraRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_camera(&self, camera: &NewCamera) -> Result<CameraRow, DashboardError> {
        let sql = format!(
            "INSERT INTO cameras \
                 (name, location, location_description, camera_type, status, \
                  detection_threshold, last_maintenance) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {CAMERA_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CameraRow>(&sql)
            .bind(&camera.name)
            .bind(Json(camera.location()))
            .bind(&camera.location_description)
            .bind(&camera.camera_type)
            .bind(&camera.status)
            .bind(camera.detection_threshold)
            .bind(camera.last_maintenance)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_camera(
        &self,
        id: i64,
        update: &CameraUpdate,
    ) -> Result<Option<CameraRow>, DashboardError> {
        let sql = format!(
            "UPDATE cameras SET \
                 status = COALESCE($2, status), \
                 detection_threshold = COALESCE($3, detection_threshold) \
             WHERE id = $1 \
             RETURNING {CAMERA_COLUMNS}"
        );
        let row = sqlx::query_as::<_, CameraRow>(&sql)
            .bind(id)
            .bind(&update.status)
            .bind(update.detection_threshold)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_species(&self) -> Result<Vec<SpeciesRow>, DashboardError> {
        let rows = sqlx::query_as::<_, SpeciesRow>(
            "SELECT id, name, scientific_name, conservation_status, description \
             FROM species ORDER BY name ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_user_by_email(
        &self,
        email: &str,
    ) -> Result<Option<UserAccount>, DashboardError> {
        let row = sqlx::query_as::<_, UserAccount>(
            "SELECT id, email, display_name, password_hash FROM users WHERE lower(email) = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn summary_counts(&self) -> Result<SummaryCounts, DashboardError> {
        let (total_animals, total_species, total_cameras, cameras_online) =
            sqlx::query_as::<_, (i64, i64, i64, i64)>(
                "SELECT \
                     (SELECT COUNT(*) FROM animals), \
                     (SELECT COUNT(*) FROM species), \
                     (SELECT COUNT(*) FROM cameras), \
                     (SELECT COUNT(*) FROM cameras WHERE status = 'online')",
            )
            .fetch_one(&self.pool)
            .await?;

        let active_by_severity = sqlx::query_as::<_, (String, i64)>(
            "SELECT severity, COUNT(*) FROM alerts WHERE status = 'active' \
             GROUP BY severity ORDER BY severity",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(SummaryCounts {
            total_animals,
            total_species,
            total_cameras,
            cameras_online,
            active_by_severity,
        })
    }

    async fn ping(&self) -> Result<(), DashboardError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
