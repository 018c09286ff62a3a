//! Database rows and their conversion into dashboard records.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::domain::display::{self, NOT_RECORDED, UNKNOWN};
use crate::domain::{
    AlertRecord, AnimalRecord, CameraLocation, CameraRecord, DashboardSummary, SpeciesRecord,
};
use crate::error::DashboardError;

/// A row of `alerts` with `animals.name` joined in.
#[derive(Debug, Clone, FromRow)]
pub struct AlertRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Referenced animal.
    pub animal_id: Option<i64>,
    /// Joined `animals.name`.
    pub animal_name: Option<String>,
    /// Alert category.
    pub alert_type: String,
    /// Severity label.
    pub severity: String,
    /// Message text.
    pub message: String,
    /// Free-text location.
    pub location: Option<String>,
    /// `active` or `resolved`.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Resolution timestamp.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Optional latitude.
    pub latitude: Option<f64>,
    /// Optional longitude.
    pub longitude: Option<f64>,
}

impl TryFrom<AlertRow> for AlertRecord {
    type Error = DashboardError;

    fn try_from(row: AlertRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            animal_id: row.animal_id,
            animal_name: row.animal_name,
            alert_type: row.alert_type,
            severity: row.severity,
            message: row.message,
            location: row.location,
            status: row.status.parse()?,
            created_at_display: display::format_timestamp(&row.created_at),
            created_at: row.created_at,
            resolved_at: row.resolved_at,
            latitude: row.latitude,
            longitude: row.longitude,
        })
    }
}

/// A row of `animals` with `species.name` joined in.
#[derive(Debug, Clone, FromRow)]
pub struct AnimalRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Given name.
    pub name: String,
    /// Tag identifier.
    pub tag_id: String,
    /// Species reference.
    pub species_id: i64,
    /// Joined `species.name`.
    pub species_name: Option<String>,
    /// Gender label.
    pub gender: String,
    /// Estimated age.
    pub age_estimate: String,
    /// Health status label.
    pub health_status: String,
    /// Last sighting.
    pub last_seen: Option<DateTime<Utc>>,
    /// Ranger notes.
    pub notes: Option<String>,
    /// Image URL.
    pub image_url: Option<String>,
}

impl From<AnimalRow> for AnimalRecord {
    fn from(row: AnimalRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            tag_id: row.tag_id,
            gender: row.gender,
            age_estimate: row.age_estimate,
            health_status: row.health_status,
            last_seen: display::timestamp_or(row.last_seen.as_ref(), UNKNOWN),
            last_seen_at: row.last_seen,
            species_id: row.species_id,
            species_name: row.species_name,
            notes: row.notes,
            image_url: row.image_url,
        }
    }
}

/// A row of `cameras`. `location` is the raw JSONB value.
#[derive(Debug, Clone, FromRow)]
pub struct CameraRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Camera name.
    pub name: String,
    /// Point object or string label.
    pub location: Option<serde_json::Value>,
    /// Site description.
    pub location_description: Option<String>,
    /// Camera type.
    pub camera_type: String,
    /// Operational status.
    pub status: String,
    /// Detection threshold.
    pub detection_threshold: f64,
    /// Last maintenance date.
    pub last_maintenance: Option<NaiveDate>,
}

/// Renders a stored location. A shape that is neither a point nor a
/// label is shown as its raw JSON text so one bad row cannot hide the rest.
fn location_display(camera_id: i64, location: Option<serde_json::Value>) -> String {
    match location {
        Some(serde_json::Value::Null) | None => UNKNOWN.to_string(),
        Some(value) => {
            let raw = value.to_string();
            match CameraLocation::from_json(value) {
                Ok(location) => location.display(),
                Err(e) => {
                    tracing::warn!(camera_id, error = %e, "unreadable camera location");
                    raw
                }
            }
        }
    }
}

impl From<CameraRow> for CameraRecord {
    fn from(row: CameraRow) -> Self {
        let location = location_display(row.id, row.location);
        Self {
            id: row.id,
            name: row.name,
            location,
            location_description: row.location_description,
            camera_type: row.camera_type,
            status: row.status,
            detection_threshold: row.detection_threshold,
            last_maintenance: display::date_or(row.last_maintenance.as_ref(), NOT_RECORDED),
            last_maintenance_on: row.last_maintenance,
        }
    }
}

/// A row of `species`.
#[derive(Debug, Clone, FromRow)]
pub struct SpeciesRow {
    /// Auto-increment row ID.
    pub id: i64,
    /// Common name.
    pub name: String,
    /// Binomial name.
    pub scientific_name: Option<String>,
    /// Conservation status label.
    pub conservation_status: Option<String>,
    /// Description.
    pub description: Option<String>,
}

impl From<SpeciesRow> for SpeciesRecord {
    fn from(row: SpeciesRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            scientific_name: row.scientific_name,
            conservation_status: row.conservation_status,
            description: row.description,
        }
    }
}

/// A row of `users`, only read by the authentication gate.
#[derive(Clone, FromRow)]
pub struct UserAccount {
    /// Auto-increment row ID.
    pub id: i64,
    /// Lowercase email.
    pub email: String,
    /// Name shown in the dashboard.
    pub display_name: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
}

impl std::fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("display_name", &self.display_name)
            .finish_non_exhaustive()
    }
}

/// Raw counts backing [`DashboardSummary`].
#[derive(Debug, Clone, Default)]
pub struct SummaryCounts {
    /// `COUNT(*)` of animals.
    pub total_animals: i64,
    /// `COUNT(*)` of species.
    pub total_species: i64,
    /// `COUNT(*)` of cameras.
    pub total_cameras: i64,
    /// Cameras with status `online`.
    pub cameras_online: i64,
    /// Active alerts grouped by severity.
    pub active_by_severity: Vec<(String, i64)>,
}

impl From<SummaryCounts> for DashboardSummary {
    fn from(counts: SummaryCounts) -> Self {
        let active_alerts_by_severity: BTreeMap<String, i64> =
            counts.active_by_severity.into_iter().collect();
        Self {
            total_animals: counts.total_animals,
            total_species: counts.total_species,
            total_cameras: counts.total_cameras,
            cameras_online: counts.cameras_online,
            active_alerts: active_alerts_by_severity.values().sum(),
            active_alerts_by_severity,
        }
    }
}
