//! Animal records and the insert payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DashboardError;

/// Animal as handed to the dashboard, with the species name joined in.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AnimalRecord {
    /// Store-assigned id.
    pub id: i64,
    /// Given name (e.g. `"Raja"`).
    pub name: String,
    /// Collar / ear tag identifier (e.g. `"TI-004"`).
    pub tag_id: String,
    /// Gender label.
    pub gender: String,
    /// Estimated age, free text (e.g. `"6 years"`).
    pub age_estimate: String,
    /// Health status label.
    pub health_status: String,
    /// Last sighting rendered for display, or `"Unknown"`.
    pub last_seen: String,
    /// Raw last sighting time.
    pub last_seen_at: Option<DateTime<Utc>>,
    /// Species reference.
    pub species_id: i64,
    /// Joined species name.
    pub species_name: Option<String>,
    /// Ranger notes.
    pub notes: Option<String>,
    /// Image URL or storage path.
    pub image_url: Option<String>,
}

/// Payload for inserting an animal. The id is assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewAnimal {
    /// Given name.
    pub name: String,
    /// Tag identifier, unique across animals.
    pub tag_id: String,
    /// Species reference; must name an existing species.
    pub species_id: i64,
    /// Gender label.
    pub gender: String,
    /// Estimated age.
    pub age_estimate: String,
    /// Health status label.
    pub health_status: String,
    /// Last sighting time.
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
    /// Ranger notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Image URL or storage path.
    #[serde(default)]
    pub image_url: Option<String>,
}

impl NewAnimal {
    /// Checks that every required text field is non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] naming the first blank field.
    pub fn validate(&self) -> Result<(), DashboardError> {
        let required = [
            ("name", &self.name),
            ("tag_id", &self.tag_id),
            ("gender", &self.gender),
            ("age_estimate", &self.age_estimate),
            ("health_status", &self.health_status),
        ];
        if let Some((field, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(DashboardError::InvalidRequest(format!("{field} is required")));
        }
        Ok(())
    }
}
