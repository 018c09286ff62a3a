//! Species reference records.

use serde::Serialize;
use utoipa::ToSchema;

/// Species as handed to the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SpeciesRecord {
    /// Store-assigned id.
    pub id: i64,
    /// Common name (e.g. `"Bengal Tiger"`).
    pub name: String,
    /// Binomial name.
    pub scientific_name: Option<String>,
    /// IUCN-style status label (e.g. `"Endangered"`).
    pub conservation_status: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}
