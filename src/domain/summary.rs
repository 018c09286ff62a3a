//! Aggregate counts for the dashboard header cards.

use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

/// Counts shown at the top of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DashboardSummary {
    /// Number of tracked animals.
    pub total_animals: i64,
    /// Number of species on record.
    pub total_species: i64,
    /// Number of cameras.
    pub total_cameras: i64,
    /// Number of cameras whose status is `online`.
    pub cameras_online: i64,
    /// Number of alerts still active.
    pub active_alerts: i64,
    /// Active alerts keyed by severity label.
    pub active_alerts_by_severity: BTreeMap<String, i64>,
}
