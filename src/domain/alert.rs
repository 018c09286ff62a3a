//! Alert records and list filters.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DashboardError;

/// Default number of alerts returned by a list call.
pub const DEFAULT_ALERT_LIMIT: u32 = 50;

/// Upper bound on the number of alerts returned by a list call.
pub const MAX_ALERT_LIMIT: u32 = 500;

/// Lifecycle status of an alert. Stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    /// Raised and not yet handled.
    Active,
    /// Handled by a ranger; `resolved_at` is stamped.
    Resolved,
}

impl AlertStatus {
    /// Returns the stored text form.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertStatus {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "resolved" => Ok(Self::Resolved),
            other => Err(DashboardError::StoreError(format!(
                "unexpected alert status {other:?}"
            ))),
        }
    }
}

/// Alert as handed to the dashboard, with the animal name joined in.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertRecord {
    /// Store-assigned id.
    pub id: i64,
    /// Animal the alert is about, if any.
    pub animal_id: Option<i64>,
    /// Joined animal name.
    pub animal_name: Option<String>,
    /// Alert category (e.g. `"geofence"`, `"poaching"`).
    pub alert_type: String,
    /// Severity label (e.g. `"high"`).
    pub severity: String,
    /// Human-readable message.
    pub message: String,
    /// Free-text location label.
    pub location: Option<String>,
    /// Current status.
    pub status: AlertStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Creation time rendered for display.
    pub created_at_display: String,
    /// Resolution time, set once resolved.
    pub resolved_at: Option<DateTime<Utc>>,
    /// Optional latitude of the event.
    pub latitude: Option<f64>,
    /// Optional longitude of the event.
    pub longitude: Option<f64>,
}

/// Filter for listing alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertQuery {
    /// Maximum number of rows, already clamped to `1..=MAX_ALERT_LIMIT`.
    pub limit: u32,
    /// Include resolved alerts; when `false` only active alerts are returned.
    pub include_resolved: bool,
}

impl AlertQuery {
    /// Builds a query, clamping `limit` into the allowed range.
    #[must_use]
    pub fn new(limit: Option<u32>, include_resolved: bool) -> Self {
        Self {
            limit: limit
                .unwrap_or(DEFAULT_ALERT_LIMIT)
                .clamp(1, MAX_ALERT_LIMIT),
            include_resolved,
        }
    }

    /// Returns `true` if an alert with `status` passes the filter.
    #[must_use]
    pub fn admits(&self, status: AlertStatus) -> bool {
        self.include_resolved || status == AlertStatus::Active
    }
}

impl Default for AlertQuery {
    fn default() -> Self {
        Self::new(None, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_text_round_trips() {
        for status in [AlertStatus::Active, AlertStatus::Resolved] {
            assert_eq!(status.as_str().parse::<AlertStatus>().ok(), Some(status));
        }
    }

    #[test]
    fn unknown_status_is_a_store_error() {
        let parsed = "snoozed".parse::<AlertStatus>();
        assert!(matches!(parsed, Err(DashboardError::StoreError(_))));
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(AlertQuery::new(Some(0), false).limit, 1);
        assert_eq!(AlertQuery::new(Some(10_000), false).limit, MAX_ALERT_LIMIT);
        assert_eq!(AlertQuery::new(None, true).limit, DEFAULT_ALERT_LIMIT);
    }

    #[test]
    fn active_only_filter_rejects_resolved() {
        let query = AlertQuery::new(None, false);
        assert!(query.admits(AlertStatus::Active));
        assert!(!query.admits(AlertStatus::Resolved));
        assert!(AlertQuery::new(None, true).admits(AlertStatus::Resolved));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&AlertStatus::Resolved).ok();
        assert_eq!(json.as_deref(), Some("\"resolved\""));
    }
}
