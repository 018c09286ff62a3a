//! Camera records, location normalization, and write payloads.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::DashboardError;

/// Status given to a camera inserted without one.
pub const DEFAULT_CAMERA_STATUS: &str = "online";

/// Detection threshold given to a camera inserted without one.
pub const DEFAULT_DETECTION_THRESHOLD: f64 = 0.5;

/// Camera location as kept in the store.
///
/// The `location` column holds either a point or a free-text label. Points
/// written by this service use `{x, y}` with `x` = longitude and `y` =
/// latitude; GeoJSON points exported by other tools are accepted as well.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CameraLocation {
    /// `{"x": .., "y": ..}`
    Point {
        /// Longitude.
        x: f64,
        /// Latitude.
        y: f64,
    },
    /// `{"type": "Point", "coordinates": [x, y]}`
    GeoJson {
        /// `[longitude, latitude]`.
        coordinates: [f64; 2],
    },
    /// A label such as `"North ridge, near the salt lick"`.
    Text(String),
}

impl CameraLocation {
    /// Composes the store's point representation from separate inputs.
    #[must_use]
    pub const fn from_coordinates(latitude: f64, longitude: f64) -> Self {
        Self::Point {
            x: longitude,
            y: latitude,
        }
    }

    /// Decodes the raw JSON column value.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::StoreError`] when the value is neither a
    /// point nor a string.
    pub fn from_json(value: serde_json::Value) -> Result<Self, DashboardError> {
        serde_json::from_value(value)
            .map_err(|e| DashboardError::StoreError(format!("unreadable camera location: {e}")))
    }

    /// Returns the `(x, y)` pair when the location is a point.
    #[must_use]
    pub const fn as_point(&self) -> Option<(f64, f64)> {
        match self {
            Self::Point { x, y } => Some((*x, *y)),
            Self::GeoJson { coordinates: [x, y] } => Some((*x, *y)),
            Self::Text(_) => None,
        }
    }

    /// Renders a point as `"(x, y)"` and passes a label through unchanged.
    #[must_use]
    pub fn display(&self) -> String {
        match (self.as_point(), self) {
            (Some((x, y)), _) => format!("({x}, {y})"),
            (None, Self::Text(label)) => label.clone(),
            (None, _) => String::new(),
        }
    }
}

/// Camera as handed to the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CameraRecord {
    /// Store-assigned id.
    pub id: i64,
    /// Camera name.
    pub name: String,
    /// Normalized location string, or `"Unknown"`.
    pub location: String,
    /// Free-text description of the site.
    pub location_description: Option<String>,
    /// Camera type (e.g. `"trail"`, `"thermal"`).
    pub camera_type: String,
    /// Operational status (e.g. `"online"`, `"offline"`, `"maintenance"`).
    pub status: String,
    /// Minimum detection confidence, in `[0, 1]`.
    pub detection_threshold: f64,
    /// Last maintenance date rendered for display, or `"Not recorded"`.
    pub last_maintenance: String,
    /// Raw last maintenance date.
    pub last_maintenance_on: Option<NaiveDate>,
}

/// Payload for inserting a camera.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewCamera {
    /// Camera name.
    pub name: String,
    /// Latitude in degrees, `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in degrees, `[-180, 180]`.
    pub longitude: f64,
    /// Free-text description of the site.
    #[serde(default)]
    pub location_description: Option<String>,
    /// Camera type.
    pub camera_type: String,
    /// Operational status; defaults to `"online"`.
    #[serde(default = "default_status")]
    pub status: String,
    /// Detection threshold; defaults to `0.5`.
    #[serde(default = "default_threshold")]
    pub detection_threshold: f64,
    /// Last maintenance date.
    #[serde(default)]
    pub last_maintenance: Option<NaiveDate>,
}

fn default_status() -> String {
    DEFAULT_CAMERA_STATUS.to_string()
}

const fn default_threshold() -> f64 {
    DEFAULT_DETECTION_THRESHOLD
}

impl NewCamera {
    /// Returns the store point built from `latitude` / `longitude`.
    #[must_use]
    pub const fn location(&self) -> CameraLocation {
        CameraLocation::from_coordinates(self.latitude, self.longitude)
    }

    /// Validates names, coordinate ranges, and the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] on the first violation.
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.name.trim().is_empty() {
            return Err(DashboardError::InvalidRequest("name is required".to_string()));
        }
        if self.camera_type.trim().is_empty() {
            return Err(DashboardError::InvalidRequest(
                "camera_type is required".to_string(),
            ));
        }
        if self.status.trim().is_empty() {
            return Err(DashboardError::InvalidRequest("status is required".to_string()));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(DashboardError::InvalidRequest(format!(
                "latitude out of range: {}",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(DashboardError::InvalidRequest(format!(
                "longitude out of range: {}",
                self.longitude
            )));
        }
        validate_threshold(self.detection_threshold)
    }
}

/// Partial update for a camera. Only status and threshold can change.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CameraUpdate {
    /// New operational status.
    #[serde(default)]
    pub status: Option<String>,
    /// New detection threshold.
    #[serde(default)]
    pub detection_threshold: Option<f64>,
}

impl CameraUpdate {
    /// Requires at least one field, a non-blank status and an in-range
    /// threshold.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidRequest`] on the first violation.
    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.status.is_none() && self.detection_threshold.is_none() {
            return Err(DashboardError::InvalidRequest(
                "nothing to update: provide status or detection_threshold".to_string(),
            ));
        }
        if let Some(status) = &self.status
            && status.trim().is_empty()
        {
            return Err(DashboardError::InvalidRequest("status must not be blank".to_string()));
        }
        if let Some(threshold) = self.detection_threshold {
            validate_threshold(threshold)?;
        }
        Ok(())
    }
}

fn validate_threshold(threshold: f64) -> Result<(), DashboardError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(DashboardError::InvalidRequest(format!(
            "detection_threshold must be within [0, 1], got {threshold}"
        )))
    }
}


#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn point_renders_as_pair() {
        let loc = CameraLocation::from_coordinates(-1.5, 36.25);
        assert_eq!(loc.display(), "(36.25, -1.5)");
    }

    #[test]
    fn whole_numbers_render_without_fraction() {
        let loc = CameraLocation::Point { x: 10.0, y: 20.0 };
        assert_eq!(loc.display(), "(10, 20)");
    }

    #[test]
    fn text_location_passes_through() {
        let Ok(loc) = CameraLocation::from_json(serde_json::json!("North ridge")) else {
            panic!("string location should decode");
        };
        assert_eq!(loc.display(), "North ridge");
    }

    #[test]
    fn geojson_point_is_normalized() {
        let Ok(loc) = CameraLocation::from_json(serde_json::json!({
            "type": "Point",
            "coordinates": [35.5, -2.75]
        })) else {
            panic!("geojson location should decode");
        };
        assert_eq!(loc.display(), "(35.5, -2.75)");
    }

    #[test]
    fn stored_point_decodes() {
        let Ok(loc) = CameraLocation::from_json(serde_json::json!({"x": 1.5, "y": 2.5})) else {
            panic!("point location should decode");
        };
        assert_eq!(loc.as_point(), Some((1.5, 2.5)));
    }

    #[test]
    fn numeric_location_is_unreadable() {
        let result = CameraLocation::from_json(serde_json::json!(42));
        assert!(matches!(result, Err(DashboardError::StoreError(_))));
    }

    #[test]
    fn new_camera_rejects_out_of_range_latitude() {
        let camera = fixtures::trail_camera("Cam A", 91.0, 10.0);
        assert!(matches!(
            camera.validate(),
            Err(DashboardError::InvalidRequest(_))
        ));
    }

    #[test]
    fn new_camera_defaults_apply() {
        let json = serde_json::json!({
            "name": "Cam B",
            "latitude": -1.0,
            "longitude": 36.0,
            "camera_type": "thermal"
        });
        let Ok(camera) = serde_json::from_value::<NewCamera>(json) else {
            panic!("should deserialize");
        };
        assert_eq!(camera.status, "online");
        assert!((camera.detection_threshold - 0.5).abs() < f64::EPSILON);
        assert!(camera.validate().is_ok());
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(CameraUpdate::default().validate().is_err());
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let update = CameraUpdate {
            status: None,
            detection_threshold: Some(1.5),
        };
        assert!(update.validate().is_err());
    }
}
