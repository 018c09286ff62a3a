//! Domain events emitted after every successful write.
//!
//! Every write publishes a [`DashboardEvent`] through the
//! [`super::EventBus`]; WebSocket clients subscribe per [`Topic`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Subscription topic, one per entity that can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    /// Alert changes.
    Alerts,
    /// Animal changes.
    Animals,
    /// Camera changes.
    Cameras,
}

impl Topic {
    /// Returns the wire name of the topic.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alerts => "alerts",
            Self::Animals => "animals",
            Self::Cameras => "cameras",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alerts" => Ok(Self::Alerts),
            "animals" => Ok(Self::Animals),
            "cameras" => Ok(Self::Cameras),
            other => Err(format!("unknown topic: {other}")),
        }
    }
}

/// Event broadcast after a write.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum DashboardEvent {
    /// An alert was marked resolved.
    AlertResolved {
        /// Alert id.
        alert_id: i64,
        /// Resolution time stamped by the write.
        resolved_at: DateTime<Utc>,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An animal was inserted.
    AnimalAdded {
        /// New animal id.
        animal_id: i64,
        /// Animal name.
        name: String,
        /// Species id.
        species_id: i64,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A camera was inserted.
    CameraAdded {
        /// New camera id.
        camera_id: i64,
        /// Camera name.
        name: String,
        /// Normalized location.
        location: String,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A camera's status or threshold changed.
    CameraUpdated {
        /// Camera id.
        camera_id: i64,
        /// Status after the update.
        status: String,
        /// Threshold after the update.
        detection_threshold: f64,
        /// Event timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl DashboardEvent {
    /// Returns the topic this event is published under.
    #[must_use]
    pub const fn topic(&self) -> Topic {
        match self {
            Self::AlertResolved { .. } => Topic::Alerts,
            Self::AnimalAdded { .. } => Topic::Animals,
            Self::CameraAdded { .. } | Self::CameraUpdated { .. } => Topic::Cameras,
        }
    }

    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::AlertResolved { .. } => "alert_resolved",
            Self::AnimalAdded { .. } => "animal_added",
            Self::CameraAdded { .. } => "camera_added",
            Self::CameraUpdated { .. } => "camera_updated",
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn topics_parse_from_wire_names() {
        for topic in [Topic::Alerts, Topic::Animals, Topic::Cameras] {
            assert_eq!(topic.as_str().parse::<Topic>().ok(), Some(topic));
        }
        assert!("herds".parse::<Topic>().is_err());
    }

    #[test]
    fn camera_events_share_a_topic() {
        let added = DashboardEvent::CameraAdded {
            camera_id: 1,
            name: "Cam A".to_string(),
            location: "(1, 2)".to_string(),
            timestamp: Utc::now(),
        };
        let updated = DashboardEvent::CameraUpdated {
            camera_id: 1,
            status: "offline".to_string(),
            detection_threshold: 0.4,
            timestamp: Utc::now(),
        };
        assert_eq!(added.topic(), Topic::Cameras);
        assert_eq!(updated.topic(), Topic::Cameras);
    }

    #[test]
    fn serializes_with_event_type_tag() {
        let event = DashboardEvent::AlertResolved {
            alert_id: 9,
            resolved_at: Utc::now(),
            timestamp: Utc::now(),
        };
        let Ok(json) = serde_json::to_value(&event) else {
            panic!("serialization failed");
        };
        assert_eq!(json["event_type"], "alert_resolved");
        assert_eq!(json["alert_id"], 9);
        assert_eq!(event.event_type_str(), "alert_resolved");
    }
}
