use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Direction of the ongoing horizontal sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepDirection {
    /// Angle is increasing towards the 180° bound.
    Up,
    /// Angle is decreasing towards the 0° bound.
    Down,
}

/// A single confirmed obstacle reading at one scan angle.
///
/// The distance is always strictly positive and within the sensor's
/// configured maximum range; readings outside that window never produce a
/// `Detection`, they clear the map entry instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Measured distance to the obstacle, in centimeters.
    #[serde(rename = "distance")]
    pub distance_cm: f64,
}

impl Detection {
    /// Wrap a raw in-range distance reading.
    pub fn new(distance_cm: f64) -> Self {
        Self { distance_cm }
    }
}

/// Immutable snapshot of the sweep state, published by the sweep task after
/// every step and consumed read-only by the console task.
///
/// Snapshots are shared as `Arc<RadarSnapshot>` over a watch channel, so a
/// reader always observes one internally consistent map, never a half-written
/// entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarSnapshot {
    /// Current angle of the sweep servo, in whole degrees.
    pub angle_deg: u16,
    /// Which way the sweep is currently moving.
    pub direction: SweepDirection,
    /// One entry per configured scan angle; `None` means nothing detected
    /// there on the most recent pass.
    pub obstacles: BTreeMap<u16, Option<Detection>>,
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
}

/// Wire format served at the `/angle` endpoint.
///
/// Serializes to `{"angle": <int>, "obstacles": {"<angle>": {"distance": <f>}
/// | null, ...}}` with a key present for every configured scan angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleReport {
    pub angle: u16,
    pub obstacles: BTreeMap<u16, Option<Detection>>,
}

impl From<&RadarSnapshot> for AngleReport {
    fn from(snapshot: &RadarSnapshot) -> Self {
        Self {
            angle: snapshot.angle_deg,
            obstacles: snapshot.obstacles.clone(),
        }
    }
}

/// Global error type spanning hardware faults, transport failures, and
/// snapshot serialization defects.
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum RadarError {
    #[error("Hardware Fault on {component}: {details}")]
    HardwareFault { component: String, details: String },

    #[error("Invalid Configuration: {0}")]
    Config(String),

    #[error("Snapshot Serialization Error: {0}")]
    Serialization(String),

    #[error("Transport Error: {0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot_with(angle: u16, detections: &[(u16, f64)]) -> RadarSnapshot {
        let mut obstacles: BTreeMap<u16, Option<Detection>> =
            (0..=180).step_by(10).map(|a| (a, None)).collect();
        for &(a, d) in detections {
            obstacles.insert(a, Some(Detection::new(d)));
        }
        RadarSnapshot {
            angle_deg: angle,
            direction: SweepDirection::Up,
            obstacles,
            taken_at: Utc::now(),
        }
    }

    #[test]
    fn detection_serializes_with_distance_key() {
        let json = serde_json::to_string(&Detection::new(42.5)).unwrap();
        assert_eq!(json, r#"{"distance":42.5}"#);
    }

    #[test]
    fn angle_report_roundtrip() {
        let report = AngleReport::from(&snapshot_with(40, &[(40, 120.0)]));
        let json = serde_json::to_string(&report).unwrap();
        let back: AngleReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
    }

    #[test]
    fn angle_report_keeps_empty_entries_as_null() {
        let report = AngleReport::from(&snapshot_with(90, &[(90, 30.0)]));
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""90":{"distance":30.0}"#));
        assert!(json.contains(r#""80":null"#));
    }

    #[test]
    fn angle_report_has_a_key_per_scan_angle() {
        let report = AngleReport::from(&snapshot_with(0, &[]));
        assert_eq!(report.obstacles.len(), 19);
        assert!(report.obstacles.keys().all(|a| a % 10 == 0 && *a <= 180));
    }

    #[test]
    fn radar_error_display() {
        let err = RadarError::HardwareFault {
            component: "sweep_servo".to_string(),
            details: "pwm write failed".to_string(),
        };
        assert!(err.to_string().contains("sweep_servo"));

        let err2 = RadarError::Transport("connection reset".to_string());
        assert!(err2.to_string().contains("connection reset"));
    }
}
