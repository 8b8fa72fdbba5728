use crate::detection::record::Detection;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<&Detection> for GeoPoint {
    fn from(detection: &Detection) -> Self {
        Self::new(detection.latitude, detection.longitude)
    }
}

/// One reconstructed fire event: a density cluster of detections ordered in
/// time, with the displacement observed between its first and last detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireEvent {
    pub detections: Vec<Detection>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_location: GeoPoint,
    pub end_location: GeoPoint,
    pub displacement_meters: f64,
    pub spread_speed_meters_per_hour: f64,
    pub bearing_degrees: f64,
    pub average_brightness: f64,
}

impl FireEvent {
    pub fn cluster_size(&self) -> usize {
        self.detections.len()
    }

    /// Time between the first and last detection, in hours.
    pub fn elapsed_hours(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 3_600_000.0
    }
}
