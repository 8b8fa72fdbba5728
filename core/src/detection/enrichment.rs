//! Per-detection enrichment data (weather, terrain, vegetation index).
//!
//! Enrichment is kept beside detections rather than inside them: records are
//! keyed by detection identity and joined only when a caller asks for them.

use crate::detection::record::Detection;
use chrono::{DateTime, NaiveDate, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

const KEY_SCALE: f64 = 1_000_000.0;

/// Identity of a detection: micro-degree quantized position plus acquisition
/// instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DetectionKey {
    pub latitude_e6: i64,
    pub longitude_e6: i64,
    pub timestamp: DateTime<Utc>,
}

impl DetectionKey {
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude_e6: (latitude * KEY_SCALE).round() as i64,
            longitude_e6: (longitude * KEY_SCALE).round() as i64,
            timestamp,
        }
    }
}

impl From<&Detection> for DetectionKey {
    fn from(detection: &Detection) -> Self {
        Self::new(detection.latitude, detection.longitude, detection.timestamp)
    }
}

/// Daily station observation near a detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub station: String,
    #[serde(default)]
    pub name: Option<String>,
    pub date: NaiveDate,
    /// Average daily wind speed.
    #[serde(default)]
    pub awnd: Option<f64>,
    #[serde(default)]
    pub prcp: Option<f64>,
    #[serde(default)]
    pub rhav: Option<f64>,
    #[serde(default)]
    pub tmax: Option<f64>,
    #[serde(default)]
    pub tmin: Option<f64>,
    /// Direction of the fastest gust, degrees.
    #[serde(default)]
    pub wdfg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Topography {
    pub elevation: Option<f64>,
    pub slope: Option<f64>,
    pub vegetation_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentRecord {
    pub weather: Vec<WeatherObservation>,
    pub topography: Option<Topography>,
    pub ndvi: Option<f64>,
}

impl EnrichmentRecord {
    pub fn is_empty(&self) -> bool {
        self.weather.is_empty() && self.topography.is_none() && self.ndvi.is_none()
    }

    fn absorb(&mut self, other: EnrichmentRecord) {
        self.weather.extend(other.weather);
        if other.topography.is_some() {
            self.topography = other.topography;
        }
        if other.ndvi.is_some() {
            self.ndvi = other.ndvi;
        }
    }
}

/// Enrichment records indexed by detection identity.
#[derive(Debug, Clone, Default)]
pub struct EnrichmentTable {
    records: FxHashMap<DetectionKey, EnrichmentRecord>,
}

impl EnrichmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds data for a detection. Weather observations accumulate; terrain and
    /// NDVI values are replaced by the newest non-empty value.
    pub fn insert(&mut self, key: DetectionKey, record: EnrichmentRecord) {
        self.records.entry(key).or_default().absorb(record);
    }

    pub fn get(&self, detection: &Detection) -> Option<&EnrichmentRecord> {
        self.records.get(&DetectionKey::from(detection))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Pairs each detection with its enrichment, preserving detection order.
    pub fn join<'a>(
        &'a self,
        detections: &'a [Detection],
    ) -> Vec<(&'a Detection, Option<&'a EnrichmentRecord>)> {
        detections
            .iter()
            .map(|detection| (detection, self.get(detection)))
            .collect()
    }

    /// Number of detections in the slice with any enrichment attached.
    pub fn coverage(&self, detections: &[Detection]) -> usize {
        detections
            .iter()
            .filter(|detection| self.get(detection).is_some_and(|r| !r.is_empty()))
            .count()
    }
}
