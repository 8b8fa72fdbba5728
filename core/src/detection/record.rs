use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sensor-reported confidence. The engine never interprets the scale; MODIS
/// reports a percentage while VIIRS reports a low/nominal/high label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Confidence {
    Numeric(f64),
    Label(String),
}

/// Upstream hotspot row before validation. Field names follow the FIRMS
/// export columns so provider rows deserialize directly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDetection {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(alias = "bright_ti4")]
    pub brightness: Option<f64>,
    pub confidence: Option<Confidence>,
    pub satellite: Option<String>,
    pub instrument: Option<String>,
    pub acq_date: Option<String>,
    pub acq_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A validated hotspot detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub satellite: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instrument: Option<String>,
}

impl Detection {
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
            brightness: None,
            confidence: None,
            satellite: None,
            instrument: None,
        }
    }

    pub fn with_brightness(mut self, brightness: f64) -> Self {
        self.brightness = Some(brightness);
        self
    }

    /// True when both coordinates are finite numbers.
    pub fn has_finite_coordinates(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Brightness with absent or non-finite readings counted as zero.
    pub fn brightness_or_zero(&self) -> f64 {
        self.brightness
            .filter(|value| value.is_finite())
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn raw_detection_accepts_firms_column_names() {
        let row = r#"{
            "latitude": 34.1,
            "longitude": -118.1,
            "bright_ti4": 331.5,
            "confidence": "n",
            "satellite": "N",
            "instrument": "VIIRS",
            "acq_date": "2025-01-08",
            "acq_time": "930"
        }"#;
        let raw: RawDetection = serde_json::from_str(row).unwrap();
        assert_eq!(raw.brightness, Some(331.5));
        assert_eq!(raw.confidence, Some(Confidence::Label("n".into())));
        assert_eq!(raw.acq_time.as_deref(), Some("930"));
        assert!(raw.timestamp.is_none());
    }

    #[test]
    fn numeric_confidence_is_passed_through() {
        let raw: RawDetection = serde_json::from_str(r#"{"confidence": 87}"#).unwrap();
        assert_eq!(raw.confidence, Some(Confidence::Numeric(87.0)));
    }

    #[test]
    fn brightness_defaults_to_zero_when_absent() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 7, 12, 0, 0).unwrap();
        let detection = Detection::new(34.0, -118.0, ts);
        assert_eq!(detection.brightness_or_zero(), 0.0);
        assert_eq!(detection.with_brightness(300.0).brightness_or_zero(), 300.0);
    }

    #[test]
    fn non_finite_coordinates_are_detected() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 7, 12, 0, 0).unwrap();
        assert!(!Detection::new(f64::NAN, 0.0, ts).has_finite_coordinates());
        assert!(!Detection::new(0.0, f64::INFINITY, ts).has_finite_coordinates());
        assert!(Detection::new(0.0, 0.0, ts).has_finite_coordinates());
    }
}
