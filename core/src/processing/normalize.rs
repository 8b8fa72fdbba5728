use crate::detection::{Detection, RawDetection};
use crate::telemetry::log::LogManager;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::Serialize;

/// Acquisition time assumed when a row carries a date but no time.
const DEFAULT_ACQ_TIME: &str = "1200";

const NAIVE_TIMESTAMP_FORMATS: [&str; 3] =
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Why a row was filtered out before clustering.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize)]
pub enum RejectReason {
    #[error("missing coordinate")]
    MissingCoordinate,
    #[error("non-finite coordinate ({latitude}, {longitude})")]
    NonFiniteCoordinate { latitude: f64, longitude: f64 },
    #[error("missing acquisition time")]
    MissingTimestamp,
    #[error("unparseable acquisition time '{0}'")]
    UnparseableTimestamp(String),
}

/// A dropped row and its position in the input sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rejection {
    pub index: usize,
    pub reason: RejectReason,
}

/// Output of the normalizer: accepted detections in input order plus the rows
/// that were dropped.
#[derive(Debug, Clone, Default)]
pub struct Normalized {
    pub detections: Vec<Detection>,
    pub rejected: Vec<Rejection>,
}

/// Validates raw rows, dropping any without finite coordinates or a parseable
/// acquisition time.
pub fn normalize<I>(raws: I) -> Normalized
where
    I: IntoIterator<Item = RawDetection>,
{
    let logger = LogManager::new("normalize");
    let mut normalized = Normalized::default();

    for (index, raw) in raws.into_iter().enumerate() {
        match normalize_record(raw) {
            Ok(detection) => normalized.detections.push(detection),
            Err(reason) => {
                logger.detail(&format!("dropping row {}: {}", index, reason));
                normalized.rejected.push(Rejection { index, reason });
            }
        }
    }

    logger.record(&format!(
        "accepted {} detections, rejected {}",
        normalized.detections.len(),
        normalized.rejected.len()
    ));
    normalized
}

/// Converts one raw row into a detection.
pub fn normalize_record(raw: RawDetection) -> Result<Detection, RejectReason> {
    let (latitude, longitude) = match (raw.latitude, raw.longitude) {
        (Some(latitude), Some(longitude)) => (latitude, longitude),
        _ => return Err(RejectReason::MissingCoordinate),
    };
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(RejectReason::NonFiniteCoordinate {
            latitude,
            longitude,
        });
    }
    let timestamp = resolve_timestamp(&raw)?;

    Ok(Detection {
        latitude,
        longitude,
        timestamp,
        brightness: raw.brightness.filter(|value| value.is_finite()),
        confidence: raw.confidence,
        satellite: trimmed(raw.satellite),
        instrument: trimmed(raw.instrument),
    })
}

/// Splits already-typed detections into those safe to cluster and those with
/// non-finite coordinates. Non-finite brightness on a kept detection is
/// cleared, matching the raw normalizer.
pub fn retain_valid(detections: &[Detection]) -> (Vec<Detection>, Vec<Rejection>) {
    let mut accepted = Vec::with_capacity(detections.len());
    let mut rejected = Vec::new();
    for (index, detection) in detections.iter().enumerate() {
        if detection.has_finite_coordinates() {
            accepted.push(Detection {
                brightness: detection.brightness.filter(|value| value.is_finite()),
                ..detection.clone()
            });
        } else {
            rejected.push(Rejection {
                index,
                reason: RejectReason::NonFiniteCoordinate {
                    latitude: detection.latitude,
                    longitude: detection.longitude,
                },
            });
        }
    }
    (accepted, rejected)
}

/// Resolves the acquisition instant of a row, preferring an explicit
/// `timestamp` over the FIRMS `acq_date`/`acq_time` pair. Naive values are UTC.
pub fn resolve_timestamp(raw: &RawDetection) -> Result<DateTime<Utc>, RejectReason> {
    if let Some(text) = raw
        .timestamp
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        return parse_timestamp(text).ok_or_else(|| RejectReason::UnparseableTimestamp(text.into()));
    }

    let date_text = raw
        .acq_date
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or(RejectReason::MissingTimestamp)?;
    let time_text = raw
        .acq_time
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_ACQ_TIME);

    let unparseable = || RejectReason::UnparseableTimestamp(format!("{} {}", date_text, time_text));
    let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d").map_err(|_| unparseable())?;
    let time = parse_acq_time(time_text).ok_or_else(unparseable)?;
    Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NAIVE_TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// FIRMS encodes acquisition time as `HHMM` with leading zeros dropped.
fn parse_acq_time(text: &str) -> Option<NaiveTime> {
    if text.is_empty() || text.len() > 4 || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let padded = format!("{:0>4}", text);
    let hours: u32 = padded[..2].parse().ok()?;
    let minutes: u32 = padded[2..].parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
