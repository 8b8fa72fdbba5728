use crate::ingest::ChunkOutcome;
use chrono::{DateTime, Utc};
use firecore::prelude::ClusterParams;
use firecore::telemetry::RunMetrics;
use firecore::{FireEvent, GeoPoint};
use serde::Serialize;

/// Per-batch line of the run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSummary {
    pub label: String,
    pub detections: usize,
    pub events: usize,
    pub noise: usize,
    pub demoted: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Event fields consumed downstream, without the member detections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventSummary {
    pub cluster_size: usize,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub start_location: GeoPoint,
    pub end_location: GeoPoint,
    pub displacement_meters: f64,
    pub spread_speed_meters_per_hour: f64,
    pub bearing_degrees: f64,
    pub average_brightness: f64,
}

impl From<&FireEvent> for EventSummary {
    fn from(event: &FireEvent) -> Self {
        Self {
            cluster_size: event.cluster_size(),
            start_time: event.start_time,
            end_time: event.end_time,
            start_location: event.start_location,
            end_location: event.end_location,
            displacement_meters: event.displacement_meters,
            spread_speed_meters_per_hour: event.spread_speed_meters_per_hour,
            bearing_degrees: event.bearing_degrees,
            average_brightness: event.average_brightness,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportModel {
    pub params: ClusterParams,
    pub metrics: RunMetrics,
    pub sources: Vec<ChunkOutcome>,
    pub batches: Vec<BatchSummary>,
    pub events: Vec<EventSummary>,
}

impl ReportModel {
    pub fn new(
        params: ClusterParams,
        metrics: RunMetrics,
        sources: Vec<ChunkOutcome>,
        batches: Vec<BatchSummary>,
        events: &[FireEvent],
    ) -> Self {
        Self {
            params,
            metrics,
            sources,
            batches,
            events: events.iter().map(EventSummary::from).collect(),
        }
    }
}
