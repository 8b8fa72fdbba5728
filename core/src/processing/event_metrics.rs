use crate::detection::{Detection, FireEvent, GeoPoint};
use crate::math::geodesy::{bearing_degrees, distance_meters};
use crate::math::stats::StatsHelper;

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Builds the event for one cluster.
///
/// Detections are ordered by timestamp with ties kept in input order, so
/// `members` should already be in input order. Returns `None` for an empty
/// cluster.
pub fn build_event(members: Vec<Detection>) -> Option<FireEvent> {
    let mut detections = members;
    // `sort_by_key` is stable.
    detections.sort_by_key(|detection| detection.timestamp);

    let start = detections.first()?;
    let end = detections.last()?;

    let displacement_meters =
        distance_meters(start.latitude, start.longitude, end.latitude, end.longitude);
    let bearing = bearing_degrees(start.latitude, start.longitude, end.latitude, end.longitude);
    let elapsed_hours =
        (end.timestamp - start.timestamp).num_milliseconds() as f64 / MILLIS_PER_HOUR;
    let spread_speed_meters_per_hour = if elapsed_hours > 0.0 {
        displacement_meters / elapsed_hours
    } else {
        0.0
    };
    let (start_time, end_time) = (start.timestamp, end.timestamp);
    let (start_location, end_location) = (GeoPoint::from(start), GeoPoint::from(end));
    let brightness: Vec<f64> = detections
        .iter()
        .map(Detection::brightness_or_zero)
        .collect();
    let average_brightness = StatsHelper::mean(&brightness);

    Some(FireEvent {
        start_time,
        end_time,
        start_location,
        end_location,
        displacement_meters,
        spread_speed_meters_per_hour,
        bearing_degrees: bearing,
        average_brightness,
        detections,
    })
}

/// Builds one event per cluster, in cluster order.
pub fn build_events(detections: &[Detection], clusters: &[Vec<usize>]) -> Vec<FireEvent> {
    clusters
        .iter()
        .filter_map(|members| {
            let mut ordered = members.clone();
            ordered.sort_unstable();
            build_event(ordered.into_iter().map(|i| detections[i].clone()).collect())
        })
        .collect()
}
