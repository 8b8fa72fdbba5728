//! Spherical-earth geometry helpers.

use crate::detection::GeoPoint;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance in meters between two coordinates (haversine).
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    let c = 2.0 * a.sqrt().atan2((1.0 - a).max(0.0).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial compass bearing from point 1 toward point 2, in `[0, 360)`.
///
/// Coincident points have no direction; they yield 0.
pub fn bearing_degrees(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    normalize_degrees(y.atan2(x).to_degrees())
}

/// Point reached from `(lat, lon)` after travelling `distance_m` along the
/// great circle with initial bearing `bearing_deg`.
pub fn destination_point(lat: f64, lon: f64, bearing_deg: f64, distance_m: f64) -> GeoPoint {
    let phi1 = lat.to_radians();
    let lambda1 = lon.to_radians();
    let theta = bearing_deg.to_radians();
    let delta = distance_m / EARTH_RADIUS_M;

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let y = theta.sin() * delta.sin() * phi1.cos();
    let x = delta.cos() - phi1.sin() * phi2.sin();
    let lambda2 = lambda1 + y.atan2(x);

    let longitude = (lambda2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    GeoPoint::new(phi2.to_degrees(), longitude)
}

fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {} within {} of {}",
            actual,
            tolerance,
            expected
        );
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        assert_close(distance_meters(0.0, 0.0, 0.0, 1.0), 111_195.0, 1.0);
        assert_close(bearing_degrees(0.0, 0.0, 0.0, 1.0), 90.0, 1e-9);
    }

    #[test]
    fn coincident_points_have_zero_distance_and_finite_bearing() {
        assert_eq!(distance_meters(34.05, -118.24, 34.05, -118.24), 0.0);
        let bearing = bearing_degrees(34.05, -118.24, 34.05, -118.24);
        assert!(bearing.is_finite());
        assert!((0.0..360.0).contains(&bearing));
    }

    #[test]
    fn distance_is_symmetric() {
        let pairs = [
            ((34.05, -118.24), (36.17, -115.14)),
            ((-33.87, 151.21), (51.51, -0.13)),
            ((89.9, 10.0), (-89.9, -170.0)),
            ((0.0, 179.9), (0.0, -179.9)),
        ];
        for ((lat1, lon1), (lat2, lon2)) in pairs {
            let forward = distance_meters(lat1, lon1, lat2, lon2);
            let backward = distance_meters(lat2, lon2, lat1, lon1);
            assert!((forward - backward).abs() <= forward.abs() * 1e-6 + 1e-9);
        }
    }

    #[test]
    fn cardinal_bearings() {
        assert_close(bearing_degrees(0.0, 0.0, 1.0, 0.0), 0.0, 1e-9);
        assert_close(bearing_degrees(0.0, 0.0, -1.0, 0.0), 180.0, 1e-9);
        assert_close(bearing_degrees(0.0, 0.0, 0.0, -1.0), 270.0, 1e-9);
    }

    #[test]
    fn bearing_stays_below_360() {
        // A hair west of due north.
        let bearing = bearing_degrees(0.0, 0.0, 1.0, -1e-15);
        assert!((0.0..360.0).contains(&bearing));
    }

    #[test]
    fn destination_round_trips_with_distance_and_bearing() {
        let origin = (34.1, -118.1);
        let target = destination_point(origin.0, origin.1, 63.0, 12_500.0);
        assert_close(
            distance_meters(origin.0, origin.1, target.latitude, target.longitude),
            12_500.0,
            0.01,
        );
        assert_close(
            bearing_degrees(origin.0, origin.1, target.latitude, target.longitude),
            63.0,
            1e-6,
        );
    }

    #[test]
    fn destination_wraps_across_the_antimeridian() {
        let target = destination_point(0.0, 179.95, 90.0, 20_000.0);
        assert!(target.longitude < -179.0);
    }
}
