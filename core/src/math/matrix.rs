use crate::detection::Detection;
use ndarray::{Array2, ArrayView2};

pub struct MatrixHelper;

impl MatrixHelper {
    /// Builds the `n x 2` (latitude, longitude) feature matrix used for
    /// clustering.
    pub fn coordinates(detections: &[Detection]) -> Array2<f64> {
        let mut features = Array2::<f64>::zeros((detections.len(), 2));
        for (mut row, detection) in features.rows_mut().into_iter().zip(detections) {
            row[0] = detection.latitude;
            row[1] = detection.longitude;
        }
        features
    }

    /// Straight-line distance between two rows, in coordinate units.
    pub fn planar_distance(features: ArrayView2<f64>, a: usize, b: usize) -> f64 {
        let d_lat = features[[a, 0]] - features[[b, 0]];
        let d_lon = features[[a, 1]] - features[[b, 1]];
        d_lat.hypot(d_lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn coordinates_fill_one_row_per_detection() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 7, 0, 0, 0).unwrap();
        let detections = vec![Detection::new(1.0, 2.0, ts), Detection::new(4.0, 6.0, ts)];
        let features = MatrixHelper::coordinates(&detections);
        assert_eq!(features.shape(), &[2, 2]);
        assert_eq!(features[[1, 1]], 6.0);
        assert_eq!(MatrixHelper::planar_distance(features.view(), 0, 1), 5.0);
    }
}
