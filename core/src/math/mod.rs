pub mod geodesy;
pub mod matrix;
pub mod stats;

pub use geodesy::{bearing_degrees, destination_point, distance_meters, EARTH_RADIUS_M};
pub use matrix::MatrixHelper;
pub use stats::StatsHelper;
