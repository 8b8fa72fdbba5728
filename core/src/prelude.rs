use serde::{Deserialize, Serialize};

/// Default clustering radius, in degrees of latitude/longitude.
pub const DEFAULT_EPSILON_DEG: f64 = 0.1;

/// Default minimum neighborhood size for a core point.
pub const DEFAULT_MIN_PTS: usize = 3;

/// Parameters shared by every reconstruction run.
///
/// `epsilon` is a radius in coordinate degrees, not meters: clustering treats
/// (latitude, longitude) as a flat plane, while reported event displacement is
/// always a great-circle distance in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterParams {
    pub epsilon: f64,
    pub min_pts: usize,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON_DEG,
            min_pts: DEFAULT_MIN_PTS,
        }
    }
}

impl ClusterParams {
    pub fn new(epsilon: f64, min_pts: usize) -> Self {
        Self { epsilon, min_pts }
    }

    /// Minimum neighborhood size actually applied; zero behaves like one since
    /// a point always counts itself.
    pub fn effective_min_pts(&self) -> usize {
        self.min_pts.max(1)
    }
}

/// Neighbor lookup used while clustering. Both strategies yield identical
/// partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeighborStrategy {
    Linear,
    #[default]
    Grid,
}

impl std::str::FromStr for NeighborStrategy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "grid" => Ok(Self::Grid),
            other => Err(format!("unknown neighbor strategy '{}'", other)),
        }
    }
}

/// Common error type for engine operations that can actually fail.
///
/// Malformed detections are never errors; they are filtered with a
/// [`RejectReason`](crate::processing::normalize::RejectReason).
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error("batch '{0}' aborted: {1}")]
    BatchAborted(String, String),
}

pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_match_reference_values() {
        let params = ClusterParams::default();
        assert_eq!(params.epsilon, 0.1);
        assert_eq!(params.min_pts, 3);
    }

    #[test]
    fn zero_min_pts_is_treated_as_one() {
        assert_eq!(ClusterParams::new(0.1, 0).effective_min_pts(), 1);
    }

    #[test]
    fn neighbor_strategy_parses_case_insensitively() {
        assert_eq!("GRID".parse::<NeighborStrategy>(), Ok(NeighborStrategy::Grid));
        assert_eq!(
            "linear".parse::<NeighborStrategy>(),
            Ok(NeighborStrategy::Linear)
        );
        assert!("kd-tree".parse::<NeighborStrategy>().is_err());
    }
}
