use anyhow::Context;
use firecore::prelude::{ClusterParams, NeighborStrategy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    /// Clustering radius in degrees.
    pub epsilon: f64,
    pub min_pts: usize,
    /// Split detections into windows of this many days before clustering.
    pub window_days: Option<u32>,
    pub neighbors: NeighborStrategy,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let params = ClusterParams::default();
        Self {
            epsilon: params.epsilon,
            min_pts: params.min_pts,
            window_days: None,
            neighbors: NeighborStrategy::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        epsilon: f64,
        min_pts: usize,
        window_days: Option<u32>,
        neighbors: NeighborStrategy,
    ) -> Self {
        Self {
            epsilon,
            min_pts,
            window_days,
            neighbors,
        }
    }

    pub fn to_params(&self) -> ClusterParams {
        ClusterParams::new(self.epsilon, self.min_pts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_from_args_produces_params() {
        let cfg = WorkflowConfig::from_args(0.05, 4, Some(10), NeighborStrategy::Linear);
        assert_eq!(cfg.to_params(), ClusterParams::new(0.05, 4));
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"epsilon: 0.02\nmin_pts: 5\nwindow_days: 10\nneighbors: linear\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.min_pts, 5);
        assert_eq!(cfg.window_days, Some(10));
        assert_eq!(cfg.neighbors, NeighborStrategy::Linear);
    }

    #[test]
    fn missing_yaml_keys_fall_back_to_defaults() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"min_pts: 2\n").unwrap();
        let path = temp.into_temp_path();
        let cfg = WorkflowConfig::load(&path).unwrap();
        assert_eq!(cfg.epsilon, 0.1);
        assert_eq!(cfg.window_days, None);
        assert_eq!(cfg.neighbors, NeighborStrategy::Grid);
    }

    #[test]
    fn malformed_yaml_reports_the_path() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"epsilon: [not, a, number]\n").unwrap();
        let path = temp.into_temp_path();
        let err = WorkflowConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing workflow config"));
    }
}
