use crate::detection::{Detection, FireEvent, RawDetection};
use crate::prelude::{ClusterParams, NeighborStrategy};
use crate::processing::cluster::{cluster_detections, Clustering};
use crate::processing::event_metrics::build_events;
use crate::processing::normalize::{normalize, retain_valid, Rejection};
use crate::telemetry::log::LogManager;

/// Result of one reconstruction run.
///
/// Cluster and noise indices refer to `detections`, which holds only the
/// detections that passed validation, in input order. Rejection indices refer
/// to the caller's original input.
#[derive(Debug, Clone, Default)]
pub struct Reconstruction {
    pub detections: Vec<Detection>,
    pub clustering: Clustering,
    pub events: Vec<FireEvent>,
    pub rejected: Vec<Rejection>,
}

impl Reconstruction {
    pub fn noise(&self) -> impl Iterator<Item = &Detection> + '_ {
        self.clustering
            .noise
            .iter()
            .map(|&index| &self.detections[index])
    }

    pub fn noise_count(&self) -> usize {
        self.clustering.noise.len()
    }

    /// Noise points that were members of a demoted undersized cluster.
    pub fn demoted_count(&self) -> usize {
        self.clustering.demoted
    }
}

/// Groups detections into fire events using the default grid neighbor search.
pub fn reconstruct(detections: &[Detection], params: &ClusterParams) -> Reconstruction {
    reconstruct_with(detections, params, NeighborStrategy::default())
}

/// Groups detections into fire events. Detections with non-finite coordinates
/// are dropped before clustering.
pub fn reconstruct_with(
    detections: &[Detection],
    params: &ClusterParams,
    strategy: NeighborStrategy,
) -> Reconstruction {
    let (accepted, rejected) = retain_valid(detections);
    let mut reconstruction = run(accepted, params, strategy);
    reconstruction.rejected = rejected;
    reconstruction
}

/// Normalizes upstream rows and reconstructs events from those that survive.
pub fn reconstruct_raw<I>(
    raws: I,
    params: &ClusterParams,
    strategy: NeighborStrategy,
) -> Reconstruction
where
    I: IntoIterator<Item = RawDetection>,
{
    let normalized = normalize(raws);
    let mut reconstruction = run(normalized.detections, params, strategy);
    reconstruction.rejected = normalized.rejected;
    reconstruction
}

fn run(
    detections: Vec<Detection>,
    params: &ClusterParams,
    strategy: NeighborStrategy,
) -> Reconstruction {
    let logger = LogManager::new("events");
    let clustering = cluster_detections(&detections, params, strategy);
    let events = build_events(&detections, &clustering.clusters);
    logger.record(&format!(
        "epsilon {} min_pts {} -> {} clusters, {} events from {} detections",
        params.epsilon,
        params.min_pts,
        clustering.cluster_count(),
        events.len(),
        detections.len()
    ));
    if clustering.demoted > 0 {
        logger.warn(&format!(
            "{} core points reported as noise after cluster demotion",
            clustering.demoted
        ));
    }

    Reconstruction {
        detections,
        clustering,
        events,
        rejected: Vec::new(),
    }
}
