use crate::detection::Detection;
use crate::math::matrix::MatrixHelper;
use crate::prelude::{ClusterParams, NeighborStrategy};
use crate::processing::neighbors::{build_search, NeighborSearch};
use crate::telemetry::log::LogManager;
use serde::Serialize;

/// Partition of detection indices produced by one clustering run.
///
/// Every index appears exactly once, either in one cluster or in `noise`.
/// Cluster member lists and the noise list are in ascending index order;
/// clusters are in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Clustering {
    pub clusters: Vec<Vec<usize>>,
    pub noise: Vec<usize>,
    /// Points in `noise` that belonged to a cluster left smaller than
    /// `min_pts`.
    pub demoted: usize,
}

impl Clustering {
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }
}

/// Runs DBSCAN over the (latitude, longitude) plane.
pub fn cluster_detections(
    detections: &[Detection],
    params: &ClusterParams,
    strategy: NeighborStrategy,
) -> Clustering {
    let features = MatrixHelper::coordinates(detections);
    let search = build_search(strategy, features.view(), params.epsilon);
    dbscan(search.as_ref(), params.effective_min_pts())
}

/// DBSCAN over an arbitrary neighbor search.
///
/// Seeds are taken in index order and each cluster is expanded breadth-first
/// in neighbor discovery order. A border point reachable from several clusters
/// stays with the first one that reached it. Clusters left smaller than
/// `min_pts` because their border points were already claimed are demoted to
/// noise.
pub fn dbscan(search: &dyn NeighborSearch, min_pts: usize) -> Clustering {
    let logger = LogManager::new("cluster");
    let len = search.len();
    let mut visited = vec![false; len];
    let mut assigned: Vec<Option<usize>> = vec![None; len];
    // Last cluster id whose frontier already holds the point.
    let mut queued_for: Vec<Option<usize>> = vec![None; len];
    let mut clusters: Vec<Vec<usize>> = Vec::new();

    for seed in 0..len {
        if visited[seed] {
            continue;
        }
        visited[seed] = true;

        let neighbors = search.region(seed);
        if neighbors.len() < min_pts {
            continue;
        }

        let cluster_id = clusters.len();
        let mut members = vec![seed];
        assigned[seed] = Some(cluster_id);

        let mut frontier = neighbors;
        for &point in &frontier {
            queued_for[point] = Some(cluster_id);
        }

        let mut cursor = 0;
        while cursor < frontier.len() {
            let point = frontier[cursor];
            cursor += 1;

            if !visited[point] {
                visited[point] = true;
                let expansion = search.region(point);
                if expansion.len() >= min_pts {
                    for next in expansion {
                        if queued_for[next] != Some(cluster_id) {
                            queued_for[next] = Some(cluster_id);
                            frontier.push(next);
                        }
                    }
                }
            }

            if assigned[point].is_none() {
                assigned[point] = Some(cluster_id);
                members.push(point);
            }
        }

        clusters.push(members);
    }

    let mut partition = Clustering::default();
    for mut members in clusters {
        if members.len() < min_pts {
            logger.detail(&format!(
                "demoting cluster of {} below min_pts {}",
                members.len(),
                min_pts
            ));
            partition.demoted += members.len();
            partition.noise.extend(members);
            continue;
        }
        members.sort_unstable();
        partition.clusters.push(members);
    }
    partition
        .noise
        .extend((0..len).filter(|&index| assigned[index].is_none()));
    partition.noise.sort_unstable();

    logger.record(&format!(
        "{} points -> {} clusters, {} noise ({} demoted)",
        len,
        partition.cluster_count(),
        partition.noise.len(),
        partition.demoted
    ));
    partition
}
