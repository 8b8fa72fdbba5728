pub mod cluster;
pub mod engine;
pub mod event_metrics;
pub mod neighbors;
pub mod normalize;

pub use cluster::{cluster_detections, Clustering};
pub use engine::{reconstruct, reconstruct_raw, reconstruct_with, Reconstruction};
pub use event_metrics::{build_event, build_events};
pub use neighbors::{GridIndex, LinearScan, NeighborSearch};
pub use normalize::{normalize, Normalized, RejectReason, Rejection};
