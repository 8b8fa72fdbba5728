//! Core reconstruction engine for satellite hotspot detections.
//!
//! Detections are validated, grouped with DBSCAN over the latitude/longitude
//! plane, and each resulting cluster is summarized as a fire event carrying
//! its displacement, spread speed, bearing and mean brightness. Every entry
//! point is a pure function of its input and [`ClusterParams`].

pub mod batch;
pub mod detection;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use detection::{Detection, FireEvent, GeoPoint, RawDetection};
pub use prelude::{ClusterParams, EngineError, EngineResult, NeighborStrategy};
pub use processing::{reconstruct, reconstruct_raw, reconstruct_with, Reconstruction};
