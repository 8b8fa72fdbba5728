pub mod enrichment;
pub mod event;
pub mod record;

pub use enrichment::{
    DetectionKey, EnrichmentRecord, EnrichmentTable, Topography, WeatherObservation,
};
pub use event::{FireEvent, GeoPoint};
pub use record::{Confidence, Detection, RawDetection};
