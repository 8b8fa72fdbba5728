pub mod chunk;
pub mod loader;

pub use chunk::{chunk_date_range, covering_chunks, partition_by_window, DateChunk};
pub use loader::{collect_chunks, load_sources, ChunkOutcome, ChunkStatus, IngestReport};
