use anyhow::Context;
use firecore::RawDetection;
use log::{info, warn};
use serde::Serialize;
use std::fmt::{self, Display};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ChunkStatus {
    Loaded { records: usize },
    Failed { error: String },
}

/// Result of pulling one source (a file or a date window).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkOutcome {
    pub source: String,
    #[serde(flatten)]
    pub status: ChunkStatus,
}

/// Records gathered from every source that succeeded, plus one outcome per
/// source in the order they were attempted.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub outcomes: Vec<ChunkOutcome>,
    pub records: Vec<RawDetection>,
}

impl IngestReport {
    pub fn failed_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome.status, ChunkStatus::Failed { .. }))
            .count()
    }

    pub fn loaded_count(&self) -> usize {
        self.outcomes.len() - self.failed_count()
    }
}

/// Folds over sources, keeping going past failures.
pub fn collect_chunks<S, I, F>(sources: I, mut fetch: F) -> IngestReport
where
    S: Display,
    I: IntoIterator<Item = S>,
    F: FnMut(&S) -> anyhow::Result<Vec<RawDetection>>,
{
    sources
        .into_iter()
        .fold(IngestReport::default(), |mut report, source| {
            let status = match fetch(&source) {
                Ok(records) => {
                    if records.is_empty() {
                        warn!("no records returned for {}", source);
                    } else {
                        info!("fetched {} records from {}", records.len(), source);
                    }
                    let count = records.len();
                    report.records.extend(records);
                    ChunkStatus::Loaded { records: count }
                }
                Err(err) => {
                    warn!("skipping {}: {:#}", source, err);
                    ChunkStatus::Failed {
                        error: format!("{:#}", err),
                    }
                }
            };
            report.outcomes.push(ChunkOutcome {
                source: source.to_string(),
                status,
            });
            report
        })
}

struct SourceFile<'a>(&'a Path);

impl Display for SourceFile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Loads JSON detection exports, one file per chunk.
pub fn load_sources(paths: &[PathBuf]) -> IngestReport {
    collect_chunks(paths.iter().map(|path| SourceFile(path)), |source| {
        read_source(source.0)
    })
}

fn read_source(path: &Path) -> anyhow::Result<Vec<RawDetection>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading detections {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<RawDetection> = serde_json::from_str(&contents)
        .with_context(|| format!("parsing detections {}", path.display()))?;
    Ok(records)
}
