use crate::ingest::{covering_chunks, partition_by_window};
use crate::report::model::BatchSummary;
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use firecore::batch::{reconstruct_batches, DetectionBatch};
use firecore::processing::normalize::{normalize, Rejection};
use firecore::telemetry::{LogManager, MetricsRecorder, RunMetrics};
use firecore::{FireEvent, RawDetection};

/// Label of the single batch used when no time window is configured.
const WHOLE_RUN_LABEL: &str = "all";

pub struct WorkflowResult {
    pub accepted: usize,
    pub rejected: Vec<Rejection>,
    pub batches: Vec<BatchSummary>,
    pub events: Vec<FireEvent>,
    pub metrics: RunMetrics,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Normalizes rows, splits them into time windows when configured, and
    /// reconstructs every window concurrently. Failed windows are reported in
    /// the result rather than failing the run.
    pub async fn execute(&self, raws: Vec<RawDetection>) -> anyhow::Result<WorkflowResult> {
        let logger = LogManager::new("workflow");
        let metrics = MetricsRecorder::new();

        let normalized = normalize(raws);
        metrics.record_rejections(normalized.rejected.len());
        let accepted = normalized.detections.len();

        let batches = match self.config.window_days {
            Some(days) => {
                let chunks = covering_chunks(&normalized.detections, days)
                    .context("building detection time windows")?;
                partition_by_window(normalized.detections, &chunks)
            }
            None => vec![DetectionBatch::new(WHOLE_RUN_LABEL, normalized.detections)],
        };
        logger.record(&format!(
            "{} detections across {} batches",
            accepted,
            batches.len()
        ));

        let sizes: Vec<usize> = batches.iter().map(|batch| batch.detections.len()).collect();
        let outcomes =
            reconstruct_batches(batches, self.config.to_params(), self.config.neighbors).await;

        let mut summaries = Vec::with_capacity(outcomes.len());
        let mut events = Vec::new();
        for (outcome, detections) in outcomes.into_iter().zip(sizes) {
            match outcome.result {
                Ok(reconstruction) => {
                    metrics.record_batch(
                        reconstruction.events.len(),
                        reconstruction.noise_count(),
                        reconstruction.demoted_count(),
                    );
                    summaries.push(BatchSummary {
                        label: outcome.label,
                        detections,
                        events: reconstruction.events.len(),
                        noise: reconstruction.noise_count(),
                        demoted: reconstruction.demoted_count(),
                        error: None,
                    });
                    events.extend(reconstruction.events);
                }
                Err(err) => {
                    metrics.record_failed_batch();
                    logger.warn(&err.to_string());
                    summaries.push(BatchSummary {
                        label: outcome.label,
                        detections,
                        events: 0,
                        noise: 0,
                        demoted: 0,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        Ok(WorkflowResult {
            accepted,
            rejected: normalized.rejected,
            batches: summaries,
            events,
            metrics: metrics.snapshot(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_detections, GeneratorConfig};
    use firecore::prelude::NeighborStrategy;

    #[tokio::test]
    async fn runner_executes_workflow() {
        let cfg = WorkflowConfig::default();
        let runner = Runner::new(cfg);
        let rows = build_detections(&GeneratorConfig::default()).unwrap();
        let result = runner.execute(rows).await.unwrap();

        assert_eq!(result.accepted, 29);
        assert_eq!(result.events.len(), 3);
        assert_eq!(result.batches.len(), 1);
        assert_eq!(result.batches[0].label, "all");
        assert_eq!(result.metrics.events, 3);
        assert_eq!(result.metrics.noise_points, 5);
        assert_eq!(result.metrics.demoted_points, 0);
    }

    #[tokio::test]
    async fn windows_split_long_running_fires() {
        let cfg = WorkflowConfig::from_args(0.1, 3, Some(1), NeighborStrategy::Linear);
        let runner = Runner::new(cfg);
        // 32 detections at 90 minute spacing span two UTC days.
        let rows = build_detections(&GeneratorConfig {
            fires: 1,
            detections_per_fire: 32,
            noise_points: 0,
            ..Default::default()
        })
        .unwrap();
        let result = runner.execute(rows).await.unwrap();

        let labels: Vec<_> = result.batches.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2025-01-07..2025-01-07", "2025-01-08..2025-01-08"]);
        assert_eq!(result.events.len(), 2);
        assert_eq!(result.metrics.batches, 2);
    }

    #[tokio::test]
    async fn malformed_rows_are_counted_not_fatal() {
        let runner = Runner::new(WorkflowConfig::default());
        let rows = vec![
            RawDetection {
                latitude: Some(34.0),
                longitude: None,
                ..Default::default()
            },
            RawDetection::default(),
        ];
        let result = runner.execute(rows).await.unwrap();
        assert_eq!(result.accepted, 0);
        assert_eq!(result.rejected.len(), 2);
        assert_eq!(result.metrics.rejected_records, 2);
        assert!(result.events.is_empty());
    }
}
