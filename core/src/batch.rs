//! Concurrent reconstruction of independent detection batches.

use crate::detection::Detection;
use crate::prelude::{ClusterParams, EngineError, EngineResult, NeighborStrategy};
use crate::processing::engine::{reconstruct_with, Reconstruction};
use crate::telemetry::log::LogManager;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tokio::task::JoinSet;

/// Detections for one region or time window.
#[derive(Debug, Clone)]
pub struct DetectionBatch {
    pub label: String,
    pub detections: Vec<Detection>,
}

impl DetectionBatch {
    pub fn new(label: impl Into<String>, detections: Vec<Detection>) -> Self {
        Self {
            label: label.into(),
            detections,
        }
    }
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub label: String,
    pub result: EngineResult<Reconstruction>,
}

impl BatchOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Reconstructs every batch on the blocking pool and returns the outcomes in
/// submission order. A batch whose worker panics is reported as
/// [`EngineError::BatchAborted`] without affecting the others.
pub async fn reconstruct_batches(
    batches: Vec<DetectionBatch>,
    params: ClusterParams,
    strategy: NeighborStrategy,
) -> Vec<BatchOutcome> {
    let logger = LogManager::new("batch");
    let labels: Vec<String> = batches.iter().map(|batch| batch.label.clone()).collect();
    let mut slots: Vec<Option<EngineResult<Reconstruction>>> =
        labels.iter().map(|_| None).collect();

    let mut workers = JoinSet::new();
    for (position, batch) in batches.into_iter().enumerate() {
        workers.spawn_blocking(move || {
            let DetectionBatch { label, detections } = batch;
            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                reconstruct_with(&detections, &params, strategy)
            }))
            .map_err(|payload| EngineError::BatchAborted(label, panic_message(payload.as_ref())));
            (position, result)
        });
    }

    while let Some(joined) = workers.join_next().await {
        match joined {
            Ok((position, result)) => slots[position] = Some(result),
            Err(err) => logger.warn(&format!("worker did not complete: {}", err)),
        }
    }

    let outcomes: Vec<BatchOutcome> = labels
        .into_iter()
        .zip(slots)
        .map(|(label, slot)| {
            let result = slot.unwrap_or_else(|| {
                Err(EngineError::BatchAborted(label.clone(), "worker cancelled".to_string()))
            });
            BatchOutcome { label, result }
        })
        .collect();

    for outcome in &outcomes {
        match &outcome.result {
            Ok(reconstruction) => logger.detail(&format!(
                "batch '{}' -> {} events",
                outcome.label,
                reconstruction.events.len()
            )),
            Err(err) => logger.warn(&err.to_string()),
        }
    }
    logger.record(&format!("{} batches reconstructed", outcomes.len()));
    outcomes
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn cluster_at(lat: f64, lon: f64, count: usize) -> Vec<Detection> {
        let start = Utc.with_ymd_and_hms(2025, 1, 10, 6, 0, 0).unwrap();
        (0..count)
            .map(|i| {
                Detection::new(
                    lat + i as f64 * 0.002,
                    lon + i as f64 * 0.002,
                    start + Duration::hours(i as i64),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn outcomes_follow_submission_order() {
        let batches = vec![
            DetectionBatch::new("palisades", cluster_at(34.07, -118.55, 4)),
            DetectionBatch::new("empty", Vec::new()),
            DetectionBatch::new("eaton", cluster_at(34.19, -118.09, 6)),
        ];

        let outcomes =
            reconstruct_batches(batches, ClusterParams::default(), NeighborStrategy::Grid).await;
        let labels: Vec<_> = outcomes.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["palisades", "empty", "eaton"]);
        assert!(outcomes.iter().all(BatchOutcome::is_success));

        let sizes: Vec<usize> = outcomes
            .iter()
            .map(|o| o.result.as_ref().map(|r| r.events.len()).unwrap_or(0))
            .collect();
        assert_eq!(sizes, vec![1, 0, 1]);
    }

    #[tokio::test]
    async fn concurrent_batches_match_sequential_runs() {
        let detections = cluster_at(36.5, -121.8, 8);
        let sequential =
            reconstruct_with(&detections, &ClusterParams::default(), NeighborStrategy::Linear);
        let outcomes = reconstruct_batches(
            vec![
                DetectionBatch::new("a", detections.clone()),
                DetectionBatch::new("b", detections),
            ],
            ClusterParams::default(),
            NeighborStrategy::Grid,
        )
        .await;
        for outcome in outcomes {
            let reconstruction = outcome.result.unwrap();
            assert_eq!(reconstruction.events, sequential.events);
        }
    }

    #[tokio::test]
    async fn no_batches_no_outcomes() {
        let outcomes =
            reconstruct_batches(Vec::new(), ClusterParams::default(), NeighborStrategy::Grid)
                .await;
        assert!(outcomes.is_empty());
    }
}
