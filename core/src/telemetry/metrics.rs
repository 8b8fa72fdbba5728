use serde::Serialize;
use std::sync::Mutex;

/// Thread-safe counters summarizing one driver run across batches.
pub struct MetricsRecorder {
    inner: Mutex<RunMetrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunMetrics {
    pub batches: usize,
    pub failed_batches: usize,
    pub events: usize,
    pub noise_points: usize,
    pub demoted_points: usize,
    pub rejected_records: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(RunMetrics::default()),
        }
    }

    pub fn record_batch(&self, events: usize, noise_points: usize, demoted_points: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.batches += 1;
            metrics.events += events;
            metrics.noise_points += noise_points;
            metrics.demoted_points += demoted_points;
        }
    }

    pub fn record_failed_batch(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.batches += 1;
            metrics.failed_batches += 1;
        }
    }

    pub fn record_rejections(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected_records += count;
        }
    }

    pub fn snapshot(&self) -> RunMetrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            RunMetrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
