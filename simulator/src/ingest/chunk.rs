use anyhow::bail;
use chrono::{Duration, NaiveDate};
use firecore::batch::DetectionBatch;
use firecore::Detection;
use serde::Serialize;

/// Inclusive range of calendar days (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateChunk {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateChunk {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn label(&self) -> String {
        format!("{}..{}", self.start, self.end)
    }
}

/// Splits `[start, end]` into consecutive windows of at most `max_days` days.
/// Returns no windows when `start` is after `end`. A window reaching past the
/// last representable date is clamped to `end`.
pub fn chunk_date_range(
    start: NaiveDate,
    end: NaiveDate,
    max_days: u32,
) -> anyhow::Result<Vec<DateChunk>> {
    if max_days == 0 {
        bail!("window length must be at least one day");
    }

    let span = Duration::days(i64::from(max_days) - 1);
    let mut chunks = Vec::new();
    let mut current = start;
    while current <= end {
        let chunk_end = current
            .checked_add_signed(span)
            .map_or(end, |last| last.min(end));
        chunks.push(DateChunk {
            start: current,
            end: chunk_end,
        });
        match chunk_end.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    Ok(chunks)
}

/// Windows covering every detection date from the earliest to the latest.
pub fn covering_chunks(
    detections: &[Detection],
    max_days: u32,
) -> anyhow::Result<Vec<DateChunk>> {
    let dates = detections.iter().map(|d| d.timestamp.date_naive());
    match (dates.clone().min(), dates.max()) {
        (Some(first), Some(last)) => chunk_date_range(first, last, max_days),
        _ => Ok(Vec::new()),
    }
}

/// Groups detections into one batch per window, keeping input order within
/// each batch. Detections outside every window are dropped.
pub fn partition_by_window(
    detections: Vec<Detection>,
    chunks: &[DateChunk],
) -> Vec<DetectionBatch> {
    let mut buckets: Vec<Vec<Detection>> = chunks.iter().map(|_| Vec::new()).collect();
    for detection in detections {
        let date = detection.timestamp.date_naive();
        if let Some(position) = chunks.iter().position(|chunk| chunk.contains(date)) {
            buckets[position].push(detection);
        }
    }

    chunks
        .iter()
        .zip(buckets)
        .map(|(chunk, detections)| DetectionBatch::new(chunk.label(), detections))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn january_fire_window_splits_into_ten_day_chunks() {
        let chunks = chunk_date_range(date(2025, 1, 7), date(2025, 1, 31), 10).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].end, date(2025, 1, 16));
        assert_eq!(chunks[1].start, date(2025, 1, 17));
        assert_eq!(chunks[2].start, date(2025, 1, 27));
        assert_eq!(chunks[2].end, date(2025, 1, 31));
    }

    #[test]
    fn chunks_cross_month_boundaries() {
        let chunks = chunk_date_range(date(2024, 12, 28), date(2025, 1, 3), 3).unwrap();
        let labels: Vec<_> = chunks.iter().map(DateChunk::label).collect();
        assert_eq!(
            labels,
            vec![
                "2024-12-28..2024-12-30",
                "2024-12-31..2025-01-02",
                "2025-01-03..2025-01-03"
            ]
        );
    }

    #[test]
    fn reversed_range_yields_nothing_and_zero_days_is_rejected() {
        assert!(chunk_date_range(date(2025, 2, 1), date(2025, 1, 1), 10)
            .unwrap()
            .is_empty());
        assert!(chunk_date_range(date(2025, 1, 1), date(2025, 2, 1), 0).is_err());
    }

    #[test]
    fn oversized_window_covers_the_whole_range() {
        let day = date(2025, 1, 7);
        let chunks = chunk_date_range(day, day, 200_000_000).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].label(), "2025-01-07..2025-01-07");

        let chunks = chunk_date_range(date(2025, 1, 7), date(2025, 3, 1), u32::MAX).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].end, date(2025, 3, 1));
    }

    #[test]
    fn window_ending_on_the_last_date_terminates() {
        let last = NaiveDate::MAX;
        let first = last.pred_opt().unwrap();
        let chunks = chunk_date_range(first, last, 1).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].end, last);
    }

    #[test]
    fn detections_land_in_their_window() {
        let at = |day: u32| Utc.with_ymd_and_hms(2025, 1, day, 9, 0, 0).unwrap();
        let detections = vec![
            Detection::new(34.0, -118.0, at(9)),
            Detection::new(34.1, -118.1, at(7)),
            Detection::new(34.2, -118.2, at(8)),
            Detection::new(34.3, -118.3, at(12)),
        ];
        let chunks = covering_chunks(&detections, 2).unwrap();
        assert_eq!(chunks.len(), 3);

        let batches = partition_by_window(detections, &chunks);
        let sizes: Vec<usize> = batches.iter().map(|b| b.detections.len()).collect();
        assert_eq!(sizes, vec![2, 1, 1]);
        assert_eq!(batches[0].detections[0].latitude, 34.1);
        assert_eq!(batches[0].label, "2025-01-07..2025-01-08");
    }

    #[test]
    fn no_detections_no_windows() {
        assert!(covering_chunks(&[], 10).unwrap().is_empty());
    }
}
