use crate::report::model::ReportModel;
use anyhow::Context;
use log::info;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the report as pretty-printed JSON, creating parent directories.
pub fn write_report<P: AsRef<Path>>(path: P, model: &ReportModel) -> anyhow::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating report directory {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("creating report {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, model)
        .with_context(|| format!("serializing report {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    info!("wrote report with {} events to {}", model.events.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{ChunkOutcome, ChunkStatus};
    use crate::report::model::BatchSummary;
    use chrono::{TimeZone, Utc};
    use firecore::prelude::ClusterParams;
    use firecore::processing::build_event;
    use firecore::telemetry::RunMetrics;
    use firecore::Detection;

    #[test]
    fn report_round_trips_through_disk() {
        let at = |hour| Utc.with_ymd_and_hms(2025, 1, 8, hour, 0, 0).unwrap();
        let event = build_event(vec![
            Detection::new(0.0, 0.0, at(10)),
            Detection::new(0.0, 1.0, at(11)),
        ])
        .unwrap();
        let model = ReportModel::new(
            ClusterParams::default(),
            RunMetrics {
                batches: 1,
                events: 1,
                ..Default::default()
            },
            vec![ChunkOutcome {
                source: "fires.json".into(),
                status: ChunkStatus::Loaded { records: 2 },
            }],
            vec![BatchSummary {
                label: "all".into(),
                detections: 2,
                events: 1,
                noise: 0,
                demoted: 0,
                error: None,
            }],
            &[event],
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("run.json");
        write_report(&path, &model).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["params"]["min_pts"], 3);
        assert_eq!(value["events"][0]["cluster_size"], 2);
        assert!((value["events"][0]["bearing_degrees"].as_f64().unwrap() - 90.0).abs() < 1e-9);
        assert_eq!(value["sources"][0]["status"], "loaded");
        assert!(value["batches"][0].get("error").is_none());
    }
}
