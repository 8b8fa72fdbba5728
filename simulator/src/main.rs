use anyhow::{bail, Context};
use clap::Parser;
use firecore::prelude::NeighborStrategy;
use generator::profile::{build_detections, GeneratorConfig};
use ingest::{load_sources, IngestReport};
use report::model::ReportModel;
use report::writer::write_report;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod ingest;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline fire-event reconstruction driver")]
struct Args {
    /// JSON detection exports to ingest (one chunk per file)
    #[arg(long = "input")]
    inputs: Vec<PathBuf>,
    /// Generate a synthetic scenario instead of reading inputs
    #[arg(long, default_value_t = false)]
    synthetic: bool,
    /// Historical fire template used to seed the synthetic scenario
    #[arg(long)]
    template: Option<String>,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Clustering radius in degrees
    #[arg(long, default_value_t = 0.1)]
    epsilon: f64,
    #[arg(long, default_value_t = 3)]
    min_pts: usize,
    /// Split detections into windows of this many days
    #[arg(long)]
    window_days: Option<u32>,
    #[arg(long, default_value = "grid")]
    neighbors: NeighborStrategy,
    /// Write a JSON report of the run
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow.as_ref() {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.epsilon, args.min_pts, args.window_days, args.neighbors)
    };

    let ingest = if args.synthetic {
        let config = GeneratorConfig {
            seed: args.seed,
            template: args.template.clone(),
            ..Default::default()
        };
        IngestReport {
            outcomes: Vec::new(),
            records: build_detections(&config).context("generating synthetic scenario")?,
        }
    } else if !args.inputs.is_empty() {
        load_sources(&args.inputs)
    } else {
        bail!("nothing to process: pass --input <file> or --synthetic");
    };

    let runner = Runner::new(workflow_config.clone());
    let runtime = TokioBuilder::new_multi_thread()
        .enable_all()
        .build()
        .context("creating runtime for batch reconstruction")?;
    let (loaded_sources, failed_sources) = (ingest.loaded_count(), ingest.failed_count());
    let IngestReport { outcomes, records } = ingest;
    let result = runtime.block_on(runner.execute(records))?;

    println!(
        "Reconstruction -> sources {} loaded ({} failed), detections {} ({} rejected)",
        loaded_sources,
        failed_sources,
        result.accepted,
        result.rejected.len()
    );
    println!(
        "  batches {} ({} failed), events {}, noise {} ({} demoted)",
        result.metrics.batches,
        result.metrics.failed_batches,
        result.events.len(),
        result.metrics.noise_points,
        result.metrics.demoted_points
    );
    for (index, event) in result.events.iter().enumerate() {
        println!(
            "  event {:>3}: {} detections, {:.0} m toward {:.1} deg at {:.1} m/h",
            index,
            event.cluster_size(),
            event.displacement_meters,
            event.bearing_degrees,
            event.spread_speed_meters_per_hour
        );
    }

    if let Some(path) = args.report {
        let model = ReportModel::new(
            workflow_config.to_params(),
            result.metrics,
            outcomes,
            result.batches,
            &result.events,
        );
        write_report(&path, &model)?;
    }

    Ok(())
}
