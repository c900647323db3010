//! sepsis-window — 24-hour post-onset pathway analysis.
//!
//! Loads the clinical events CSV, normalizes it into an event log keyed
//! by admission, keeps events within the post-onset window, then drives
//! the mining engine: frequency DFG, heuristics net, process tree,
//! case-duration and activity statistics, performance DFG.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use careflow_core::{config, ColumnMapping, Config};
use careflow_ingest::{normalize, CsvImporter, TemporalFilter};
use careflow_mining::{DiscoveryDriver, HttpMiningEngine};

/// 24-hour sepsis pathway analysis.
#[derive(Parser, Debug)]
#[command(name = "sepsis-window", version, about)]
struct Cli {
    /// Path to the clinical events CSV.
    #[arg(long, env = "CAREFLOW_CSV")]
    csv: Option<PathBuf>,

    /// Base URL of the process-mining engine.
    #[arg(long, env = "CAREFLOW_ENGINE_URL")]
    engine_url: Option<String>,

    /// Directory receiving the rendered PNG artifacts.
    #[arg(long, env = "CAREFLOW_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Post-onset window in hours.
    #[arg(long, env = "CAREFLOW_WINDOW_HOURS")]
    window_hours: Option<f64>,

    /// Source column holding the case identifier.
    #[arg(long, default_value = "hadm_id")]
    case_column: String,

    /// Source column holding the activity label.
    #[arg(long, default_value = "event_type")]
    activity_column: String,

    /// Source column holding the event timestamp.
    #[arg(long, default_value = "event_time")]
    timestamp_column: String,

    /// Source column holding the sepsis onset timestamp.
    #[arg(long, default_value = "sepsis_onset_time")]
    onset_column: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    config::load_dotenv();
    let cli = Cli::parse();
    let cfg = Config::from_env();
    cfg.log_summary();

    let csv_path = cli.csv.unwrap_or(cfg.data.csv_path);
    let engine_url = cli.engine_url.unwrap_or(cfg.engine.url);
    let out_dir = cli.out_dir.unwrap_or(cfg.output.out_dir);
    let window_hours = cli.window_hours.unwrap_or(cfg.data.window_hours);

    let mapping = ColumnMapping {
        case_id: cli.case_column,
        activity: cli.activity_column,
        timestamp: cli.timestamp_column,
        onset: Some(cli.onset_column),
    };

    let table = CsvImporter::import(&csv_path)
        .with_context(|| format!("failed to load {}", csv_path.display()))?;
    let events = normalize(&table, &mapping).context("failed to normalize event table")?;
    let filtered = TemporalFilter::new(window_hours)
        .apply(&events)
        .context("failed to apply temporal filter")?;
    info!(
        "{} of {} events within {}h of onset",
        filtered.len(),
        events.len(),
        window_hours
    );

    let engine = Arc::new(
        HttpMiningEngine::new(engine_url, cfg.engine.timeout_secs)
            .context("failed to build mining engine client")?,
    );
    let driver = DiscoveryDriver::new(engine, out_dir);

    let report = driver
        .run_window_analysis(&filtered)
        .await
        .context("discovery run failed")?;
    report.print();

    Ok(())
}
