//! sepsis-alpha — Alpha-Miner Petri net over the full event log.
//!
//! Loads the clinical events CSV, normalizes it into an event log keyed
//! by patient (no temporal filter), mines a Petri net with the Alpha
//! Miner, and saves the rendered image. `--view` opens it afterwards.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use careflow_core::{config, ColumnMapping, Config};
use careflow_ingest::{normalize, CsvImporter};
use careflow_mining::{DiscoveryDriver, HttpMiningEngine};

/// Alpha-Miner process discovery over the sepsis event log.
#[derive(Parser, Debug)]
#[command(name = "sepsis-alpha", version, about)]
struct Cli {
    /// Path to the clinical events CSV.
    #[arg(long, env = "CAREFLOW_CSV")]
    csv: Option<PathBuf>,

    /// Base URL of the process-mining engine.
    #[arg(long, env = "CAREFLOW_ENGINE_URL")]
    engine_url: Option<String>,

    /// Directory receiving the rendered PNG artifact.
    #[arg(long, env = "CAREFLOW_OUT_DIR")]
    out_dir: Option<PathBuf>,

    /// Source column holding the case identifier.
    #[arg(long, default_value = "subject_id")]
    case_column: String,

    /// Source column holding the activity label.
    #[arg(long, default_value = "event_type")]
    activity_column: String,

    /// Source column holding the event timestamp.
    #[arg(long, default_value = "event_time")]
    timestamp_column: String,

    /// Open the rendered image in the platform viewer.
    #[arg(long)]
    view: bool,
}

fn open_in_viewer(path: &Path) {
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(not(target_os = "macos"))]
    let opener = "xdg-open";

    match std::process::Command::new(opener).arg(path).spawn() {
        Ok(_) => info!("Opened {} in viewer", path.display()),
        Err(e) => warn!(error = %e, "failed to open viewer"),
    }
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

    let mapping = ColumnMapping {
        case_id: cli.case_column,
        activity: cli.activity_column,
        timestamp: cli.timestamp_column,
        onset: None,
    };

    let table = CsvImporter::import(&csv_path)
        .with_context(|| format!("failed to load {}", csv_path.display()))?;
    let events = normalize(&table, &mapping).context("failed to normalize event table")?;
    info!("{} events in log", events.len());

    let engine = Arc::new(
        HttpMiningEngine::new(engine_url, cfg.engine.timeout_secs)
            .context("failed to build mining engine client")?,
    );
    let driver = DiscoveryDriver::new(engine, out_dir);

    match driver
        .run_alpha_analysis(&events)
        .await
        .context("Alpha discovery failed")?
    {
        Some(path) => {
            println!("Alpha-Miner Petri net saved to {}", path.display());
            if cli.view {
                open_in_viewer(&path);
            }
        }
        None => println!("No data: event log is empty"),
    }

    Ok(())
}
