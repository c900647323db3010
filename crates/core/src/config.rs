use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_f64(key: &str, default: f64) -> f64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub data: DataConfig,
    pub engine: EngineConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            data: DataConfig::from_env(),
            engine: EngineConfig::from_env(),
            output: OutputConfig::from_env(),
        }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  data:    csv={}", self.data.csv_path.display());
        tracing::info!(
            "  data:    window_hours={}",
            self.data.window_hours
        );
        tracing::info!("  engine:  url={}", self.engine.url);
        tracing::info!("  output:  dir={}", self.output.out_dir.display());
    }
}

// ── Data source ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path to the clinical events CSV.
    pub csv_path: PathBuf,
    /// Post-onset window applied by the temporal filter, in hours.
    pub window_hours: f64,
}

impl DataConfig {
    fn from_env() -> Self {
        Self {
            csv_path: PathBuf::from(env_or(
                "CAREFLOW_CSV",
                "data/4_sepsis_care_analysis_dataset.csv",
            )),
            window_hours: env_f64("CAREFLOW_WINDOW_HOURS", 24.0),
        }
    }
}

// ── Mining engine ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Base URL of the process-mining engine service.
    pub url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl EngineConfig {
    fn from_env() -> Self {
        Self {
            url: env_or("CAREFLOW_ENGINE_URL", "http://localhost:8800"),
            timeout_secs: env_u64("CAREFLOW_ENGINE_TIMEOUT", 120),
        }
    }
}

// ── Output ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving rendered PNG artifacts.
    pub out_dir: PathBuf,
}

impl OutputConfig {
    fn from_env() -> Self {
        Self {
            out_dir: PathBuf::from(env_or("CAREFLOW_OUT_DIR", ".")),
        }
    }
}
