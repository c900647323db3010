use std::path::{Path, PathBuf};
use std::sync::Arc;

use careflow_core::{CareflowError, ClinicalEvent};
use tracing::info;

use crate::engine::{Algorithm, MiningEngine, RenderVariant};
use crate::stats;

pub const DFG_PNG: &str = "sepsis_dfg.png";
pub const HEURISTICS_NET_PNG: &str = "sepsis_heuristics_net.png";
pub const PROCESS_TREE_PNG: &str = "sepsis_process_tree.png";
pub const PERFORMANCE_DFG_PNG: &str = "sepsis_performance_dfg.png";
pub const ALPHA_PETRI_NET_PNG: &str = "sepsis_alpha_petri_net.png";

/// Dependency threshold the heuristics miner runs with.
pub const HEURISTICS_DEPENDENCY_THRESHOLD: f64 = 0.5;

const TOP_ACTIVITIES: usize = 10;

/// Summary numbers from the windowed analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowReport {
    /// Mean case duration in hours; `None` when the log is empty.
    pub avg_case_duration_hours: Option<f64>,
    pub top_activities: Vec<(String, usize)>,
    pub artifacts: Vec<PathBuf>,
}

impl WindowReport {
    /// Print the report to stdout the way the batch run expects it.
    pub fn print(&self) {
        match self.avg_case_duration_hours {
            Some(avg) => println!("Average case duration: {avg:.2} hours"),
            None => println!("Average case duration: no cases in range"),
        }

        println!("\nTop {TOP_ACTIVITIES} most frequent activities:");
        if self.top_activities.is_empty() {
            println!("  (no data)");
        }
        for (activity, count) in &self.top_activities {
            println!("  {activity}: {count}");
        }

        println!("\nProcess mining analysis complete.");
        for path in &self.artifacts {
            println!("  wrote {}", path.display());
        }
    }
}

/// Drives the fixed discovery/reporting sequence against the engine.
///
/// Steps run in a fixed order with no branching; the first engine
/// failure aborts the run. The only guarded condition is an empty
/// event log, which short-circuits to a no-data report instead of
/// handing the engine a log it would reject.
pub struct DiscoveryDriver {
    engine: Arc<dyn MiningEngine>,
    out_dir: PathBuf,
}

impl DiscoveryDriver {
    pub fn new(engine: Arc<dyn MiningEngine>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            out_dir: out_dir.into(),
        }
    }

    async fn save_render(
        &self,
        model: &crate::engine::ModelArtifact,
        variant: RenderVariant,
        filename: &str,
    ) -> Result<PathBuf, CareflowError> {
        let bytes = self.engine.render(model, variant).await?;
        let path = self.out_dir.join(filename);
        std::fs::write(&path, bytes)?;
        info!("Saved {}", path.display());
        Ok(path)
    }

    /// Pipeline 1: frequency DFG, heuristics net, process tree,
    /// case-duration and activity statistics, performance DFG.
    pub async fn run_window_analysis(
        &self,
        events: &[ClinicalEvent],
    ) -> Result<WindowReport, CareflowError> {
        if events.is_empty() {
            info!("Event log is empty after filtering; skipping discovery");
            return Ok(WindowReport {
                avg_case_duration_hours: None,
                top_activities: Vec::new(),
                artifacts: Vec::new(),
            });
        }

        let log = self.engine.ingest(events).await?;
        let mut artifacts = Vec::new();

        let dfg = self.engine.discover(&log, Algorithm::DirectlyFollows).await?;
        artifacts.push(self.save_render(&dfg, RenderVariant::Frequency, DFG_PNG).await?);

        let heu = self
            .engine
            .discover(
                &log,
                Algorithm::Heuristics {
                    dependency_threshold: HEURISTICS_DEPENDENCY_THRESHOLD,
                },
            )
            .await?;
        artifacts.push(
            self.save_render(&heu, RenderVariant::Plain, HEURISTICS_NET_PNG)
                .await?,
        );

        let tree = self.engine.discover(&log, Algorithm::Inductive).await?;
        artifacts.push(
            self.save_render(&tree, RenderVariant::Plain, PROCESS_TREE_PNG)
                .await?,
        );

        let durations = self.engine.case_durations(&log).await?;
        let avg_case_duration_hours = stats::average(&durations);
        let top_activities = stats::top_activities(events, TOP_ACTIVITIES);

        artifacts.push(
            self.save_render(&dfg, RenderVariant::Performance, PERFORMANCE_DFG_PNG)
                .await?,
        );

        Ok(WindowReport {
            avg_case_duration_hours,
            top_activities,
            artifacts,
        })
    }

    /// Pipeline 2: Alpha-Miner Petri net, rendered to a single image.
    pub async fn run_alpha_analysis(
        &self,
        events: &[ClinicalEvent],
    ) -> Result<Option<PathBuf>, CareflowError> {
        if events.is_empty() {
            info!("Event log is empty; skipping Alpha discovery");
            return Ok(None);
        }

        let log = self.engine.ingest(events).await?;
        let net = self.engine.discover(&log, Algorithm::Alpha).await?;
        let path = self
            .save_render(&net, RenderVariant::Plain, ALPHA_PETRI_NET_PNG)
            .await?;

        Ok(Some(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineError, LogHandle, ModelArtifact};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    /// Records the discovery sequence and serves canned responses.
    struct MockEngine {
        discovered: Mutex<Vec<Algorithm>>,
        durations: Vec<f64>,
    }

    impl MockEngine {
        fn new(durations: Vec<f64>) -> Self {
            Self {
                discovered: Mutex::new(Vec::new()),
                durations,
            }
        }
    }

    #[async_trait]
    impl MiningEngine for MockEngine {
        async fn ingest(&self, events: &[ClinicalEvent]) -> Result<LogHandle, EngineError> {
            Ok(LogHandle(format!("log-{}", events.len())))
        }

        async fn discover(
            &self,
            _log: &LogHandle,
            algorithm: Algorithm,
        ) -> Result<ModelArtifact, EngineError> {
            self.discovered.lock().unwrap().push(algorithm);
            Ok(ModelArtifact("model".to_string()))
        }

        async fn render(
            &self,
            _model: &ModelArtifact,
            _variant: RenderVariant,
        ) -> Result<Vec<u8>, EngineError> {
            Ok(b"\x89PNG\r\n\x1a\n".to_vec())
        }

        async fn case_durations(&self, _log: &LogHandle) -> Result<Vec<f64>, EngineError> {
            Ok(self.durations.clone())
        }
    }

    fn events(n: usize) -> Vec<ClinicalEvent> {
        (0..n)
            .map(|i| ClinicalEvent {
                case_id: "100".to_string(),
                activity: format!("act_{}", i % 3),
                timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
                hours_since_onset: Some(i as f64),
            })
            .collect()
    }

    #[tokio::test]
    async fn window_analysis_writes_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockEngine::new(vec![10.0, 20.0]));
        let driver = DiscoveryDriver::new(engine.clone(), dir.path());

        let report = driver.run_window_analysis(&events(6)).await.unwrap();

        for name in [DFG_PNG, HEURISTICS_NET_PNG, PROCESS_TREE_PNG, PERFORMANCE_DFG_PNG] {
            assert!(dir.path().join(name).exists(), "missing {name}");
        }
        assert_eq!(report.artifacts.len(), 4);
        assert_eq!(report.avg_case_duration_hours, Some(15.0));
        assert_eq!(report.top_activities[0].1, 2);
    }

    #[tokio::test]
    async fn window_analysis_runs_fixed_discovery_order() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockEngine::new(vec![1.0]));
        let driver = DiscoveryDriver::new(engine.clone(), dir.path());

        driver.run_window_analysis(&events(3)).await.unwrap();

        let seen = engine.discovered.lock().unwrap().clone();
        assert_eq!(
            seen,
            vec![
                Algorithm::DirectlyFollows,
                Algorithm::Heuristics {
                    dependency_threshold: HEURISTICS_DEPENDENCY_THRESHOLD
                },
                Algorithm::Inductive,
            ]
        );
    }

    #[tokio::test]
    async fn empty_log_reports_no_data_without_engine_calls() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockEngine::new(vec![]));
        let driver = DiscoveryDriver::new(engine.clone(), dir.path());

        let report = driver.run_window_analysis(&[]).await.unwrap();

        assert_eq!(report.avg_case_duration_hours, None);
        assert!(report.top_activities.is_empty());
        assert!(report.artifacts.is_empty());
        assert!(engine.discovered.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn alpha_analysis_writes_petri_net() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockEngine::new(vec![]));
        let driver = DiscoveryDriver::new(engine.clone(), dir.path());

        let path = driver.run_alpha_analysis(&events(4)).await.unwrap();

        assert_eq!(path, Some(dir.path().join(ALPHA_PETRI_NET_PNG)));
        assert!(dir.path().join(ALPHA_PETRI_NET_PNG).exists());
        assert_eq!(
            engine.discovered.lock().unwrap().as_slice(),
            &[Algorithm::Alpha]
        );
    }

    #[tokio::test]
    async fn alpha_analysis_skips_empty_log() {
        let dir = tempfile::tempdir().unwrap();
        let engine = Arc::new(MockEngine::new(vec![]));
        let driver = DiscoveryDriver::new(engine, dir.path());

        assert_eq!(driver.run_alpha_analysis(&[]).await.unwrap(), None);
    }
}
