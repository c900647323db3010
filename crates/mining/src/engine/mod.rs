pub mod http;

use async_trait::async_trait;
use careflow_core::{CareflowError, ClinicalEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Engine API error: {0}")]
    Api(String),
}

impl From<EngineError> for CareflowError {
    fn from(e: EngineError) -> Self {
        CareflowError::Engine(e.to_string())
    }
}

/// Opaque handle to an event log held by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogHandle(pub String);

/// Opaque handle to a discovered process model held by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelArtifact(pub String);

/// Discovery algorithms the engine exposes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum Algorithm {
    DirectlyFollows,
    Heuristics { dependency_threshold: f64 },
    Inductive,
    Alpha,
}

/// Annotation variant for rendered models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderVariant {
    Frequency,
    Performance,
    Plain,
}

/// Narrow interface to an external process-mining engine.
///
/// The engine owns all discovery, statistics, and rendering logic;
/// this side only ships normalized events in and artifacts out.
#[async_trait]
pub trait MiningEngine: Send + Sync {
    /// Ship a normalized event table to the engine, returning a log handle.
    async fn ingest(&self, events: &[ClinicalEvent]) -> Result<LogHandle, EngineError>;

    /// Run one discovery algorithm over an ingested log.
    async fn discover(
        &self,
        log: &LogHandle,
        algorithm: Algorithm,
    ) -> Result<ModelArtifact, EngineError>;

    /// Render a discovered model to PNG bytes.
    async fn render(
        &self,
        model: &ModelArtifact,
        variant: RenderVariant,
    ) -> Result<Vec<u8>, EngineError>;

    /// Per-case durations (hours) of an ingested log.
    async fn case_durations(&self, log: &LogHandle) -> Result<Vec<f64>, EngineError>;
}
