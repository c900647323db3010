use std::time::Duration;

use async_trait::async_trait;
use careflow_core::ClinicalEvent;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{Algorithm, EngineError, LogHandle, MiningEngine, ModelArtifact, RenderVariant};

/// Mining engine reached over HTTP.
///
/// Events are shipped under the engine's canonical column keys
/// (`case:concept:name`, `concept:name`, `time:timestamp`); values
/// pass through untouched.
pub struct HttpMiningEngine {
    client: Client,
    url: String,
}

impl HttpMiningEngine {
    pub fn new(url: String, timeout_secs: u64) -> Result<Self, EngineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self { client, url })
    }
}

#[derive(Serialize)]
struct LogRecord<'a> {
    #[serde(rename = "case:concept:name")]
    case_id: &'a str,
    #[serde(rename = "concept:name")]
    activity: &'a str,
    #[serde(rename = "time:timestamp")]
    timestamp: DateTime<Utc>,
}

#[derive(Serialize)]
struct IngestRequest<'a> {
    events: Vec<LogRecord<'a>>,
}

#[derive(Deserialize)]
struct IngestResponse {
    log_id: String,
}

#[derive(Deserialize)]
struct DiscoverResponse {
    model_id: String,
}

#[derive(Serialize)]
struct RenderRequest {
    variant: RenderVariant,
}

#[derive(Deserialize)]
struct CaseDurationsResponse {
    hours: Vec<f64>,
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, EngineError> {
    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(EngineError::Api(format!("{status}: {body}")));
    }
    Ok(response)
}

#[async_trait]
impl MiningEngine for HttpMiningEngine {
    async fn ingest(&self, events: &[ClinicalEvent]) -> Result<LogHandle, EngineError> {
        let request = IngestRequest {
            events: events
                .iter()
                .map(|e| LogRecord {
                    case_id: &e.case_id,
                    activity: &e.activity,
                    timestamp: e.timestamp,
                })
                .collect(),
        };

        let response = self
            .client
            .post(format!("{}/logs", self.url))
            .json(&request)
            .send()
            .await?;
        let parsed: IngestResponse = check(response).await?.json().await?;

        Ok(LogHandle(parsed.log_id))
    }

    async fn discover(
        &self,
        log: &LogHandle,
        algorithm: Algorithm,
    ) -> Result<ModelArtifact, EngineError> {
        let response = self
            .client
            .post(format!("{}/logs/{}/discover", self.url, log.0))
            .json(&algorithm)
            .send()
            .await?;
        let parsed: DiscoverResponse = check(response).await?.json().await?;

        Ok(ModelArtifact(parsed.model_id))
    }

    async fn render(
        &self,
        model: &ModelArtifact,
        variant: RenderVariant,
    ) -> Result<Vec<u8>, EngineError> {
        let response = self
            .client
            .post(format!("{}/models/{}/render", self.url, model.0))
            .json(&RenderRequest { variant })
            .send()
            .await?;
        let bytes = check(response).await?.bytes().await?;

        Ok(bytes.to_vec())
    }

    async fn case_durations(&self, log: &LogHandle) -> Result<Vec<f64>, EngineError> {
        let response = self
            .client
            .get(format!("{}/logs/{}/case-durations", self.url, log.0))
            .send()
            .await?;
        let parsed: CaseDurationsResponse = check(response).await?.json().await?;

        Ok(parsed.hours)
    }
}
