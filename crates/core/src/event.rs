use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hospital admission identifier grouping events into a case.
pub type CaseId = String;

/// One clinical event after schema normalization.
///
/// `hours_since_onset` is populated only by the temporal filter
/// (24-hour window pipeline); the Alpha pipeline leaves it `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalEvent {
    pub case_id: CaseId,
    pub activity: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours_since_onset: Option<f64>,
}

/// Explicit mapping from source CSV column names to canonical fields.
///
/// Validated against the CSV header before any row is read, so a
/// misnamed column fails fast instead of surfacing mid-normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Source column holding the case identifier.
    pub case_id: String,
    /// Source column holding the activity label.
    pub activity: String,
    /// Source column holding the event timestamp.
    pub timestamp: String,
    /// Source column holding the per-case sepsis onset timestamp.
    /// Required only by the temporal filter.
    pub onset: Option<String>,
}

impl ColumnMapping {
    /// Mapping used by the 24-hour window pipeline (cases keyed by admission).
    pub fn windowed() -> Self {
        Self {
            case_id: "hadm_id".to_string(),
            activity: "event_type".to_string(),
            timestamp: "event_time".to_string(),
            onset: Some("sepsis_onset_time".to_string()),
        }
    }

    /// Mapping used by the Alpha-Miner pipeline (cases keyed by patient).
    pub fn by_subject() -> Self {
        Self {
            case_id: "subject_id".to_string(),
            activity: "event_type".to_string(),
            timestamp: "event_time".to_string(),
            onset: None,
        }
    }

}
