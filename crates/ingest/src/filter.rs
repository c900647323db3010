use careflow_core::{CareflowError, ClinicalEvent};
use tracing::{debug, warn};

/// Keeps events inside a fixed post-onset window.
///
/// The boundary is inclusive: an event at exactly `window_hours` after
/// onset is retained. Events recorded before the documented onset
/// (negative elapsed time) are dropped and counted as a data-quality
/// warning, so every retained row satisfies `0 <= hours <= window`.
#[derive(Debug, Clone, Copy)]
pub struct TemporalFilter {
    window_hours: f64,
}

impl TemporalFilter {
    pub fn new(window_hours: f64) -> Self {
        Self { window_hours }
    }

    pub fn apply(&self, events: &[ClinicalEvent]) -> Result<Vec<ClinicalEvent>, CareflowError> {
        let mut kept = Vec::with_capacity(events.len());
        let mut dropped_late = 0usize;
        let mut dropped_negative = 0usize;

        for event in events {
            let hours = event.hours_since_onset.ok_or_else(|| {
                CareflowError::Other(
                    "temporal filter requires events normalized with an onset column".to_string(),
                )
            })?;

            if hours < 0.0 {
                dropped_negative += 1;
            } else if hours > self.window_hours {
                dropped_late += 1;
            } else {
                kept.push(event.clone());
            }
        }

        if dropped_negative > 0 {
            warn!(
                "Dropped {} events recorded before documented sepsis onset",
                dropped_negative
            );
        }
        if dropped_late > 0 {
            debug!(
                "Dropped {} events beyond the {}h window",
                dropped_late, self.window_hours
            );
        }

        Ok(kept)
    }
}
