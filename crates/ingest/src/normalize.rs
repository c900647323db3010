use careflow_core::{CareflowError, ClinicalEvent, ColumnMapping};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

use crate::csv_import::RawTable;

/// Timestamp formats accepted after RFC 3339, tried in order.
const NAIVE_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y/%m/%d %H:%M:%S"];

/// Parse a timestamp string into UTC.
///
/// RFC 3339 first, then the naive formats above (interpreted as UTC),
/// then a bare date at midnight. Anything else is unparseable.
fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = value.parse::<DateTime<Utc>>() {
        return Some(ts);
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// Activity values pandas-style sources use for "no label".
fn is_null_activity(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v == "None" || v == "null" || v == "NaN"
}

fn resolve_column(table: &RawTable, name: &str) -> Result<usize, CareflowError> {
    table
        .column_index(name)
        .ok_or_else(|| CareflowError::MissingColumn {
            column: name.to_string(),
        })
}

/// Normalize a raw CSV table into clinical events.
///
/// Selects the mapped columns, drops rows with a null activity label,
/// and parses timestamps. When an onset column is mapped, each event
/// also carries `hours_since_onset`. Unparseable timestamps are fatal;
/// row order is preserved.
pub fn normalize(
    table: &RawTable,
    mapping: &ColumnMapping,
) -> Result<Vec<ClinicalEvent>, CareflowError> {
    let case_idx = resolve_column(table, &mapping.case_id)?;
    let activity_idx = resolve_column(table, &mapping.activity)?;
    let ts_idx = resolve_column(table, &mapping.timestamp)?;
    let onset_idx = match &mapping.onset {
        Some(name) => Some(resolve_column(table, name)?),
        None => None,
    };

    let mut events = Vec::with_capacity(table.rows.len());
    let mut dropped_null_activity = 0usize;

    for (row_num, row) in table.rows.iter().enumerate() {
        let activity = row.get(activity_idx).map(String::as_str).unwrap_or("");
        if is_null_activity(activity) {
            dropped_null_activity += 1;
            continue;
        }

        let ts_value = row.get(ts_idx).map(String::as_str).unwrap_or("");
        let timestamp =
            parse_timestamp(ts_value).ok_or_else(|| CareflowError::Timestamp {
                column: mapping.timestamp.clone(),
                row: row_num,
                value: ts_value.to_string(),
            })?;

        let hours_since_onset = match onset_idx {
            Some(idx) => {
                let onset_value = row.get(idx).map(String::as_str).unwrap_or("");
                let onset = parse_timestamp(onset_value).ok_or_else(|| {
                    CareflowError::Timestamp {
                        column: mapping.onset.clone().unwrap_or_default(),
                        row: row_num,
                        value: onset_value.to_string(),
                    }
                })?;
                let elapsed = timestamp.signed_duration_since(onset);
                Some(elapsed.num_milliseconds() as f64 / 3_600_000.0)
            }
            None => None,
        };

        events.push(ClinicalEvent {
            case_id: row.get(case_idx).cloned().unwrap_or_default(),
            activity: activity.trim().to_string(),
            timestamp,
            hours_since_onset,
        });
    }

    if dropped_null_activity > 0 {
        debug!(
            "Dropped {} rows with null activity labels",
            dropped_null_activity
        );
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    fn windowed_table(rows: &[&[&str]]) -> RawTable {
        table(
            &["hadm_id", "event_type", "event_time", "sepsis_onset_time"],
            rows,
        )
    }

    #[test]
    fn normalizes_mapped_columns() {
        let t = windowed_table(&[&[
            "100",
            "lab_draw",
            "2024-01-01 10:00:00",
            "2024-01-01 08:00:00",
        ]]);
        let events = normalize(&t, &ColumnMapping::windowed()).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].case_id, "100");
        assert_eq!(events[0].activity, "lab_draw");
        assert_eq!(events[0].hours_since_onset, Some(2.0));
    }

    #[test]
    fn drops_null_activity_rows() {
        let t = windowed_table(&[
            &["100", "", "2024-01-01 10:00:00", "2024-01-01 08:00:00"],
            &["100", "NaN", "2024-01-01 10:05:00", "2024-01-01 08:00:00"],
            &["100", "lab_draw", "2024-01-01 10:10:00", "2024-01-01 08:00:00"],
        ]);
        let events = normalize(&t, &ColumnMapping::windowed()).unwrap();

        assert_eq!(events.len(), 1);
        assert!(events.iter().all(|e| !e.activity.is_empty()));
    }

    #[test]
    fn missing_column_is_schema_error() {
        let t = table(&["subject_id", "event_time"], &[]);
        let err = normalize(&t, &ColumnMapping::by_subject()).unwrap_err();

        match err {
            CareflowError::MissingColumn { column } => assert_eq!(column, "event_type"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn unparseable_timestamp_fails_fast() {
        let t = windowed_table(&[&[
            "100",
            "lab_draw",
            "not-a-time",
            "2024-01-01 08:00:00",
        ]]);
        let err = normalize(&t, &ColumnMapping::windowed()).unwrap_err();

        match err {
            CareflowError::Timestamp { column, row, value } => {
                assert_eq!(column, "event_time");
                assert_eq!(row, 0);
                assert_eq!(value, "not-a-time");
            }
            other => panic!("expected Timestamp, got {other:?}"),
        }
    }

    #[test]
    fn no_onset_column_leaves_hours_unset() {
        let t = table(
            &["subject_id", "event_type", "event_time"],
            &[&["7", "triage", "2024-01-01T10:00:00Z"]],
        );
        let events = normalize(&t, &ColumnMapping::by_subject()).unwrap();

        assert_eq!(events[0].hours_since_onset, None);
    }

    #[test]
    fn accepts_multiple_timestamp_formats() {
        for value in [
            "2024-01-01T10:00:00Z",
            "2024-01-01 10:00:00",
            "2024-01-01 10:00:00.250",
            "2024/01/01 10:00:00",
            "2024-01-01",
        ] {
            assert!(parse_timestamp(value).is_some(), "failed on {value}");
        }
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn deterministic_and_order_preserving() {
        let t = windowed_table(&[
            &["100", "b", "2024-01-01 10:00:00", "2024-01-01 08:00:00"],
            &["100", "a", "2024-01-01 09:00:00", "2024-01-01 08:00:00"],
        ]);
        let first = normalize(&t, &ColumnMapping::windowed()).unwrap();
        let second = normalize(&t, &ColumnMapping::windowed()).unwrap();

        assert_eq!(first, second);
        assert_eq!(first[0].activity, "b");
        assert_eq!(first[1].activity, "a");
    }
}
