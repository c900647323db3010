use std::path::Path;

use careflow_core::CareflowError;
use tracing::info;

/// Raw CSV contents: header row plus untyped string fields.
///
/// Typing and column selection happen in the normalizer; the loader
/// only gets the file into memory and surfaces I/O and parse errors.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of a named column, if present in the header.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct CsvImporter;

impl CsvImporter {
    pub fn import(path: &Path) -> Result<RawTable, CareflowError> {
        let file = std::fs::File::open(path).map_err(CareflowError::Io)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| CareflowError::Csv(e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| CareflowError::Csv(e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        info!("Imported {} rows from {}", rows.len(), path.display());
        Ok(RawTable { headers, rows })
    }
}
