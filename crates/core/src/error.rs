use thiserror::Error;

#[derive(Error, Debug)]
pub enum CareflowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(String),

    #[error("Missing expected column: {column}")]
    MissingColumn { column: String },

    #[error("Unparseable timestamp in column '{column}' at row {row}: {value:?}")]
    Timestamp {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Event log is empty: no cases in range")]
    EmptyLog,

    #[error("Mining engine error: {0}")]
    Engine(String),

    #[error("{0}")]
    Other(String),
}
