pub mod csv_import;
pub mod filter;
pub mod normalize;

pub use csv_import::{CsvImporter, RawTable};
pub use filter::TemporalFilter;
pub use normalize::normalize;
