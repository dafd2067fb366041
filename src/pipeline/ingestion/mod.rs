// Pipeline ingestion: reading single-score files, characterisation bundles and
// conversion factors into typed records

pub mod conversion;
pub mod loader;

pub use conversion::{load_conversion_factors, parse_conversion_csv};
pub use loader::{load_record_bundle, load_record_file, load_singlescore_dir};
