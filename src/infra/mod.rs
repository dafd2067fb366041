pub mod bundle_output_adapter;
pub mod record_source_adapter;

pub use bundle_output_adapter::{JsonFileBundleOutput, JsonRecordFilesOutput};
pub use record_source_adapter::{CharacterisationSource, SingleScoreDirSource};
