pub mod bundle_use_case;
pub mod ports;

pub use bundle_use_case::{BundleReport, BundleUseCase};
