pub mod constants;
pub mod domain;
pub mod error;
pub mod logging;
pub mod pipeline;

pub mod config;
pub mod schema;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;

pub mod observability;

pub use domain::{Contributor, ImpactCategory, ImpactRecord};
pub use pipeline::{aggregate, merge, resolve, GroupDefinition, GroupingTable};
