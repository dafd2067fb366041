// Bundle pipeline: loading source records and aggregating them

pub mod ingestion;
pub mod processing;

pub use processing::aggregate::{aggregate, aggregate_with, Aggregation};
pub use processing::grouping::{resolve, GroupDefinition, GroupingTable};
pub use processing::merge::{merge, CategoryMerger, RecordMerger};
