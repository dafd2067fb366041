//! Metric names and recording helpers for bundle runs.
//!
//! Recording goes through the `metrics` facade; nothing is exported unless
//! the embedding process installs a recorder.

/// All metric names used by the bundler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Loading
    RecordsLoaded,

    // Aggregation
    GroupsMerged,
    GroupsSkipped,
    PassthroughRecords,
    AggregateDuration,

    // Output
    BundleRecordsWritten,
    BundleWritesError,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::RecordsLoaded => "lca_records_loaded_total",
            MetricName::GroupsMerged => "lca_groups_merged_total",
            MetricName::GroupsSkipped => "lca_groups_skipped_total",
            MetricName::PassthroughRecords => "lca_passthrough_records_total",
            MetricName::AggregateDuration => "lca_aggregate_duration_seconds",
            MetricName::BundleRecordsWritten => "lca_bundle_records_written_total",
            MetricName::BundleWritesError => "lca_bundle_writes_error_total",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            RecordsLoaded,
            GroupsMerged,
            GroupsSkipped,
            PassthroughRecords,
            AggregateDuration,
            BundleRecordsWritten,
            BundleWritesError,
        ]
        .into_iter()
    }
}

// ============================================================================
// Loading
// ============================================================================

pub mod loading {
    use super::MetricName;

    pub fn records_loaded(source_kind: &str, count: usize) {
        ::metrics::counter!(MetricName::RecordsLoaded.as_str(), "source" => source_kind.to_string())
            .increment(count as u64);
    }
}

// ============================================================================
// Aggregation
// ============================================================================

pub mod aggregate {
    use super::MetricName;

    pub fn group_merged(label: &str) {
        ::metrics::counter!(MetricName::GroupsMerged.as_str(), "group" => label.to_string()).increment(1);
    }

    pub fn group_skipped(label: &str) {
        ::metrics::counter!(MetricName::GroupsSkipped.as_str(), "group" => label.to_string()).increment(1);
    }

    pub fn passthrough(count: usize) {
        ::metrics::counter!(MetricName::PassthroughRecords.as_str()).increment(count as u64);
    }

    pub fn duration(secs: f64) {
        ::metrics::histogram!(MetricName::AggregateDuration.as_str()).record(secs);
    }
}

// ============================================================================
// Output
// ============================================================================

pub mod output {
    use super::MetricName;

    pub fn records_written(count: usize) {
        ::metrics::counter!(MetricName::BundleRecordsWritten.as_str()).increment(count as u64);
    }

    pub fn write_error() {
        ::metrics::counter!(MetricName::BundleWritesError.as_str()).increment(1);
    }
}
