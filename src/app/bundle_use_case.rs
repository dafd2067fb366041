use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, Instrument};

use crate::app::ports::{BundleOutputPort, RecordSourcePort};
use crate::observability::metrics;
use crate::pipeline::{aggregate_with, CategoryMerger, GroupingTable};

/// Summary of one bundle run
#[derive(Debug, Clone, Serialize)]
pub struct BundleReport {
    pub generated_at: DateTime<Utc>,
    pub source_kind: String,
    pub records_loaded: usize,
    pub merged_groups: Vec<String>,
    pub skipped_groups: Vec<String>,
    pub passthrough: usize,
    pub records_written: usize,
    /// Passthrough records handed to the per-record output, if one is set
    pub singles_written: usize,
}

/// Use case for turning loaded impact records into the display bundle
pub struct BundleUseCase {
    source: Box<dyn RecordSourcePort>,
    output: Box<dyn BundleOutputPort>,
    passthrough_output: Option<Box<dyn BundleOutputPort>>,
    groups: GroupingTable,
}

impl BundleUseCase {
    pub fn new(
        source: Box<dyn RecordSourcePort>,
        output: Box<dyn BundleOutputPort>,
        groups: GroupingTable,
    ) -> Self {
        Self {
            source,
            output,
            passthrough_output: None,
            groups,
        }
    }

    /// Also hand the ungrouped records to `output` once the bundle is written.
    pub fn with_passthrough_output(mut self, output: Box<dyn BundleOutputPort>) -> Self {
        self.passthrough_output = Some(output);
        self
    }

    /// Load, aggregate with the configured grouping table, write.
    pub async fn run(&self) -> Result<BundleReport> {
        let span = info_span!("bundle", source = self.source.kind());
        self.run_inner().instrument(span).await
    }

    async fn run_inner(&self) -> Result<BundleReport> {
        let kind = self.source.kind();
        let records = self
            .source
            .load_records()
            .await
            .with_context(|| format!("failed to load {} records", kind))?;
        metrics::loading::records_loaded(kind, records.len());
        info!(count = records.len(), "records loaded");

        let started = Instant::now();
        let aggregation = aggregate_with(&CategoryMerger, &records, &self.groups);
        metrics::aggregate::duration(started.elapsed().as_secs_f64());

        for label in &aggregation.merged_groups {
            metrics::aggregate::group_merged(label);
        }
        for label in &aggregation.skipped_groups {
            metrics::aggregate::group_skipped(label);
        }
        metrics::aggregate::passthrough(aggregation.passthrough);

        if let Err(e) = self.output.write_bundle(&aggregation.records).await {
            metrics::output::write_error();
            return Err(e.context("failed to write bundle"));
        }
        metrics::output::records_written(aggregation.records.len());

        let mut singles_written = 0;
        if let Some(singles) = &self.passthrough_output {
            // Merged records lead the output; the rest is passthrough
            let passthrough = &aggregation.records[aggregation.merged_groups.len()..];
            if let Err(e) = singles.write_bundle(passthrough).await {
                metrics::output::write_error();
                return Err(e.context("failed to write passthrough records"));
            }
            singles_written = passthrough.len();
            info!(count = singles_written, "passthrough records written");
        }

        info!(
            merged = ?aggregation.merged_groups,
            skipped = ?aggregation.skipped_groups,
            passthrough = aggregation.passthrough,
            written = aggregation.records.len(),
            "bundle written"
        );

        Ok(BundleReport {
            generated_at: Utc::now(),
            source_kind: kind.to_string(),
            records_loaded: records.len(),
            merged_groups: aggregation.merged_groups,
            skipped_groups: aggregation.skipped_groups,
            passthrough: aggregation.passthrough,
            records_written: aggregation.records.len(),
            singles_written,
        })
    }
}
