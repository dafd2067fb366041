use tracing::{debug, warn};

use super::grouping::{resolve, GroupingTable};
use super::merge::{CategoryMerger, RecordMerger};
use crate::domain::ImpactRecord;

/// Output of one aggregation pass plus what happened to each group.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    /// Merged group records in declaration order, then passthrough records
    pub records: Vec<ImpactRecord>,
    pub merged_groups: Vec<String>,
    pub skipped_groups: Vec<String>,
    pub passthrough: usize,
}

/// Merges every configured group present in `records` and appends the
/// unclaimed records unchanged.
pub fn aggregate(records: &[ImpactRecord], groups: &GroupingTable) -> Vec<ImpactRecord> {
    aggregate_with(&CategoryMerger, records, groups).records
}

pub fn aggregate_with(
    merger: &dyn RecordMerger,
    records: &[ImpactRecord],
    groups: &GroupingTable,
) -> Aggregation {
    for (id, labels) in groups.overlapping_ids() {
        warn!(product_id = %id, ?labels, "product id listed in several groups; first group claims it");
    }

    let resolution = resolve(records, groups);

    let mut output = Vec::with_capacity(resolution.buckets.len() + resolution.passthrough.len());
    let mut merged_groups = Vec::with_capacity(resolution.buckets.len());
    for bucket in &resolution.buckets {
        if let Some(merged) = merger.merge(&bucket.records, bucket.label) {
            merged_groups.push(bucket.label.to_string());
            output.push(merged);
        }
    }

    let skipped_groups = groups
        .iter()
        .map(|g| g.label.as_str())
        .filter(|label| !merged_groups.iter().any(|m| m == label))
        .map(str::to_string)
        .collect();

    let passthrough = resolution.passthrough.len();
    output.extend(resolution.passthrough.into_iter().cloned());

    debug!(
        input = records.len(),
        output = output.len(),
        merged = merged_groups.len(),
        passthrough,
        "aggregation finished"
    );

    Aggregation {
        records: output,
        merged_groups,
        skipped_groups,
        passthrough,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Contributor, ImpactCategory};
    use crate::pipeline::processing::grouping::GroupDefinition;

    fn scored(id: &str, total: f64) -> ImpactRecord {
        let mut r = ImpactRecord::new(id);
        r.source = Some(format!("{}.json", id));
        let mut c = ImpactCategory::new("Total", "Pt", Some(total));
        c.contributors.push(Contributor::new("field", Some(total)));
        r.categories.push(c);
        r
    }

    fn ids(records: &[ImpactRecord]) -> Vec<&str> {
        records.iter().map(|r| r.product_id.as_str()).collect()
    }

    #[test]
    fn test_merged_groups_come_first_then_passthrough() {
        let input: Vec<ImpactRecord> = ["s1", "s2", "s3", "s4", "s8"]
            .iter()
            .enumerate()
            .map(|(i, id)| scored(id, i as f64 + 1.0))
            .collect();
        let table = GroupingTable::new(vec![
            GroupDefinition::new("Insecticide", ["s4", "s5"]),
            GroupDefinition::new("Fungicide", ["s6", "s7"]),
            GroupDefinition::new("Herbicide", ["s2", "s3"]),
        ]);

        let result = aggregate_with(&CategoryMerger, &input, &table);
        assert_eq!(ids(&result.records), vec!["Insecticide", "Herbicide", "s1", "s8"]);
        assert_eq!(result.merged_groups, vec!["Insecticide", "Herbicide"]);
        assert_eq!(result.skipped_groups, vec!["Fungicide"]);
        assert_eq!(result.passthrough, 2);

        let herbicide = &result.records[1];
        assert_eq!(herbicide.category("Total").unwrap().total, Some(5.0));
        assert_eq!(herbicide.source.as_deref(), Some("s2.json,s3.json"));

        // passthrough records are emitted untouched
        assert_eq!(result.records[2], input[0]);
        assert_eq!(result.records[3], input[4]);
    }

    #[test]
    fn test_no_matching_group_returns_input_unchanged() {
        let input = vec![scored("a", 1.0), scored("b", 2.0)];
        let output = aggregate(&input, &GroupingTable::default());
        assert_eq!(output, input);
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        assert!(aggregate(&[], &GroupingTable::default()).is_empty());
    }

    #[test]
    fn test_empty_table_passes_everything_through() {
        let input = vec![scored("a", 1.0)];
        let output = aggregate(&input, &GroupingTable::empty());
        assert_eq!(output, input);
    }

    #[test]
    fn test_output_length_counts_groups_and_unclaimed() {
        let input: Vec<ImpactRecord> = (1..=8)
            .map(|n| scored(&format!("singlescore_{}_1", n), n as f64))
            .collect();
        let output = aggregate(&input, &GroupingTable::default());
        // three groups of two collapse into three records
        assert_eq!(output.len(), 3 + 2);
        assert_eq!(
            ids(&output),
            vec!["Insecticide", "Fungicide", "Herbicide", "singlescore_1_1", "singlescore_8_1"]
        );
    }
}
