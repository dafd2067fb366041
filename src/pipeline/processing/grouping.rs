use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants;
use crate::domain::ImpactRecord;

/// A named composite category and the product ids folded into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDefinition {
    pub label: String,
    pub product_ids: BTreeSet<String>,
}

impl GroupDefinition {
    pub fn new<I, S>(label: impl Into<String>, product_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            label: label.into(),
            product_ids: product_ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, product_id: &str) -> bool {
        self.product_ids.contains(product_id)
    }
}

/// Ordered grouping table; declaration order is output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupingTable(Vec<GroupDefinition>);

impl Default for GroupingTable {
    fn default() -> Self {
        Self(
            constants::default_group_table()
                .into_iter()
                .map(|(label, ids)| GroupDefinition::new(label, ids))
                .collect(),
        )
    }
}

impl GroupingTable {
    pub fn new(groups: Vec<GroupDefinition>) -> Self {
        Self(groups)
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupDefinition> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Product ids listed under more than one label, with every label that
    /// lists them in declaration order.
    pub fn overlapping_ids(&self) -> Vec<(String, Vec<String>)> {
        let mut owners: HashMap<&str, Vec<String>> = HashMap::new();
        for group in &self.0 {
            for id in &group.product_ids {
                owners.entry(id.as_str()).or_default().push(group.label.clone());
            }
        }
        let mut overlaps: Vec<(String, Vec<String>)> = owners
            .into_iter()
            .filter(|(_, labels)| labels.len() > 1)
            .map(|(id, labels)| (id.to_string(), labels))
            .collect();
        overlaps.sort();
        overlaps
    }
}

/// Records claimed by one group, in input order.
#[derive(Debug)]
pub struct GroupBucket<'a> {
    pub label: &'a str,
    pub records: Vec<&'a ImpactRecord>,
}

#[derive(Debug)]
pub struct Resolution<'a> {
    /// Non-empty buckets in group declaration order
    pub buckets: Vec<GroupBucket<'a>>,
    /// Unclaimed records in input order
    pub passthrough: Vec<&'a ImpactRecord>,
}

/// Partitions `records` into group buckets and a passthrough set. A record
/// already claimed by an earlier group is never claimed again.
pub fn resolve<'a>(records: &'a [ImpactRecord], groups: &'a GroupingTable) -> Resolution<'a> {
    let mut claimed = vec![false; records.len()];
    let mut buckets = Vec::new();

    for group in groups.iter() {
        let mut members = Vec::new();
        for (idx, record) in records.iter().enumerate() {
            if !claimed[idx] && group.contains(&record.product_id) {
                claimed[idx] = true;
                members.push(record);
            }
        }

        if members.is_empty() {
            debug!(label = %group.label, "no configured ids present, skipping group");
            continue;
        }
        buckets.push(GroupBucket {
            label: &group.label,
            records: members,
        });
    }

    let passthrough = records
        .iter()
        .zip(claimed)
        .filter(|(_, taken)| !taken)
        .map(|(record, _)| record)
        .collect();

    Resolution {
        buckets,
        passthrough,
    }
}
