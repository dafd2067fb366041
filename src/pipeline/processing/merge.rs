use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use super::numeric::{or_zero, share_of};
use crate::domain::{Contributor, ImpactCategory, ImpactRecord};

/// Folds a group of records into one composite record.
pub trait RecordMerger {
    /// Returns `None` when `records` is empty: the group produces no output.
    fn merge(&self, records: &[&ImpactRecord], label: &str) -> Option<ImpactRecord>;
}

/// Sums category totals and contributor scores by name and recomputes each
/// contributor's share of the merged total.
#[derive(Debug, Default, Clone, Copy)]
pub struct CategoryMerger;

/// Running sums for one category name, owned by a single merge call.
#[derive(Debug)]
struct CategoryAccumulator {
    unit: String,
    total: f64,
    contributors: Vec<(String, f64)>,
    positions: HashMap<String, usize>,
}

impl CategoryAccumulator {
    fn new(unit: &str) -> Self {
        Self {
            unit: unit.to_string(),
            total: 0.0,
            contributors: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn add(&mut self, category: &ImpactCategory) {
        self.total += or_zero(category.total);
        for contributor in &category.contributors {
            let slot = match self.positions.get(&contributor.name) {
                Some(&slot) => slot,
                None => {
                    self.contributors.push((contributor.name.clone(), 0.0));
                    let slot = self.contributors.len() - 1;
                    self.positions.insert(contributor.name.clone(), slot);
                    slot
                }
            };
            self.contributors[slot].1 += or_zero(contributor.score);
        }
    }

    fn finish(self, name: String) -> ImpactCategory {
        let total = self.total;
        let contributors = self
            .contributors
            .into_iter()
            .map(|(name, score)| Contributor {
                name,
                score: Some(score),
                share: share_of(score, total),
            })
            .collect();

        ImpactCategory {
            impact_category: name,
            unit: self.unit,
            total: Some(total),
            contributors,
        }
    }
}

impl RecordMerger for CategoryMerger {
    fn merge(&self, records: &[&ImpactRecord], label: &str) -> Option<ImpactRecord> {
        let first = records.first()?;

        // BTreeMap keeps names in ordinal order, which is the output order
        let mut accumulators: BTreeMap<String, CategoryAccumulator> = BTreeMap::new();
        for record in records {
            for category in &record.categories {
                accumulators
                    .entry(category.impact_category.clone())
                    .or_insert_with(|| CategoryAccumulator::new(&category.unit))
                    .add(category);
            }
        }

        let categories: Vec<ImpactCategory> = accumulators
            .into_iter()
            .map(|(name, acc)| acc.finish(name))
            .collect();

        let mut sources: Vec<&str> = records
            .iter()
            .map(|r| r.source.as_deref().unwrap_or(""))
            .collect();
        sources.sort_unstable();

        // Named inputs get a named composite, so displays show the label
        let product_name = records
            .iter()
            .any(|r| r.product_name.is_some())
            .then(|| label.to_string());

        debug!(
            label,
            inputs = records.len(),
            categories = categories.len(),
            "merged group"
        );

        Some(ImpactRecord {
            product_id: label.to_string(),
            product_name,
            functional_unit: Some(
                first
                    .functional_unit
                    .clone()
                    .unwrap_or_else(|| label.to_string()),
            ),
            categories,
            source: Some(sources.join(",")),
        })
    }
}

/// Convenience wrapper around [`CategoryMerger`].
pub fn merge(records: &[&ImpactRecord], label: &str) -> Option<ImpactRecord> {
    CategoryMerger.merge(records, label)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    fn category(name: &str, unit: &str, total: Option<f64>, contributors: &[(&str, Option<f64>)]) -> ImpactCategory {
        let mut c = ImpactCategory::new(name, unit, total);
        c.contributors = contributors
            .iter()
            .map(|(n, s)| Contributor::new(*n, *s))
            .collect();
        c
    }

    fn record(id: &str, source: &str, categories: Vec<ImpactCategory>) -> ImpactRecord {
        let mut r = ImpactRecord::new(id);
        r.functional_unit = Some(format!("1 ha of {}", id));
        r.source = Some(source.to_string());
        r.categories = categories;
        r
    }

    #[test]
    fn test_merge_sums_totals_and_recomputes_shares() {
        let a = record("A", "a.json", vec![category("GWP", "kg CO2 eq", Some(10.0), &[("x", Some(6.0)), ("y", Some(4.0))])]);
        let b = record("B", "b.json", vec![category("GWP", "kg CO2 eq", Some(5.0), &[("x", Some(1.0)), ("z", Some(4.0))])]);

        let merged = merge(&[&a, &b], "L").unwrap();
        assert_eq!(merged.product_id, "L");
        assert_eq!(merged.categories.len(), 1);

        let gwp = merged.category("GWP").unwrap();
        assert_eq!(gwp.total, Some(15.0));
        let names: Vec<&str> = gwp.contributors.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y", "z"]);

        let x = gwp.contributor("x").unwrap();
        assert_eq!(x.score, Some(7.0));
        assert!((x.share.unwrap() - 7.0 / 15.0).abs() < EPS);
        let y = gwp.contributor("y").unwrap();
        assert_eq!(y.score, Some(4.0));
        assert!((y.share.unwrap() - 4.0 / 15.0).abs() < EPS);
        let z = gwp.contributor("z").unwrap();
        assert!((z.share.unwrap() - 4.0 / 15.0).abs() < EPS);
    }

    #[test]
    fn test_named_inputs_give_labelled_product_name() {
        let mut a = record("A", "a.json", vec![category("Total", "Pt", Some(1.0), &[])]);
        a.product_name = Some("Insecticide A, at farm".to_string());
        let b = record("B", "b.json", vec![category("Total", "Pt", Some(2.0), &[])]);

        let merged = merge(&[&a, &b], "Insecticide").unwrap();
        assert_eq!(merged.product_name.as_deref(), Some("Insecticide"));
        assert_eq!(merged.functional_unit.as_deref(), Some("1 ha of A"));

        let unnamed = merge(&[&b], "Insecticide").unwrap();
        assert_eq!(unnamed.product_name, None);
    }

    #[test]
    fn test_merge_of_empty_group_yields_nothing() {
        assert!(merge(&[], "Fungicide").is_none());
    }

    #[test]
    fn test_zero_total_gives_null_shares() {
        let a = record("A", "a.json", vec![category("Water", "m3", None, &[("pump", Some(2.0))])]);
        let b = record("B", "b.json", vec![category("Water", "m3", Some(0.0), &[("pump", None)])]);

        let merged = merge(&[&a, &b], "L").unwrap();
        let water = merged.category("Water").unwrap();
        assert_eq!(water.total, Some(0.0));
        assert_eq!(water.contributors[0].score, Some(2.0));
        assert_eq!(water.contributors[0].share, None);
    }

    #[test]
    fn test_categories_are_sorted_and_unit_is_first_seen() {
        let a = record(
            "A",
            "a.json",
            vec![
                category("land use", "m2a", Some(1.0), &[]),
                category("Acidification", "mol H+ eq", Some(1.0), &[]),
            ],
        );
        let b = record(
            "B",
            "b.json",
            vec![
                category("Acidification", "kg SO2 eq", Some(2.0), &[]),
                category("Climate change", "kg CO2 eq", Some(3.0), &[]),
            ],
        );

        let merged = merge(&[&a, &b], "L").unwrap();
        let names: Vec<&str> = merged
            .categories
            .iter()
            .map(|c| c.impact_category.as_str())
            .collect();
        // ordinal: uppercase before lowercase
        assert_eq!(names, vec!["Acidification", "Climate change", "land use"]);
        let acid = merged.category("Acidification").unwrap();
        assert_eq!(acid.unit, "mol H+ eq");
        assert_eq!(acid.total, Some(3.0));
    }

    #[test]
    fn test_duplicate_category_names_in_one_record_are_folded() {
        let a = record(
            "A",
            "a.json",
            vec![
                category("GWP", "kg", Some(1.0), &[("x", Some(1.0))]),
                category("GWP", "kg", Some(2.0), &[("x", Some(2.0))]),
            ],
        );

        let merged = merge(&[&a], "L").unwrap();
        assert_eq!(merged.categories.len(), 1);
        assert_eq!(merged.categories[0].total, Some(3.0));
        assert_eq!(merged.categories[0].contributors.len(), 1);
        assert_eq!(merged.categories[0].contributors[0].score, Some(3.0));
    }

    #[test]
    fn test_singleton_merge_preserves_categories() {
        let a = record(
            "A",
            "a.json",
            vec![
                category("Ozone", "kg CFC11 eq", Some(4.0), &[("x", Some(1.0)), ("y", Some(3.0))]),
                category("Eutrophication", "kg P eq", Some(2.0), &[("x", Some(2.0))]),
            ],
        );

        let merged = merge(&[&a], "L").unwrap();
        assert_eq!(merged.categories.len(), 2);
        for original in &a.categories {
            let out = merged.category(&original.impact_category).unwrap();
            assert_eq!(out.unit, original.unit);
            assert_eq!(out.total, original.total);
            for c in &original.contributors {
                assert_eq!(out.contributor(&c.name).unwrap().score, c.score);
            }
        }
    }

    #[test]
    fn test_functional_unit_and_source_provenance() {
        let mut a = record("A", "singlescore_5_1.json", vec![]);
        a.functional_unit = None;
        let b = record("B", "singlescore_4_1.json", vec![]);
        let mut c = record("C", "", vec![]);
        c.source = None;

        let merged = merge(&[&a, &b, &c], "Insecticide").unwrap();
        assert_eq!(merged.functional_unit.as_deref(), Some("Insecticide"));
        assert_eq!(
            merged.source.as_deref(),
            Some(",singlescore_4_1.json,singlescore_5_1.json")
        );
        assert!(merged.categories.is_empty());

        let merged = merge(&[&b, &a], "Insecticide").unwrap();
        assert_eq!(merged.functional_unit.as_deref(), Some("1 ha of B"));
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let a = record("A", "a.json", vec![category("GWP", "kg", None, &[("x", None)])]);
        let before = a.clone();
        let _ = merge(&[&a, &a], "L");
        assert_eq!(a, before);
    }
}
