//! Rebuilds single-score records from characterisation results by applying
//! normalisation-weighting factors per impact category.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::numeric::{or_zero, sum_or_zero};
use crate::constants::{CHARA_SUFFIX, SINGLESCORE_UNIT, TOTAL_CATEGORY};
use crate::domain::{ImpactCategory, ImpactRecord};

/// Weighting factor (Fk) per impact category name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionFactors(HashMap<String, f64>);

impl ConversionFactors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: &str, factor: f64) {
        self.0.insert(normalize_category(category), factor);
    }

    /// Keys are stored normalised, so either spelling of a category finds
    /// the same factor. Unknown categories weigh zero.
    pub fn factor_for(&self, category: &str) -> f64 {
        self.0
            .get(&normalize_category(category))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

static AMPERSAND: OnceLock<Regex> = OnceLock::new();

/// "Particulate matter & ozone" and "Particulate matter and ozone" name the
/// same category.
pub fn normalize_category(name: &str) -> String {
    let ampersand = AMPERSAND.get_or_init(|| Regex::new(r"\s*&\s*").unwrap());
    ampersand.replace_all(name, " and ").into_owned()
}

/// Characterisation id `2_chara` becomes single-score id `singlescore_2_1`.
pub fn singlescore_id(characterisation_id: &str) -> String {
    format!("singlescore_{}_1", characterisation_id.replace(CHARA_SUFFIX, ""))
}

/// Weights one characterisation record into a single-score record with a
/// leading "Total" category.
pub fn weigh_record(record: &ImpactRecord, factors: &ConversionFactors) -> ImpactRecord {
    let base = record.product_id.replace(CHARA_SUFFIX, "");
    let product_name = record
        .product_name
        .clone()
        .unwrap_or_else(|| record.product_id.clone());

    let mut categories: Vec<ImpactCategory> = record
        .categories
        .iter()
        .map(|category| {
            let value = or_zero(category.total) * factors.factor_for(&category.impact_category);
            ImpactCategory::new(category.impact_category.clone(), SINGLESCORE_UNIT, Some(value))
        })
        .collect();
    let sum = sum_or_zero(categories.iter().map(|c| c.total));
    categories.insert(0, ImpactCategory::new(TOTAL_CATEGORY, SINGLESCORE_UNIT, Some(sum)));

    debug!(product_id = %record.product_id, total = sum, "weighted characterisation record");

    ImpactRecord {
        product_id: singlescore_id(&record.product_id),
        product_name: Some(product_name.clone()),
        functional_unit: Some(product_name),
        categories,
        source: Some(format!("singlescore_{}.json", base)),
    }
}

pub fn weigh_records(records: &[ImpactRecord], factors: &ConversionFactors) -> Vec<ImpactRecord> {
    records.iter().map(|r| weigh_record(r, factors)).collect()
}
