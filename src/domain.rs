use serde::{Deserialize, Serialize};

/// One assessment result for a product or product group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRecord {
    pub product_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default)]
    pub functional_unit: Option<String>,
    #[serde(default)]
    pub categories: Vec<ImpactCategory>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactCategory {
    pub impact_category: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub contributors: Vec<Contributor>,
}

/// A named sub-source of a category total. `share` is derived on merge and
/// stays null when the category total is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    pub name: String,
    #[serde(default)]
    pub score: Option<f64>,
    #[serde(default)]
    pub share: Option<f64>,
}

impl ImpactRecord {
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: None,
            functional_unit: None,
            categories: Vec::new(),
            source: None,
        }
    }

    pub fn category(&self, name: &str) -> Option<&ImpactCategory> {
        self.categories.iter().find(|c| c.impact_category == name)
    }
}

impl ImpactCategory {
    pub fn new(impact_category: impl Into<String>, unit: impl Into<String>, total: Option<f64>) -> Self {
        Self {
            impact_category: impact_category.into(),
            unit: unit.into(),
            total,
            contributors: Vec::new(),
        }
    }

    pub fn contributor(&self, name: &str) -> Option<&Contributor> {
        self.contributors.iter().find(|c| c.name == name)
    }
}

impl Contributor {
    pub fn new(name: impl Into<String>, score: Option<f64>) -> Self {
        Self {
            name: name.into(),
            score,
            share: None,
        }
    }
}
