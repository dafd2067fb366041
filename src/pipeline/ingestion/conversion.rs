use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::{BundleError, Result};
use crate::pipeline::processing::weighting::ConversionFactors;

static FIELD: OnceLock<Regex> = OnceLock::new();

/// Splits a CSV line on commas; a double-quoted field is kept whole and may
/// contain commas. Empty fields are dropped.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let field = FIELD.get_or_init(|| Regex::new(r#""([^"]*)"|([^,]+)"#).unwrap());
    field
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Parses the single-score conversion sheet: one row per impact category with
/// its weighting factor in the `Fₖ` column.
pub fn parse_conversion_csv(text: &str) -> Result<ConversionFactors> {
    let mut lines = text.trim().trim_start_matches('\u{feff}').lines();
    let header = split_csv_line(lines.next().unwrap_or_default());

    let idx_impact = header
        .iter()
        .position(|h| h.to_lowercase().contains("impact category"))
        .ok_or_else(|| BundleError::MissingColumn("impact category".to_string()))?;
    let idx_factor = header
        .iter()
        .position(|h| h.contains("Fₖ"))
        .ok_or_else(|| BundleError::MissingColumn("Fₖ".to_string()))?;

    let mut factors = ConversionFactors::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }
        let cols = split_csv_line(line);
        let category = cols.get(idx_impact).map(|c| c.trim()).unwrap_or_default();
        let raw_factor = cols
            .get(idx_factor)
            .map(|c| c.replace(',', ""))
            .unwrap_or_default();

        match raw_factor.trim().parse::<f64>() {
            Ok(factor) if !category.is_empty() && factor.is_finite() => {
                factors.insert(category, factor);
            }
            _ => debug!(line, "skipping conversion row"),
        }
    }

    if factors.is_empty() {
        warn!("conversion sheet has no usable rows");
    }
    Ok(factors)
}

pub fn load_conversion_factors(path: &Path) -> Result<ConversionFactors> {
    let text = fs::read_to_string(path)?;
    parse_conversion_csv(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_keeps_quoted_commas() {
        assert_eq!(
            split_csv_line(r#"Climate change,"1,234.5",Pt"#),
            vec!["Climate change", "1,234.5", "Pt"]
        );
        assert_eq!(split_csv_line("a,,b"), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_conversion_sheet() {
        let csv = "\u{feff}Impact category,Normalisation,Weighting,Fₖ (Pt per unit)\n\
                   Climate change,0.0001,21.06,\"1,316.3\"\n\
                   Particulate matter & ozone,1.0,8.96,2.5\n\
                   Broken row,1,2,n/a\n\
                   \n";

        let factors = parse_conversion_csv(csv).unwrap();
        assert_eq!(factors.len(), 2);
        assert_eq!(factors.factor_for("Climate change"), 1316.3);
        assert_eq!(factors.factor_for("Particulate matter and ozone"), 2.5);
        assert_eq!(factors.factor_for("Particulate matter & ozone"), 2.5);
        assert_eq!(factors.factor_for("Broken row"), 0.0);
    }

    #[test]
    fn test_missing_factor_column_is_an_error() {
        let err = parse_conversion_csv("Impact category,Weight\nA,1\n").unwrap_err();
        assert!(matches!(err, BundleError::MissingColumn(_)));
    }
}
