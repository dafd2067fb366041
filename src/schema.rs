//! JSON schema check for written bundles.

use jsonschema::JSONSchema;
use serde_json::Value;

use crate::constants::BUNDLE_SCHEMA;
use crate::error::{BundleError, Result};

/// Validates `instance` against `schema`, returning every violation as
/// `"<message> at <instance path>"`.
pub fn schema_violations(schema: &Value, instance: &Value) -> Result<Vec<String>> {
    let compiled = JSONSchema::compile(schema)
        .map_err(|e| BundleError::Schema(format!("Failed to compile JSON Schema: {}", e)))?;

    let violations = match compiled.validate(instance) {
        Ok(()) => Vec::new(),
        Err(errors) => errors
            .map(|error| format!("{} at {}", error, error.instance_path))
            .collect(),
    };
    Ok(violations)
}

pub fn bundle_schema() -> Result<Value> {
    Ok(serde_json::from_str(BUNDLE_SCHEMA)?)
}

/// Checks a bundle document against the built-in bundle schema.
pub fn validate_bundle(instance: &Value) -> Result<()> {
    let violations = schema_violations(&bundle_schema()?, instance)?;
    if violations.is_empty() {
        Ok(())
    } else {
        Err(BundleError::Schema(violations.join("; ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_contributor_without_share_is_rejected() {
        let bundle = json!([{
            "product_id": "p",
            "functional_unit": "1 kg",
            "categories": [{
                "impact_category": "GWP", "unit": "Pt", "total": 1.0,
                "contributors": [{"name": "x", "score": 1.0}]
            }],
            "source": "p.json"
        }]);
        let err = validate_bundle(&bundle).unwrap_err();
        assert!(err.to_string().contains("share"));
    }

    #[test]
    fn test_empty_bundle_is_valid() {
        assert!(validate_bundle(&json!([])).is_ok());
    }
}
