/// Default locations, relative to the project root the CLI is run from.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "LCA_BUNDLER_CONFIG";

pub const DEFAULT_SINGLESCORE_DIR: &str = "singlescore";
pub const DEFAULT_OUTPUT_PATH: &str = "pivot_app/data/singlescore.json";
pub const DEFAULT_CHARACTERISATION_PATH: &str = "pivot_app/data/characterisation.json";
pub const DEFAULT_CONVERSION_PATH: &str = "singlescore/singlescore - singlescore_conversion.csv";

pub const LOG_DIR: &str = "logs";
pub const LOG_FILE_NAME: &str = "lca_bundler.log";

/// File names picked up by the single-score directory loader
pub const SINGLESCORE_FILE_PATTERN: &str = r"^singlescore_.*\.json$";

// Weighted single-score records
pub const SINGLESCORE_UNIT: &str = "Pt";
pub const TOTAL_CATEGORY: &str = "Total";
pub const CHARA_SUFFIX: &str = "_chara";

// Built-in grouping table labels
pub const INSECTICIDE_GROUP: &str = "Insecticide";
pub const FUNGICIDE_GROUP: &str = "Fungicide";
pub const HERBICIDE_GROUP: &str = "Herbicide";

/// Built-in grouping table, in declaration order.
pub fn default_group_table() -> Vec<(&'static str, [&'static str; 2])> {
    vec![
        (INSECTICIDE_GROUP, ["singlescore_4_1", "singlescore_5_1"]),
        (FUNGICIDE_GROUP, ["singlescore_6_1", "singlescore_7_1"]),
        (HERBICIDE_GROUP, ["singlescore_2_1", "singlescore_3_1"]),
    ]
}

/// Schema the bundle output is validated against
pub const BUNDLE_SCHEMA: &str = include_str!("../schemas/singlescore_bundle.v1.json");
