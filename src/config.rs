use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants;
use crate::error::{BundleError, Result};
use crate::pipeline::GroupingTable;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub groups: GroupingTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub singlescore_dir: PathBuf,
    pub output: PathBuf,
    pub characterisation: PathBuf,
    pub conversion: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            singlescore_dir: PathBuf::from(constants::DEFAULT_SINGLESCORE_DIR),
            output: PathBuf::from(constants::DEFAULT_OUTPUT_PATH),
            characterisation: PathBuf::from(constants::DEFAULT_CHARACTERISATION_PATH),
            conversion: PathBuf::from(constants::DEFAULT_CONVERSION_PATH),
        }
    }
}

impl Config {
    /// Loads `path`, else `$LCA_BUNDLER_CONFIG`, else `config.toml`. A missing
    /// default file falls back to the built-in configuration; an explicitly
    /// named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(constants::CONFIG_PATH_ENV).ok().map(PathBuf::from));

        match explicit {
            Some(path) => Self::from_path(&path),
            None => {
                let default_path = Path::new(constants::DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::from_path(default_path)
                } else {
                    info!("no {} found, using built-in configuration", constants::DEFAULT_CONFIG_PATH);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BundleError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), groups = config.groups.len(), "loaded configuration");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Blank or repeated labels are rejected. Ids listed under several labels
    /// are accepted; aggregation reports them and the first group claims them.
    pub fn validate(&self) -> Result<()> {
        let mut labels = HashSet::new();
        for group in self.groups.iter() {
            if group.label.trim().is_empty() {
                return Err(BundleError::Config("group label must not be blank".to_string()));
            }
            if !labels.insert(group.label.as_str()) {
                return Err(BundleError::Config(format!("duplicate group label '{}'", group.label)));
            }
        }
        Ok(())
    }
}
