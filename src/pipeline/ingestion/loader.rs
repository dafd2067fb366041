use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::{debug, info};

use crate::constants::SINGLESCORE_FILE_PATTERN;
use crate::domain::ImpactRecord;
use crate::error::{BundleError, Result};

fn parse_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|source| BundleError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Loads one single-score file; `source` becomes the file name.
pub fn load_record_file(path: &Path) -> Result<ImpactRecord> {
    let mut record: ImpactRecord = parse_json(path)?;
    record.source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());
    Ok(record)
}

/// Loads a JSON array of records, e.g. the characterisation bundle.
pub fn load_record_bundle(path: &Path) -> Result<Vec<ImpactRecord>> {
    let records: Vec<ImpactRecord> = parse_json(path)?;
    debug!(path = %path.display(), count = records.len(), "loaded record bundle");
    Ok(records)
}

/// Single-score files in `dir`, sorted by file name.
pub fn singlescore_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = Regex::new(SINGLESCORE_FILE_PATTERN)
        .map_err(|e| BundleError::Config(format!("bad file pattern: {}", e)))?;

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        if pattern.is_match(&name.to_string_lossy()) {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Loads every single-score file in `dir`. An empty directory is an error.
pub fn load_singlescore_dir(dir: &Path) -> Result<Vec<ImpactRecord>> {
    let files = singlescore_files(dir)?;
    if files.is_empty() {
        return Err(BundleError::NoSourceFiles(dir.display().to_string()));
    }

    let records = files
        .iter()
        .map(|path| load_record_file(path))
        .collect::<Result<Vec<_>>>()?;
    info!(dir = %dir.display(), count = records.len(), "loaded single-score records");
    Ok(records)
}
