use async_trait::async_trait;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::app::ports::BundleOutputPort;
use crate::domain::ImpactRecord;

async fn ensure_directory(dir: &Path) -> anyhow::Result<()> {
    if dir.as_os_str().is_empty() || dir.exists() {
        return Ok(());
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create output directory {:?}: {}", dir, e))?;
    debug!("Created output directory: {:?}", dir);
    Ok(())
}

async fn write_pretty_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| anyhow::anyhow!("Failed to serialize {:?} to JSON: {}", path, e))?;

    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open output file {:?}: {}", path, e))?;
    file.write_all(json.as_bytes())
        .await
        .map_err(|e| anyhow::anyhow!("Failed to write to output file {:?}: {}", path, e))?;
    file.flush()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to flush output file {:?}: {}", path, e))?;
    Ok(())
}

/// Writes the bundle as one pretty-printed JSON array
pub struct JsonFileBundleOutput {
    pub path: PathBuf,
}

impl JsonFileBundleOutput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BundleOutputPort for JsonFileBundleOutput {
    async fn write_bundle(&self, records: &[ImpactRecord]) -> anyhow::Result<()> {
        if let Some(parent_dir) = self.path.parent() {
            ensure_directory(parent_dir).await?;
        }
        write_pretty_json(&self.path, records).await?;

        debug!("Wrote {} records to {:?}", records.len(), self.path);
        Ok(())
    }
}

/// Writes every record to its own file in `dir`, named after its source file.
pub struct JsonRecordFilesOutput {
    pub dir: PathBuf,
}

impl JsonRecordFilesOutput {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Only the final component of `source` is used; records without one are
    /// named after their product id.
    fn file_path(&self, record: &ImpactRecord) -> PathBuf {
        let file_name = record
            .source
            .as_deref()
            .and_then(|source| Path::new(source).file_name())
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| format!("{}.json", record.product_id).into());
        self.dir.join(file_name)
    }
}

#[async_trait]
impl BundleOutputPort for JsonRecordFilesOutput {
    async fn write_bundle(&self, records: &[ImpactRecord]) -> anyhow::Result<()> {
        ensure_directory(&self.dir).await?;
        for record in records {
            let path = self.file_path(record);
            write_pretty_json(&path, record).await?;
            debug!(product_id = %record.product_id, "Wrote record file {:?}", path);
        }
        Ok(())
    }
}
