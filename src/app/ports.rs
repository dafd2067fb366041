use async_trait::async_trait;

use crate::domain::ImpactRecord;

/// Supplies the loaded, typed records for one bundle run.
#[async_trait]
pub trait RecordSourcePort: Send + Sync {
    /// Short name used in logs and metric labels
    fn kind(&self) -> &'static str;

    async fn load_records(&self) -> anyhow::Result<Vec<ImpactRecord>>;
}

/// Receives the aggregated bundle.
#[async_trait]
pub trait BundleOutputPort: Send + Sync {
    async fn write_bundle(&self, records: &[ImpactRecord]) -> anyhow::Result<()>;
}
