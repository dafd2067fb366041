use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use crate::app::ports::RecordSourcePort;
use crate::domain::ImpactRecord;
use crate::pipeline::ingestion::{load_conversion_factors, load_record_bundle, load_singlescore_dir};
use crate::pipeline::processing::weighting::weigh_records;

/// Reads `singlescore_*.json` files from a directory
pub struct SingleScoreDirSource {
    pub dir: PathBuf,
}

impl SingleScoreDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl RecordSourcePort for SingleScoreDirSource {
    fn kind(&self) -> &'static str {
        "singlescore"
    }

    async fn load_records(&self) -> anyhow::Result<Vec<ImpactRecord>> {
        Ok(load_singlescore_dir(&self.dir)?)
    }
}

/// Rebuilds single-score records from the characterisation bundle and the
/// conversion factor sheet
pub struct CharacterisationSource {
    pub characterisation: PathBuf,
    pub conversion: PathBuf,
}

impl CharacterisationSource {
    pub fn new(characterisation: impl Into<PathBuf>, conversion: impl Into<PathBuf>) -> Self {
        Self {
            characterisation: characterisation.into(),
            conversion: conversion.into(),
        }
    }
}

#[async_trait]
impl RecordSourcePort for CharacterisationSource {
    fn kind(&self) -> &'static str {
        "characterisation"
    }

    async fn load_records(&self) -> anyhow::Result<Vec<ImpactRecord>> {
        let characterisation = load_record_bundle(&self.characterisation)?;
        let factors = load_conversion_factors(&self.conversion)?;
        info!(
            products = characterisation.len(),
            factors = factors.len(),
            "weighting characterisation results"
        );
        Ok(weigh_records(&characterisation, &factors))
    }
}
