// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Test-only feature extractors.
//!
//! Scores are derived from the asset id, so expected values can be computed
//! in tests without running any tool.

use async_trait::async_trait;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use std::time::Duration;

use crate::asset::Asset;
use crate::errors::ExtractionError;
use crate::store::ResultKey;
use crate::traits::{ExtractorContext, ExtractorKind, FeatureExtractor};
use crate::types::{RawResultSet, ScoreMap};

/// Deterministic score of `atom_feature` for `asset`.
pub fn stub_score(asset: &Asset, atom_feature: &str) -> f64 {
    let seed = atom_feature.bytes().map(f64::from).sum::<f64>();
    asset.asset_id as f64 + seed / 1000.0
}

fn scores_for<T: ExtractorKind>(asset: &Asset, atoms: &[&str]) -> ScoreMap {
    atoms
        .iter()
        .map(|atom| (T::score_key_for(atom), stub_score(asset, atom)))
        .collect()
}

/// Extractor with logs and stored results, standing in for a tool-backed one.
///
/// Every computed (not reused) asset appends a line to its log file, so tests
/// can count how often extraction actually happened.
pub struct VmafStub {
    context: ExtractorContext,
}

impl VmafStub {
    pub fn log_path(log_dir: &std::path::Path, asset: &Asset) -> PathBuf {
        log_dir.join(format!("{}_{}_{}.log", Self::TYPE, Self::VERSION, asset.signature()))
    }

    fn result_key(asset: &Asset) -> ResultKey {
        ResultKey::new(Self::TYPE, Self::VERSION, asset)
    }
}

impl ExtractorKind for VmafStub {
    const TYPE: &'static str = "vmaf";
    const VERSION: &'static str = "1.0";
    const ATOM_FEATURES: &'static [&'static str] = &["vif", "motion", "ansnr"];

    fn new(context: ExtractorContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl FeatureExtractor for VmafStub {
    fn type_tag(&self) -> &'static str {
        Self::TYPE
    }

    async fn run(&self) -> Result<RawResultSet, ExtractionError> {
        let log_dir = self.context.log_dir();
        fs::create_dir_all(log_dir).map_err(|source| ExtractionError::Io {
            path: log_dir.to_path_buf(),
            source,
        })?;

        let mut results = Vec::with_capacity(self.context.assets.len());
        for asset in self.context.assets.iter() {
            let key = Self::result_key(asset);
            if let Some(stored) = self.context.result_store.load(&key)? {
                results.push(stored);
                continue;
            }

            let path = Self::log_path(log_dir, asset);
            let mut log = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .map_err(|source| ExtractionError::Io {
                    path: path.clone(),
                    source,
                })?;
            writeln!(log, "computed {}", asset.signature())
                .map_err(|source| ExtractionError::Io { path, source })?;

            let scores = scores_for::<Self>(asset, Self::ATOM_FEATURES);
            self.context.result_store.save(&key, &scores)?;
            results.push(scores);
        }
        Ok(results)
    }

    async fn remove_logs(&self) -> Result<(), ExtractionError> {
        for asset in self.context.assets.iter() {
            let path = Self::log_path(self.context.log_dir(), asset);
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => return Err(ExtractionError::Io { path, source }),
            }
        }
        Ok(())
    }

    async fn remove_results(&self) -> Result<(), ExtractionError> {
        for asset in self.context.assets.iter() {
            self.context.result_store.delete(&Self::result_key(asset))?;
        }
        Ok(())
    }
}

/// Stateless extractor with two atoms and no logs.
pub struct NoiseStub {
    context: ExtractorContext,
}

impl ExtractorKind for NoiseStub {
    const TYPE: &'static str = "noise";
    const VERSION: &'static str = "0.3";
    const ATOM_FEATURES: &'static [&'static str] = &["speckle", "grain"];

    fn new(context: ExtractorContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl FeatureExtractor for NoiseStub {
    fn type_tag(&self) -> &'static str {
        Self::TYPE
    }

    async fn run(&self) -> Result<RawResultSet, ExtractionError> {
        Ok(self
            .context
            .assets
            .iter()
            .map(|asset| scores_for::<Self>(asset, Self::ATOM_FEATURES))
            .collect())
    }

    async fn remove_logs(&self) -> Result<(), ExtractionError> {
        Ok(())
    }

    async fn remove_results(&self) -> Result<(), ExtractionError> {
        Ok(())
    }
}

/// Second variant claiming the `vmaf` tag, for ambiguity tests.
pub struct AlternateVmafStub;

impl ExtractorKind for AlternateVmafStub {
    const TYPE: &'static str = "vmaf";
    const VERSION: &'static str = "2.0";
    const ATOM_FEATURES: &'static [&'static str] = &["vif"];

    fn new(_context: ExtractorContext) -> Self {
        Self
    }
}

#[async_trait]
impl FeatureExtractor for AlternateVmafStub {
    fn type_tag(&self) -> &'static str {
        Self::TYPE
    }

    async fn run(&self) -> Result<RawResultSet, ExtractionError> {
        Ok(Vec::new())
    }

    async fn remove_logs(&self) -> Result<(), ExtractionError> {
        Ok(())
    }

    async fn remove_results(&self) -> Result<(), ExtractionError> {
        Ok(())
    }
}

/// Extractor whose run and cleanup always fail.
pub struct FailingStub;

impl ExtractorKind for FailingStub {
    const TYPE: &'static str = "failing";
    const VERSION: &'static str = "0.0";
    const ATOM_FEATURES: &'static [&'static str] = &["never"];

    fn new(_context: ExtractorContext) -> Self {
        Self
    }
}

#[async_trait]
impl FeatureExtractor for FailingStub {
    fn type_tag(&self) -> &'static str {
        Self::TYPE
    }

    async fn run(&self) -> Result<RawResultSet, ExtractionError> {
        Err(ExtractionError::Failed("simulated extractor failure".to_string()))
    }

    async fn remove_logs(&self) -> Result<(), ExtractionError> {
        Err(ExtractionError::Failed("simulated cleanup failure".to_string()))
    }

    async fn remove_results(&self) -> Result<(), ExtractionError> {
        Err(ExtractionError::Failed("simulated cleanup failure".to_string()))
    }
}

/// Memoizing extractor that takes a while before it stores anything.
pub struct SlowStub {
    context: ExtractorContext,
}

impl SlowStub {
    pub const DELAY: Duration = Duration::from_millis(300);
}

impl ExtractorKind for SlowStub {
    const TYPE: &'static str = "slow";
    const VERSION: &'static str = "0.1";
    const ATOM_FEATURES: &'static [&'static str] = &["lag"];

    fn new(context: ExtractorContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl FeatureExtractor for SlowStub {
    fn type_tag(&self) -> &'static str {
        Self::TYPE
    }

    async fn run(&self) -> Result<RawResultSet, ExtractionError> {
        tokio::time::sleep(Self::DELAY).await;

        let mut results = Vec::with_capacity(self.context.assets.len());
        for asset in self.context.assets.iter() {
            let scores = scores_for::<Self>(asset, Self::ATOM_FEATURES);
            let key = ResultKey::new(Self::TYPE, Self::VERSION, asset);
            self.context.result_store.save(&key, &scores)?;
            results.push(scores);
        }
        Ok(results)
    }

    async fn remove_logs(&self) -> Result<(), ExtractionError> {
        Ok(())
    }

    async fn remove_results(&self) -> Result<(), ExtractionError> {
        for asset in self.context.assets.iter() {
            let key = ResultKey::new(Self::TYPE, Self::VERSION, asset);
            self.context.result_store.delete(&key)?;
        }
        Ok(())
    }
}

/// Declares two atoms but only ever produces the first.
pub struct IncompleteStub {
    context: ExtractorContext,
}

impl ExtractorKind for IncompleteStub {
    const TYPE: &'static str = "incomplete";
    const VERSION: &'static str = "0.1";
    const ATOM_FEATURES: &'static [&'static str] = &["present", "absent"];

    fn new(context: ExtractorContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl FeatureExtractor for IncompleteStub {
    fn type_tag(&self) -> &'static str {
        Self::TYPE
    }

    async fn run(&self) -> Result<RawResultSet, ExtractionError> {
        Ok(self
            .context
            .assets
            .iter()
            .map(|asset| scores_for::<Self>(asset, &["present"]))
            .collect())
    }

    async fn remove_logs(&self) -> Result<(), ExtractionError> {
        Ok(())
    }

    async fn remove_results(&self) -> Result<(), ExtractionError> {
        Ok(())
    }
}

/// Returns one result more than there are assets.
pub struct MisalignedStub {
    context: ExtractorContext,
}

impl ExtractorKind for MisalignedStub {
    const TYPE: &'static str = "misaligned";
    const VERSION: &'static str = "0.1";
    const ATOM_FEATURES: &'static [&'static str] = &["only"];

    fn new(context: ExtractorContext) -> Self {
        Self { context }
    }
}

#[async_trait]
impl FeatureExtractor for MisalignedStub {
    fn type_tag(&self) -> &'static str {
        Self::TYPE
    }

    async fn run(&self) -> Result<RawResultSet, ExtractionError> {
        let mut results: RawResultSet = self
            .context
            .assets
            .iter()
            .map(|asset| scores_for::<Self>(asset, Self::ATOM_FEATURES))
            .collect();
        results.push(ScoreMap::new());
        Ok(results)
    }

    async fn remove_logs(&self) -> Result<(), ExtractionError> {
        Ok(())
    }

    async fn remove_results(&self) -> Result<(), ExtractionError> {
        Ok(())
    }
}
