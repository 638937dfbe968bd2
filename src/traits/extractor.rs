// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The contract every feature-extractor variant satisfies.
//!
//! A variant has two sides:
//!
//! * a static side ([`ExtractorKind`]): type tag, version, declared atom
//!   features and the score-key function, all available without an instance
//! * an instance side ([`FeatureExtractor`]): bound to an [`ExtractorContext`],
//!   it runs extraction and cleans up after it
//!
//! # Location purity
//!
//! Every log file, working directory and result-store key an extractor uses
//! must be a pure function of the asset (see
//! [`Asset::signature`](crate::asset::Asset::signature)), the variant's tag and
//! version, and the [`RuntimeOptions`]. The assembler builds a fresh instance
//! for `remove_logs` / `remove_results` and relies on it finding exactly what
//! an earlier `run` produced.

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::Span;

use crate::asset::Asset;
use crate::config::RuntimeOptions;
use crate::errors::ExtractionError;
use crate::store::ResultStore;
use crate::types::{RawResultSet, ScoreKey};

/// What an extractor instance is bound to when it is built.
#[derive(Clone)]
pub struct ExtractorContext {
    /// Shared, read-only asset list; results are index-aligned with it.
    pub assets: Arc<[Asset]>,
    /// Diagnostic sink. Extractor events are recorded inside this span.
    pub span: Span,
    pub options: RuntimeOptions,
    pub result_store: Arc<dyn ResultStore>,
}

impl ExtractorContext {
    pub fn new(
        assets: Arc<[Asset]>,
        span: Span,
        options: RuntimeOptions,
        result_store: Arc<dyn ResultStore>,
    ) -> Self {
        Self {
            assets,
            span,
            options,
            result_store,
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.options.log_dir
    }

    pub fn fifo_mode(&self) -> bool {
        self.options.fifo_mode
    }

    pub fn delete_workdir(&self) -> bool {
        self.options.delete_workdir
    }
}

impl fmt::Debug for ExtractorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorContext")
            .field("asset_count", &self.assets.len())
            .field("options", &self.options)
            .field("result_store", &self.result_store.name())
            .finish()
    }
}

/// Instance side of an extractor variant.
#[async_trait]
pub trait FeatureExtractor: Send + Sync {
    /// The variant's type tag, identical to [`ExtractorKind::TYPE`].
    fn type_tag(&self) -> &'static str;

    /// Extract scores for every asset in the bound context.
    ///
    /// The returned set has one entry per asset, in asset order, and each
    /// entry contains at least the score key of every declared atom feature.
    async fn run(&self) -> Result<RawResultSet, ExtractionError>;

    /// Delete the log files `run` writes. A no-op when none exist.
    async fn remove_logs(&self) -> Result<(), ExtractionError>;

    /// Delete the stored results `run` saves. A no-op when none exist.
    async fn remove_results(&self) -> Result<(), ExtractionError>;
}

/// Static side of an extractor variant, used by the registry.
pub trait ExtractorKind: FeatureExtractor + Sized + 'static {
    const TYPE: &'static str;
    const VERSION: &'static str;
    /// Every atom feature this variant produces, in declaration order.
    const ATOM_FEATURES: &'static [&'static str];

    fn score_key_for(atom_feature: &str) -> ScoreKey {
        ScoreKey::new(format!("{}_{}_score", Self::TYPE, atom_feature))
    }

    fn new(context: ExtractorContext) -> Self;
}
