// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::{ExtractionError, RegistryError};
use crate::types::ScoreKey;
use thiserror::Error;

/// Errors surfaced by [`FeatureAssembler`](crate::assembler::FeatureAssembler).
///
/// Every variant is terminal for the current assembly attempt.
#[derive(Debug, Error)]
pub enum AssemblyError {
    /// A requested type tag matched zero or several registered variants.
    #[error(transparent)]
    Configuration(#[from] RegistryError),

    /// An extractor's `run` or cleanup failed. The source is passed through unchanged.
    #[error("Feature extractor '{type_tag}' failed: {source}")]
    Extraction {
        type_tag: String,
        #[source]
        source: ExtractionError,
    },

    /// The extractor succeeded but did not produce a score it declared.
    #[error("Feature extractor '{type_tag}' returned no '{score_key}' score for asset {asset_index}")]
    MissingScore {
        type_tag: String,
        score_key: ScoreKey,
        asset_index: usize,
    },

    /// The extractor's result set is not index-aligned with the asset list.
    #[error("Feature extractor '{type_tag}' returned {actual} results for {expected} assets")]
    ResultCountMismatch {
        type_tag: String,
        expected: usize,
        actual: usize,
    },

    #[error("Record for asset {asset_index} has no '{score_key}' entry")]
    KeyOrderMismatch {
        score_key: ScoreKey,
        asset_index: usize,
    },

    #[error("Feature assembly has not run yet")]
    NotAssembled,

    #[error("Extraction task did not complete: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed to acquire extraction permit: {0}")]
    Permit(#[from] tokio::sync::AcquireError),
}

impl AssemblyError {
    /// True for errors that signal an extractor broke its declared contract.
    pub fn is_consistency_violation(&self) -> bool {
        matches!(
            self,
            AssemblyError::MissingScore { .. } | AssemblyError::ResultCountMismatch { .. }
        )
    }
}
