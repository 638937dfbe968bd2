// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Memoizing result stores used by feature extractors.
//!
//! The assembler never touches a store directly; it only hands the shared
//! handle to the extractors it builds. Extractors consult the store before
//! doing work, save what they computed, and delete entries on
//! `remove_results`.
//!
//! # Available Stores
//!
//! * [`InMemoryResultStore`] - process-local, for tests and one-shot runs
//! * [`FileSystemResultStore`] - one JSON file per entry under a root directory

mod filesystem;
mod memory;

pub use filesystem::FileSystemResultStore;
pub use memory::InMemoryResultStore;

use crate::asset::Asset;
use crate::errors::StoreError;
use crate::types::ScoreMap;
use std::fmt;

/// Identifies one extractor's scores for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResultKey {
    pub type_tag: String,
    pub version: String,
    pub asset_signature: String,
}

impl ResultKey {
    pub fn new(type_tag: impl Into<String>, version: impl Into<String>, asset: &Asset) -> Self {
        Self {
            type_tag: type_tag.into(),
            version: version.into(),
            asset_signature: asset.signature(),
        }
    }
}

impl fmt::Display for ResultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.type_tag, self.version, self.asset_signature)
    }
}

/// Key-value store for per-asset extractor results.
///
/// Implementations must be safe to share between concurrently running
/// extractors.
pub trait ResultStore: Send + Sync {
    fn load(&self, key: &ResultKey) -> Result<Option<ScoreMap>, StoreError>;

    fn save(&self, key: &ResultKey, scores: &ScoreMap) -> Result<(), StoreError>;

    /// Returns `Ok(false)` when there was nothing to delete.
    fn delete(&self, key: &ResultKey) -> Result<bool, StoreError>;

    fn name(&self) -> &'static str;
}
