// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Score types shared by extractors, result stores and the assembler.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

/// Canonical key for one (extractor type, atom feature) pair.
///
/// Keys are minted by the extractor variant itself (see
/// [`ExtractorKind::score_key_for`](crate::traits::ExtractorKind::score_key_for)),
/// never by the assembler.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreKey(String);

impl ScoreKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ScoreKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ScoreKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for ScoreKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Scores produced by one extractor for one asset.
pub type ScoreMap = BTreeMap<ScoreKey, f64>;

/// One extractor's output: a `ScoreMap` per asset, index-aligned with the
/// shared asset list.
pub type RawResultSet = Vec<ScoreMap>;

/// Assembled scores for one asset across every requested extractor type.
pub type ScoreRecord = BTreeMap<ScoreKey, f64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_key_lookup_by_str() {
        let mut scores = ScoreMap::new();
        scores.insert(ScoreKey::from("vmaf_vif_score"), 0.5);

        assert_eq!(scores.get("vmaf_vif_score"), Some(&0.5));
        assert_eq!(scores.get("vmaf_adm_score"), None);
    }

    #[test]
    fn test_score_key_serializes_as_plain_string() {
        let mut record = ScoreRecord::new();
        record.insert(ScoreKey::new("vmaf_ansnr_score"), 30.0);

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"vmaf_ansnr_score":30.0}"#);

        let parsed: ScoreRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, record);
    }
}
