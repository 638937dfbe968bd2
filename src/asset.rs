// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Media assets under analysis.
//!
//! Inside an assembly an asset is identified by its index in the shared asset
//! list. Extractors and result stores additionally need a location-stable
//! identity, which [`Asset::signature`] derives from the asset's fields alone.

use crate::config::consts::DEFAULT_YUV_TYPE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A reference/distorted media pair to be scored.
///
/// # Example
/// ```yaml
/// dataset: example
/// content_id: 0
/// asset_id: 1
/// ref_path: /data/ref/src01.yuv
/// dis_path: /data/dis/src01_hrc03.yuv
/// width: 1920
/// height: 1080
/// yuv_type: yuv420p
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub dataset: String,
    pub content_id: u32,
    pub asset_id: u32,
    pub ref_path: PathBuf,
    pub dis_path: PathBuf,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_yuv_type")]
    pub yuv_type: String,
}

fn default_yuv_type() -> String {
    DEFAULT_YUV_TYPE.to_string()
}

impl Asset {
    pub fn new(
        dataset: impl Into<String>,
        content_id: u32,
        asset_id: u32,
        ref_path: impl Into<PathBuf>,
        dis_path: impl Into<PathBuf>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            content_id,
            asset_id,
            ref_path: ref_path.into(),
            dis_path: dis_path.into(),
            width,
            height,
            yuv_type: default_yuv_type(),
        }
    }

    pub fn with_yuv_type(mut self, yuv_type: impl Into<String>) -> Self {
        self.yuv_type = yuv_type.into();
        self
    }

    /// Deterministic, filename-safe identity of this asset.
    ///
    /// Depends only on the asset's fields, so two `Asset` values describing
    /// the same media always map to the same logs and stored results.
    pub fn signature(&self) -> String {
        sanitize(&format!(
            "{}_{}_{}_{}_vs_{}_{}x{}_{}",
            self.dataset,
            self.content_id,
            self.asset_id,
            file_label(&self.ref_path),
            file_label(&self.dis_path),
            self.width,
            self.height,
            self.yuv_type
        ))
    }
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Replace anything outside `[A-Za-z0-9._-]` with `_`.
pub(crate) fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
