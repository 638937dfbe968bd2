// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by a feature extractor's `run`, `remove_logs` or
/// `remove_results`.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("IO error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to launch '{program}': {source}")]
    ToolLaunch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{program}' exited with {status} for asset {asset_index}: {stderr}")]
    ToolFailed {
        program: String,
        asset_index: usize,
        status: String,
        stderr: String,
    },

    #[error("Malformed line {line_number} in '{}': {line}", .path.display())]
    MalformedLog {
        path: PathBuf,
        line_number: usize,
        line: String,
    },

    #[error("No frame scores found in '{}'", .path.display())]
    NoFrames { path: PathBuf },

    /// The tool produced frames, but none for a declared atom feature.
    #[error("No '{atom}' frame scores found in '{}'", .path.display())]
    MissingAtom { atom: String, path: PathBuf },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Extraction failed: {0}")]
    Failed(String),
}
