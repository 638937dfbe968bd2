// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for feature extractor events.
//!
//! This module contains message types for logging events related to:
//! * Resolving a requested type tag to a registered variant
//! * Extraction completion and failure
//! * External tool invocation and working directory handling

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::time::Duration;
use tracing::Span;

/// A requested type tag resolved to a registered variant.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ExtractorResolved<'a> {
    pub type_tag: &'a str,
    pub version: &'a str,
    pub atom_count: usize,
}

impl Display for ExtractorResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved feature extractor '{}' version {} ({} atom features requested)",
            self.type_tag, self.version, self.atom_count
        )
    }
}

impl StructuredLog for ExtractorResolved<'_> {
    fn log(&self) {
        tracing::debug!(
            type_tag = self.type_tag,
            version = self.version,
            atom_count = self.atom_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "extractor",
            span_name = name,
            type_tag = self.type_tag,
            version = self.version,
        )
    }
}

/// An extractor returned results for every asset.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use feature_assembler::observability::messages::extractor::ExtractionCompleted;
/// use std::time::Duration;
///
/// let msg = ExtractionCompleted {
///     type_tag: "VMAF_feature",
///     asset_count: 4,
///     duration: Duration::from_secs(12),
/// };
///
/// tracing::info!("{}", msg);
/// ```
pub struct ExtractionCompleted<'a> {
    pub type_tag: &'a str,
    pub asset_count: usize,
    pub duration: Duration,
}

impl Display for ExtractionCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Feature extractor '{}' produced results for {} assets in {:?}",
            self.type_tag, self.asset_count, self.duration
        )
    }
}

impl StructuredLog for ExtractionCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            type_tag = self.type_tag,
            asset_count = self.asset_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "extraction_completed",
            span_name = name,
            type_tag = self.type_tag,
            asset_count = self.asset_count,
            duration = ?self.duration,
        )
    }
}

/// An extractor's run or cleanup failed.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use feature_assembler::observability::messages::extractor::ExtractionFailed;
///
/// let error = std::io::Error::new(std::io::ErrorKind::NotFound, "vmaf not found");
/// let msg = ExtractionFailed {
///     type_tag: "VMAF_feature",
///     error: &error,
/// };
///
/// tracing::error!("{}", msg);
/// ```
pub struct ExtractionFailed<'a> {
    pub type_tag: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ExtractionFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Feature extractor '{}' failed: {}",
            self.type_tag, self.error
        )
    }
}

impl StructuredLog for ExtractionFailed<'_> {
    fn log(&self) {
        tracing::error!(
            type_tag = self.type_tag,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "extraction_failed",
            span_name = name,
            type_tag = self.type_tag,
            error = %self.error,
        )
    }
}

/// An external tool is about to be launched for one asset.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ToolInvocation<'a> {
    pub program: &'a Path,
    pub asset_signature: &'a str,
    pub fifo_mode: bool,
}

impl Display for ToolInvocation<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let mode = if self.fifo_mode { "streaming" } else { "log file" };
        write!(
            f,
            "Running '{}' for asset {} ({} mode)",
            self.program.display(),
            self.asset_signature,
            mode
        )
    }
}

impl StructuredLog for ToolInvocation<'_> {
    fn log(&self) {
        tracing::debug!(
            program = %self.program.display(),
            asset_signature = self.asset_signature,
            fifo_mode = self.fifo_mode,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "tool_invocation",
            span_name = name,
            program = %self.program.display(),
            asset_signature = self.asset_signature,
        )
    }
}

pub struct WorkdirRemoved<'a> {
    pub path: &'a Path,
}

impl Display for WorkdirRemoved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Removed working directory '{}'", self.path.display())
    }
}

impl StructuredLog for WorkdirRemoved<'_> {
    fn log(&self) {
        tracing::debug!(path = %self.path.display(), "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("workdir_removed", span_name = name, path = %self.path.display())
    }
}
