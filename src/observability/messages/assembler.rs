// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the assembly lifecycle.
//!
//! This module contains message types for logging events related to:
//! * Assembly start and completion
//! * Consistency violations found while merging raw results
//! * Cleanup of extractor logs and stored results

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// Assembly started for a set of extractor types.
///
/// # Log Level
/// `info!` - Important operational event
///
/// # Example
/// ```
/// use feature_assembler::observability::messages::assembler::AssemblyStarted;
/// use feature_assembler::observability::messages::StructuredLog;
///
/// let msg = AssemblyStarted {
///     type_count: 2,
///     asset_count: 10,
///     max_concurrency: 1,
/// };
///
/// let span = msg.span("feature_assembly");
/// let _guard = span.enter();
/// msg.log();
/// ```
pub struct AssemblyStarted {
    pub type_count: usize,
    pub asset_count: usize,
    pub max_concurrency: usize,
}

impl Display for AssemblyStarted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Starting feature assembly: {} extractor types over {} assets, max_concurrency={}",
            self.type_count, self.asset_count, self.max_concurrency
        )
    }
}

impl StructuredLog for AssemblyStarted {
    fn log(&self) {
        tracing::info!(
            type_count = self.type_count,
            asset_count = self.asset_count,
            max_concurrency = self.max_concurrency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "assembly",
            span_name = name,
            type_count = self.type_count,
            asset_count = self.asset_count,
            max_concurrency = self.max_concurrency,
        )
    }
}

/// Assembly merged every extractor's results into records.
///
/// # Log Level
/// `info!` - Important operational event
pub struct AssemblyCompleted {
    pub record_count: usize,
    pub key_count: usize,
    pub duration: Duration,
}

impl Display for AssemblyCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Feature assembly completed: {} records with {} keys each in {:?}",
            self.record_count, self.key_count, self.duration
        )
    }
}

impl StructuredLog for AssemblyCompleted {
    fn log(&self) {
        tracing::info!(
            record_count = self.record_count,
            key_count = self.key_count,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "assembly_completed",
            span_name = name,
            record_count = self.record_count,
            key_count = self.key_count,
            duration = ?self.duration,
        )
    }
}

/// An extractor's output disagrees with what it declared.
///
/// # Log Level
/// `error!` - Extractor contract broken, assembly aborted
///
/// # Example
/// ```
/// use feature_assembler::observability::messages::assembler::ConsistencyViolation;
///
/// let msg = ConsistencyViolation {
///     type_tag: "VMAF_feature",
///     detail: "no 'VMAF_feature_adm_score' score for asset 3",
/// };
///
/// assert!(msg.to_string().contains("VMAF_feature"));
/// ```
pub struct ConsistencyViolation<'a> {
    pub type_tag: &'a str,
    pub detail: &'a str,
}

impl Display for ConsistencyViolation<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Feature extractor '{}' broke its declared output: {}",
            self.type_tag, self.detail
        )
    }
}

impl StructuredLog for ConsistencyViolation<'_> {
    fn log(&self) {
        tracing::error!(type_tag = self.type_tag, detail = self.detail, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "consistency_violation",
            span_name = name,
            type_tag = self.type_tag,
        )
    }
}

/// Cleanup ran for every requested extractor type.
///
/// # Log Level
/// `info!` - Important operational event
pub struct CleanupCompleted<'a> {
    /// `"remove_logs"` or `"remove_results"`
    pub operation: &'a str,
    pub type_count: usize,
}

impl Display for CleanupCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Cleanup '{}' completed for {} extractor types",
            self.operation, self.type_count
        )
    }
}

impl StructuredLog for CleanupCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            operation = self.operation,
            type_count = self.type_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "cleanup",
            span_name = name,
            operation = self.operation,
            type_count = self.type_count,
        )
    }
}
