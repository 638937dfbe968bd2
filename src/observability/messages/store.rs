// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for result store access.

use crate::observability::messages::StructuredLog;
use crate::store::ResultKey;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Stored scores were reused instead of running extraction.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ResultStoreHit<'a> {
    pub key: &'a ResultKey,
    pub store: &'a str,
}

impl Display for ResultStoreHit<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Reusing stored result {} from {} store", self.key, self.store)
    }
}

impl StructuredLog for ResultStoreHit<'_> {
    fn log(&self) {
        tracing::info!(
            type_tag = %self.key.type_tag,
            asset_signature = %self.key.asset_signature,
            store = self.store,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "result_store_hit",
            span_name = name,
            key = %self.key,
            store = self.store,
        )
    }
}

/// Freshly extracted scores were saved.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct ResultStored<'a> {
    pub key: &'a ResultKey,
    pub store: &'a str,
    pub score_count: usize,
}

impl Display for ResultStored<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Stored {} scores as {} in {} store",
            self.score_count, self.key, self.store
        )
    }
}

impl StructuredLog for ResultStored<'_> {
    fn log(&self) {
        tracing::debug!(
            key = %self.key,
            store = self.store,
            score_count = self.score_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "result_stored",
            span_name = name,
            key = %self.key,
            store = self.store,
        )
    }
}

/// Stored results of one extractor type were deleted.
///
/// # Log Level
/// `info!` - Important operational event
pub struct ResultsRemoved<'a> {
    pub type_tag: &'a str,
    pub removed: usize,
    pub store: &'a str,
}

impl Display for ResultsRemoved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Removed {} stored '{}' results from {} store",
            self.removed, self.type_tag, self.store
        )
    }
}

impl StructuredLog for ResultsRemoved<'_> {
    fn log(&self) {
        tracing::info!(
            type_tag = self.type_tag,
            removed = self.removed,
            store = self.store,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "results_removed",
            span_name = name,
            type_tag = self.type_tag,
            store = self.store,
        )
    }
}
