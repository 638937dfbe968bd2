// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// A requested extractor type tag could not be resolved to exactly one variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("No feature extractor registered for type '{tag}' (registered: {registered})")]
    NotRegistered { tag: String, registered: String },

    #[error("Feature extractor type '{tag}' is ambiguous: {count} registered variants declare it")]
    Ambiguous { tag: String, count: usize },
}

impl RegistryError {
    pub fn tag(&self) -> &str {
        match self {
            RegistryError::NotRegistered { tag, .. } | RegistryError::Ambiguous { tag, .. } => tag,
        }
    }
}
