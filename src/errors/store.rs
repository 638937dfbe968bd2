// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by [`ResultStore`](crate::store::ResultStore) implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Result store IO error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Result store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Result store lock poisoned")]
    Poisoned,
}
