// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use super::StoreError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating an assembly config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration validation failed:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    #[error("Failed to open result store: {0}")]
    Store(#[from] StoreError),
}
