// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::asset::Asset;
use crate::config::consts::{
    DEFAULT_LOG_DIR, DEFAULT_MAX_CONCURRENCY, DEFAULT_VMAF_EXECUTABLE, DEFAULT_WORKDIR_ROOT,
};
use crate::config::{AtomSelection, FeatureRequest};
use crate::errors::{ConfigError, StoreError};
use crate::registry::ExtractorRegistry;
use crate::store::{FileSystemResultStore, InMemoryResultStore, ResultStore};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Main configuration structure for a feature assembly run.
///
/// # Fields
/// * `features` - Requested extractor types and their atom selections
/// * `assets` - Assets to score, in output order
/// * `runtime` - Log/workdir locations and extractor behavior (optional)
/// * `result_store` - Where extractors memoize results (optional, defaults to memory)
///
/// # Example
/// ```yaml
/// features:
///   VMAF_feature: [vif, adm]
/// assets:
///   - dataset: example
///     content_id: 0
///     asset_id: 0
///     ref_path: ref.yuv
///     dis_path: dis.yuv
///     width: 1920
///     height: 1080
/// runtime:
///   log_dir: ./logs
///   fifo_mode: false
/// result_store:
///   kind: filesystem
///   root: ./results
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub features: FeatureRequest,
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub runtime: RuntimeOptions,
    #[serde(default)]
    pub result_store: ResultStoreConfig,
}

/// Options shared by every extractor built during an assembly.
///
/// # Fields
/// * `log_dir` - Where per-asset extractor logs are written
/// * `workdir_root` - Parent of per-asset working directories
/// * `fifo_mode` - Stream tool output through a pipe instead of a log file
/// * `delete_workdir` - Remove working directories after extraction
/// * `max_concurrency` - Extractor types run at once (1 = sequential)
/// * `vmaf_executable` - Program invoked by the VMAF feature extractor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct RuntimeOptions {
    pub log_dir: PathBuf,
    pub workdir_root: PathBuf,
    pub fifo_mode: bool,
    pub delete_workdir: bool,
    pub max_concurrency: usize,
    pub vmaf_executable: PathBuf,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            workdir_root: PathBuf::from(DEFAULT_WORKDIR_ROOT),
            fifo_mode: true,
            delete_workdir: true,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            vmaf_executable: PathBuf::from(DEFAULT_VMAF_EXECUTABLE),
        }
    }
}

impl RuntimeOptions {
    pub fn with_log_dir(mut self, log_dir: impl Into<PathBuf>) -> Self {
        self.log_dir = log_dir.into();
        self
    }

    pub fn with_workdir_root(mut self, workdir_root: impl Into<PathBuf>) -> Self {
        self.workdir_root = workdir_root.into();
        self
    }

    pub fn with_fifo_mode(mut self, fifo_mode: bool) -> Self {
        self.fifo_mode = fifo_mode;
        self
    }

    pub fn with_delete_workdir(mut self, delete_workdir: bool) -> Self {
        self.delete_workdir = delete_workdir;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_vmaf_executable(mut self, vmaf_executable: impl Into<PathBuf>) -> Self {
        self.vmaf_executable = vmaf_executable.into();
        self
    }
}

/// Result store backing the extractors.
///
/// # Example
/// ```yaml
/// result_store:
///   kind: filesystem
///   root: ./results
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultStoreConfig {
    #[default]
    Memory,
    Filesystem { root: PathBuf },
}

impl ResultStoreConfig {
    pub fn open(&self) -> Result<Arc<dyn ResultStore>, StoreError> {
        match self {
            ResultStoreConfig::Memory => Ok(Arc::new(InMemoryResultStore::new())),
            ResultStoreConfig::Filesystem { root } => {
                Ok(Arc::new(FileSystemResultStore::open(root)?))
            }
        }
    }
}

/// Load a config from a YAML file, or TOML when the extension is `.toml`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let cfg: Config = if is_toml {
        toml::from_str(&content)?
    } else {
        serde_yaml::from_str(&content)?
    };
    Ok(cfg)
}

/// Check a config against the extractors in `registry`.
///
/// Every problem found is reported, not just the first.
pub fn validate_config(cfg: &Config, registry: &ExtractorRegistry) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    if cfg.features.is_empty() {
        errors.push("No feature types requested".to_string());
    }
    if cfg.assets.is_empty() {
        errors.push("Asset list is empty".to_string());
    }
    if cfg.runtime.max_concurrency == 0 {
        errors.push("runtime.max_concurrency must be at least 1".to_string());
    }

    for type_tag in cfg.features.sorted_types() {
        let variant = match registry.resolve(type_tag) {
            Ok(variant) => variant,
            Err(e) => {
                errors.push(e.to_string());
                continue;
            }
        };

        if let Some(AtomSelection::Explicit(atoms)) = cfg.features.selection(type_tag) {
            if atoms.is_empty() {
                errors.push(format!("Feature type '{}' selects no atom features", type_tag));
            }
            for atom in atoms.iter().filter(|atom| !variant.declares_atom(atom)) {
                errors.push(format!(
                    "Feature type '{}' has no atom feature '{}' (declared: {})",
                    type_tag,
                    atom,
                    variant.default_atom_features().join(", ")
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::Validation(errors))
    }
}

/// Load a config and validate it against the built-in extractors.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    validate_config(&cfg, &ExtractorRegistry::builtin())?;
    Ok(cfg)
}
