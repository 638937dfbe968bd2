// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::assembler::{AssemblyContext, FeatureAssembler};
use crate::config::Config;
use crate::errors::ConfigError;
use crate::registry::ExtractorRegistry;

/// Assembly runtime builder - turns a loaded configuration into a ready
/// [`FeatureAssembler`].
///
/// Opens the configured result store and binds it, the runtime options and
/// the asset list to an assembler backed by the built-in extractor registry.
///
/// # Examples
///
/// ```
/// use feature_assembler::asset::Asset;
/// use feature_assembler::config::{Config, FeatureRequest, RuntimeBuilder};
///
/// let config = Config {
///     features: FeatureRequest::new().with_atoms("VMAF_feature", ["vif"]),
///     assets: vec![Asset::new("doc", 0, 0, "ref.yuv", "dis.yuv", 64, 48)],
///     runtime: Default::default(),
///     result_store: Default::default(),
/// };
///
/// let assembler = RuntimeBuilder::from_config(&config).unwrap();
/// assert_eq!(assembler.ordered_score_key_list().unwrap().len(), 1);
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Build an assembler using the built-in extractor registry.
    pub fn from_config(cfg: &Config) -> Result<FeatureAssembler, ConfigError> {
        Self::from_config_with_registry(cfg, ExtractorRegistry::builtin())
    }

    /// Build an assembler resolving extractor types against `registry`.
    pub fn from_config_with_registry(
        cfg: &Config,
        registry: ExtractorRegistry,
    ) -> Result<FeatureAssembler, ConfigError> {
        let result_store = cfg.result_store.open()?;
        let context = AssemblyContext::new(cfg.runtime.clone(), result_store);
        Ok(FeatureAssembler::new(
            cfg.features.clone(),
            cfg.assets.clone(),
            registry,
            context,
        ))
    }
}
