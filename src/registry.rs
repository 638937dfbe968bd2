// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Static registry of feature-extractor variants.
//!
//! Each variant is registered once, at startup, as an [`ExtractorVariant`]
//! entry built from its [`ExtractorKind`] implementation. Lookup by type tag
//! succeeds only when exactly one registered entry declares the tag.
//!
//! # Examples
//!
//! ```
//! use feature_assembler::registry::ExtractorRegistry;
//!
//! let registry = ExtractorRegistry::builtin();
//! let variant = registry.resolve("VMAF_feature").unwrap();
//!
//! assert_eq!(variant.version(), "0.1");
//! assert_eq!(variant.score_key_for("vif").as_str(), "VMAF_feature_vif_score");
//! assert!(registry.resolve("PSNR_feature").is_err());
//! ```

use std::fmt;
use std::sync::Arc;

use crate::backends::VmafFeatureExtractor;
use crate::errors::RegistryError;
use crate::traits::{ExtractorContext, ExtractorKind, FeatureExtractor};
use crate::types::ScoreKey;

/// Registry entry describing one extractor variant.
#[derive(Clone, Copy)]
pub struct ExtractorVariant {
    type_tag: &'static str,
    version: &'static str,
    atom_features: &'static [&'static str],
    score_key: fn(&str) -> ScoreKey,
    build: fn(ExtractorContext) -> Arc<dyn FeatureExtractor>,
}

fn build_instance<T: ExtractorKind>(context: ExtractorContext) -> Arc<dyn FeatureExtractor> {
    Arc::new(T::new(context))
}

impl ExtractorVariant {
    pub fn of<T: ExtractorKind>() -> Self {
        Self {
            type_tag: T::TYPE,
            version: T::VERSION,
            atom_features: T::ATOM_FEATURES,
            score_key: T::score_key_for,
            build: build_instance::<T>,
        }
    }

    pub fn type_tag(&self) -> &'static str {
        self.type_tag
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Atom features produced by default, in declaration order.
    pub fn default_atom_features(&self) -> &'static [&'static str] {
        self.atom_features
    }

    pub fn declares_atom(&self, atom_feature: &str) -> bool {
        self.atom_features.contains(&atom_feature)
    }

    pub fn score_key_for(&self, atom_feature: &str) -> ScoreKey {
        (self.score_key)(atom_feature)
    }

    /// Build a fresh instance bound to `context`.
    pub fn instantiate(&self, context: ExtractorContext) -> Arc<dyn FeatureExtractor> {
        (self.build)(context)
    }
}

impl fmt::Debug for ExtractorVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractorVariant")
            .field("type_tag", &self.type_tag)
            .field("version", &self.version)
            .field("atom_features", &self.atom_features)
            .finish()
    }
}

/// The set of extractor variants available to an assembler.
#[derive(Debug, Clone, Default)]
pub struct ExtractorRegistry {
    variants: Vec<ExtractorVariant>,
}

impl ExtractorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every variant this crate ships.
    pub fn builtin() -> Self {
        Self::new().with_variant(ExtractorVariant::of::<VmafFeatureExtractor>())
    }

    /// Add a variant. Duplicate tags are accepted here and reported by
    /// [`resolve`](Self::resolve).
    pub fn register(&mut self, variant: ExtractorVariant) {
        self.variants.push(variant);
    }

    pub fn with_variant(mut self, variant: ExtractorVariant) -> Self {
        self.register(variant);
        self
    }

    /// Find the single variant declaring `type_tag`.
    pub fn resolve(&self, type_tag: &str) -> Result<&ExtractorVariant, RegistryError> {
        let matches: Vec<&ExtractorVariant> = self
            .variants
            .iter()
            .filter(|variant| variant.type_tag == type_tag)
            .collect();

        match matches.as_slice() {
            [variant] => Ok(variant),
            [] => Err(RegistryError::NotRegistered {
                tag: type_tag.to_string(),
                registered: self.type_tags().join(", "),
            }),
            _ => Err(RegistryError::Ambiguous {
                tag: type_tag.to_string(),
                count: matches.len(),
            }),
        }
    }

    pub fn contains(&self, type_tag: &str) -> bool {
        self.variants.iter().any(|variant| variant.type_tag == type_tag)
    }

    /// Distinct registered type tags, sorted.
    pub fn type_tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = self.variants.iter().map(|v| v.type_tag).collect();
        tags.sort_unstable();
        tags.dedup();
        tags
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{AlternateVmafStub, NoiseStub, VmafStub};

    fn stub_registry() -> ExtractorRegistry {
        ExtractorRegistry::new()
            .with_variant(ExtractorVariant::of::<VmafStub>())
            .with_variant(ExtractorVariant::of::<NoiseStub>())
    }

    #[test]
    fn test_resolve_unique_tag() {
        let registry = stub_registry();
        let variant = registry.resolve("vmaf").unwrap();

        assert_eq!(variant.type_tag(), "vmaf");
        assert_eq!(variant.default_atom_features(), &["vif", "motion", "ansnr"]);
        assert_eq!(variant.score_key_for("vif"), ScoreKey::new("vmaf_vif_score"));
        assert!(variant.declares_atom("motion"));
        assert!(!variant.declares_atom("adm"));
    }

    #[test]
    fn test_resolve_errors_unless_exactly_one_match() {
        let registry = stub_registry().with_variant(ExtractorVariant::of::<AlternateVmafStub>());

        let test_cases = vec![
            ("noise", None),
            (
                "psnr",
                Some(RegistryError::NotRegistered {
                    tag: "psnr".into(),
                    registered: "noise, vmaf".into(),
                }),
            ),
            (
                "vmaf",
                Some(RegistryError::Ambiguous {
                    tag: "vmaf".into(),
                    count: 2,
                }),
            ),
        ];

        for (tag, expected_error) in test_cases {
            let result = registry.resolve(tag);
            match expected_error {
                None => assert_eq!(result.unwrap().type_tag(), tag),
                Some(expected) => assert_eq!(result.unwrap_err(), expected, "tag '{}'", tag),
            }
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = ExtractorRegistry::new();
        assert!(registry.is_empty());
        assert!(matches!(
            registry.resolve("vmaf"),
            Err(RegistryError::NotRegistered { .. })
        ));
    }

    #[test]
    fn test_type_tags_are_sorted_and_distinct() {
        let registry = stub_registry().with_variant(ExtractorVariant::of::<AlternateVmafStub>());
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.type_tags(), vec!["noise", "vmaf"]);
        assert!(registry.contains("noise"));
        assert!(!registry.contains("psnr"));
    }

    #[test]
    fn test_builtin_registry_has_vmaf_feature() {
        let registry = ExtractorRegistry::builtin();
        let variant = registry.resolve("VMAF_feature").unwrap();
        assert_eq!(
            variant.default_atom_features(),
            &["vif", "adm", "ansnr", "motion"]
        );
        assert_eq!(
            variant.score_key_for("adm").as_str(),
            "VMAF_feature_adm_score"
        );
    }
}
