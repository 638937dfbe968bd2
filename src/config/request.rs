// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::ALL_ATOM_FEATURES;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::hash_map;
use std::collections::{BTreeSet, HashMap};

/// Which atom features of one extractor type are requested.
///
/// # Example
/// ```yaml
/// VMAF_feature: all          # AtomSelection::All
/// PSNR_feature: [psnr]       # AtomSelection::Explicit
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomSelection {
    /// Every atom feature the variant declares.
    All,
    /// Exactly these atom features.
    Explicit(BTreeSet<String>),
}

impl AtomSelection {
    pub fn explicit<I, S>(atoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AtomSelection::Explicit(atoms.into_iter().map(Into::into).collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, AtomSelection::All)
    }
}

#[derive(Deserialize, Serialize)]
#[serde(untagged)]
enum RawSelection {
    Keyword(String),
    List(Vec<String>),
}

impl<'de> Deserialize<'de> for AtomSelection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawSelection::deserialize(deserializer)? {
            RawSelection::Keyword(keyword) if keyword == ALL_ATOM_FEATURES => Ok(AtomSelection::All),
            RawSelection::Keyword(other) => Err(serde::de::Error::custom(format!(
                "invalid atom selection '{}': expected \"{}\" or a list of atom features",
                other, ALL_ATOM_FEATURES
            ))),
            RawSelection::List(atoms) => Ok(AtomSelection::explicit(atoms)),
        }
    }
}

impl Serialize for AtomSelection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = match self {
            AtomSelection::All => RawSelection::Keyword(ALL_ATOM_FEATURES.to_string()),
            AtomSelection::Explicit(atoms) => RawSelection::List(atoms.iter().cloned().collect()),
        };
        raw.serialize(serializer)
    }
}

/// Requested extractor types and, per type, the atom features wanted.
///
/// The map carries no ordering. Extraction is driven by the unordered
/// [`requested_types`](Self::requested_types); presentation order comes from
/// [`ordered_score_keys`](crate::assembler::ordered_score_keys).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureRequest(HashMap<String, AtomSelection>);

impl FeatureRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request every declared atom feature of `type_tag`.
    pub fn with_all(mut self, type_tag: impl Into<String>) -> Self {
        self.insert(type_tag, AtomSelection::All);
        self
    }

    /// Request exactly `atoms` of `type_tag`.
    pub fn with_atoms<I, S>(mut self, type_tag: impl Into<String>, atoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(type_tag, AtomSelection::explicit(atoms));
        self
    }

    /// Returns the previous selection for `type_tag`, if any.
    pub fn insert(
        &mut self,
        type_tag: impl Into<String>,
        selection: AtomSelection,
    ) -> Option<AtomSelection> {
        self.0.insert(type_tag.into(), selection)
    }

    pub fn selection(&self, type_tag: &str) -> Option<&AtomSelection> {
        self.0.get(type_tag)
    }

    /// The requested set, in no particular order.
    pub fn requested_types(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn sorted_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.requested_types().collect();
        types.sort_unstable();
        types
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, AtomSelection> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, AtomSelection)> for FeatureRequest {
    fn from_iter<I: IntoIterator<Item = (String, AtomSelection)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
