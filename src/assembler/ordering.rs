// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Canonical ordering of score keys.
//!
//! Downstream models read feature vectors positionally, so the key order
//! must not depend on how a request was written or on hash-map iteration:
//! type tags sorted lexicographically, and within a type, atom features
//! sorted lexicographically.

use crate::config::{AtomSelection, FeatureRequest};
use crate::errors::RegistryError;
use crate::registry::{ExtractorRegistry, ExtractorVariant};
use crate::types::ScoreKey;

/// Atom features actually produced for `selection`, sorted.
///
/// `All` expands to the variant's declared set; an explicit selection is
/// taken as-is.
pub fn effective_atom_features(selection: &AtomSelection, variant: &ExtractorVariant) -> Vec<String> {
    let mut atoms: Vec<String> = match selection {
        AtomSelection::All => variant
            .default_atom_features()
            .iter()
            .map(|atom| atom.to_string())
            .collect(),
        AtomSelection::Explicit(atoms) => atoms.iter().cloned().collect(),
    };
    atoms.sort_unstable();
    atoms.dedup();
    atoms
}

/// The score keys of `request`, in canonical order.
///
/// Depends only on the request and the registry; no extraction is needed.
pub fn ordered_score_keys(
    request: &FeatureRequest,
    registry: &ExtractorRegistry,
) -> Result<Vec<ScoreKey>, RegistryError> {
    let mut keys = Vec::new();

    for type_tag in request.sorted_types() {
        let variant = registry.resolve(type_tag)?;
        let Some(selection) = request.selection(type_tag) else {
            continue;
        };
        keys.extend(
            effective_atom_features(selection, variant)
                .iter()
                .map(|atom| variant.score_key_for(atom)),
        );
    }

    Ok(keys)
}
