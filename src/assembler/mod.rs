// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Feature assembly: run the requested extractors and merge their output.
//!
//! * [`FeatureAssembler`] - orchestrates extraction, merge and cleanup
//! * [`ordered_score_keys`] - canonical key order for positional feature vectors
//!
//! Extraction is driven by the unordered requested set, while presentation
//! always follows the canonical order. The two never mix: positional
//! consumers must use [`ordered_score_keys`], not the request's iteration
//! order.

#[allow(clippy::module_inception)]
mod assembler;
mod merge;
mod ordering;

#[cfg(test)]
mod integration_tests;

pub use assembler::{AssemblerState, AssemblyContext, FeatureAssembler};
pub use ordering::{effective_atom_features, ordered_score_keys};
