// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::assembler::ordering::effective_atom_features;
use crate::config::FeatureRequest;
use crate::errors::AssemblyError;
use crate::observability::messages::assembler::ConsistencyViolation;
use crate::observability::messages::StructuredLog;
use crate::registry::ExtractorRegistry;
use crate::types::{RawResultSet, ScoreRecord};

/// Merge per-type raw results into one record per asset.
///
/// Every result set must hold exactly `asset_count` entries, and every entry
/// must contain the key of each requested atom feature. Extra keys an
/// extractor returns are ignored.
pub(crate) fn merge_records(
    request: &FeatureRequest,
    registry: &ExtractorRegistry,
    raw_results: &HashMap<String, RawResultSet>,
    asset_count: usize,
) -> Result<Vec<ScoreRecord>, AssemblyError> {
    let types = request.sorted_types();

    for &type_tag in &types {
        let actual = raw_results.get(type_tag).map_or(0, Vec::len);
        if actual != asset_count {
            let error = AssemblyError::ResultCountMismatch {
                type_tag: type_tag.to_string(),
                expected: asset_count,
                actual,
            };
            report_violation(type_tag, &error);
            return Err(error);
        }
    }

    let mut records = vec![ScoreRecord::new(); asset_count];

    for &type_tag in &types {
        let variant = registry.resolve(type_tag)?;
        let Some(selection) = request.selection(type_tag) else {
            continue;
        };
        let Some(result_set) = raw_results.get(type_tag) else {
            continue;
        };

        for atom in effective_atom_features(selection, variant) {
            let score_key = variant.score_key_for(&atom);
            for (asset_index, (record, scores)) in records.iter_mut().zip(result_set).enumerate() {
                let Some(&score) = scores.get(&score_key) else {
                    let error = AssemblyError::MissingScore {
                        type_tag: type_tag.to_string(),
                        score_key,
                        asset_index,
                    };
                    report_violation(type_tag, &error);
                    return Err(error);
                };
                record.insert(score_key.clone(), score);
            }
        }
    }

    Ok(records)
}

fn report_violation(type_tag: &str, error: &AssemblyError) {
    let detail = error.to_string();
    ConsistencyViolation {
        type_tag,
        detail: &detail,
    }
    .log();
}
