// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Parser for the per-frame output of the VMAF feature tool.
//!
//! The tool prints one line per atom feature per frame:
//!
//! ```text
//! vif: 0 0.913
//! adm: 0 0.954
//! ```
//!
//! Lines without a `:` and lines naming an atom nobody asked for are ignored
//! (banners, progress output). A line naming a tracked atom must carry a
//! frame index and a finite value.

use std::collections::BTreeMap;

/// A line that names a tracked atom but cannot be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedLine {
    /// 1-based.
    pub line_number: usize,
    pub line: String,
}

/// Per-frame values collected for a fixed set of atom features.
#[derive(Debug, Clone)]
pub struct FrameScores {
    frames: BTreeMap<&'static str, Vec<f64>>,
    lines_seen: usize,
}

impl FrameScores {
    pub fn new(atom_features: &[&'static str]) -> Self {
        Self {
            frames: atom_features.iter().map(|atom| (*atom, Vec::new())).collect(),
            lines_seen: 0,
        }
    }

    pub fn push_line(&mut self, line: &str) -> Result<(), MalformedLine> {
        self.lines_seen += 1;
        let line_number = self.lines_seen;

        let Some((name, rest)) = line.split_once(':') else {
            return Ok(());
        };
        let Some(values) = self.frames.get_mut(name.trim()) else {
            return Ok(());
        };

        let malformed = || MalformedLine {
            line_number,
            line: line.to_string(),
        };

        let mut fields = rest.split_whitespace();
        let (Some(frame), Some(value), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(malformed());
        };
        if frame.parse::<usize>().is_err() {
            return Err(malformed());
        }
        match value.parse::<f64>() {
            Ok(value) if value.is_finite() => {
                values.push(value);
                Ok(())
            }
            _ => Err(malformed()),
        }
    }

    /// Mean over frames, or `None` when the atom has no frames.
    pub fn mean(&self, atom_feature: &str) -> Option<f64> {
        let values = self.frames.get(atom_feature)?;
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Largest number of frames seen for any tracked atom.
    pub fn frame_count(&self) -> usize {
        self.frames.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }
}
