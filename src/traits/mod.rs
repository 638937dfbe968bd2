// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod extractor;

pub use extractor::{ExtractorContext, ExtractorKind, FeatureExtractor};
