// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! VMAF elementary features via the external `vmaf` tool.

mod extractor;
pub mod log_parser;

pub use extractor::VmafFeatureExtractor;
