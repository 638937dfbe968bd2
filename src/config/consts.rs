// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Selection keyword meaning "every atom feature the variant declares"
pub const ALL_ATOM_FEATURES: &str = "all";
/// Directory for per-asset extractor logs
pub const DEFAULT_LOG_DIR: &str = "logs";
/// Parent directory for per-asset extractor working directories
pub const DEFAULT_WORKDIR_ROOT: &str = "workdir";
/// External VMAF feature tool, resolved through `PATH` unless configured
pub const DEFAULT_VMAF_EXECUTABLE: &str = "vmaf";
/// Pixel format assumed when an asset does not declare one
pub const DEFAULT_YUV_TYPE: &str = "yuv420p";
/// Extractor types run one after another unless raised
pub const DEFAULT_MAX_CONCURRENCY: usize = 1;
