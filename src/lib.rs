// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod assembler;  // run + merge + cleanup orchestration
pub mod asset;      // media assets under analysis
pub mod backends;   // feature extractor implementations
pub mod config;     // config loading + runtime builder
pub mod errors;     // error handling
pub mod observability;
pub mod registry;   // extractor variant lookup
pub mod store;      // memoized per-asset results
pub mod traits;     // extractor contract
pub mod types;      // score keys and result shapes
