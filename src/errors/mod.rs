// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error taxonomy.
//!
//! * [`RegistryError`] - a requested extractor type matches zero or several
//!   registered variants (configuration defect, never retried)
//! * [`ExtractionError`] - anything an extractor's `run` or cleanup raises
//! * [`AssemblyError`] - what the assembler surfaces to its caller, including
//!   consistency violations between an extractor and its declared atoms
//! * [`StoreError`] / [`ConfigError`] - result store and config loading

mod assembly;
mod config;
mod extraction;
mod registry;
mod store;

pub use assembly::AssemblyError;
pub use config::ConfigError;
pub use extraction::ExtractionError;
pub use registry::RegistryError;
pub use store::StoreError;
