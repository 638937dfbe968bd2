// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod loader;
mod request;
mod runtime;

pub mod consts;

pub use loader::{
    load_and_validate_config, load_config, validate_config, Config, ResultStoreConfig,
    RuntimeOptions,
};
pub use request::{AtomSelection, FeatureRequest};
pub use runtime::RuntimeBuilder;
