// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Feature extractor implementations.
//!
//! Each extractor implements [`FeatureExtractor`](crate::traits::FeatureExtractor)
//! and [`ExtractorKind`](crate::traits::ExtractorKind), and is made available to
//! assemblies by registering it in an
//! [`ExtractorRegistry`](crate::registry::ExtractorRegistry).
//!
//! # Available Extractors
//!
//! ## VMAF Feature Extractor
//! Elementary VMAF features (`vif`, `adm`, `ansnr`, `motion`) computed by the
//! external `vmaf` tool, one invocation per asset:
//! - **Output**: per-frame tool output, averaged per atom feature
//! - **FIFO mode**: tool output is streamed through a pipe and parsed live
//! - **Memoization**: per-asset results are kept in the shared result store
//!
//! ## Stub Extractors (Test-Only)
//! Deterministic extractors for assembler tests (only available in test builds):
//! - **VmafStub**: logs and stored results without an external tool
//! - **FailingStub**: simulates extraction and cleanup failures
//! - **IncompleteStub** / **MisalignedStub**: break their declared output
//! - **Note**: NOT available in production builds
//!
//! # Architecture
//!
//! ```text
//! Registry → ExtractorVariant → Extractor Instance (bound to ExtractorContext) → Assembler
//! ```
//!
//! # Examples
//!
//! ```rust
//! use feature_assembler::backends::VmafFeatureExtractor;
//! use feature_assembler::traits::ExtractorKind;
//!
//! assert_eq!(VmafFeatureExtractor::TYPE, "VMAF_feature");
//! assert_eq!(
//!     VmafFeatureExtractor::score_key_for("motion").as_str(),
//!     "VMAF_feature_motion_score"
//! );
//! ```

#[cfg(test)]
pub mod stub;
pub mod vmaf;

pub use vmaf::VmafFeatureExtractor;
