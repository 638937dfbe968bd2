// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging in the feature assembler. Message types follow a
//! struct-based pattern with a `Display` implementation, so no log text is
//! scattered through the code as string literals.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::assembler` - assembly lifecycle, merge and cleanup events
//! * `messages::extractor` - extractor resolution, tool invocation and failures
//! * `messages::store` - result store hits and writes
//!
//! # Usage
//!
//! ```rust
//! use feature_assembler::observability::messages::extractor::ExtractorResolved;
//! use feature_assembler::observability::messages::StructuredLog;
//!
//! let msg = ExtractorResolved {
//!     type_tag: "VMAF_feature",
//!     version: "0.1",
//!     atom_count: 4,
//! };
//!
//! msg.log();
//! ```
//!
//! The library emits events only. Installing a subscriber is left to the
//! binary (see `main.rs`).

pub mod messages;
