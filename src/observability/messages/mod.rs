// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it as a `tracing` event with typed fields.
//!
//! # Organization
//!
//! * `assembler` - assembly lifecycle, merge and cleanup events
//! * `extractor` - extractor resolution, tool invocation and failures
//! * `store` - result store hits and writes

use tracing::Span;

pub mod assembler;
pub mod extractor;
pub mod store;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the message as a `tracing` event in the current span.
    fn log(&self);

    /// Build a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
