// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for human-readable output and
//! [`StructuredLog`] to emit itself, with its fields attached, at the level
//! documented on the type.
//!
//! # Organization
//!
//! * `features` - optional backend detection
//! * `assembly` - stack assembly events and warnings
//! * `decorators` - decorator side effects
//! * `input` - input stream lifecycle
//! * `interpreter` - parse and interpretation lifecycle

use tracing::Span;

pub mod assembly;
pub mod decorators;
pub mod features;
pub mod input;
pub mod interpreter;

/// A message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emit the event.
    fn log(&self);

    /// A span carrying the same fields, for scoping nested events.
    fn span(&self, name: &str) -> Span;
}
