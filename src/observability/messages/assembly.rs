// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for domain stack assembly.
//!
//! This module contains message types for logging events related to:
//! * Backends pushed onto the stack
//! * Decorators wrapping the top of the stack
//! * The final single domain, and any discarded leftovers

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A backend was constructed and pushed.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct BackendPushed<'a> {
    pub name: &'a str,
    pub depth: usize,
}

impl Display for BackendPushed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Pushed backend '{}' (stack depth {})", self.name, self.depth)
    }
}

impl StructuredLog for BackendPushed<'_> {
    fn log(&self) {
        tracing::debug!(name = self.name, depth = self.depth, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "backend_pushed",
            span_name = name,
            backend = self.name,
            depth = self.depth,
        )
    }
}

/// A decorator replaced the top of the stack with a wrapped domain.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use setstack::observability::messages::assembly::DecoratorApplied;
///
/// let msg = DecoratorApplied {
///     name: "stats",
///     result: "stats(explicit)",
/// };
///
/// assert_eq!(msg.to_string(), "Applied decorator 'stats': stats(explicit)");
/// ```
pub struct DecoratorApplied<'a> {
    pub name: &'a str,
    pub result: &'a str,
}

impl Display for DecoratorApplied<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Applied decorator '{}': {}", self.name, self.result)
    }
}

impl StructuredLog for DecoratorApplied<'_> {
    fn log(&self) {
        tracing::debug!(name = self.name, result = self.result, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "decorator_applied",
            span_name = name,
            decorator = self.name,
            result = self.result,
        )
    }
}

/// Assembly finished with one domain selected.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DomainAssembled<'a> {
    pub description: &'a str,
    pub discarded: usize,
}

impl Display for DomainAssembled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Assembled domain {}", self.description)?;
        if self.discarded > 0 {
            write!(f, " ({} unused domain(s) discarded)", self.discarded)?;
        }
        Ok(())
    }
}

impl StructuredLog for DomainAssembled<'_> {
    fn log(&self) {
        tracing::info!(
            description = self.description,
            discarded = self.discarded,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "domain",
            span_name = name,
            description = self.description,
        )
    }
}

/// A domain left below the top of the stack is being dropped.
///
/// # Log Level
/// `debug!` - Diagnostic detail; the user-facing warning is printed separately
pub struct DomainDiscarded<'a> {
    pub description: &'a str,
}

impl Display for DomainDiscarded<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Disposing unused domain {}", self.description)
    }
}

impl StructuredLog for DomainDiscarded<'_> {
    fn log(&self) {
        tracing::debug!(description = self.description, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "domain_discarded",
            span_name = name,
            description = self.description,
        )
    }
}
