// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for parsing and interpretation.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Interpretation started.
///
/// # Log Level
/// `info!` - Important operational event
pub struct InterpretationStarted<'a> {
    pub format: &'a str,
    pub domain: &'a str,
    pub statements: usize,
}

impl Display for InterpretationStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Interpreting {} statements of {} input on {}",
            self.statements, self.format, self.domain
        )
    }
}

impl StructuredLog for InterpretationStarted<'_> {
    fn log(&self) {
        tracing::info!(
            format = self.format,
            domain = self.domain,
            statements = self.statements,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "interpretation",
            span_name = name,
            format = self.format,
            domain = self.domain,
        )
    }
}

/// Interpretation finished without error.
///
/// # Log Level
/// `info!` - Important operational event
pub struct InterpretationCompleted<'a> {
    pub format: &'a str,
    pub executed: usize,
    pub duration: std::time::Duration,
}

impl Display for InterpretationCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} interpretation completed: {} statements in {:?}",
            self.format, self.executed, self.duration
        )
    }
}

impl StructuredLog for InterpretationCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            format = self.format,
            executed = self.executed,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "interpretation_completed",
            span_name = name,
            format = self.format,
            executed = self.executed,
        )
    }
}

/// The input could not be parsed.
///
/// # Log Level
/// `debug!` - The user-facing report goes to stderr separately
pub struct ParseFailed<'a> {
    pub input: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for ParseFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.input, self.error)
    }
}

impl StructuredLog for ParseFailed<'_> {
    fn log(&self) {
        tracing::debug!(input = self.input, error = %self.error, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("parse_failed", span_name = name, input = self.input)
    }
}
