// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for decorator side effects.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A decorator could not write to its file; it stops writing but the
/// domain keeps working.
///
/// # Log Level
/// `warn!` - Degraded behaviour
pub struct DecoratorWriteFailed<'a> {
    pub decorator: &'a str,
    pub path: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for DecoratorWriteFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "{} decorator stopped writing to '{}': {}",
            self.decorator, self.path, self.error
        )
    }
}

impl StructuredLog for DecoratorWriteFailed<'_> {
    fn log(&self) {
        tracing::warn!(
            decorator = self.decorator,
            path = self.path,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "decorator_write_failed",
            span_name = name,
            decorator = self.decorator,
            path = self.path,
        )
    }
}

/// Final operation counts of a `stats` decorator.
///
/// # Log Level
/// `info!` - Important operational event
pub struct StatisticsReport<'a> {
    pub total_calls: u64,
    pub summary: &'a str,
}

impl Display for StatisticsReport<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Domain statistics: {} calls {}", self.total_calls, self.summary)
    }
}

impl StructuredLog for StatisticsReport<'_> {
    fn log(&self) {
        tracing::info!(total_calls = self.total_calls, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "statistics_report",
            span_name = name,
            total_calls = self.total_calls,
        )
    }
}
