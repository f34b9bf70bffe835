// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for optional backend detection.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An optional dependency was found at a sufficient version.
///
/// # Log Level
/// `info!` - Important operational event
pub struct FeatureEnabled<'a> {
    pub package: &'a str,
    pub version: &'a str,
}

impl Display for FeatureEnabled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Optional backend '{}' enabled (version {})",
            self.package, self.version
        )
    }
}

impl StructuredLog for FeatureEnabled<'_> {
    fn log(&self) {
        tracing::info!(
            package = self.package,
            version = self.version,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "feature_enabled",
            span_name = name,
            package = self.package,
            version = self.version,
        )
    }
}

/// An optional dependency is absent or too old. Expected state, not a failure.
///
/// # Log Level
/// `debug!` - Diagnostic detail
///
/// # Example
/// ```
/// use setstack::observability::messages::features::FeatureDisabled;
///
/// let msg = FeatureDisabled {
///     package: "z3",
///     found: Some("4.6.0"),
///     minimum: "4.8.0",
/// };
///
/// assert_eq!(
///     msg.to_string(),
///     "Optional backend 'z3' disabled: found 4.6.0, need at least 4.8.0"
/// );
/// ```
pub struct FeatureDisabled<'a> {
    pub package: &'a str,
    pub found: Option<&'a str>,
    pub minimum: &'a str,
}

impl Display for FeatureDisabled<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.found {
            Some(found) => write!(
                f,
                "Optional backend '{}' disabled: found {}, need at least {}",
                self.package, found, self.minimum
            ),
            None => write!(
                f,
                "Optional backend '{}' disabled: not installed",
                self.package
            ),
        }
    }
}

impl StructuredLog for FeatureDisabled<'_> {
    fn log(&self) {
        tracing::debug!(
            package = self.package,
            found = self.found,
            minimum = self.minimum,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "feature_disabled",
            span_name = name,
            package = self.package,
            minimum = self.minimum,
        )
    }
}
