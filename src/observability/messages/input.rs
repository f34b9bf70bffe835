// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the input stream lifecycle.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// The input was opened and its format chosen.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct InputOpened<'a> {
    pub name: &'a str,
    pub format: &'a str,
}

impl Display for InputOpened<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Opened {} input from {}", self.format, self.name)
    }
}

impl StructuredLog for InputOpened<'_> {
    fn log(&self) {
        tracing::debug!(name = self.name, format = self.format, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "input",
            span_name = name,
            input = self.name,
            format = self.format,
        )
    }
}

/// The input's release action ran.
///
/// # Log Level
/// `debug!` - Diagnostic detail
pub struct InputReleased<'a> {
    pub name: &'a str,
}

impl Display for InputReleased<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Released input {}", self.name)
    }
}

impl StructuredLog for InputReleased<'_> {
    fn log(&self) {
        tracing::debug!(name = self.name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("input_released", span_name = name, input = self.name)
    }
}
