// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

/// Malformed input for the selected format, located at the offending token.
///
/// Lines and columns are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("({line}:{col}) Parse error: {message}")]
pub struct ParseError {
    pub line: usize,
    pub col: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, col: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            col,
            message: message.into(),
        }
    }
}
