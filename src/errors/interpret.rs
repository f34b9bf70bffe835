// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while executing a script or replaying a trace.

use thiserror::Error;

use crate::errors::DomainError;

#[derive(Error, Debug)]
pub enum InterpretError {
    #[error("line {line}: undefined set '{name}'")]
    UndefinedSet { name: String, line: usize },

    #[error("line {line}: undefined variable '{name}'")]
    UndefinedVariable { name: String, line: usize },

    #[error("line {line}: variable '{name}' is already declared")]
    Redeclared { name: String, line: usize },

    #[error("line {line}: unknown trace handle '{handle}'")]
    UnknownHandle { handle: String, line: usize },

    #[error("line {line}: assertion failed: {query}")]
    AssertionFailed { query: String, line: usize },

    #[error("line {line}: check failed: expected {expected}, got {actual}")]
    CheckFailed {
        expected: bool,
        actual: bool,
        line: usize,
    },

    #[error("line {line}: {source}")]
    Domain {
        line: usize,
        #[source]
        source: DomainError,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
