// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors reported by domain backends and decorators.

use thiserror::Error;

use crate::traits::{SetId, VarId};

/// Failure of a single domain operation.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("unknown set handle {0}")]
    UnknownSet(SetId),

    #[error("unknown variable {0}")]
    UnknownVariable(VarId),

    #[error("unsupported variable width {0} (expected 1..=63 bits)")]
    InvalidWidth(u32),

    #[error("value {value} does not fit in {bits} bits")]
    ValueOutOfRange { value: u64, bits: u32 },

    #[error("variables of different widths compared: {left} vs {right} bits")]
    WidthMismatch { left: u32, right: u32 },

    #[error("point has {got} coordinates but {expected} variables are declared")]
    ArityMismatch { expected: usize, got: usize },

    #[error("universe of 2^{bits} valuations exceeds the limit of 2^{limit_bits}")]
    UniverseTooLarge { bits: u32, limit_bits: u32 },

    #[error("operation '{operation}' is not supported by {domain}")]
    Unsupported {
        operation: &'static str,
        domain: String,
    },

    /// Backend plumbing failure (solver process, I/O).
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
