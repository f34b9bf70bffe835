// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors raised while turning arguments into a single assembled domain.

use std::fmt;

use thiserror::Error;

use crate::errors::DomainError;

/// Fatal configuration problems. Each one stops the run before any input is read.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Assembly finished with nothing on the stack.
    #[error("no domain specified: give at least one backend, e.g. --explicit")]
    NoDomain,

    /// A decorator was applied while the stack was empty.
    #[error("decorator '--{decorator}' has no input domain: push a backend before it")]
    EmptyStack { decorator: String },

    /// A token that names no registry entry.
    #[error("unknown argument '{0}'")]
    UnknownArgument(String),

    /// An option that takes a value came last, or with an empty value.
    #[error("argument '--{option}' expects a value")]
    MissingValue { option: String },

    /// `--name=value` given for an option that takes no value.
    #[error("argument '--{option}' does not take a value (got '{value}')")]
    UnexpectedValue { option: String, value: String },

    /// More than one positional input file.
    #[error("more than one input file given: '{first}' and '{second}'")]
    ExtraInput { first: String, second: String },

    /// A backend or decorator constructor failed.
    #[error("failed to construct '--{name}': {source}")]
    Construction {
        name: String,
        #[source]
        source: DomainError,
    },
}

/// Non-fatal configuration findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// More than one domain was left on the stack; only the top one is used.
    UnusedDomains { used: String, discarded: Vec<String> },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::UnusedDomains { used, discarded } => write!(
                f,
                "{} domain(s) left on the stack; using '{}' and discarding {}",
                discarded.len() + 1,
                used,
                discarded
                    .iter()
                    .map(|d| format!("'{d}'"))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}
