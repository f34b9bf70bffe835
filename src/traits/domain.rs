// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The capability interface shared by every backend and decorator.
//!
//! A domain manages sets of *valuations*: assignments of a value to each
//! declared bit-vector variable. Sets and variables are referred to through
//! small copyable handles owned by the domain that issued them.

use std::fmt;

use serde::Serialize;

use crate::errors::{DomainError, DomainResult};

/// Handle to a set held by a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SetId(pub u32);

/// Handle to a declared variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct VarId(pub u32);

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Symbolic set operations.
///
/// Interpreters only ever see `Box<dyn Domain>`; they cannot tell which
/// backend or decorator chain they were handed. Decorators implement this
/// trait by delegating every method to the domain they own.
pub trait Domain: fmt::Debug {
    /// Human readable name of the chain, e.g. `stats(explicit)`.
    fn describe(&self) -> String;

    /// Declare a new variable ranging over `0..2^bits`.
    ///
    /// Sets that already exist are extended to the new dimension unconstrained.
    fn declare(&mut self, name: &str, bits: u32) -> DomainResult<VarId>;

    /// Every valuation.
    fn top(&mut self) -> DomainResult<SetId>;

    /// No valuation.
    fn bottom(&mut self) -> DomainResult<SetId>;

    /// Valuations where `var == value`.
    fn var_eq_const(&mut self, var: VarId, value: u64) -> DomainResult<SetId>;

    /// Valuations where `a == b`. Both variables must have the same width.
    fn var_eq_var(&mut self, a: VarId, b: VarId) -> DomainResult<SetId>;

    /// The set holding exactly one valuation, given in declaration order.
    fn singleton(&mut self, point: &[u64]) -> DomainResult<SetId> {
        let _ = point;
        Err(DomainError::Unsupported {
            operation: "singleton",
            domain: self.describe(),
        })
    }

    fn union(&mut self, a: SetId, b: SetId) -> DomainResult<SetId>;

    fn intersect(&mut self, a: SetId, b: SetId) -> DomainResult<SetId>;

    /// Valuations in `a` but not in `b`.
    fn difference(&mut self, a: SetId, b: SetId) -> DomainResult<SetId>;

    fn complement(&mut self, a: SetId) -> DomainResult<SetId>;

    /// Existential projection: forget the value of `var`.
    fn exists(&mut self, set: SetId, var: VarId) -> DomainResult<SetId>;

    fn is_empty(&mut self, set: SetId) -> DomainResult<bool>;

    fn equal(&mut self, a: SetId, b: SetId) -> DomainResult<bool>;

    /// Is `a` contained in `b`?
    fn subset(&mut self, a: SetId, b: SetId) -> DomainResult<bool>;

    /// Drop a set. The handle must not be used afterwards.
    fn release(&mut self, set: SetId) -> DomainResult<()>;
}
