// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Leaf domain implementations.
//!
//! Each backend implements the `Domain` trait with one concrete
//! representation and is instantiated by name through the registry.
//!
//! # Available Backends
//!
//! ## Explicit Backend
//! Enumerates every valuation of a set:
//! - **Dependencies**: none, so it is always registered (`--explicit`)
//! - **Limits**: universes up to 2^20 valuations
//! - **Use Case**: small problems, testing, reference answers
//!
//! ## SMT Backend
//! Keeps sets as bit-vector formulas and asks an external solver:
//! - **Solvers**: `z3` (`--z3`) and `cvc5` (`--cvc5`)
//! - **Gating**: each token exists only when its solver was detected at a
//!   sufficient version
//! - **Use Case**: wide variables that cannot be enumerated
//!
//! # Architecture
//!
//! ```text
//! Token → Registry entry → Backend constructor → Box<dyn Domain> → Stack
//! ```

pub mod explicit;
pub mod smt;

pub use explicit::ExplicitDomain;
pub use smt::SmtDomain;
