// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! From command-line tokens to one assembled domain.
//!
//! `args` merges explicit and environment tokens and resolves them against
//! the `registry`; the `assembler` replays the resulting commands on a stack.

mod args;
mod assembler;
mod registry;

#[cfg(test)]
mod integration_tests;
pub mod consts;

pub use args::{env_args, merge_args, parse_invocation, Invocation};
pub use assembler::{Assembled, StackAssembler, StackCommand};
pub use registry::{
    standard_entries, BackendCtor, DecoratorCtor, EntryKind, Registry, RegistryEntry,
};
