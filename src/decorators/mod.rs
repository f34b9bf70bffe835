// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Transparent wrappers around a single domain.
//!
//! A decorator owns exactly one `Box<dyn Domain>`, implements the whole
//! `Domain` trait by delegation and adds one cross-cutting behaviour:
//!
//! * `log` - JSON line per interaction, written to a file
//! * `stats` - per-operation counters, reported on drop
//! * `debug` - every interaction printed to stderr
//! * `trace` - replayable `.strace` output, optionally with checked answers
//! * `equalities` - equal sets remembered so repeat queries skip the backend
//! * `singleton` - point sets synthesised from constant constraints
//! * `pack` - variables spread over separate instances of a backend
//!
//! The first four only watch calls go by, so they share [`observed::Observed`]
//! and differ in their [`observed::Observer`].

pub mod debug;
pub mod equalities;
pub mod log;
pub mod observed;
pub mod pack;
pub mod singleton;
pub mod stats;
pub mod trace;

pub use observed::{Call, Observed, Observer, Reply};
