// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging in setstack. Message types follow a struct-based
//! pattern with a `Display` implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent between human and structured output
//! * Give every event one obvious log level
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::features` - optional backend detection
//! * `messages::assembly` - domain stack assembly
//! * `messages::decorators` - decorator side effects (files, summaries)
//! * `messages::input` - input acquisition and release
//! * `messages::interpreter` - parsing and interpretation lifecycle
//!
//! # Usage
//!
//! ```rust
//! use setstack::observability::messages::assembly::DomainAssembled;
//! use setstack::observability::messages::StructuredLog;
//!
//! let msg = DomainAssembled {
//!     description: "stats(explicit)",
//!     discarded: 0,
//! };
//!
//! msg.log();
//! ```

pub mod messages;

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset: warnings and errors only.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Install the global `fmt` subscriber writing to stderr.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
