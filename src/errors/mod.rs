// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod domain;
mod interpret;
mod parse;

pub use config::{ConfigError, ConfigWarning};
pub use domain::{DomainError, DomainResult};
pub use interpret::InterpretError;
pub use parse::ParseError;
