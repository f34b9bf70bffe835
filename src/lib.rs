// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;   // explicit and SMT domains
pub mod config;     // tokens, registry, stack assembly
pub mod decorators; // transparent domain wrappers
pub mod driver;     // parse and interpret dispatch
pub mod errors;     // error handling
pub mod features;   // optional backend detection
pub mod input;      // input streams and format dispatch
pub mod interp;     // script and trace interpreters
pub mod lang;       // lexer, parsers, syntax trees
pub mod observability;
pub mod traits;     // unified abstractions
