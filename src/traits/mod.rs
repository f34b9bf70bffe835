// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod domain;
pub mod interpreter;

pub use domain::{Domain, SetId, VarId};
pub use interpreter::Interpreter;
