// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::InterpretError;

/// Executes one parsed program against the domain the interpreter owns.
pub trait Interpreter {
    type Program;

    /// Run `program` to completion, returning the number of statements executed.
    fn run(&mut self, program: &Self::Program) -> Result<usize, InterpretError>;
}
