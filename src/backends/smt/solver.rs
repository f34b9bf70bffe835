// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! External SMT solver processes.

use std::fmt;
use std::io::Write;
use std::process::{Command, Stdio};

use anyhow::{anyhow, bail, Context};

/// Answer to a single `(check-sat)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SatResult {
    Sat,
    Unsat,
    Unknown,
}

impl SatResult {
    /// Read the first meaningful line of solver output.
    pub fn from_output(output: &str) -> Option<Self> {
        match output.lines().map(str::trim).find(|l| !l.is_empty())? {
            "sat" => Some(SatResult::Sat),
            "unsat" => Some(SatResult::Unsat),
            "unknown" => Some(SatResult::Unknown),
            _ => None,
        }
    }
}

/// Decides satisfiability of a complete SMT-LIB script.
pub trait Solver: fmt::Debug {
    fn check_sat(&mut self, script: &str) -> anyhow::Result<SatResult>;
}

/// Runs one solver process per query, feeding the script on stdin.
#[derive(Debug, Clone)]
pub struct ProcessSolver {
    program: String,
    args: Vec<String>,
}

impl ProcessSolver {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn z3() -> Self {
        Self::new("z3", &["-in", "-smt2"])
    }

    pub fn cvc5() -> Self {
        Self::new("cvc5", &["--lang=smt2"])
    }
}

impl Solver for ProcessSolver {
    fn check_sat(&mut self, script: &str) -> anyhow::Result<SatResult> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("failed to start solver '{}'", self.program))?;

        let sent = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(script.as_bytes()).map_err(anyhow::Error::from),
            None => Err(anyhow!("solver stdin was not captured")),
        };
        if let Err(error) = sent {
            // Reap the child before reporting; it may still be running.
            let _ = child.kill();
            let _ = child.wait();
            return Err(error.context(format!("failed to send query to '{}'", self.program)));
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("solver '{}' did not finish", self.program))?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        match SatResult::from_output(&stdout) {
            Some(result) => Ok(result),
            None => bail!(
                "solver '{}' gave no verdict: {}{}",
                self.program,
                stdout.trim(),
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        }
    }
}
