// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Top-level run: tokens in, exit status out.
//!
//! The order is fixed. Tokens are resolved and the domain is assembled,
//! discarding extras, before the input is opened. The input is parsed with
//! the front-end its name selects, and the domain moves into the matching
//! interpreter. Diagnostics go to `err`, script output to `out`.

use std::io::Write;
use std::time::Instant;

use crate::config::consts::PROGRAM_NAME;
use crate::config::{merge_args, parse_invocation, Registry, StackAssembler};
use crate::errors::{ConfigError, InterpretError};
use crate::features::FeatureSet;
use crate::input::InputStream;
use crate::interp::{ScriptInterpreter, TraceInterpreter};
use crate::lang::{self, Ast};
use crate::observability::messages::interpreter::{
    InterpretationCompleted, InterpretationStarted, ParseFailed,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{Domain, Interpreter};


/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    /// Bad arguments or an unassemblable stack.
    Config,
    Parse,
    /// Interpreter or backend failure, including failed assertions and checks.
    Interpret,
    /// The input could not be opened or read.
    Input,
}

impl Status {
    pub fn code(self) -> u8 {
        match self {
            Status::Success => 0,
            Status::Config => 1,
            Status::Parse => 2,
            Status::Interpret => 3,
            Status::Input => 4,
        }
    }
}

/// Run the whole pipeline for explicit `tokens` plus the environment value.
pub fn run(
    tokens: &[String],
    env_value: Option<&str>,
    features: &FeatureSet,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Status {
    let registry = Registry::standard(features);
    let usage = registry.usage(PROGRAM_NAME);
    let tokens = merge_args(tokens, env_value);

    let invocation = match parse_invocation(&registry, &tokens) {
        Ok(invocation) => invocation,
        Err(e) => return config_failure(err, &e, &usage),
    };
    if invocation.help {
        let _ = write!(err, "{usage}");
        return Status::Success;
    }

    let mut assembler = StackAssembler::new();
    let assembled = match assembler.run(&invocation.commands) {
        Ok(()) => assembler.finish(),
        Err(e) => Err(e),
    };
    let assembled = match assembled {
        Ok(assembled) => assembled,
        Err(e) => return config_failure(err, &e, &usage),
    };
    if let Some(warning) = &assembled.warning {
        let _ = writeln!(err, "warning: {warning}");
    }

    let stream = match InputStream::open(invocation.input.as_deref()) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = writeln!(err, "error: {e:#}");
            return Status::Input;
        }
    };

    execute(assembled.domain, stream, out, err)
}

fn config_failure(err: &mut dyn Write, error: &ConfigError, usage: &str) -> Status {
    let _ = writeln!(err, "error: {error}");
    let _ = write!(err, "\n{usage}");
    Status::Config
}

/// Parse `stream` and interpret it with `domain`.
///
/// The stream is released exactly once on every path. After a successful
/// parse that happens once the interpreter and its domain are gone.
pub fn execute(
    domain: Box<dyn Domain>,
    mut stream: InputStream,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Status {
    let bytes = match stream.read_to_end() {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = writeln!(err, "error: cannot read input '{}': {e}", stream.name());
            return Status::Input;
        }
    };

    let format = stream.format();
    let ast = match lang::decode(&bytes).and_then(|text| lang::parse(text, format)) {
        Ok(ast) => ast,
        Err(e) => {
            ParseFailed {
                input: stream.name(),
                error: &e,
            }
            .log();
            let _ = writeln!(err, "{}: {e}", stream.name());
            return Status::Parse;
        }
    };

    let description = domain.describe();
    let started = InterpretationStarted {
        format: format.as_str(),
        domain: &description,
        statements: ast.len(),
    };
    let span = started.span("interpret");
    let _enter = span.enter();
    started.log();

    let start = Instant::now();
    let result = interpret(domain, &ast, out);

    let status = match result {
        Ok(executed) => {
            InterpretationCompleted {
                format: format.as_str(),
                executed,
                duration: start.elapsed(),
            }
            .log();
            Status::Success
        }
        Err(e) => {
            let _ = writeln!(err, "error: {}: {e}", stream.name());
            Status::Interpret
        }
    };
    drop(stream);
    status
}

fn interpret(domain: Box<dyn Domain>, ast: &Ast, out: &mut dyn Write) -> Result<usize, InterpretError> {
    match ast {
        Ast::Script(script) => ScriptInterpreter::new(domain, out).run(script),
        Ast::Trace(trace) => TraceInterpreter::new(domain).run(trace),
    }
}
