// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `--trace [+]<path>`: record a replayable `.strace` file.
//!
//! A leading `+` on the path turns on check mode: every query line then
//! carries the answer observed while recording (`empty s3 -> true`), and a
//! replay fails if the backend answers differently.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context};

use crate::decorators::observed::{Call, Observed, Observer, Reply};
use crate::errors::{DomainError, DomainResult};
use crate::observability::messages::decorators::DecoratorWriteFailed;
use crate::observability::messages::StructuredLog;
use crate::traits::Domain;

/// Sign that enables check mode when it prefixes the trace path.
pub const CHECK_MODE_SIGN: char = '+';

/// Destination parsed from the decorator argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceTarget {
    pub path: PathBuf,
    pub check_mode: bool,
}

impl TraceTarget {
    pub fn parse(arg: &str) -> anyhow::Result<Self> {
        let (check_mode, path) = match arg.strip_prefix(CHECK_MODE_SIGN) {
            Some(rest) => (true, rest),
            None => (false, arg),
        };
        if path.is_empty() {
            bail!("trace decorator needs a file path after '{CHECK_MODE_SIGN}'");
        }
        Ok(Self {
            path: PathBuf::from(path),
            check_mode,
        })
    }
}

#[derive(Debug)]
pub struct TraceWriter {
    path: PathBuf,
    writer: BufWriter<File>,
    check_mode: bool,
    failed: bool,
}

impl TraceWriter {
    pub fn create(target: &TraceTarget) -> anyhow::Result<Self> {
        let file = File::create(&target.path)
            .with_context(|| format!("cannot create trace file '{}'", target.path.display()))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "# setstack operation trace")?;
        if target.check_mode {
            writeln!(writer, "# check mode: queries carry their recorded answers")?;
        }
        Ok(Self {
            path: target.path.clone(),
            writer,
            check_mode: target.check_mode,
            failed: false,
        })
    }

    /// Flush buffered records. Returns false, after logging, when the file
    /// could not be written.
    pub fn finish(&mut self) -> bool {
        if self.failed {
            return false;
        }
        if let Err(error) = self.writer.flush() {
            self.failed = true;
            DecoratorWriteFailed {
                decorator: "trace",
                path: &self.path.display().to_string(),
                error: &error,
            }
            .log();
            return false;
        }
        true
    }
}

/// Render one interaction in trace syntax.
pub fn trace_line(call: &Call<'_>, outcome: Result<Reply, &DomainError>, check_mode: bool) -> String {
    let reply = match outcome {
        Ok(reply) => reply,
        Err(error) => return format!("# failed: {call}: {error}"),
    };
    let query = |text: String| match (check_mode, reply) {
        (true, Reply::Bool(answer)) => format!("{text} -> {answer}"),
        _ => text,
    };
    match (call, reply) {
        (Call::Declare { name, bits }, Reply::Var(var)) => format!("{var} = declare {name} {bits}"),
        (Call::Top, Reply::Set(s)) => format!("{s} = top"),
        (Call::Bottom, Reply::Set(s)) => format!("{s} = bottom"),
        (Call::VarEqConst { var, value }, Reply::Set(s)) => format!("{s} = const {var} {value}"),
        (Call::VarEqVar { a, b }, Reply::Set(s)) => format!("{s} = eqvar {a} {b}"),
        (Call::Singleton { point }, Reply::Set(s)) => {
            let values: Vec<String> = point.iter().map(u64::to_string).collect();
            format!("{s} = single {}", values.join(" ")).trim_end().to_string()
        }
        (Call::Union { a, b }, Reply::Set(s)) => format!("{s} = union {a} {b}"),
        (Call::Intersect { a, b }, Reply::Set(s)) => format!("{s} = inter {a} {b}"),
        (Call::Difference { a, b }, Reply::Set(s)) => format!("{s} = diff {a} {b}"),
        (Call::Complement { a }, Reply::Set(s)) => format!("{s} = compl {a}"),
        (Call::Exists { set, var }, Reply::Set(s)) => format!("{s} = exists {set} {var}"),
        (Call::IsEmpty { set }, Reply::Bool(_)) => query(format!("empty {set}")),
        (Call::Equal { a, b }, Reply::Bool(_)) => query(format!("equal {a} {b}")),
        (Call::Subset { a, b }, Reply::Bool(_)) => query(format!("subset {a} {b}")),
        (Call::Release { set }, Reply::Unit) => format!("release {set}"),
        (call, reply) => format!("# {call} -> {reply}"),
    }
}

impl Observer for TraceWriter {
    fn label(&self) -> String {
        if self.check_mode {
            "trace+".to_string()
        } else {
            "trace".to_string()
        }
    }

    fn observe(&mut self, call: &Call<'_>, outcome: Result<Reply, &DomainError>) {
        if self.failed {
            return;
        }
        let line = trace_line(call, outcome, self.check_mode);
        if let Err(error) = writeln!(self.writer, "{line}") {
            self.failed = true;
            DecoratorWriteFailed {
                decorator: "trace",
                path: &self.path.display().to_string(),
                error: &error,
            }
            .log();
        }
    }
}

impl Drop for TraceWriter {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Registry constructor: `arg` is the trace path, optionally prefixed with `+`.
pub fn wrap(inner: Box<dyn Domain>, arg: Option<&str>) -> DomainResult<Box<dyn Domain>> {
    let arg = arg.context("trace decorator needs a file path")?;
    let target = TraceTarget::parse(arg)?;
    let writer = TraceWriter::create(&target)?;
    Ok(Box::new(Observed::new(inner, writer)))
}
