// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `--log <path>`: append every interaction to a file as one JSON object per line.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::decorators::observed::{Call, Observed, Observer, Reply};
use crate::errors::{DomainError, DomainResult};
use crate::observability::messages::decorators::DecoratorWriteFailed;
use crate::observability::messages::StructuredLog;
use crate::traits::Domain;

#[derive(Serialize)]
struct LogRecord<'a> {
    seq: u64,
    #[serde(flatten)]
    call: &'a Call<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<Reply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug)]
pub struct InteractionLog {
    path: PathBuf,
    writer: BufWriter<File>,
    seq: u64,
    failed: bool,
}

impl InteractionLog {
    pub fn create(path: &Path) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("cannot create log file '{}'", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            seq: 0,
            failed: false,
        })
    }

    fn write_record(&mut self, record: &LogRecord<'_>) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
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
                decorator: "log",
                path: &self.path.display().to_string(),
                error: &error,
            }
            .log();
            return false;
        }
        true
    }
}

impl Observer for InteractionLog {
    fn label(&self) -> String {
        "log".to_string()
    }

    fn observe(&mut self, call: &Call<'_>, outcome: Result<Reply, &DomainError>) {
        if self.failed {
            return;
        }
        self.seq += 1;
        let record = LogRecord {
            seq: self.seq,
            call,
            reply: outcome.as_ref().ok().copied(),
            error: outcome.err().map(ToString::to_string),
        };
        if let Err(error) = self.write_record(&record) {
            self.failed = true;
            DecoratorWriteFailed {
                decorator: "log",
                path: &self.path.display().to_string(),
                error: &*error,
            }
            .log();
        }
    }
}

impl Drop for InteractionLog {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Registry constructor: wrap `inner` so it logs to the file named by `arg`.
pub fn wrap(inner: Box<dyn Domain>, arg: Option<&str>) -> DomainResult<Box<dyn Domain>> {
    let path = arg.context("log decorator needs a file path")?;
    let log = InteractionLog::create(Path::new(path))?;
    Ok(Box::new(Observed::new(inner, log)))
}
