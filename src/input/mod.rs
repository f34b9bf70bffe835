// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Input acquisition and format dispatch.
//!
//! The input's name alone decides how it is parsed: names ending in
//! `.strace` are traces, everything else (stdin included) is a script.

use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use anyhow::Context;

use crate::config::consts::TRACE_EXTENSION;
use crate::observability::messages::input::{InputOpened, InputReleased};
use crate::observability::messages::StructuredLog;

/// Name reported for standard input.
pub const STDIN_NAME: &str = "<stdin>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Script,
    Trace,
}

impl InputFormat {
    /// `Trace` iff the name ends with `.strace`, compared case-sensitively.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some(name) if name.ends_with(TRACE_EXTENSION) => InputFormat::Trace,
            _ => InputFormat::Script,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            InputFormat::Script => "script",
            InputFormat::Trace => "trace",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type ReleaseAction = Box<dyn FnOnce()>;

/// A readable source tagged with its format.
///
/// The release action runs exactly once, when the stream is dropped, after
/// the underlying handle has been closed.
pub struct InputStream {
    format: InputFormat,
    name: String,
    reader: Box<dyn BufRead>,
    release: Option<ReleaseAction>,
}

impl InputStream {
    /// Open `path`, or stdin when `None`.
    pub fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let stream = match path {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("cannot open input '{}'", path.display()))?;
                let name = path.display().to_string();
                let format = InputFormat::from_name(path.to_str());
                Self::from_reader(name, format, BufReader::new(file))
            }
            None => Self::from_reader(STDIN_NAME, InputFormat::Script, io::stdin().lock()),
        };

        InputOpened {
            name: &stream.name,
            format: stream.format.as_str(),
        }
        .log();

        let name = stream.name.clone();
        Ok(stream.on_release(move || InputReleased { name: &name }.log()))
    }

    pub fn from_reader(
        name: impl Into<String>,
        format: InputFormat,
        reader: impl BufRead + 'static,
    ) -> Self {
        Self {
            format,
            name: name.into(),
            reader: Box::new(reader),
            release: None,
        }
    }

    /// Add a release action; earlier actions run first.
    pub fn on_release(mut self, action: impl FnOnce() + 'static) -> Self {
        self.release = Some(match self.release.take() {
            Some(previous) => Box::new(move || {
                previous();
                action();
            }),
            None => Box::new(action),
        });
        self
    }

    pub fn format(&self) -> InputFormat {
        self.format
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read everything that is left, as raw bytes.
    pub fn read_to_end(&mut self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.reader.read_to_end(&mut bytes)?;
        Ok(bytes)
    }
}

impl fmt::Debug for InputStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputStream")
            .field("format", &self.format)
            .field("name", &self.name)
            .finish()
    }
}

impl Drop for InputStream {
    fn drop(&mut self) {
        self.reader = Box::new(io::empty());
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::io::Cursor;
    use std::rc::Rc;

    #[test]
    fn test_format_from_name() {
        let test_cases = vec![
            (Some("run.strace"), InputFormat::Trace),
            (Some("dir/a.b.strace"), InputFormat::Trace),
            (Some(".strace"), InputFormat::Trace),
            (Some("run.STRACE"), InputFormat::Script),
            (Some("run.strace.bak"), InputFormat::Script),
            (Some("strace"), InputFormat::Script),
            (Some("prog.sset"), InputFormat::Script),
            (Some(""), InputFormat::Script),
            (None, InputFormat::Script),
        ];

        for (name, expected) in test_cases {
            assert_eq!(InputFormat::from_name(name), expected, "name {name:?}");
        }
    }

    #[test]
    fn test_release_runs_once_on_drop() {
        let count = Rc::new(Cell::new(0));
        let counter = Rc::clone(&count);
        let mut stream = InputStream::from_reader(
            "mem",
            InputFormat::Script,
            Cursor::new(b"var x : 1;".to_vec()),
        )
        .on_release(move || counter.set(counter.get() + 1));

        assert_eq!(stream.read_to_end().unwrap(), b"var x : 1;");
        assert_eq!(count.get(), 0);
        drop(stream);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_release_actions_run_in_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let (first, second) = (Rc::clone(&order), Rc::clone(&order));
        let stream = InputStream::from_reader("mem", InputFormat::Trace, Cursor::new(Vec::new()))
            .on_release(move || first.borrow_mut().push("first"))
            .on_release(move || second.borrow_mut().push("second"));

        drop(stream);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_open_file_dispatches_on_name() {
        let dir = tempfile::tempdir().unwrap();
        let trace = dir.path().join("replay.strace");
        std::fs::write(&trace, "v0 = declare x 1\n").unwrap();

        let mut stream = InputStream::open(Some(&trace)).unwrap();
        assert_eq!(stream.format(), InputFormat::Trace);
        assert_eq!(stream.name(), trace.display().to_string());
        assert_eq!(stream.read_to_end().unwrap(), b"v0 = declare x 1\n");
    }

    #[test]
    fn test_open_missing_file_fails_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.sset");

        let err = InputStream::open(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("absent.sset"));
    }
}
