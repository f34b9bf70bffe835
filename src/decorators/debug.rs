// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `--debug`: print every interaction to the diagnostics channel as it happens.

use std::fmt;
use std::io::{self, Write};

use crate::decorators::observed::{Call, Observed, Observer, Reply};
use crate::errors::{DomainError, DomainResult};
use crate::traits::Domain;

pub struct DebugPrinter {
    out: Box<dyn Write>,
    step: u64,
}

impl DebugPrinter {
    pub fn stderr() -> Self {
        Self::to_writer(Box::new(io::stderr()))
    }

    pub fn to_writer(out: Box<dyn Write>) -> Self {
        Self { out, step: 0 }
    }
}

impl fmt::Debug for DebugPrinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugPrinter")
            .field("step", &self.step)
            .finish_non_exhaustive()
    }
}

impl Observer for DebugPrinter {
    fn label(&self) -> String {
        "debug".to_string()
    }

    fn observe(&mut self, call: &Call<'_>, outcome: Result<Reply, &DomainError>) {
        self.step += 1;
        // Diagnostics output is best effort.
        let _ = match outcome {
            Ok(reply) => writeln!(self.out, "[debug {:>4}] {call} -> {reply}", self.step),
            Err(error) => writeln!(self.out, "[debug {:>4}] {call} failed: {error}", self.step),
        };
    }
}

/// Registry constructor.
pub fn wrap(inner: Box<dyn Domain>, _arg: Option<&str>) -> DomainResult<Box<dyn Domain>> {
    Ok(Box::new(Observed::new(inner, DebugPrinter::stderr())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::ExplicitDomain;
    use crate::traits::SetId;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// A writer whose buffer stays readable after it is boxed.
    #[derive(Clone, Default)]
    struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_debug_prints_each_call() {
        let buffer = SharedBuffer::default();
        let printer = DebugPrinter::to_writer(Box::new(buffer.clone()));
        let mut domain = Observed::new(Box::new(ExplicitDomain::new()), printer);
        let top = domain.top().unwrap();
        assert!(!domain.is_empty(top).unwrap());
        assert!(domain.release(SetId(0)).is_err());

        let text = String::from_utf8(buffer.0.borrow().clone()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "[debug    1] top() -> s1");
        assert_eq!(lines[1], "[debug    2] is_empty(s1) -> false");
        assert!(lines[2].starts_with("[debug    3] release(s0) failed: unknown set handle s0"));
        assert_eq!(domain.describe(), "debug(explicit)");
    }
}
