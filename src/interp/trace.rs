// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::errors::{DomainError, InterpretError};
use crate::lang::ast::{SetDef, Trace, TraceOp, TraceQuery};
use crate::traits::{Domain, Interpreter, SetId, VarId};

/// Replays a recorded trace.
///
/// Handles in the trace are names chosen by whoever recorded it; they are
/// mapped to the handles the live domain returns. Queries recorded with an
/// answer (`-> true`) must get the same answer again.
#[derive(Debug)]
pub struct TraceInterpreter {
    domain: Box<dyn Domain>,
    vars: HashMap<String, VarId>,
    sets: HashMap<String, SetId>,
    checked: usize,
}

impl TraceInterpreter {
    pub fn new(domain: Box<dyn Domain>) -> Self {
        Self {
            domain,
            vars: HashMap::new(),
            sets: HashMap::new(),
            checked: 0,
        }
    }

    /// Number of recorded answers verified so far.
    pub fn checked(&self) -> usize {
        self.checked
    }

    fn var(&self, handle: &str, line: usize) -> Result<VarId, InterpretError> {
        self.vars.get(handle).copied().ok_or_else(|| unknown(handle, line))
    }

    fn set(&self, handle: &str, line: usize) -> Result<SetId, InterpretError> {
        self.sets.get(handle).copied().ok_or_else(|| unknown(handle, line))
    }

    fn sets2(&self, a: &str, b: &str, line: usize) -> Result<(SetId, SetId), InterpretError> {
        Ok((self.set(a, line)?, self.set(b, line)?))
    }

    fn define(&mut self, def: &SetDef, line: usize) -> Result<SetId, InterpretError> {
        let result = match def {
            SetDef::Top => self.domain.top(),
            SetDef::Bottom => self.domain.bottom(),
            SetDef::Const(var, value) => {
                let var = self.var(var, line)?;
                self.domain.var_eq_const(var, *value)
            }
            SetDef::EqVar(a, b) => {
                let (a, b) = (self.var(a, line)?, self.var(b, line)?);
                self.domain.var_eq_var(a, b)
            }
            SetDef::Single(point) => self.domain.singleton(point),
            SetDef::Union(a, b) => {
                let (a, b) = self.sets2(a, b, line)?;
                self.domain.union(a, b)
            }
            SetDef::Inter(a, b) => {
                let (a, b) = self.sets2(a, b, line)?;
                self.domain.intersect(a, b)
            }
            SetDef::Diff(a, b) => {
                let (a, b) = self.sets2(a, b, line)?;
                self.domain.difference(a, b)
            }
            SetDef::Compl(a) => {
                let a = self.set(a, line)?;
                self.domain.complement(a)
            }
            SetDef::Exists(set, var) => {
                let (set, var) = (self.set(set, line)?, self.var(var, line)?);
                self.domain.exists(set, var)
            }
        };
        result.map_err(|source| InterpretError::Domain { line, source })
    }

    fn query(&mut self, query: &TraceQuery, line: usize) -> Result<bool, InterpretError> {
        let answer: Result<bool, DomainError> = match query {
            TraceQuery::Empty(a) => {
                let a = self.set(a, line)?;
                self.domain.is_empty(a)
            }
            TraceQuery::Equal(a, b) => {
                let (a, b) = self.sets2(a, b, line)?;
                self.domain.equal(a, b)
            }
            TraceQuery::Subset(a, b) => {
                let (a, b) = self.sets2(a, b, line)?;
                self.domain.subset(a, b)
            }
        };
        answer.map_err(|source| InterpretError::Domain { line, source })
    }
}

fn unknown(handle: &str, line: usize) -> InterpretError {
    InterpretError::UnknownHandle {
        handle: handle.to_string(),
        line,
    }
}

impl Interpreter for TraceInterpreter {
    type Program = Trace;

    fn run(&mut self, program: &Trace) -> Result<usize, InterpretError> {
        for step in &program.steps {
            let line = step.line;
            match &step.op {
                TraceOp::Declare { target, name, bits } => {
                    let var = self
                        .domain
                        .declare(name, *bits)
                        .map_err(|source| InterpretError::Domain { line, source })?;
                    self.vars.insert(target.clone(), var);
                }
                TraceOp::Define { target, def } => {
                    let set = self.define(def, line)?;
                    self.sets.insert(target.clone(), set);
                }
                TraceOp::Query { query, expected } => {
                    let actual = self.query(query, line)?;
                    if let Some(expected) = *expected {
                        if expected != actual {
                            return Err(InterpretError::CheckFailed {
                                expected,
                                actual,
                                line,
                            });
                        }
                        self.checked += 1;
                    }
                }
                TraceOp::Release(handle) => {
                    let set = self.set(handle, line)?;
                    self.domain
                        .release(set)
                        .map_err(|source| InterpretError::Domain { line, source })?;
                    self.sets.remove(handle);
                }
            }
        }
        Ok(program.steps.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::ExplicitDomain;
    use crate::decorators;
    use crate::lang::trace::parse_trace;

    fn replay(text: &str) -> Result<usize, InterpretError> {
        let trace = parse_trace(text).unwrap();
        TraceInterpreter::new(Box::new(ExplicitDomain::new())).run(&trace)
    }

    #[test]
    fn test_replay_outcomes() {
        let test_cases = vec![
            (
                "recorded answers match",
                "v0 = declare x 2\ns1 = const v0 1\ns2 = compl s1\n\
                 empty s1 -> false\nequal s1 s2 -> false\nsubset s1 s1 -> true\nrelease s2",
                Ok(7),
            ),
            (
                "handles need not match live ids",
                "v7 = declare x 1\ns40 = top\ns41 = exists s40 v7\nequal s40 s41 -> true",
                Ok(4),
            ),
            (
                "mismatched answer",
                "v0 = declare x 1\ns1 = top\nempty s1 -> true",
                Err("line 3: check failed: expected true, got false"),
            ),
            (
                "released handle",
                "s1 = top\nrelease s1\nempty s1",
                Err("line 3: unknown trace handle 's1'"),
            ),
            (
                "undeclared variable handle",
                "s1 = const v3 0",
                Err("line 1: unknown trace handle 'v3'"),
            ),
            (
                "domain failure",
                "v0 = declare x 1\ns1 = const v0 5",
                Err("line 2: value 5 does not fit in 1 bits"),
            ),
        ];

        for (name, text, expected) in test_cases {
            let result = replay(text).map_err(|e| e.to_string());
            assert_eq!(result, expected.map_err(str::to_string), "Test case '{}' failed", name);
        }
    }

    #[test]
    fn test_recorded_trace_replays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.strace");
        let arg = format!("+{}", path.display());

        {
            let mut domain =
                decorators::trace::wrap(Box::new(ExplicitDomain::new()), Some(&arg)).unwrap();
            let x = domain.declare("x", 2).unwrap();
            let y = domain.declare("y", 2).unwrap();
            let eq = domain.var_eq_var(x, y).unwrap();
            let one = domain.var_eq_const(x, 1).unwrap();
            let both = domain.intersect(eq, one).unwrap();
            let point = domain.singleton(&[1, 1]).unwrap();
            assert!(domain.equal(both, point).unwrap());
            assert!(!domain.is_empty(both).unwrap());
            domain.release(point).unwrap();
        }

        let text = std::fs::read_to_string(&path).unwrap();
        let trace = parse_trace(&text).unwrap();
        let mut interpreter = TraceInterpreter::new(Box::new(ExplicitDomain::new()));

        assert_eq!(interpreter.run(&trace).unwrap(), 9);
        assert_eq!(interpreter.checked(), 2);
    }
}
