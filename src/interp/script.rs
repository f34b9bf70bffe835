// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::io::Write;

use crate::errors::{DomainError, InterpretError};
use crate::lang::ast::{Expr, Query, Script, StatementKind};
use crate::traits::{Domain, Interpreter, SetId, VarId};

/// A set produced while evaluating an expression.
#[derive(Debug, Clone, Copy)]
struct Value {
    set: SetId,
    /// Temporary result that must be released once consumed.
    owned: bool,
}

/// Executes scripts against the domain it owns.
///
/// `print` answers go to `out`, one `true`/`false` per line. Intermediate
/// sets are released as soon as they have been consumed.
#[derive(Debug)]
pub struct ScriptInterpreter<W: Write> {
    domain: Box<dyn Domain>,
    out: W,
    vars: HashMap<String, VarId>,
    sets: HashMap<String, SetId>,
}

impl<W: Write> ScriptInterpreter<W> {
    pub fn new(domain: Box<dyn Domain>, out: W) -> Self {
        Self {
            domain,
            out,
            vars: HashMap::new(),
            sets: HashMap::new(),
        }
    }

    pub fn domain(&self) -> &dyn Domain {
        self.domain.as_ref()
    }

    fn var(&self, name: &str, line: usize) -> Result<VarId, InterpretError> {
        self.vars
            .get(name)
            .copied()
            .ok_or_else(|| InterpretError::UndefinedVariable {
                name: name.to_string(),
                line,
            })
    }

    fn release(&mut self, value: Value) -> Result<(), DomainError> {
        if value.owned {
            self.domain.release(value.set)?;
        }
        Ok(())
    }

    fn binary(
        &mut self,
        a: &Expr,
        b: &Expr,
        line: usize,
        op: fn(&mut dyn Domain, SetId, SetId) -> Result<SetId, DomainError>,
    ) -> Result<Value, InterpretError> {
        let a = self.eval(a, line)?;
        let b = self.eval(b, line)?;
        let result = op(self.domain.as_mut(), a.set, b.set);
        self.release(a).map_err(domain_at(line))?;
        self.release(b).map_err(domain_at(line))?;
        Ok(Value {
            set: result.map_err(domain_at(line))?,
            owned: true,
        })
    }

    fn eval(&mut self, expr: &Expr, line: usize) -> Result<Value, InterpretError> {
        let fresh = |set: Result<SetId, DomainError>| {
            set.map(|set| Value { set, owned: true })
                .map_err(domain_at(line))
        };

        match expr {
            Expr::Top => fresh(self.domain.top()),
            Expr::Bottom => fresh(self.domain.bottom()),
            Expr::Name(name) => self
                .sets
                .get(name)
                .map(|&set| Value { set, owned: false })
                .ok_or_else(|| InterpretError::UndefinedSet {
                    name: name.clone(),
                    line,
                }),
            Expr::EqConst(var, value) => {
                let var = self.var(var, line)?;
                fresh(self.domain.var_eq_const(var, *value))
            }
            Expr::EqVar(a, b) => {
                let (a, b) = (self.var(a, line)?, self.var(b, line)?);
                fresh(self.domain.var_eq_var(a, b))
            }
            Expr::Point(values) => fresh(self.domain.singleton(values)),
            Expr::Union(a, b) => self.binary(a, b, line, |d, a, b| d.union(a, b)),
            Expr::Intersect(a, b) => self.binary(a, b, line, |d, a, b| d.intersect(a, b)),
            Expr::Difference(a, b) => self.binary(a, b, line, |d, a, b| d.difference(a, b)),
            Expr::Complement(a) => {
                let a = self.eval(a, line)?;
                let result = self.domain.complement(a.set);
                self.release(a).map_err(domain_at(line))?;
                fresh(result)
            }
            Expr::Exists(var, body) => {
                let var = self.var(var, line)?;
                let body = self.eval(body, line)?;
                let result = self.domain.exists(body.set, var);
                self.release(body).map_err(domain_at(line))?;
                fresh(result)
            }
        }
    }

    fn query(&mut self, query: &Query, line: usize) -> Result<bool, InterpretError> {
        match query {
            Query::Empty(a) => {
                let a = self.eval(a, line)?;
                let answer = self.domain.is_empty(a.set);
                self.release(a).map_err(domain_at(line))?;
                answer.map_err(domain_at(line))
            }
            Query::Equal(a, b) | Query::Subset(a, b) => {
                let a = self.eval(a, line)?;
                let b = self.eval(b, line)?;
                let answer = match query {
                    Query::Equal(..) => self.domain.equal(a.set, b.set),
                    _ => self.domain.subset(a.set, b.set),
                };
                self.release(a).map_err(domain_at(line))?;
                self.release(b).map_err(domain_at(line))?;
                answer.map_err(domain_at(line))
            }
        }
    }

    fn bind(&mut self, name: &str, expr: &Expr, line: usize) -> Result<(), InterpretError> {
        let value = self.eval(expr, line)?;
        // A bare name aliases a live set; bind a copy so rebinding either is safe.
        let set = if value.owned {
            value.set
        } else {
            self.domain
                .union(value.set, value.set)
                .map_err(domain_at(line))?
        };
        if let Some(previous) = self.sets.insert(name.to_string(), set) {
            self.domain.release(previous).map_err(domain_at(line))?;
        }
        Ok(())
    }
}

fn domain_at(line: usize) -> impl Fn(DomainError) -> InterpretError {
    move |source| InterpretError::Domain { line, source }
}

impl<W: Write> Interpreter for ScriptInterpreter<W> {
    type Program = Script;

    fn run(&mut self, program: &Script) -> Result<usize, InterpretError> {
        for statement in &program.statements {
            let line = statement.line;
            match &statement.kind {
                StatementKind::Var { name, bits } => {
                    if self.vars.contains_key(name) {
                        return Err(InterpretError::Redeclared {
                            name: name.clone(),
                            line,
                        });
                    }
                    let var = self.domain.declare(name, *bits).map_err(domain_at(line))?;
                    self.vars.insert(name.clone(), var);
                }
                StatementKind::Let { name, expr } => self.bind(name, expr, line)?,
                StatementKind::Print(query) => {
                    let answer = self.query(query, line)?;
                    writeln!(self.out, "{answer}")?;
                }
                StatementKind::Assert(query) => {
                    if !self.query(query, line)? {
                        return Err(InterpretError::AssertionFailed {
                            query: query.to_string(),
                            line,
                        });
                    }
                }
            }
        }
        self.out.flush()?;
        Ok(program.statements.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::ExplicitDomain;
    use crate::decorators::{Call, Observed, Observer, Reply};
    use std::cell::Cell;
    use std::rc::Rc;
    use crate::lang::script::parse_script;

    fn run(text: &str) -> (Result<usize, InterpretError>, String) {
        let script = parse_script(text).unwrap();
        let mut out = Vec::new();
        let result = {
            let mut interpreter = ScriptInterpreter::new(Box::new(ExplicitDomain::new()), &mut out);
            interpreter.run(&script)
        };
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_print_answers() {
        struct TestCase {
            name: &'static str,
            script: &'static str,
            expected: &'static str,
        }

        let test_cases = vec![
            TestCase {
                name: "constant constraint is not empty",
                script: "var x : 2; print empty(x == 1); print empty(x == 1 & x == 2);",
                expected: "false\ntrue\n",
            },
            TestCase {
                name: "union of all values is top",
                script: "var x : 1; print equal(x == 0 | x == 1, top);",
                expected: "true\n",
            },
            TestCase {
                name: "difference and complement agree",
                script: "var x : 2; let a = x == 3; print equal(top - a, !a);",
                expected: "true\n",
            },
            TestCase {
                name: "projection forgets a variable",
                script: "var x : 2; var y : 2; let a = x == 1 & y == 2; \
                         print equal(exists y . a, x == 1); print subset(a, exists y . a);",
                expected: "true\ntrue\n",
            },
            TestCase {
                name: "variable equality and points",
                script: "var x : 2; var y : 2; print subset({3, 3}, x == y); print subset({1, 2}, x == y);",
                expected: "true\nfalse\n",
            },
            TestCase {
                name: "rebinding a name",
                script: "var x : 1; let a = x == 0; let b = a; let a = bottom; \
                         print empty(a); print empty(b);",
                expected: "true\nfalse\n",
            },
        ];

        for test_case in test_cases {
            let (result, output) = run(test_case.script);
            assert!(result.is_ok(), "{}: {:?}", test_case.name, result);
            assert_eq!(output, test_case.expected, "Test case '{}' failed", test_case.name);
        }
    }

    #[test]
    fn test_failures() {
        let test_cases = vec![
            ("let a = b;", "line 1: undefined set 'b'"),
            ("let a = x == 1;", "line 1: undefined variable 'x'"),
            ("var x : 1;\nvar x : 2;", "line 2: variable 'x' is already declared"),
            ("var x : 1;\n\nassert empty(top);", "line 3: assertion failed: empty(top)"),
            ("var x : 1; let a = x == 2;", "line 1: value 2 does not fit in 1 bits"),
        ];

        for (script, expected) in test_cases {
            let (result, _) = run(script);
            assert_eq!(result.unwrap_err().to_string(), expected, "script {script:?}");
        }
    }

    #[test]
    fn test_statement_count_and_passing_assertions() {
        let (result, output) =
            run("var x : 1; assert subset(x == 0, top); assert equal(top, top);");
        assert_eq!(result.unwrap(), 3);
        assert!(output.is_empty());
    }

    /// Net number of sets created minus sets released.
    #[derive(Debug)]
    struct LiveSets(Rc<Cell<i64>>);

    impl Observer for LiveSets {
        fn label(&self) -> String {
            "live".to_string()
        }

        fn observe(&mut self, call: &Call<'_>, outcome: Result<Reply, &DomainError>) {
            match (call, outcome) {
                (_, Ok(Reply::Set(_))) => self.0.set(self.0.get() + 1),
                (Call::Release { .. }, Ok(_)) => self.0.set(self.0.get() - 1),
                _ => {}
            }
        }
    }

    #[test]
    fn test_temporaries_are_released() {
        let live = Rc::new(Cell::new(0));
        let script =
            parse_script("var x : 2; let a = x == 1; print empty((a | x == 2) & !bottom);")
                .unwrap();
        let observed = Observed::new(Box::new(ExplicitDomain::new()), LiveSets(Rc::clone(&live)));
        let mut out = Vec::new();
        let mut interpreter = ScriptInterpreter::new(Box::new(observed), &mut out);

        interpreter.run(&script).unwrap();

        assert_eq!(interpreter.domain().describe(), "live(explicit)");
        assert_eq!(live.get(), 1);
        drop(interpreter);
        assert_eq!(String::from_utf8(out).unwrap(), "false\n");
    }
}
