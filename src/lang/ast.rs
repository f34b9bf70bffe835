// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Syntax trees for both input formats.

use std::fmt;

/// A parsed input, tagged by format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    Script(Script),
    Trace(Trace),
}

impl Ast {
    /// Number of top-level statements or trace steps.
    pub fn len(&self) -> usize {
        match self {
            Ast::Script(script) => script.statements.len(),
            Ast::Trace(trace) => trace.steps.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---- script ----

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub line: usize,
    pub kind: StatementKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    Var { name: String, bits: u32 },
    Let { name: String, expr: Expr },
    Print(Query),
    Assert(Query),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Empty(Expr),
    Equal(Expr, Expr),
    Subset(Expr, Expr),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Top,
    Bottom,
    Name(String),
    EqConst(String, u64),
    EqVar(String, String),
    Point(Vec<u64>),
    Union(Box<Expr>, Box<Expr>),
    Intersect(Box<Expr>, Box<Expr>),
    Difference(Box<Expr>, Box<Expr>),
    Complement(Box<Expr>),
    Exists(String, Box<Expr>),
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Top => f.write_str("top"),
            Expr::Bottom => f.write_str("bottom"),
            Expr::Name(name) => f.write_str(name),
            Expr::EqConst(var, value) => write!(f, "{var} == {value}"),
            Expr::EqVar(a, b) => write!(f, "{a} == {b}"),
            Expr::Point(values) => {
                let values: Vec<String> = values.iter().map(u64::to_string).collect();
                write!(f, "{{{}}}", values.join(", "))
            }
            Expr::Union(a, b) => write!(f, "({a} | {b})"),
            Expr::Intersect(a, b) => write!(f, "({a} & {b})"),
            Expr::Difference(a, b) => write!(f, "({a} - {b})"),
            Expr::Complement(a) => write!(f, "!({a})"),
            Expr::Exists(var, body) => write!(f, "(exists {var} . {body})"),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Empty(a) => write!(f, "empty({a})"),
            Query::Equal(a, b) => write!(f, "equal({a}, {b})"),
            Query::Subset(a, b) => write!(f, "subset({a}, {b})"),
        }
    }
}

// ---- trace ----

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace {
    pub steps: Vec<TraceStep>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    pub line: usize,
    pub op: TraceOp,
}

/// One recorded operation. Handles (`v0`, `s3`) are names local to the trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceOp {
    Declare { target: String, name: String, bits: u32 },
    Define { target: String, def: SetDef },
    Query { query: TraceQuery, expected: Option<bool> },
    Release(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDef {
    Top,
    Bottom,
    Const(String, u64),
    EqVar(String, String),
    Single(Vec<u64>),
    Union(String, String),
    Inter(String, String),
    Diff(String, String),
    Compl(String),
    Exists(String, String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceQuery {
    Empty(String),
    Equal(String, String),
    Subset(String, String),
}

impl fmt::Display for TraceQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceQuery::Empty(set) => write!(f, "empty {set}"),
            TraceQuery::Equal(a, b) => write!(f, "equal {a} {b}"),
            TraceQuery::Subset(a, b) => write!(f, "subset {a} {b}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_display() {
        let x1 = Expr::EqConst("x".into(), 1);
        let test_cases = vec![
            (Query::Empty(Expr::Bottom), "empty(bottom)"),
            (
                Query::Subset(
                    Expr::Union(Box::new(x1.clone()), Box::new(Expr::Name("a".into()))),
                    Expr::Top,
                ),
                "subset((x == 1 | a), top)",
            ),
            (
                Query::Equal(
                    Expr::Exists("y".into(), Box::new(Expr::Complement(Box::new(x1)))),
                    Expr::Point(vec![0, 3]),
                ),
                "equal((exists y . !(x == 1)), {0, 3})",
            ),
        ];

        for (query, expected) in test_cases {
            assert_eq!(query.to_string(), expected);
        }
    }
}
