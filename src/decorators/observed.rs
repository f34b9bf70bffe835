// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! A transparent wrapper that reports every interaction to an [`Observer`].
//!
//! The logging, statistics, debug and trace decorators only differ in what
//! they do with an interaction, so they share this one delegating
//! implementation of [`Domain`].

use std::fmt;

use serde::Serialize;

use crate::errors::{DomainError, DomainResult};
use crate::traits::{Domain, SetId, VarId};

/// One call made on a domain, with its arguments.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call<'a> {
    Declare { name: &'a str, bits: u32 },
    Top,
    Bottom,
    VarEqConst { var: VarId, value: u64 },
    VarEqVar { a: VarId, b: VarId },
    Singleton { point: &'a [u64] },
    Union { a: SetId, b: SetId },
    Intersect { a: SetId, b: SetId },
    Difference { a: SetId, b: SetId },
    Complement { a: SetId },
    Exists { set: SetId, var: VarId },
    IsEmpty { set: SetId },
    Equal { a: SetId, b: SetId },
    Subset { a: SetId, b: SetId },
    Release { set: SetId },
}

impl Call<'_> {
    /// Operation name, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            Call::Declare { .. } => "declare",
            Call::Top => "top",
            Call::Bottom => "bottom",
            Call::VarEqConst { .. } => "var_eq_const",
            Call::VarEqVar { .. } => "var_eq_var",
            Call::Singleton { .. } => "singleton",
            Call::Union { .. } => "union",
            Call::Intersect { .. } => "intersect",
            Call::Difference { .. } => "difference",
            Call::Complement { .. } => "complement",
            Call::Exists { .. } => "exists",
            Call::IsEmpty { .. } => "is_empty",
            Call::Equal { .. } => "equal",
            Call::Subset { .. } => "subset",
            Call::Release { .. } => "release",
        }
    }
}

impl fmt::Display for Call<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = self.kind();
        match self {
            Call::Declare { name, bits } => write!(f, "{kind}({name}, {bits})"),
            Call::Top | Call::Bottom => write!(f, "{kind}()"),
            Call::VarEqConst { var, value } => write!(f, "{kind}({var}, {value})"),
            Call::VarEqVar { a, b } => write!(f, "{kind}({a}, {b})"),
            Call::Singleton { point } => write!(f, "{kind}({point:?})"),
            Call::Union { a, b }
            | Call::Intersect { a, b }
            | Call::Difference { a, b }
            | Call::Equal { a, b }
            | Call::Subset { a, b } => write!(f, "{kind}({a}, {b})"),
            Call::Complement { a } => write!(f, "{kind}({a})"),
            Call::Exists { set, var } => write!(f, "{kind}({set}, {var})"),
            Call::IsEmpty { set } | Call::Release { set } => write!(f, "{kind}({set})"),
        }
    }
}

/// What a successful call returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reply {
    Var(VarId),
    Set(SetId),
    Bool(bool),
    Unit,
}

impl From<VarId> for Reply {
    fn from(var: VarId) -> Self {
        Reply::Var(var)
    }
}

impl From<SetId> for Reply {
    fn from(set: SetId) -> Self {
        Reply::Set(set)
    }
}

impl From<bool> for Reply {
    fn from(answer: bool) -> Self {
        Reply::Bool(answer)
    }
}

impl From<()> for Reply {
    fn from(_: ()) -> Self {
        Reply::Unit
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Var(var) => write!(f, "{var}"),
            Reply::Set(set) => write!(f, "{set}"),
            Reply::Bool(answer) => write!(f, "{answer}"),
            Reply::Unit => f.write_str("ok"),
        }
    }
}

/// The single behaviour an observing decorator adds.
pub trait Observer: fmt::Debug {
    /// Prefix shown in `describe()`, e.g. `stats`.
    fn label(&self) -> String;

    /// Called after every delegated call with its outcome.
    fn observe(&mut self, call: &Call<'_>, outcome: Result<Reply, &DomainError>);
}

/// Delegates every operation to `inner`, then reports it to the observer.
#[derive(Debug)]
pub struct Observed<O: Observer> {
    inner: Box<dyn Domain>,
    observer: O,
}

impl<O: Observer> Observed<O> {
    pub fn new(inner: Box<dyn Domain>, observer: O) -> Self {
        Self { inner, observer }
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    fn record<T>(&mut self, call: Call<'_>, result: DomainResult<T>) -> DomainResult<T>
    where
        T: Copy + Into<Reply>,
    {
        self.observer
            .observe(&call, result.as_ref().map(|value| (*value).into()));
        result
    }
}

impl<O: Observer> Domain for Observed<O> {
    fn describe(&self) -> String {
        format!("{}({})", self.observer.label(), self.inner.describe())
    }

    fn declare(&mut self, name: &str, bits: u32) -> DomainResult<VarId> {
        let result = self.inner.declare(name, bits);
        self.record(Call::Declare { name, bits }, result)
    }

    fn top(&mut self) -> DomainResult<SetId> {
        let result = self.inner.top();
        self.record(Call::Top, result)
    }

    fn bottom(&mut self) -> DomainResult<SetId> {
        let result = self.inner.bottom();
        self.record(Call::Bottom, result)
    }

    fn var_eq_const(&mut self, var: VarId, value: u64) -> DomainResult<SetId> {
        let result = self.inner.var_eq_const(var, value);
        self.record(Call::VarEqConst { var, value }, result)
    }

    fn var_eq_var(&mut self, a: VarId, b: VarId) -> DomainResult<SetId> {
        let result = self.inner.var_eq_var(a, b);
        self.record(Call::VarEqVar { a, b }, result)
    }

    fn singleton(&mut self, point: &[u64]) -> DomainResult<SetId> {
        let result = self.inner.singleton(point);
        self.record(Call::Singleton { point }, result)
    }

    fn union(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        let result = self.inner.union(a, b);
        self.record(Call::Union { a, b }, result)
    }

    fn intersect(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        let result = self.inner.intersect(a, b);
        self.record(Call::Intersect { a, b }, result)
    }

    fn difference(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        let result = self.inner.difference(a, b);
        self.record(Call::Difference { a, b }, result)
    }

    fn complement(&mut self, a: SetId) -> DomainResult<SetId> {
        let result = self.inner.complement(a);
        self.record(Call::Complement { a }, result)
    }

    fn exists(&mut self, set: SetId, var: VarId) -> DomainResult<SetId> {
        let result = self.inner.exists(set, var);
        self.record(Call::Exists { set, var }, result)
    }

    fn is_empty(&mut self, set: SetId) -> DomainResult<bool> {
        let result = self.inner.is_empty(set);
        self.record(Call::IsEmpty { set }, result)
    }

    fn equal(&mut self, a: SetId, b: SetId) -> DomainResult<bool> {
        let result = self.inner.equal(a, b);
        self.record(Call::Equal { a, b }, result)
    }

    fn subset(&mut self, a: SetId, b: SetId) -> DomainResult<bool> {
        let result = self.inner.subset(a, b);
        self.record(Call::Subset { a, b }, result)
    }

    fn release(&mut self, set: SetId) -> DomainResult<()> {
        let result = self.inner.release(set);
        self.record(Call::Release { set }, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::ExplicitDomain;

    /// Remembers `call => reply` strings.
    #[derive(Debug, Default)]
    struct Recorder(Vec<String>);

    impl Observer for Recorder {
        fn label(&self) -> String {
            "recorder".to_string()
        }

        fn observe(&mut self, call: &Call<'_>, outcome: Result<Reply, &DomainError>) {
            let outcome = match outcome {
                Ok(reply) => reply.to_string(),
                Err(_) => "error".to_string(),
            };
            self.0.push(format!("{call} => {outcome}"));
        }
    }

    #[test]
    fn test_observed_delegates_and_reports() {
        let mut domain = Observed::new(Box::new(ExplicitDomain::new()), Recorder::default());
        let x = domain.declare("x", 1).unwrap();
        let x1 = domain.var_eq_const(x, 1).unwrap();
        let top = domain.top().unwrap();
        assert!(domain.subset(x1, top).unwrap());
        assert!(domain.var_eq_const(x, 2).is_err());
        domain.release(x1).unwrap();

        assert_eq!(domain.describe(), "recorder(explicit)");
        assert_eq!(
            domain.observer().0,
            vec![
                "declare(x, 1) => v0",
                "var_eq_const(v0, 1) => s1",
                "top() => s2",
                "subset(s1, s2) => true",
                "var_eq_const(v0, 2) => error",
                "release(s1) => ok",
            ]
        );
    }

    #[test]
    fn test_call_serializes_with_op_tag() {
        let call = Call::Union {
            a: SetId(1),
            b: SetId(2),
        };
        assert_eq!(
            serde_json::to_string(&call).unwrap(),
            r#"{"op":"union","a":1,"b":2}"#
        );
        assert_eq!(
            serde_json::to_string(&Reply::Bool(true)).unwrap(),
            r#"{"bool":true}"#
        );
    }
}
