// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `--singleton`: build point sets for domains that cannot.
//!
//! `singleton(point)` is answered by intersecting one `var == value`
//! constraint per declared variable; temporaries are released as it goes.
//! Every other call passes straight through.

use crate::errors::{DomainError, DomainResult};
use crate::traits::{Domain, SetId, VarId};

#[derive(Debug)]
pub struct SingletonSupport {
    inner: Box<dyn Domain>,
    declared: Vec<VarId>,
}

impl SingletonSupport {
    pub fn new(inner: Box<dyn Domain>) -> Self {
        Self {
            inner,
            declared: Vec::new(),
        }
    }
}

impl Domain for SingletonSupport {
    fn describe(&self) -> String {
        format!("singleton({})", self.inner.describe())
    }

    fn declare(&mut self, name: &str, bits: u32) -> DomainResult<VarId> {
        let var = self.inner.declare(name, bits)?;
        self.declared.push(var);
        Ok(var)
    }

    fn top(&mut self) -> DomainResult<SetId> {
        self.inner.top()
    }

    fn bottom(&mut self) -> DomainResult<SetId> {
        self.inner.bottom()
    }

    fn var_eq_const(&mut self, var: VarId, value: u64) -> DomainResult<SetId> {
        self.inner.var_eq_const(var, value)
    }

    fn var_eq_var(&mut self, a: VarId, b: VarId) -> DomainResult<SetId> {
        self.inner.var_eq_var(a, b)
    }

    fn singleton(&mut self, point: &[u64]) -> DomainResult<SetId> {
        if point.len() != self.declared.len() {
            return Err(DomainError::ArityMismatch {
                expected: self.declared.len(),
                got: point.len(),
            });
        }
        let mut acc = self.inner.top()?;
        for (var, value) in self.declared.clone().into_iter().zip(point) {
            let constraint = match self.inner.var_eq_const(var, *value) {
                Ok(set) => set,
                Err(error) => {
                    self.inner.release(acc)?;
                    return Err(error);
                }
            };
            let narrowed = self.inner.intersect(acc, constraint)?;
            self.inner.release(acc)?;
            self.inner.release(constraint)?;
            acc = narrowed;
        }
        Ok(acc)
    }

    fn union(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        self.inner.union(a, b)
    }

    fn intersect(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        self.inner.intersect(a, b)
    }

    fn difference(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        self.inner.difference(a, b)
    }

    fn complement(&mut self, a: SetId) -> DomainResult<SetId> {
        self.inner.complement(a)
    }

    fn exists(&mut self, set: SetId, var: VarId) -> DomainResult<SetId> {
        self.inner.exists(set, var)
    }

    fn is_empty(&mut self, set: SetId) -> DomainResult<bool> {
        self.inner.is_empty(set)
    }

    fn equal(&mut self, a: SetId, b: SetId) -> DomainResult<bool> {
        self.inner.equal(a, b)
    }

    fn subset(&mut self, a: SetId, b: SetId) -> DomainResult<bool> {
        self.inner.subset(a, b)
    }

    fn release(&mut self, set: SetId) -> DomainResult<()> {
        self.inner.release(set)
    }
}

/// Registry constructor.
pub fn wrap(inner: Box<dyn Domain>, _arg: Option<&str>) -> DomainResult<Box<dyn Domain>> {
    Ok(Box::new(SingletonSupport::new(inner)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::smt::{SatResult, Solver, SmtDomain};
    use crate::backends::ExplicitDomain;

    #[test]
    fn test_singleton_matches_native_points() {
        let mut native = ExplicitDomain::new();
        let mut built = SingletonSupport::new(Box::new(ExplicitDomain::new()));
        for domain in [&mut native as &mut dyn Domain, &mut built as &mut dyn Domain] {
            domain.declare("x", 2).unwrap();
            domain.declare("y", 3).unwrap();
        }
        let expected = native.singleton(&[2, 5]).unwrap();
        let point = built.singleton(&[2, 5]).unwrap();
        let x = built.var_eq_const(VarId(0), 2).unwrap();
        let y = built.var_eq_const(VarId(1), 5).unwrap();
        let xy = built.intersect(x, y).unwrap();
        assert!(built.equal(point, xy).unwrap());
        assert_eq!(native.cardinality(expected).unwrap(), 1);
    }

    #[test]
    fn test_singleton_errors() {
        let mut domain = SingletonSupport::new(Box::new(ExplicitDomain::new()));
        domain.declare("x", 1).unwrap();
        assert!(matches!(
            domain.singleton(&[0, 0]),
            Err(DomainError::ArityMismatch { expected: 1, got: 2 })
        ));
        assert!(matches!(
            domain.singleton(&[3]),
            Err(DomainError::ValueOutOfRange { value: 3, bits: 1 })
        ));
    }

    #[derive(Debug)]
    struct NeverCalled;

    impl Solver for NeverCalled {
        fn check_sat(&mut self, _script: &str) -> anyhow::Result<SatResult> {
            anyhow::bail!("solver should not be consulted")
        }
    }

    #[test]
    fn test_singleton_over_smt_builds_a_conjunction() {
        let smt = SmtDomain::new("scripted", Box::new(NeverCalled));
        let mut domain = SingletonSupport::new(Box::new(smt));
        domain.declare("x", 2).unwrap();
        domain.declare("y", 2).unwrap();
        assert!(domain.singleton(&[1, 3]).is_ok());
        assert_eq!(domain.describe(), "singleton(scripted)");
    }
}
