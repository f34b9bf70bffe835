// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `--equalities`: remember which sets were proven equal.
//!
//! Once the wrapped domain has answered `equal(a, b) == true`, `a` and `b`
//! join one equivalence class. Later `equal` and `subset` queries between
//! members of a class are answered here without reaching the backend.
//! Releasing a set removes it from its class.

use std::collections::{BTreeSet, HashMap};

use crate::errors::DomainResult;
use crate::traits::{Domain, SetId, VarId};

#[derive(Debug)]
pub struct EqualityTracker {
    inner: Box<dyn Domain>,
    class_of: HashMap<SetId, usize>,
    classes: HashMap<usize, BTreeSet<SetId>>,
    next_class: usize,
    shortcuts: u64,
}

impl EqualityTracker {
    pub fn new(inner: Box<dyn Domain>) -> Self {
        Self {
            inner,
            class_of: HashMap::new(),
            classes: HashMap::new(),
            next_class: 0,
            shortcuts: 0,
        }
    }

    /// Queries answered from the recorded equalities.
    pub fn shortcuts(&self) -> u64 {
        self.shortcuts
    }

    /// True when `a` and `b` are the same set or are known to be equal.
    pub fn known_equal(&self, a: SetId, b: SetId) -> bool {
        a == b
            || matches!(
                (self.class_of.get(&a), self.class_of.get(&b)),
                (Some(x), Some(y)) if x == y
            )
    }

    fn class_for(&mut self, set: SetId) -> usize {
        if let Some(class) = self.class_of.get(&set) {
            return *class;
        }
        let class = self.next_class;
        self.next_class += 1;
        self.class_of.insert(set, class);
        self.classes.insert(class, BTreeSet::from([set]));
        class
    }

    fn merge(&mut self, a: SetId, b: SetId) {
        let (ca, cb) = (self.class_for(a), self.class_for(b));
        if ca == cb {
            return;
        }
        let size = |c: usize| self.classes.get(&c).map_or(0, BTreeSet::len);
        let (keep, absorb) = if size(ca) >= size(cb) { (ca, cb) } else { (cb, ca) };
        let moved = self.classes.remove(&absorb).unwrap_or_default();
        for set in &moved {
            self.class_of.insert(*set, keep);
        }
        self.classes.entry(keep).or_default().extend(moved);
    }

    fn forget(&mut self, set: SetId) {
        if let Some(class) = self.class_of.remove(&set) {
            if let Some(members) = self.classes.get_mut(&class) {
                members.remove(&set);
                if members.len() <= 1 {
                    for lone in std::mem::take(members) {
                        self.class_of.remove(&lone);
                    }
                    self.classes.remove(&class);
                }
            }
        }
    }
}

impl Domain for EqualityTracker {
    fn describe(&self) -> String {
        format!("equalities({})", self.inner.describe())
    }

    fn declare(&mut self, name: &str, bits: u32) -> DomainResult<VarId> {
        self.inner.declare(name, bits)
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
        self.inner.singleton(point)
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
        if a != b && self.known_equal(a, b) {
            self.shortcuts += 1;
            return Ok(true);
        }
        let answer = self.inner.equal(a, b)?;
        if answer && a != b {
            self.merge(a, b);
        }
        Ok(answer)
    }

    fn subset(&mut self, a: SetId, b: SetId) -> DomainResult<bool> {
        if a != b && self.known_equal(a, b) {
            self.shortcuts += 1;
            return Ok(true);
        }
        self.inner.subset(a, b)
    }

    fn release(&mut self, set: SetId) -> DomainResult<()> {
        self.inner.release(set)?;
        self.forget(set);
        Ok(())
    }
}

/// Registry constructor.
pub fn wrap(inner: Box<dyn Domain>, _arg: Option<&str>) -> DomainResult<Box<dyn Domain>> {
    Ok(Box::new(EqualityTracker::new(inner)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::ExplicitDomain;
    use crate::decorators::observed::Observed;
    use crate::decorators::stats::Statistics;

    #[test]
    fn test_known_equalities_skip_the_backend() {
        let counted = Observed::new(Box::new(ExplicitDomain::new()), Statistics::default());
        let mut domain = EqualityTracker::new(Box::new(counted));
        let x = domain.declare("x", 2).unwrap();
        let a = domain.var_eq_const(x, 1).unwrap();
        let b = domain.singleton(&[1]).unwrap();
        let c = domain.union(a, b).unwrap();
        let other = domain.var_eq_const(x, 2).unwrap();

        assert!(domain.equal(a, b).unwrap());
        assert!(domain.equal(b, c).unwrap());
        assert!(!domain.equal(a, other).unwrap());
        assert_eq!(domain.shortcuts(), 0);

        // a == b and b == c put all three in one class.
        assert!(domain.known_equal(a, c));
        assert!(domain.equal(c, a).unwrap());
        assert!(domain.subset(a, c).unwrap());
        assert_eq!(domain.shortcuts(), 2);
        assert!(!domain.known_equal(a, other));
    }

    #[test]
    fn test_release_leaves_the_class() {
        let mut domain = EqualityTracker::new(Box::new(ExplicitDomain::new()));
        let x = domain.declare("x", 1).unwrap();
        let a = domain.var_eq_const(x, 0).unwrap();
        let b = domain.var_eq_const(x, 0).unwrap();
        assert!(domain.equal(a, b).unwrap());
        assert!(domain.known_equal(a, b));

        domain.release(b).unwrap();
        assert!(!domain.known_equal(a, b));
        assert!(domain.class_of.is_empty());
        assert!(domain.classes.is_empty());
    }

    #[test]
    fn test_describe() {
        let domain = wrap(Box::new(ExplicitDomain::new()), None).unwrap();
        assert_eq!(domain.describe(), "equalities(explicit)");
    }
}
