// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Enumerative backend: every set is stored as the explicit list of its
//! valuations. It needs no external dependency, so it is always registered.

use std::collections::{BTreeSet, HashMap};

use crate::errors::{DomainError, DomainResult};
use crate::traits::{Domain, SetId, VarId};

/// Largest universe, in total declared bits, the backend will enumerate.
pub const DEFAULT_LIMIT_BITS: u32 = 20;

/// Largest width of a single variable.
pub const MAX_VARIABLE_BITS: u32 = 63;

type Point = Vec<u64>;

#[derive(Debug)]
struct Variable {
    name: String,
    bits: u32,
}

#[derive(Debug)]
pub struct ExplicitDomain {
    vars: Vec<Variable>,
    sets: HashMap<SetId, BTreeSet<Point>>,
    next_set: u32,
    limit_bits: u32,
}

impl Default for ExplicitDomain {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplicitDomain {
    pub fn new() -> Self {
        Self::with_limit(DEFAULT_LIMIT_BITS)
    }

    /// Create a backend refusing universes larger than `2^limit_bits` valuations.
    pub fn with_limit(limit_bits: u32) -> Self {
        Self {
            vars: Vec::new(),
            sets: HashMap::new(),
            next_set: 0,
            limit_bits,
        }
    }

    fn total_bits(&self) -> u32 {
        self.vars.iter().map(|v| v.bits).sum()
    }

    fn store(&mut self, points: BTreeSet<Point>) -> SetId {
        self.next_set += 1;
        let id = SetId(self.next_set);
        self.sets.insert(id, points);
        id
    }

    fn set(&self, id: SetId) -> DomainResult<&BTreeSet<Point>> {
        self.sets.get(&id).ok_or(DomainError::UnknownSet(id))
    }

    fn variable(&self, id: VarId) -> DomainResult<&Variable> {
        self.vars
            .get(id.0 as usize)
            .ok_or(DomainError::UnknownVariable(id))
    }

    fn universe(&self) -> BTreeSet<Point> {
        self.vars
            .iter()
            .fold(BTreeSet::from([Point::new()]), |points, var| {
                extend(points, var.bits)
            })
    }

    fn combine(
        &mut self,
        a: SetId,
        b: SetId,
        op: impl Fn(&BTreeSet<Point>, &BTreeSet<Point>) -> BTreeSet<Point>,
    ) -> DomainResult<SetId> {
        let points = op(self.set(a)?, self.set(b)?);
        Ok(self.store(points))
    }
}

/// Append every value of a `bits`-wide variable to each point.
fn extend(points: BTreeSet<Point>, bits: u32) -> BTreeSet<Point> {
    points
        .into_iter()
        .flat_map(|point| {
            (0..1u64 << bits).map(move |value| {
                let mut extended = point.clone();
                extended.push(value);
                extended
            })
        })
        .collect()
}

fn check_value(value: u64, bits: u32) -> DomainResult<()> {
    if value >> bits == 0 {
        Ok(())
    } else {
        Err(DomainError::ValueOutOfRange { value, bits })
    }
}

impl Domain for ExplicitDomain {
    fn describe(&self) -> String {
        "explicit".to_string()
    }

    fn declare(&mut self, name: &str, bits: u32) -> DomainResult<VarId> {
        if bits == 0 || bits > MAX_VARIABLE_BITS {
            return Err(DomainError::InvalidWidth(bits));
        }
        let total = self.total_bits() + bits;
        if total > self.limit_bits {
            return Err(DomainError::UniverseTooLarge {
                bits: total,
                limit_bits: self.limit_bits,
            });
        }

        for points in self.sets.values_mut() {
            *points = extend(std::mem::take(points), bits);
        }
        self.vars.push(Variable {
            name: name.to_string(),
            bits,
        });
        tracing::trace!(variable = name, bits, "explicit domain declared variable");
        Ok(VarId(self.vars.len() as u32 - 1))
    }

    fn top(&mut self) -> DomainResult<SetId> {
        let points = self.universe();
        Ok(self.store(points))
    }

    fn bottom(&mut self) -> DomainResult<SetId> {
        Ok(self.store(BTreeSet::new()))
    }

    fn var_eq_const(&mut self, var: VarId, value: u64) -> DomainResult<SetId> {
        check_value(value, self.variable(var)?.bits)?;
        let index = var.0 as usize;
        let points = self
            .universe()
            .into_iter()
            .filter(|p| p[index] == value)
            .collect();
        Ok(self.store(points))
    }

    fn var_eq_var(&mut self, a: VarId, b: VarId) -> DomainResult<SetId> {
        let (left, right) = (self.variable(a)?.bits, self.variable(b)?.bits);
        if left != right {
            return Err(DomainError::WidthMismatch { left, right });
        }
        let (i, j) = (a.0 as usize, b.0 as usize);
        let points = self
            .universe()
            .into_iter()
            .filter(|p| p[i] == p[j])
            .collect();
        Ok(self.store(points))
    }

    fn singleton(&mut self, point: &[u64]) -> DomainResult<SetId> {
        if point.len() != self.vars.len() {
            return Err(DomainError::ArityMismatch {
                expected: self.vars.len(),
                got: point.len(),
            });
        }
        for (value, var) in point.iter().zip(&self.vars) {
            check_value(*value, var.bits)?;
        }
        Ok(self.store(BTreeSet::from([point.to_vec()])))
    }

    fn union(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        self.combine(a, b, |x, y| x.union(y).cloned().collect())
    }

    fn intersect(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        self.combine(a, b, |x, y| x.intersection(y).cloned().collect())
    }

    fn difference(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        self.combine(a, b, |x, y| x.difference(y).cloned().collect())
    }

    fn complement(&mut self, a: SetId) -> DomainResult<SetId> {
        let set = self.set(a)?;
        let points = self
            .universe()
            .into_iter()
            .filter(|p| !set.contains(p))
            .collect();
        Ok(self.store(points))
    }

    fn exists(&mut self, set: SetId, var: VarId) -> DomainResult<SetId> {
        let bits = self.variable(var)?.bits;
        let index = var.0 as usize;
        let points = self
            .set(set)?
            .iter()
            .flat_map(|point| {
                (0..1u64 << bits).map(move |value| {
                    let mut moved = point.clone();
                    moved[index] = value;
                    moved
                })
            })
            .collect();
        Ok(self.store(points))
    }

    fn is_empty(&mut self, set: SetId) -> DomainResult<bool> {
        Ok(self.set(set)?.is_empty())
    }

    fn equal(&mut self, a: SetId, b: SetId) -> DomainResult<bool> {
        Ok(self.set(a)? == self.set(b)?)
    }

    fn subset(&mut self, a: SetId, b: SetId) -> DomainResult<bool> {
        Ok(self.set(a)?.is_subset(self.set(b)?))
    }

    fn release(&mut self, set: SetId) -> DomainResult<()> {
        self.sets
            .remove(&set)
            .map(|_| ())
            .ok_or(DomainError::UnknownSet(set))
    }
}

impl ExplicitDomain {
    /// Number of valuations in `set`.
    pub fn cardinality(&self, set: SetId) -> DomainResult<usize> {
        Ok(self.set(set)?.len())
    }

    /// Names of the declared variables, in declaration order.
    pub fn variable_names(&self) -> Vec<&str> {
        self.vars.iter().map(|v| v.name.as_str()).collect()
    }
}
