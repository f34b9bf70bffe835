// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `--pack <backend>[:<size>]`: spread the variables over several domains.
//!
//! Variables are grouped into packs of at most `size` (default 1) in
//! declaration order. The wrapped domain holds the first pack and every
//! further pack is a fresh instance of the named backend, so no single
//! domain ever sees more than `size` variables.
//!
//! A set is a union of product terms. Each term has one component per pack,
//! and the valuations of the term are those whose restriction to every pack
//! lies in that pack's component. Union concatenates terms, intersection
//! pairs them up, and complement applies De Morgan term by term. Terms found
//! empty while intersecting are dropped, which keeps the unions small and
//! makes emptiness of an intersection free to read off.
//!
//! `var_eq_var` between variables of different packs is expanded one value
//! at a time and only accepted up to [`MAX_CROSS_PACK_BITS`] bits.

use std::collections::HashMap;

use anyhow::{anyhow, Context};

use crate::config::{BackendCtor, EntryKind, Registry};
use crate::errors::{DomainError, DomainResult};
use crate::features::FeatureSet;
use crate::traits::{Domain, SetId, VarId};

/// Widest variable `var_eq_var` can relate across two packs.
pub const MAX_CROSS_PACK_BITS: u32 = 8;

/// Variables per pack when the option gives no size.
pub const DEFAULT_PACK_SIZE: usize = 1;

/// One component per pack; the term denotes their product.
type Term = Vec<SetId>;

#[derive(Debug, Clone, Copy)]
struct PackedVar {
    pack: usize,
    local: VarId,
    bits: u32,
}

#[derive(Debug)]
pub struct PackedDomain {
    packs: Vec<Box<dyn Domain>>,
    pack_vars: Vec<usize>,
    backend: &'static str,
    factory: BackendCtor,
    pack_size: usize,
    vars: Vec<PackedVar>,
    sets: HashMap<SetId, Vec<Term>>,
    next_set: u32,
}

impl PackedDomain {
    /// `first` holds the first pack; later packs come from `factory`.
    pub fn new(
        first: Box<dyn Domain>,
        backend: &'static str,
        factory: BackendCtor,
        pack_size: usize,
    ) -> Self {
        Self {
            packs: vec![first],
            pack_vars: vec![0],
            backend,
            factory,
            pack_size: pack_size.max(1),
            vars: Vec::new(),
            sets: HashMap::new(),
            next_set: 0,
        }
    }

    pub fn pack_count(&self) -> usize {
        self.packs.len()
    }

    /// Name of the backend that builds the packs after the first.
    pub fn backend(&self) -> &'static str {
        self.backend
    }

    fn var(&self, var: VarId) -> DomainResult<PackedVar> {
        self.vars
            .get(var.0 as usize)
            .copied()
            .ok_or(DomainError::UnknownVariable(var))
    }

    fn terms(&self, set: SetId) -> DomainResult<Vec<Term>> {
        self.sets.get(&set).cloned().ok_or(DomainError::UnknownSet(set))
    }

    fn store(&mut self, terms: Vec<Term>) -> SetId {
        self.next_set += 1;
        let id = SetId(self.next_set);
        self.sets.insert(id, terms);
        id
    }

    fn top_term(&mut self) -> DomainResult<Term> {
        self.packs.iter_mut().map(|domain| domain.top()).collect()
    }

    /// A term constrained only in `pack`.
    fn term_with(&mut self, pack: usize, component: SetId) -> DomainResult<Term> {
        let mut term = Vec::with_capacity(self.packs.len());
        for (index, domain) in self.packs.iter_mut().enumerate() {
            term.push(if index == pack { component } else { domain.top()? });
        }
        Ok(term)
    }

    fn copy_term(&mut self, term: &Term) -> DomainResult<Term> {
        self.packs
            .iter_mut()
            .zip(term)
            .map(|(domain, set)| domain.union(*set, *set))
            .collect()
    }

    fn release_terms(&mut self, terms: Vec<Term>) -> DomainResult<()> {
        for term in terms {
            for (domain, set) in self.packs.iter_mut().zip(term) {
                domain.release(set)?;
            }
        }
        Ok(())
    }

    fn term_is_empty(&mut self, term: &Term) -> DomainResult<bool> {
        for (domain, set) in self.packs.iter_mut().zip(term) {
            if domain.is_empty(*set)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Pairwise products of `a` and `b`, without the empty ones.
    fn intersect_terms(&mut self, a: &[Term], b: &[Term]) -> DomainResult<Vec<Term>> {
        let mut result = Vec::new();
        for left in a {
            for right in b {
                let term = self
                    .packs
                    .iter_mut()
                    .zip(left.iter().zip(right))
                    .map(|(domain, (x, y))| domain.intersect(*x, *y))
                    .collect::<DomainResult<Term>>()?;
                if self.term_is_empty(&term)? {
                    self.release_terms(vec![term])?;
                } else {
                    result.push(term);
                }
            }
        }
        Ok(result)
    }

    fn complement_terms(&mut self, terms: &[Term]) -> DomainResult<Vec<Term>> {
        let mut result = vec![self.top_term()?];
        for term in terms {
            // Outside a product means outside at least one component.
            let mut outside = Vec::with_capacity(term.len());
            for (pack, component) in term.iter().enumerate() {
                let flipped = self.packs[pack].complement(*component)?;
                outside.push(self.term_with(pack, flipped)?);
            }
            let next = self.intersect_terms(&result, &outside)?;
            self.release_terms(result)?;
            self.release_terms(outside)?;
            result = next;
        }
        Ok(result)
    }

    /// True iff `a` has no valuation outside `b`.
    fn contained(&mut self, a: SetId, b: SetId) -> DomainResult<bool> {
        let (left, right) = (self.terms(a)?, self.terms(b)?);
        let outside = self.complement_terms(&right)?;
        let rest = self.intersect_terms(&left, &outside)?;
        let contained = rest.is_empty();
        self.release_terms(outside)?;
        self.release_terms(rest)?;
        Ok(contained)
    }
}

impl Domain for PackedDomain {
    fn describe(&self) -> String {
        format!("pack({})", self.packs[0].describe())
    }

    fn declare(&mut self, name: &str, bits: u32) -> DomainResult<VarId> {
        let last = self.packs.len() - 1;
        let (pack, local) = if self.pack_vars[last] < self.pack_size {
            (last, self.packs[last].declare(name, bits)?)
        } else {
            let mut domain = (self.factory)()?;
            let local = domain.declare(name, bits)?;
            for terms in self.sets.values_mut() {
                for term in terms.iter_mut() {
                    term.push(domain.top()?);
                }
            }
            self.packs.push(domain);
            self.pack_vars.push(0);
            (last + 1, local)
        };
        self.pack_vars[pack] += 1;
        self.vars.push(PackedVar { pack, local, bits });
        Ok(VarId(self.vars.len() as u32 - 1))
    }

    fn top(&mut self) -> DomainResult<SetId> {
        let term = self.top_term()?;
        Ok(self.store(vec![term]))
    }

    fn bottom(&mut self) -> DomainResult<SetId> {
        Ok(self.store(Vec::new()))
    }

    fn var_eq_const(&mut self, var: VarId, value: u64) -> DomainResult<SetId> {
        let var = self.var(var)?;
        let component = self.packs[var.pack].var_eq_const(var.local, value)?;
        let term = self.term_with(var.pack, component)?;
        Ok(self.store(vec![term]))
    }

    fn var_eq_var(&mut self, a: VarId, b: VarId) -> DomainResult<SetId> {
        let (a, b) = (self.var(a)?, self.var(b)?);
        if a.pack == b.pack {
            let component = self.packs[a.pack].var_eq_var(a.local, b.local)?;
            let term = self.term_with(a.pack, component)?;
            return Ok(self.store(vec![term]));
        }
        if a.bits != b.bits {
            return Err(DomainError::WidthMismatch {
                left: a.bits,
                right: b.bits,
            });
        }
        if a.bits > MAX_CROSS_PACK_BITS {
            return Err(DomainError::Unsupported {
                operation: "var_eq_var",
                domain: self.describe(),
            });
        }
        let mut terms = Vec::with_capacity(1 << a.bits);
        for value in 0..(1u64 << a.bits) {
            let left = self.packs[a.pack].var_eq_const(a.local, value)?;
            let right = self.packs[b.pack].var_eq_const(b.local, value)?;
            let mut term = self.term_with(a.pack, left)?;
            let unconstrained = std::mem::replace(&mut term[b.pack], right);
            self.packs[b.pack].release(unconstrained)?;
            terms.push(term);
        }
        Ok(self.store(terms))
    }

    fn singleton(&mut self, point: &[u64]) -> DomainResult<SetId> {
        if point.len() != self.vars.len() {
            return Err(DomainError::ArityMismatch {
                expected: self.vars.len(),
                got: point.len(),
            });
        }
        let mut term = Vec::with_capacity(self.packs.len());
        for pack in 0..self.packs.len() {
            let local: Vec<u64> = self
                .vars
                .iter()
                .zip(point)
                .filter(|(var, _)| var.pack == pack)
                .map(|(_, value)| *value)
                .collect();
            let domain = &mut self.packs[pack];
            term.push(if local.is_empty() {
                domain.top()?
            } else {
                domain.singleton(&local)?
            });
        }
        Ok(self.store(vec![term]))
    }

    fn union(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        let (left, right) = (self.terms(a)?, self.terms(b)?);
        let mut terms = Vec::with_capacity(left.len() + right.len());
        for term in left.iter().chain(&right) {
            terms.push(self.copy_term(term)?);
        }
        Ok(self.store(terms))
    }

    fn intersect(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        let (left, right) = (self.terms(a)?, self.terms(b)?);
        let terms = self.intersect_terms(&left, &right)?;
        Ok(self.store(terms))
    }

    fn difference(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        let (left, right) = (self.terms(a)?, self.terms(b)?);
        let outside = self.complement_terms(&right)?;
        let terms = self.intersect_terms(&left, &outside)?;
        self.release_terms(outside)?;
        Ok(self.store(terms))
    }

    fn complement(&mut self, a: SetId) -> DomainResult<SetId> {
        let terms = self.terms(a)?;
        let terms = self.complement_terms(&terms)?;
        Ok(self.store(terms))
    }

    fn exists(&mut self, set: SetId, var: VarId) -> DomainResult<SetId> {
        let var = self.var(var)?;
        let mut projected = Vec::new();
        for term in self.terms(set)? {
            let mut copy = Vec::with_capacity(term.len());
            for (pack, component) in term.into_iter().enumerate() {
                let domain = &mut self.packs[pack];
                copy.push(if pack == var.pack {
                    domain.exists(component, var.local)?
                } else {
                    domain.union(component, component)?
                });
            }
            projected.push(copy);
        }
        Ok(self.store(projected))
    }

    fn is_empty(&mut self, set: SetId) -> DomainResult<bool> {
        for term in self.terms(set)? {
            if !self.term_is_empty(&term)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn equal(&mut self, a: SetId, b: SetId) -> DomainResult<bool> {
        Ok(self.contained(a, b)? && self.contained(b, a)?)
    }

    fn subset(&mut self, a: SetId, b: SetId) -> DomainResult<bool> {
        self.contained(a, b)
    }

    fn release(&mut self, set: SetId) -> DomainResult<()> {
        let terms = self.sets.remove(&set).ok_or(DomainError::UnknownSet(set))?;
        self.release_terms(terms)
    }
}

/// Split `<backend>[:<size>]`.
fn parse_pack_arg(arg: &str) -> anyhow::Result<(&str, usize)> {
    match arg.split_once(':') {
        Some((backend, size)) => {
            let size = size
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .with_context(|| format!("invalid pack size '{size}'"))?;
            Ok((backend, size))
        }
        None => Ok((arg, DEFAULT_PACK_SIZE)),
    }
}

/// Registry constructor: `arg` names the backend that builds the extra packs.
pub fn wrap(inner: Box<dyn Domain>, arg: Option<&str>) -> DomainResult<Box<dyn Domain>> {
    let arg = arg.context("pack decorator needs a backend name")?;
    let (name, size) = parse_pack_arg(arg)?;
    let registry = Registry::standard(&FeatureSet::from_build());
    let entry = registry
        .lookup(name)
        .ok_or_else(|| anyhow!("unknown pack backend '{name}'"))?;
    let EntryKind::Backend(factory) = entry.kind else {
        return Err(anyhow!("'{name}' is a decorator, not a backend").into());
    };
    Ok(Box::new(PackedDomain::new(inner, entry.name, factory, size)))
}
