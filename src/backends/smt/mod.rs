// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! SMT-LIB backend.
//!
//! Sets are kept as quantified bit-vector formulas over the declared
//! variables; nothing is enumerated. Emptiness, equality and inclusion are
//! decided by handing a self-contained script to an external [`Solver`].
//! This backend has no native `singleton`; stack `--singleton` on top of it
//! when scripts need point sets.

pub mod solver;

use std::collections::HashMap;

use anyhow::anyhow;

use crate::errors::{DomainError, DomainResult};
use crate::traits::{Domain, SetId, VarId};

pub use solver::{ProcessSolver, SatResult, Solver};

/// Largest width of a single variable.
pub const MAX_VARIABLE_BITS: u32 = 63;

#[derive(Debug)]
struct SmtVariable {
    name: String,
    bits: u32,
}

#[derive(Debug)]
pub struct SmtDomain {
    label: &'static str,
    solver: Box<dyn Solver>,
    vars: Vec<SmtVariable>,
    sets: HashMap<SetId, String>,
    next_set: u32,
}

impl SmtDomain {
    pub fn new(label: &'static str, solver: Box<dyn Solver>) -> Self {
        Self {
            label,
            solver,
            vars: Vec::new(),
            sets: HashMap::new(),
            next_set: 0,
        }
    }

    pub fn z3() -> Self {
        Self::new("z3", Box::new(ProcessSolver::z3()))
    }

    pub fn cvc5() -> Self {
        Self::new("cvc5", Box::new(ProcessSolver::cvc5()))
    }

    /// The formula describing `set`.
    pub fn formula(&self, set: SetId) -> DomainResult<&str> {
        self.sets
            .get(&set)
            .map(String::as_str)
            .ok_or(DomainError::UnknownSet(set))
    }

    /// A complete script asking whether `formula` is satisfiable.
    pub fn query_script(&self, formula: &str) -> String {
        let mut script = String::new();
        for (index, var) in self.vars.iter().enumerate() {
            script.push_str(&format!(
                "; {}\n(declare-const {} (_ BitVec {}))\n",
                var.name,
                symbol(index),
                var.bits
            ));
        }
        script.push_str(&format!("(assert {formula})\n(check-sat)\n(exit)\n"));
        script
    }

    fn store(&mut self, formula: String) -> SetId {
        self.next_set += 1;
        let id = SetId(self.next_set);
        self.sets.insert(id, formula);
        id
    }

    fn variable(&self, var: VarId) -> DomainResult<&SmtVariable> {
        self.vars
            .get(var.0 as usize)
            .ok_or(DomainError::UnknownVariable(var))
    }

    fn binary(&mut self, op: &str, a: SetId, b: SetId) -> DomainResult<SetId> {
        let formula = format!("({op} {} {})", self.formula(a)?, self.formula(b)?);
        Ok(self.store(formula))
    }

    /// True iff `formula` has no model.
    fn unsatisfiable(&mut self, formula: &str) -> DomainResult<bool> {
        let script = self.query_script(formula);
        match self.solver.check_sat(&script)? {
            SatResult::Sat => Ok(false),
            SatResult::Unsat => Ok(true),
            SatResult::Unknown => Err(DomainError::Backend(anyhow!(
                "{} could not decide the query",
                self.label
            ))),
        }
    }
}

fn symbol(index: usize) -> String {
    format!("v{index}")
}

fn literal(value: u64, bits: u32) -> String {
    format!("(_ bv{value} {bits})")
}

impl Domain for SmtDomain {
    fn describe(&self) -> String {
        self.label.to_string()
    }

    fn declare(&mut self, name: &str, bits: u32) -> DomainResult<VarId> {
        if bits == 0 || bits > MAX_VARIABLE_BITS {
            return Err(DomainError::InvalidWidth(bits));
        }
        self.vars.push(SmtVariable {
            name: name.to_string(),
            bits,
        });
        Ok(VarId(self.vars.len() as u32 - 1))
    }

    fn top(&mut self) -> DomainResult<SetId> {
        Ok(self.store("true".to_string()))
    }

    fn bottom(&mut self) -> DomainResult<SetId> {
        Ok(self.store("false".to_string()))
    }

    fn var_eq_const(&mut self, var: VarId, value: u64) -> DomainResult<SetId> {
        let bits = self.variable(var)?.bits;
        if value >> bits != 0 {
            return Err(DomainError::ValueOutOfRange { value, bits });
        }
        let formula = format!("(= {} {})", symbol(var.0 as usize), literal(value, bits));
        Ok(self.store(formula))
    }

    fn var_eq_var(&mut self, a: VarId, b: VarId) -> DomainResult<SetId> {
        let (left, right) = (self.variable(a)?.bits, self.variable(b)?.bits);
        if left != right {
            return Err(DomainError::WidthMismatch { left, right });
        }
        let formula = format!("(= {} {})", symbol(a.0 as usize), symbol(b.0 as usize));
        Ok(self.store(formula))
    }

    fn union(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        self.binary("or", a, b)
    }

    fn intersect(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        self.binary("and", a, b)
    }

    fn difference(&mut self, a: SetId, b: SetId) -> DomainResult<SetId> {
        let formula = format!("(and {} (not {}))", self.formula(a)?, self.formula(b)?);
        Ok(self.store(formula))
    }

    fn complement(&mut self, a: SetId) -> DomainResult<SetId> {
        let formula = format!("(not {})", self.formula(a)?);
        Ok(self.store(formula))
    }

    fn exists(&mut self, set: SetId, var: VarId) -> DomainResult<SetId> {
        let bits = self.variable(var)?.bits;
        let formula = format!(
            "(exists (({} (_ BitVec {bits}))) {})",
            symbol(var.0 as usize),
            self.formula(set)?
        );
        Ok(self.store(formula))
    }

    fn is_empty(&mut self, set: SetId) -> DomainResult<bool> {
        let formula = self.formula(set)?.to_string();
        self.unsatisfiable(&formula)
    }

    fn equal(&mut self, a: SetId, b: SetId) -> DomainResult<bool> {
        let formula = format!("(xor {} {})", self.formula(a)?, self.formula(b)?);
        self.unsatisfiable(&formula)
    }

    fn subset(&mut self, a: SetId, b: SetId) -> DomainResult<bool> {
        let formula = format!("(and {} (not {}))", self.formula(a)?, self.formula(b)?);
        self.unsatisfiable(&formula)
    }

    fn release(&mut self, set: SetId) -> DomainResult<()> {
        self.sets
            .remove(&set)
            .map(|_| ())
            .ok_or(DomainError::UnknownSet(set))
    }
}
