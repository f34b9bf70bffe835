// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! `--stats`: count calls per operation and report the totals when the
//! domain is dropped.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::decorators::observed::{Call, Observed, Observer, Reply};
use crate::errors::{DomainError, DomainResult};
use crate::observability::messages::decorators::StatisticsReport;
use crate::observability::messages::StructuredLog;
use crate::traits::Domain;

/// Counters for one operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationStats {
    pub calls: u64,
    pub failures: u64,
    pub answered_true: u64,
    pub answered_false: u64,
}

#[derive(Debug, Default)]
pub struct Statistics {
    table: BTreeMap<&'static str, OperationStats>,
}

impl Statistics {
    pub fn get(&self, operation: &str) -> OperationStats {
        self.table.get(operation).copied().unwrap_or_default()
    }

    pub fn total_calls(&self) -> u64 {
        self.table.values().map(|s| s.calls).sum()
    }

    /// The whole table as a JSON object keyed by operation.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.table).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }
}

impl Observer for Statistics {
    fn label(&self) -> String {
        "stats".to_string()
    }

    fn observe(&mut self, call: &Call<'_>, outcome: Result<Reply, &DomainError>) {
        let entry = self.table.entry(call.kind()).or_default();
        entry.calls += 1;
        match outcome {
            Err(_) => entry.failures += 1,
            Ok(Reply::Bool(true)) => entry.answered_true += 1,
            Ok(Reply::Bool(false)) => entry.answered_false += 1,
            Ok(_) => {}
        }
    }
}

impl Drop for Statistics {
    fn drop(&mut self) {
        if self.table.is_empty() {
            return;
        }
        let summary = self.to_json();
        StatisticsReport {
            total_calls: self.total_calls(),
            summary: &summary,
        }
        .log();
        eprintln!("statistics: {summary}");
    }
}

/// Registry constructor.
pub fn wrap(inner: Box<dyn Domain>, _arg: Option<&str>) -> DomainResult<Box<dyn Domain>> {
    Ok(Box::new(Observed::new(inner, Statistics::default())))
}
