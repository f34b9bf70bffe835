// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::fmt::Write as _;

use crate::backends::{ExplicitDomain, SmtDomain};
use crate::config::consts::{ARGS_ENV_VAR, TRACE_EXTENSION};
use crate::decorators;
use crate::errors::DomainResult;
use crate::features::{Feature, FeatureSet};
use crate::traits::Domain;

/// Builds a fresh backend domain.
pub type BackendCtor = fn() -> DomainResult<Box<dyn Domain>>;

/// Wraps the domain on top of the stack, given the option's value if it takes one.
pub type DecoratorCtor = fn(Box<dyn Domain>, Option<&str>) -> DomainResult<Box<dyn Domain>>;

#[derive(Clone, Copy)]
pub enum EntryKind {
    Backend(BackendCtor),
    Decorator {
        ctor: DecoratorCtor,
        /// Placeholder shown in usage, e.g. `<path>`. `None` for flags.
        value: Option<&'static str>,
    },
}

/// One named constructor, addressed on the command line as `--<name>`.
#[derive(Clone, Copy)]
pub struct RegistryEntry {
    pub name: &'static str,
    pub summary: &'static str,
    pub kind: EntryKind,
    /// Entry only exists when this feature was detected.
    pub gate: Option<Feature>,
}

impl RegistryEntry {
    pub fn is_backend(&self) -> bool {
        matches!(self.kind, EntryKind::Backend(_))
    }

    pub fn takes_value(&self) -> bool {
        matches!(self.kind, EntryKind::Decorator { value: Some(_), .. })
    }

    fn usage_form(&self) -> String {
        match self.kind {
            EntryKind::Decorator { value: Some(hint), .. } => format!("--{} {}", self.name, hint),
            _ => format!("--{}", self.name),
        }
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("name", &self.name)
            .field("backend", &self.is_backend())
            .field("gate", &self.gate)
            .finish()
    }
}

fn explicit_backend() -> DomainResult<Box<dyn Domain>> {
    Ok(Box::new(ExplicitDomain::new()))
}

fn z3_backend() -> DomainResult<Box<dyn Domain>> {
    Ok(Box::new(SmtDomain::z3()))
}

fn cvc5_backend() -> DomainResult<Box<dyn Domain>> {
    Ok(Box::new(SmtDomain::cvc5()))
}

/// Every constructor the binary knows about, gated ones included, in usage order.
pub fn standard_entries() -> Vec<RegistryEntry> {
    vec![
        RegistryEntry {
            name: "explicit",
            summary: "enumerate valuations explicitly (small universes only)",
            kind: EntryKind::Backend(explicit_backend),
            gate: None,
        },
        RegistryEntry {
            name: "z3",
            summary: "encode sets as SMT-LIB formulas decided by z3",
            kind: EntryKind::Backend(z3_backend),
            gate: Some(Feature::Z3),
        },
        RegistryEntry {
            name: "cvc5",
            summary: "encode sets as SMT-LIB formulas decided by cvc5",
            kind: EntryKind::Backend(cvc5_backend),
            gate: Some(Feature::Cvc5),
        },
        RegistryEntry {
            name: "log",
            summary: "write every interaction to a JSON lines file",
            kind: EntryKind::Decorator {
                ctor: decorators::log::wrap,
                value: Some("<path>"),
            },
            gate: None,
        },
        RegistryEntry {
            name: "stats",
            summary: "count operations and print a summary at exit",
            kind: EntryKind::Decorator {
                ctor: decorators::stats::wrap,
                value: None,
            },
            gate: None,
        },
        RegistryEntry {
            name: "debug",
            summary: "print every interaction to stderr",
            kind: EntryKind::Decorator {
                ctor: decorators::debug::wrap,
                value: None,
            },
            gate: None,
        },
        RegistryEntry {
            name: "trace",
            summary: "record a replayable trace; a leading '+' also records answers to check",
            kind: EntryKind::Decorator {
                ctor: decorators::trace::wrap,
                value: Some("<[+]path>"),
            },
            gate: None,
        },
        RegistryEntry {
            name: "equalities",
            summary: "remember sets proven equal and answer repeat queries directly",
            kind: EntryKind::Decorator {
                ctor: decorators::equalities::wrap,
                value: None,
            },
            gate: None,
        },
        RegistryEntry {
            name: "singleton",
            summary: "provide point sets for backends without them",
            kind: EntryKind::Decorator {
                ctor: decorators::singleton::wrap,
                value: None,
            },
            gate: None,
        },
        RegistryEntry {
            name: "pack",
            summary: "split variables into groups, each in its own instance of the named backend",
            kind: EntryKind::Decorator {
                ctor: decorators::pack::wrap,
                value: Some("<backend>[:size]"),
            },
            gate: None,
        },
    ]
}

/// Name-indexed table of backend and decorator constructors.
///
/// Gated entries whose feature is disabled are left out entirely, so asking
/// for them is indistinguishable from asking for a name that never existed.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: Vec<RegistryEntry>,
}

impl Registry {
    /// The binary's registry for the given feature flags.
    pub fn standard(features: &FeatureSet) -> Self {
        Self::from_entries(standard_entries(), features)
    }

    pub fn from_entries(
        entries: impl IntoIterator<Item = RegistryEntry>,
        features: &FeatureSet,
    ) -> Self {
        let entries = entries
            .into_iter()
            .filter(|entry| entry.gate.map_or(true, |f| features.is_enabled(f)))
            .collect();
        Self { entries }
    }

    pub fn lookup(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Help text listing the available entries.
    pub fn usage(&self, program: &str) -> String {
        let width = self
            .entries
            .iter()
            .map(|entry| entry.usage_form().len())
            .max()
            .unwrap_or(0);

        let mut text = format!("usage: {program} [OPTIONS...] [INPUT]\n");
        for (heading, backends) in [
            ("Backends (push a new domain):", true),
            ("Decorators (wrap the domain on top of the stack):", false),
        ] {
            let _ = writeln!(text, "\n{heading}");
            for entry in self.entries.iter().filter(|e| e.is_backend() == backends) {
                let _ = writeln!(
                    text,
                    "  {:<width$}  {}",
                    entry.usage_form(),
                    entry.summary,
                    width = width
                );
            }
        }
        let _ = writeln!(
            text,
            "\nOptions are applied left to right; words in ${ARGS_ENV_VAR} are appended.\n\
             INPUT ending in '{TRACE_EXTENSION}' is replayed as a trace, anything else is\n\
             read as a script. Without INPUT a script is read from stdin."
        );
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(registry: &Registry) -> Vec<&'static str> {
        registry.entries().map(|entry| entry.name).collect()
    }

    #[test]
    fn test_gated_backends_follow_feature_flags() {
        struct TestCase {
            name: &'static str,
            features: FeatureSet,
            present: Vec<&'static str>,
            absent: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "no optional backends",
                features: FeatureSet::none(),
                present: vec!["explicit"],
                absent: vec!["z3", "cvc5"],
            },
            TestCase {
                name: "z3 only",
                features: FeatureSet::none().with(Feature::Z3),
                present: vec!["explicit", "z3"],
                absent: vec!["cvc5"],
            },
            TestCase {
                name: "both solvers",
                features: FeatureSet::none().with(Feature::Z3).with(Feature::Cvc5),
                present: vec!["explicit", "z3", "cvc5"],
                absent: vec![],
            },
        ];

        for test_case in test_cases {
            let registry = Registry::standard(&test_case.features);
            for name in &test_case.present {
                assert!(
                    registry.lookup(name).is_some(),
                    "{}: expected '{}' to be registered",
                    test_case.name,
                    name
                );
            }
            for name in &test_case.absent {
                assert!(
                    registry.lookup(name).is_none(),
                    "{}: expected '{}' to be absent",
                    test_case.name,
                    name
                );
            }
        }
    }

    #[test]
    fn test_standard_order_and_decorators() {
        let registry = Registry::standard(&FeatureSet::none());
        assert_eq!(
            names(&registry),
            vec!["explicit", "log", "stats", "debug", "trace", "equalities", "singleton", "pack"]
        );

        let test_cases = vec![
            ("explicit", true, false),
            ("log", false, true),
            ("trace", false, true),
            ("stats", false, false),
            ("singleton", false, false),
            ("pack", false, true),
        ];
        for (name, backend, takes_value) in test_cases {
            let entry = registry.lookup(name).unwrap();
            assert_eq!(entry.is_backend(), backend, "{name}");
            assert_eq!(entry.takes_value(), takes_value, "{name}");
        }
    }

    #[test]
    fn test_explicit_backend_constructs() {
        let registry = Registry::standard(&FeatureSet::none());
        let entry = registry.lookup("explicit").unwrap();
        let EntryKind::Backend(ctor) = entry.kind else {
            panic!("explicit should be a backend");
        };
        assert_eq!(ctor().unwrap().describe(), "explicit");
    }

    #[test]
    fn test_usage_lists_only_registered_entries() {
        let registry = Registry::standard(&FeatureSet::none().with(Feature::Cvc5));
        let usage = registry.usage("setstack");

        assert!(usage.starts_with("usage: setstack [OPTIONS...] [INPUT]"));
        assert!(usage.contains("--cvc5"));
        assert!(!usage.contains("--z3"));
        assert!(usage.contains("--trace <[+]path>"));
        assert!(usage.contains("--pack <backend>[:size]"));
        assert!(usage.contains("SETSTACK_ARGS"));
    }
}
