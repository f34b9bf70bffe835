// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use crate::config::registry::{BackendCtor, DecoratorCtor, EntryKind, RegistryEntry};
use crate::errors::{ConfigError, ConfigWarning};
use crate::observability::messages::assembly::{
    BackendPushed, DecoratorApplied, DomainAssembled, DomainDiscarded,
};
use crate::observability::messages::StructuredLog;
use crate::traits::Domain;

/// One resolved command-line option, in the order it was given.
#[derive(Clone)]
pub struct StackCommand {
    pub entry: RegistryEntry,
    pub value: Option<String>,
}

impl StackCommand {
    pub fn new(entry: RegistryEntry, value: Option<String>) -> Self {
        Self { entry, value }
    }

    pub fn name(&self) -> &'static str {
        self.entry.name
    }
}

impl fmt::Debug for StackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "--{}={}", self.entry.name, value),
            None => write!(f, "--{}", self.entry.name),
        }
    }
}

/// The single domain left after assembly.
#[derive(Debug)]
pub struct Assembled {
    pub domain: Box<dyn Domain>,
    pub warning: Option<ConfigWarning>,
}

/// Builds a domain by replaying stack commands.
///
/// Backends push, decorators pop one domain and push its wrapper. Nothing
/// else touches the stack.
#[derive(Debug, Default)]
pub struct StackAssembler {
    stack: Vec<Box<dyn Domain>>,
}

impl StackAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Descriptions from bottom to top.
    pub fn describe_stack(&self) -> Vec<String> {
        self.stack.iter().map(|domain| domain.describe()).collect()
    }

    pub fn push_backend(&mut self, name: &str, ctor: BackendCtor) -> Result<(), ConfigError> {
        let domain = ctor().map_err(|source| ConfigError::Construction {
            name: name.to_string(),
            source,
        })?;
        self.stack.push(domain);
        BackendPushed {
            name,
            depth: self.stack.len(),
        }
        .log();
        Ok(())
    }

    pub fn apply_decorator(
        &mut self,
        name: &str,
        ctor: DecoratorCtor,
        value: Option<&str>,
    ) -> Result<(), ConfigError> {
        let inner = self.stack.pop().ok_or_else(|| ConfigError::EmptyStack {
            decorator: name.to_string(),
        })?;
        // A failed constructor consumed `inner`; the run is over anyway.
        let wrapped = ctor(inner, value).map_err(|source| ConfigError::Construction {
            name: name.to_string(),
            source,
        })?;
        DecoratorApplied {
            name,
            result: &wrapped.describe(),
        }
        .log();
        self.stack.push(wrapped);
        Ok(())
    }

    pub fn execute(&mut self, command: &StackCommand) -> Result<(), ConfigError> {
        match command.entry.kind {
            EntryKind::Backend(ctor) => self.push_backend(command.entry.name, ctor),
            EntryKind::Decorator { ctor, .. } => {
                self.apply_decorator(command.entry.name, ctor, command.value.as_deref())
            }
        }
    }

    /// Execute each command once, left to right, stopping at the first failure.
    pub fn run(&mut self, commands: &[StackCommand]) -> Result<(), ConfigError> {
        commands.iter().try_for_each(|command| self.execute(command))
    }

    /// Take the top domain. Anything below it is dropped here, top-down,
    /// so discarded chains flush their files before any input is read.
    pub fn finish(mut self) -> Result<Assembled, ConfigError> {
        let domain = self.stack.pop().ok_or(ConfigError::NoDomain)?;
        let used = domain.describe();

        let mut discarded = Vec::new();
        while let Some(extra) = self.stack.pop() {
            let description = extra.describe();
            DomainDiscarded {
                description: &description,
            }
            .log();
            drop(extra);
            discarded.push(description);
        }

        DomainAssembled {
            description: &used,
            discarded: discarded.len(),
        }
        .log();

        let warning = if discarded.is_empty() {
            None
        } else {
            Some(ConfigWarning::UnusedDomains { used, discarded })
        };
        Ok(Assembled { domain, warning })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::smt::solver::{SatResult, Solver};
    use crate::backends::{ExplicitDomain, SmtDomain};
    use crate::decorators;
    use crate::errors::DomainResult;

    #[derive(Debug)]
    struct NoSolver;

    impl Solver for NoSolver {
        fn check_sat(&mut self, _script: &str) -> anyhow::Result<SatResult> {
            anyhow::bail!("no solver in tests")
        }
    }

    fn explicit() -> DomainResult<Box<dyn Domain>> {
        Ok(Box::new(ExplicitDomain::new()))
    }

    fn alpha() -> DomainResult<Box<dyn Domain>> {
        Ok(Box::new(SmtDomain::new("alpha", Box::new(NoSolver))))
    }

    fn beta() -> DomainResult<Box<dyn Domain>> {
        Ok(Box::new(SmtDomain::new("beta", Box::new(NoSolver))))
    }

    enum Step {
        Push(&'static str, BackendCtor),
        Wrap(&'static str, DecoratorCtor),
    }

    #[test]
    fn test_assembly_sequences() {
        struct TestCase {
            name: &'static str,
            steps: Vec<Step>,
            expected_stack: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "single backend",
                steps: vec![Step::Push("explicit", explicit)],
                expected_stack: vec!["explicit"],
            },
            TestCase {
                name: "decorator wraps the most recent backend",
                steps: vec![
                    Step::Push("alpha", alpha),
                    Step::Push("beta", beta),
                    Step::Wrap("stats", decorators::stats::wrap),
                ],
                expected_stack: vec!["alpha", "stats(beta)"],
            },
            TestCase {
                name: "decorators nest outward",
                steps: vec![
                    Step::Push("explicit", explicit),
                    Step::Wrap("singleton", decorators::singleton::wrap),
                    Step::Wrap("equalities", decorators::equalities::wrap),
                ],
                expected_stack: vec!["equalities(singleton(explicit))"],
            },
        ];

        for test_case in test_cases {
            let mut assembler = StackAssembler::new();
            for step in test_case.steps {
                match step {
                    Step::Push(name, ctor) => assembler.push_backend(name, ctor).unwrap(),
                    Step::Wrap(name, ctor) => assembler.apply_decorator(name, ctor, None).unwrap(),
                }
            }
            assert_eq!(
                assembler.describe_stack(),
                test_case.expected_stack,
                "Test case '{}' failed",
                test_case.name
            );
        }
    }

    #[test]
    fn test_decorator_on_empty_stack_names_the_decorator() {
        let mut assembler = StackAssembler::new();
        let err = assembler
            .apply_decorator("stats", decorators::stats::wrap, None)
            .unwrap_err();

        assert!(matches!(&err, ConfigError::EmptyStack { decorator } if decorator == "stats"));
        assert!(err.to_string().contains("--stats"));
        assert_eq!(assembler.depth(), 0);
    }

    #[test]
    fn test_finish_with_nothing_is_fatal() {
        let err = StackAssembler::new().finish().unwrap_err();
        assert!(matches!(err, ConfigError::NoDomain));
    }

    #[test]
    fn test_finish_with_two_domains_warns_and_uses_the_top() {
        let mut assembler = StackAssembler::new();
        assembler.push_backend("alpha", alpha).unwrap();
        assembler.push_backend("beta", beta).unwrap();

        let assembled = assembler.finish().unwrap();

        assert_eq!(assembled.domain.describe(), "beta");
        assert_eq!(
            assembled.warning,
            Some(ConfigWarning::UnusedDomains {
                used: "beta".to_string(),
                discarded: vec!["alpha".to_string()],
            })
        );
    }

    #[test]
    fn test_finish_with_one_domain_is_silent() {
        let mut assembler = StackAssembler::new();
        assembler.push_backend("explicit", explicit).unwrap();

        let assembled = assembler.finish().unwrap();
        assert_eq!(assembled.domain.describe(), "explicit");
        assert!(assembled.warning.is_none());
    }

    #[test]
    fn test_discarded_chain_is_flushed_during_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discarded.strace");
        let path_arg = path.to_str().unwrap().to_string();

        let mut assembler = StackAssembler::new();
        assembler.push_backend("explicit", explicit).unwrap();
        assembler
            .apply_decorator("trace", decorators::trace::wrap, Some(&path_arg))
            .unwrap();
        assembler.push_backend("explicit", explicit).unwrap();

        let assembled = assembler.finish().unwrap();
        let written = std::fs::read_to_string(&path).unwrap();

        assert!(written.starts_with("# setstack operation trace"));
        assert_eq!(assembled.domain.describe(), "explicit");
        assert!(assembled.warning.is_some());
    }

    #[test]
    fn test_failed_constructor_is_reported_by_name() {
        let mut assembler = StackAssembler::new();
        assembler.push_backend("explicit", explicit).unwrap();

        let err = assembler
            .apply_decorator("log", decorators::log::wrap, None)
            .unwrap_err();

        assert!(matches!(&err, ConfigError::Construction { name, .. } if name == "log"));
    }
}
