// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

#[cfg(test)]
mod integration_tests {
    use crate::config::{merge_args, parse_invocation, Registry, StackAssembler};
    use crate::errors::{ConfigError, ConfigWarning};
    use crate::features::FeatureSet;

    fn tokens(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    fn assemble(line: &str, env: Option<&str>) -> Result<crate::config::Assembled, ConfigError> {
        let registry = Registry::standard(&FeatureSet::none());
        let merged = merge_args(&tokens(line), env);
        let invocation = parse_invocation(&registry, &merged)?;
        let mut assembler = StackAssembler::new();
        assembler.run(&invocation.commands)?;
        assembler.finish()
    }

    /// Token lines through registry, parser and assembler
    #[test]
    fn test_token_lines_to_domains() {
        struct TestCase {
            name: &'static str,
            line: &'static str,
            env: Option<&'static str>,
            expected_domain: &'static str,
            expected_discarded: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "plain backend",
                line: "--explicit",
                env: None,
                expected_domain: "explicit",
                expected_discarded: vec![],
            },
            TestCase {
                name: "decorators apply in order",
                line: "--explicit --singleton --stats",
                env: None,
                expected_domain: "stats(singleton(explicit))",
                expected_discarded: vec![],
            },
            TestCase {
                name: "environment decorates the explicit stack",
                line: "--explicit",
                env: Some("--equalities --debug"),
                expected_domain: "debug(equalities(explicit))",
                expected_discarded: vec![],
            },
            TestCase {
                name: "pack takes a backend name",
                line: "--explicit --pack explicit:2 --stats",
                env: None,
                expected_domain: "stats(pack(explicit))",
                expected_discarded: vec![],
            },
            TestCase {
                name: "environment backend shadows the command line",
                line: "--explicit --stats",
                env: Some("--explicit"),
                expected_domain: "explicit",
                expected_discarded: vec!["stats(explicit)"],
            },
        ];

        for test_case in test_cases {
            let assembled = assemble(test_case.line, test_case.env)
                .unwrap_or_else(|e| panic!("{}: {}", test_case.name, e));

            assert_eq!(
                assembled.domain.describe(),
                test_case.expected_domain,
                "Test case '{}' failed",
                test_case.name
            );
            let discarded = match assembled.warning {
                Some(ConfigWarning::UnusedDomains { discarded, .. }) => discarded,
                None => vec![],
            };
            assert_eq!(discarded, test_case.expected_discarded, "{}", test_case.name);
        }
    }

    #[test]
    fn test_fatal_token_lines() {
        let test_cases = vec![
            ("", "no domain specified"),
            ("--stats --explicit", "decorator '--stats' has no input domain"),
            ("--explicit --log", "argument '--log' expects a value"),
            ("--cvc5", "unknown argument '--cvc5'"),
        ];

        for (line, expected) in test_cases {
            let err = assemble(line, None).unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "'{}': got '{}'",
                line,
                err
            );
        }
    }

    #[test]
    fn test_log_decorator_writes_through_assembled_domain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("calls.jsonl");
        let line = format!("--explicit --log {}", path.display());

        let mut assembled = assemble(&line, None).unwrap();
        let x = assembled.domain.declare("x", 2).unwrap();
        let set = assembled.domain.var_eq_const(x, 1).unwrap();
        assert!(!assembled.domain.is_empty(set).unwrap());
        drop(assembled);

        let written = std::fs::read_to_string(&path).unwrap();
        let records: Vec<serde_json::Value> = written
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0]["op"], "declare");
        assert_eq!(records[1]["op"], "var_eq_const");
        assert_eq!(records[2]["op"], "is_empty");
        assert_eq!(records[2]["seq"], 3);
    }
}
