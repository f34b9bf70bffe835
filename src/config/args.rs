// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use crate::config::assembler::StackCommand;
use crate::config::consts::ARGS_ENV_VAR;
use crate::config::registry::Registry;
use crate::errors::ConfigError;

/// Everything the command line asks for.
#[derive(Debug, Default)]
pub struct Invocation {
    pub commands: Vec<StackCommand>,
    pub input: Option<PathBuf>,
    pub help: bool,
}

/// Explicit tokens verbatim, followed by the whitespace-separated words of
/// the environment value. An unset or blank value adds nothing.
pub fn merge_args(explicit: &[String], env_value: Option<&str>) -> Vec<String> {
    explicit
        .iter()
        .cloned()
        .chain(
            env_value
                .into_iter()
                .flat_map(str::split_whitespace)
                .map(str::to_string),
        )
        .collect()
}

/// Current value of `SETSTACK_ARGS`, if set and valid unicode.
pub fn env_args() -> Option<String> {
    std::env::var(ARGS_ENV_VAR).ok()
}

/// Resolve tokens against the registry.
///
/// Options are `--name`, `--name value` or `--name=value`. The only
/// positional is the input path; `--` ends option parsing.
pub fn parse_invocation(registry: &Registry, tokens: &[String]) -> Result<Invocation, ConfigError> {
    let mut invocation = Invocation::default();
    let mut options_done = false;
    let mut tokens = tokens.iter();

    while let Some(token) = tokens.next() {
        if !options_done {
            if token == "-h" || token == "--help" {
                invocation.help = true;
                return Ok(invocation);
            }
            if token == "--" {
                options_done = true;
                continue;
            }
            if let Some(option) = token.strip_prefix("--") {
                let (name, inline) = match option.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (option, None),
                };
                let entry = *registry
                    .lookup(name)
                    .ok_or_else(|| ConfigError::UnknownArgument(token.clone()))?;

                let value = if entry.takes_value() {
                    let value = match inline {
                        Some(value) => Some(value.to_string()),
                        None => tokens.next().cloned(),
                    };
                    match value {
                        Some(value) if !value.is_empty() => Some(value),
                        _ => {
                            return Err(ConfigError::MissingValue {
                                option: name.to_string(),
                            })
                        }
                    }
                } else if let Some(value) = inline {
                    return Err(ConfigError::UnexpectedValue {
                        option: name.to_string(),
                        value: value.to_string(),
                    });
                } else {
                    None
                };

                invocation.commands.push(StackCommand::new(entry, value));
                continue;
            }
            if token.starts_with('-') {
                return Err(ConfigError::UnknownArgument(token.clone()));
            }
        }

        match &invocation.input {
            Some(first) => {
                return Err(ConfigError::ExtraInput {
                    first: first.display().to_string(),
                    second: token.clone(),
                })
            }
            None => invocation.input = Some(PathBuf::from(token)),
        }
    }

    Ok(invocation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{Feature, FeatureSet};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_args() {
        struct TestCase {
            name: &'static str,
            explicit: Vec<&'static str>,
            env_value: Option<&'static str>,
            expected: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "env words appended after explicit tokens",
                explicit: vec!["-a"],
                env_value: Some("-b  -c"),
                expected: vec!["-a", "-b", "-c"],
            },
            TestCase {
                name: "unset variable",
                explicit: vec!["--explicit", "in.txt"],
                env_value: None,
                expected: vec!["--explicit", "in.txt"],
            },
            TestCase {
                name: "blank variable",
                explicit: vec!["--explicit"],
                env_value: Some(" \t\n "),
                expected: vec!["--explicit"],
            },
            TestCase {
                name: "explicit tokens kept verbatim",
                explicit: vec!["a b", ""],
                env_value: Some("\t--stats\n"),
                expected: vec!["a b", "", "--stats"],
            },
            TestCase {
                name: "nothing at all",
                explicit: vec![],
                env_value: None,
                expected: vec![],
            },
        ];

        for test_case in test_cases {
            let merged = merge_args(&strings(&test_case.explicit), test_case.env_value);
            assert_eq!(
                merged, test_case.expected,
                "Test case '{}' failed",
                test_case.name
            );
        }
    }

    #[test]
    fn test_parse_invocation_accepts() {
        struct TestCase {
            name: &'static str,
            tokens: Vec<&'static str>,
            expected_commands: Vec<(&'static str, Option<&'static str>)>,
            expected_input: Option<&'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "backend and input",
                tokens: vec!["--explicit", "prog.sset"],
                expected_commands: vec![("explicit", None)],
                expected_input: Some("prog.sset"),
            },
            TestCase {
                name: "value as next token",
                tokens: vec!["--explicit", "--log", "out.jsonl"],
                expected_commands: vec![("explicit", None), ("log", Some("out.jsonl"))],
                expected_input: None,
            },
            TestCase {
                name: "value inline",
                tokens: vec!["--explicit", "--trace=+run.strace", "--stats"],
                expected_commands: vec![
                    ("explicit", None),
                    ("trace", Some("+run.strace")),
                    ("stats", None),
                ],
                expected_input: None,
            },
            TestCase {
                name: "input before options",
                tokens: vec!["in.strace", "--explicit"],
                expected_commands: vec![("explicit", None)],
                expected_input: Some("in.strace"),
            },
            TestCase {
                name: "double dash makes the rest positional",
                tokens: vec!["--explicit", "--", "--odd-name"],
                expected_commands: vec![("explicit", None)],
                expected_input: Some("--odd-name"),
            },
            TestCase {
                name: "repeated entries are separate commands",
                tokens: vec!["--explicit", "--explicit", "--stats"],
                expected_commands: vec![("explicit", None), ("explicit", None), ("stats", None)],
                expected_input: None,
            },
        ];

        let registry = Registry::standard(&FeatureSet::none());
        for test_case in test_cases {
            let invocation = parse_invocation(&registry, &strings(&test_case.tokens))
                .unwrap_or_else(|e| panic!("{}: {}", test_case.name, e));

            let commands: Vec<_> = invocation
                .commands
                .iter()
                .map(|c| (c.name(), c.value.as_deref()))
                .collect();
            assert_eq!(commands, test_case.expected_commands, "{}", test_case.name);
            assert_eq!(
                invocation.input,
                test_case.expected_input.map(PathBuf::from),
                "{}",
                test_case.name
            );
            assert!(!invocation.help, "{}", test_case.name);
        }
    }

    #[test]
    fn test_parse_invocation_rejects() {
        let test_cases = vec![
            ("unknown option", vec!["--bogus"], "unknown argument '--bogus'"),
            ("single dash option", vec!["-x"], "unknown argument '-x'"),
            ("gated backend not detected", vec!["--z3"], "unknown argument '--z3'"),
            (
                "missing trailing value",
                vec!["--explicit", "--log"],
                "argument '--log' expects a value",
            ),
            ("empty inline value", vec!["--trace="], "argument '--trace' expects a value"),
            (
                "value on a flag",
                vec!["--stats=yes"],
                "argument '--stats' does not take a value (got 'yes')",
            ),
            (
                "two inputs",
                vec!["a.sset", "b.sset"],
                "more than one input file given: 'a.sset' and 'b.sset'",
            ),
        ];

        let registry = Registry::standard(&FeatureSet::none());
        for (name, tokens, expected) in test_cases {
            let err = parse_invocation(&registry, &strings(&tokens)).unwrap_err();
            assert_eq!(err.to_string(), expected, "Test case '{}' failed", name);
        }
    }

    #[test]
    fn test_gated_backend_accepted_when_enabled() {
        let registry = Registry::standard(&FeatureSet::none().with(Feature::Z3));
        let invocation = parse_invocation(&registry, &strings(&["--z3"])).unwrap();
        assert_eq!(invocation.commands.len(), 1);
        assert_eq!(invocation.commands[0].name(), "z3");
    }

    #[test]
    fn test_help_short_circuits() {
        let registry = Registry::standard(&FeatureSet::none());
        for tokens in [vec!["--help"], vec!["--explicit", "-h", "--bogus"]] {
            let invocation = parse_invocation(&registry, &strings(&tokens)).unwrap();
            assert!(invocation.help);
        }
    }
}
