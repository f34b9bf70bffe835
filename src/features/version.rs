// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Dotted version numbers with numeric, component-wise ordering.
//!
//! This file is also compiled into `build.rs`, so it must stay std-only.

use std::cmp::Ordering;
use std::fmt;

/// A dotted version such as `4.12.2`.
///
/// Components compare numerically from left to right. Missing trailing
/// components count as zero, so `1.2` and `1.2.0.0` are equal, and leading
/// zeros carry no weight (`01.2` equals `1.2`).
#[derive(Debug, Clone, Default)]
pub struct Version {
    components: Vec<u64>,
}

impl Version {
    /// Parse a version string. Never fails: empty or non-numeric components
    /// are read as zero.
    pub fn parse(text: &str) -> Self {
        let components = text
            .trim()
            .split('.')
            .map(|part| part.trim().parse::<u64>().unwrap_or(0))
            .collect();
        Self { components }
    }

    /// The component at `index`, zero when absent.
    pub fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|i| self.component(i).cmp(&other.component(i)))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(u64::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// Returns true when `installed` is at or above `minimum`.
pub fn version_ge(installed: &str, minimum: &str) -> bool {
    Version::parse(installed) >= Version::parse(minimum)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_ge_table_driven() {
        struct TestCase {
            a: &'static str,
            b: &'static str,
            expected: bool,
        }

        let test_cases = vec![
            TestCase { a: "1.2", b: "1.2.0.0", expected: true },
            TestCase { a: "1.2.0.0", b: "1.2", expected: true },
            TestCase { a: "01.2", b: "1.2", expected: true },
            TestCase { a: "1.2", b: "01.2", expected: true },
            TestCase { a: "1.10", b: "1.9", expected: true },
            TestCase { a: "1.9", b: "1.10", expected: false },
            TestCase { a: "2", b: "1.99.99", expected: true },
            TestCase { a: "1.99.99", b: "2", expected: false },
            TestCase { a: "4.8.0", b: "4.8", expected: true },
            TestCase { a: "4.7.9", b: "4.8", expected: false },
            TestCase { a: "", b: "0", expected: true },
        ];

        for case in test_cases {
            assert_eq!(
                version_ge(case.a, case.b),
                case.expected,
                "version_ge({:?}, {:?})",
                case.a,
                case.b
            );
        }
    }

    #[test]
    fn test_version_equality_ignores_padding() {
        assert_eq!(Version::parse("1.2"), Version::parse("1.2.0.0"));
        assert_eq!(Version::parse("01.2"), Version::parse("1.2"));
        assert_ne!(Version::parse("1.10"), Version::parse("1.1"));
    }

    #[test]
    fn test_ordering_is_total() {
        let versions = ["0", "1", "1.0.1", "1.2", "1.10", "2", "10.0.0.1", "01.2"];
        for a in versions {
            assert!(version_ge(a, a), "{a} >= {a}");
            for b in versions {
                let (va, vb) = (Version::parse(a), Version::parse(b));
                if va != vb {
                    assert_ne!(version_ge(a, b), version_ge(b, a), "{a} vs {b}");
                }
            }
        }
    }

    #[test]
    fn test_non_numeric_components_read_as_zero() {
        assert_eq!(Version::parse("1.x.3"), Version::parse("1.0.3"));
        assert_eq!(Version::parse("1.2").to_string(), "1.2");
    }
}
