// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Queries for installed optional dependencies.
//!
//! Shared with `build.rs`; keep it std-only.

use std::process::Command;

/// A minimum version requirement for one optional package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub package: &'static str,
    pub minimum: &'static str,
}

/// Every optional backend dependency and the oldest release it works with.
pub const REQUIREMENTS: &[Requirement] = &[
    Requirement { package: "z3", minimum: "4.8.0" },
    Requirement { package: "cvc5", minimum: "1.0.0" },
];

/// Answers whether a package is installed, and at which version.
pub trait PackageProbe {
    /// The reported version string, or `None` when the package cannot be queried.
    fn installed_version(&self, package: &str) -> Option<String>;
}

/// Probes a package by running `<package> --version`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandProbe;

impl PackageProbe for CommandProbe {
    fn installed_version(&self, package: &str) -> Option<String> {
        let output = Command::new(package).arg("--version").output().ok()?;
        if !output.status.success() {
            return None;
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        extract_version(&stdout).or_else(|| extract_version(&stderr))
    }
}

/// Pull the first dotted numeric word out of a `--version` banner.
///
/// `"Z3 version 4.12.2 - 64 bit"` yields `4.12.2`; words such as `cvc5`
/// that merely contain digits are skipped.
pub fn extract_version(banner: &str) -> Option<String> {
    banner.split_whitespace().find_map(|word| {
        let word = word.trim_start_matches(|c: char| c == 'v' || c == 'V');
        if !word.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        let version: String = word
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        Some(version.trim_end_matches('.').to_string())
    })
}
