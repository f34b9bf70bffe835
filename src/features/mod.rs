// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Optional backend detection.
//!
//! Each gated backend depends on an external package (an SMT solver binary).
//! A [`Feature`] is enabled iff that package answers a version query with a
//! version at or above its [`Requirement`] minimum. Absence is expected
//! configuration state, never an error.
//!
//! Detection runs once in `build.rs`, which records each package's version
//! in a generated table. [`FeatureSet::from_build`] feeds that table through
//! [`FeatureSet::detect`], so the build and the binary apply the same
//! requirements. Tests can force flags with [`FeatureSet::with`].

pub mod probe;
pub mod version;

use std::collections::BTreeMap;
use std::fmt;

use crate::observability::messages::features::{FeatureDisabled, FeatureEnabled};
use crate::observability::messages::StructuredLog;

pub use probe::{CommandProbe, PackageProbe, Requirement, REQUIREMENTS};
pub use version::{version_ge, Version};

// Defines `DETECTED_FEATURES: &[(&str, bool, Option<&str>)]`.
include!(concat!(env!("OUT_DIR"), "/detected_features.rs"));

/// An optional backend capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    Z3,
    Cvc5,
}

impl Feature {
    pub const ALL: [Feature; 2] = [Feature::Z3, Feature::Cvc5];

    /// Name of the package whose presence enables this feature.
    pub fn package(self) -> &'static str {
        match self {
            Feature::Z3 => "z3",
            Feature::Cvc5 => "cvc5",
        }
    }

    pub fn from_package(package: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.package() == package)
    }

    /// The minimum version this crate accepts.
    pub fn requirement(self) -> Requirement {
        REQUIREMENTS
            .iter()
            .copied()
            .find(|r| r.package == self.package())
            .unwrap_or(Requirement {
                package: self.package(),
                minimum: "0",
            })
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.package())
    }
}

/// Replays the versions recorded by `build.rs` instead of running packages.
#[derive(Debug, Clone, Copy)]
struct BuildTable;

impl PackageProbe for BuildTable {
    fn installed_version(&self, package: &str) -> Option<String> {
        DETECTED_FEATURES
            .iter()
            .find(|(name, _, _)| *name == package)
            .and_then(|(_, _, version)| version.map(str::to_string))
    }
}

/// The immutable set of enabled features, with the version that enabled each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    enabled: BTreeMap<Feature, String>,
}

impl FeatureSet {
    /// No optional backend available.
    pub fn none() -> Self {
        Self::default()
    }

    /// Force `feature` on, regardless of what is installed.
    pub fn with(mut self, feature: Feature) -> Self {
        self.enabled
            .entry(feature)
            .or_insert_with(|| feature.requirement().minimum.to_string());
        self
    }

    /// The flags computed by the build script, re-evaluated and logged.
    pub fn from_build() -> Self {
        Self::detect(&BuildTable)
    }

    /// Evaluate every requirement against `probe`.
    pub fn detect(probe: &dyn PackageProbe) -> Self {
        let mut enabled = BTreeMap::new();
        for feature in Feature::ALL {
            let requirement = feature.requirement();
            match probe.installed_version(requirement.package) {
                Some(found) if version_ge(&found, requirement.minimum) => {
                    FeatureEnabled {
                        package: requirement.package,
                        version: &found,
                    }
                    .log();
                    enabled.insert(feature, found);
                }
                found => {
                    FeatureDisabled {
                        package: requirement.package,
                        found: found.as_deref(),
                        minimum: requirement.minimum,
                    }
                    .log();
                }
            }
        }
        Self { enabled }
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.enabled.contains_key(&feature)
    }

    /// The version that enabled `feature`, if it is enabled.
    pub fn version_of(&self, feature: Feature) -> Option<&str> {
        self.enabled.get(&feature).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.enabled.keys().copied()
    }
}
