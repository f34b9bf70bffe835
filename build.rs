// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Detects optional backend dependencies once, at build time, and writes the
//! resulting feature table to `$OUT_DIR/detected_features.rs`.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

#[path = "src/features/probe.rs"]
#[allow(dead_code)]
mod probe;
#[path = "src/features/version.rs"]
#[allow(dead_code)]
mod version;

use probe::{CommandProbe, PackageProbe, REQUIREMENTS};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let probe = CommandProbe;
    let mut table = String::from(
        "/// Generated by build.rs: `(package, enabled, detected version)`.\n\
         pub(crate) const DETECTED_FEATURES: &[(&str, bool, Option<&str>)] = &[\n",
    );

    for requirement in REQUIREMENTS {
        let found = probe.installed_version(requirement.package);
        let enabled = found
            .as_deref()
            .is_some_and(|v| version::version_ge(v, requirement.minimum));
        let found = match &found {
            Some(v) => format!("Some({v:?})"),
            None => "None".to_string(),
        };
        writeln!(table, "    ({:?}, {enabled}, {found}),", requirement.package)?;
    }
    table.push_str("];\n");

    let out_dir = env::var("OUT_DIR")?;
    fs::write(Path::new(&out_dir).join("detected_features.rs"), table)?;

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src/features/probe.rs");
    println!("cargo:rerun-if-changed=src/features/version.rs");
    println!("cargo:rerun-if-env-changed=PATH");
    Ok(())
}
