// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;
use std::io;
use std::process::ExitCode;

use setstack::config::env_args;
use setstack::driver;
use setstack::features::FeatureSet;
use setstack::observability::init_logging;

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let env_value = env_args();
    let features = FeatureSet::from_build();

    let stdout = io::stdout();
    let stderr = io::stderr();
    let status = driver::run(
        &args,
        env_value.as_deref(),
        &features,
        &mut stdout.lock(),
        &mut stderr.lock(),
    );

    ExitCode::from(status.code())
}
