// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Environment variable whose whitespace-separated words are appended to the command line
pub const ARGS_ENV_VAR: &str = "SETSTACK_ARGS";
/// Input file suffix that selects the trace format
pub const TRACE_EXTENSION: &str = ".strace";
/// Name used in usage text when the real program name is unknown
pub const PROGRAM_NAME: &str = "setstack";
