// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! One interpreter per input format. Each takes ownership of the assembled
//! domain and never hands it back.

pub mod script;
pub mod trace;

pub use script::ScriptInterpreter;
pub use trace::TraceInterpreter;
