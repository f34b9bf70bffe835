// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Front-ends for the two input formats.
//!
//! Both share one tokenizer; positions in errors are 1-based and rendered
//! as `(line:col) Parse error: <detail>`.

pub mod ast;
pub mod lexer;
pub mod script;
pub mod trace;

pub use ast::{Ast, Script, Trace};

use crate::errors::ParseError;
use crate::input::InputFormat;

/// Check that raw input is UTF-8, locating the first bad byte otherwise.
pub fn decode(bytes: &[u8]) -> Result<&str, ParseError> {
    std::str::from_utf8(bytes).map_err(|e| {
        let valid = &bytes[..e.valid_up_to()];
        let line = valid.iter().filter(|b| **b == b'\n').count() + 1;
        let line_start = valid.iter().rposition(|b| *b == b'\n').map_or(0, |i| i + 1);
        // The prefix is valid UTF-8, so this never falls back.
        let col = std::str::from_utf8(&valid[line_start..]).map_or(0, |s| s.chars().count()) + 1;
        ParseError::new(
            line,
            col,
            format!("invalid UTF-8 byte 0x{:02x}", bytes[e.valid_up_to()]),
        )
    })
}

/// Parse `text` with the front-end for `format`.
pub fn parse(text: &str, format: InputFormat) -> Result<Ast, ParseError> {
    match format {
        InputFormat::Script => script::parse_script(text).map(Ast::Script),
        InputFormat::Trace => trace::parse_trace(text).map(Ast::Trace),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_selects_front_end() {
        let test_cases = vec![
            ("var x : 2;", InputFormat::Script, true),
            ("v0 = declare x 2", InputFormat::Trace, false),
        ];
        for (text, format, is_script) in test_cases {
            let ast = parse(text, format).unwrap();
            assert_eq!(matches!(ast, Ast::Script(_)), is_script, "{text}");
            assert_eq!(ast.len(), 1);
        }
    }

    #[test]
    fn test_decode_locates_invalid_utf8() {
        struct TestCase {
            name: &'static str,
            input: &'static [u8],
            expected: Result<&'static str, &'static str>,
        }

        let test_cases = vec![
            TestCase {
                name: "ascii",
                input: b"var x : 1;\n",
                expected: Ok("var x : 1;\n"),
            },
            TestCase {
                name: "multibyte characters are fine",
                input: "# caf\u{e9}\nvar x : 1;".as_bytes(),
                expected: Ok("# caf\u{e9}\nvar x : 1;"),
            },
            TestCase {
                name: "first byte",
                input: b"\xff\xfe",
                expected: Err("(1:1) Parse error: invalid UTF-8 byte 0xff"),
            },
            TestCase {
                name: "second line",
                input: b"var x : 1;\nlet a = \xff;\n",
                expected: Err("(2:9) Parse error: invalid UTF-8 byte 0xff"),
            },
            TestCase {
                name: "columns count characters",
                input: b"# \xc3\xa9\xc3\xa9 \x80",
                expected: Err("(1:6) Parse error: invalid UTF-8 byte 0x80"),
            },
        ];

        for case in test_cases {
            let decoded = decode(case.input).map_err(|e| e.to_string());
            assert_eq!(
                decoded.as_deref().map_err(String::as_str),
                case.expected,
                "Test case '{}'",
                case.name
            );
        }
    }

    #[test]
    fn test_same_text_differs_by_format() {
        assert!(parse("v0 = declare x 2", InputFormat::Script).is_err());
        assert!(parse("var x : 2;", InputFormat::Trace).is_err());
    }
}
