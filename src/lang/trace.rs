// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Line parser for the `.strace` format written by the trace decorator.
//!
//! ```text
//! v0 = declare x 3
//! s1 = const v0 5
//! s2 = union s1 s1
//! equal s1 s2 -> true
//! release s2
//! ```

use crate::errors::ParseError;
use crate::lang::ast::{SetDef, Trace, TraceOp, TraceQuery, TraceStep};
use crate::lang::lexer::{tokenize, Cursor, TokenKind};

const NO_RESERVED: &[&str] = &[];

pub fn parse_trace(text: &str) -> Result<Trace, ParseError> {
    let mut cursor = Cursor::new(tokenize(text, true)?);
    let mut steps = Vec::new();

    loop {
        match cursor.peek().kind {
            TokenKind::Eof => break,
            TokenKind::Newline => {
                cursor.advance();
            }
            _ => {
                let line = cursor.peek().line;
                let op = step(&mut cursor)?;
                if !cursor.at(&TokenKind::Eof) {
                    cursor.expect(&TokenKind::Newline)?;
                }
                steps.push(TraceStep { line, op });
            }
        }
    }

    Ok(Trace { steps })
}

fn handle(cursor: &mut Cursor) -> Result<String, ParseError> {
    cursor.expect_ident("a handle", NO_RESERVED)
}

fn handle_pair(cursor: &mut Cursor) -> Result<(String, String), ParseError> {
    Ok((handle(cursor)?, handle(cursor)?))
}

fn step(cursor: &mut Cursor) -> Result<TraceOp, ParseError> {
    let word = handle(cursor)?;
    match word.as_str() {
        "empty" => query(cursor, |c| Ok(TraceQuery::Empty(handle(c)?))),
        "equal" => query(cursor, |c| {
            let (a, b) = handle_pair(c)?;
            Ok(TraceQuery::Equal(a, b))
        }),
        "subset" => query(cursor, |c| {
            let (a, b) = handle_pair(c)?;
            Ok(TraceQuery::Subset(a, b))
        }),
        "release" => Ok(TraceOp::Release(handle(cursor)?)),
        _ => {
            cursor.expect_symbol('=')?;
            assignment(cursor, word)
        }
    }
}

fn query(
    cursor: &mut Cursor,
    operands: impl FnOnce(&mut Cursor) -> Result<TraceQuery, ParseError>,
) -> Result<TraceOp, ParseError> {
    let query = operands(cursor)?;
    let expected = if cursor.at(&TokenKind::Arrow) {
        cursor.advance();
        if cursor.at_keyword("true") {
            cursor.advance();
            Some(true)
        } else if cursor.at_keyword("false") {
            cursor.advance();
            Some(false)
        } else {
            return Err(cursor.unexpected("'true' or 'false'"));
        }
    } else {
        None
    };
    Ok(TraceOp::Query { query, expected })
}

fn assignment(cursor: &mut Cursor, target: String) -> Result<TraceOp, ParseError> {
    let operation = cursor.peek().clone();
    let word = handle(cursor)?;
    let def = match word.as_str() {
        "declare" => {
            let name = handle(cursor)?;
            let bits = cursor.expect_width()?;
            return Ok(TraceOp::Declare { target, name, bits });
        }
        "top" => SetDef::Top,
        "bottom" => SetDef::Bottom,
        "const" => {
            let var = handle(cursor)?;
            SetDef::Const(var, cursor.expect_number("a value")?)
        }
        "eqvar" => {
            let (a, b) = handle_pair(cursor)?;
            SetDef::EqVar(a, b)
        }
        "single" => {
            let mut values = Vec::new();
            while let TokenKind::Number(value) = cursor.peek().kind {
                cursor.advance();
                values.push(value);
            }
            SetDef::Single(values)
        }
        "union" => {
            let (a, b) = handle_pair(cursor)?;
            SetDef::Union(a, b)
        }
        "inter" => {
            let (a, b) = handle_pair(cursor)?;
            SetDef::Inter(a, b)
        }
        "diff" => {
            let (a, b) = handle_pair(cursor)?;
            SetDef::Diff(a, b)
        }
        "compl" => SetDef::Compl(handle(cursor)?),
        "exists" => {
            let (set, var) = handle_pair(cursor)?;
            SetDef::Exists(set, var)
        }
        other => {
            return Err(ParseError::new(
                operation.line,
                operation.col,
                format!("unknown trace operation '{other}'"),
            ))
        }
    };
    Ok(TraceOp::Define { target, def })
}
