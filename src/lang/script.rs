// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Recursive-descent parser for the script format.
//!
//! ```text
//! program   := statement*
//! statement := "var" NAME ":" WIDTH ";"
//!            | "let" NAME "=" expr ";"
//!            | ("print" | "assert") query ";"
//! query     := "empty" "(" expr ")"
//!            | ("equal" | "subset") "(" expr "," expr ")"
//! expr      := term (("|" | "-") term)*
//! term      := unary ("&" unary)*
//! unary     := "!" unary | atom
//! atom      := "(" expr ")" | "top" | "bottom" | "{" [NUMBER ("," NUMBER)*] "}"
//!            | "exists" NAME "." unary
//!            | NAME ["==" (NUMBER | NAME)]
//! ```

use crate::errors::ParseError;
use crate::lang::ast::{Expr, Query, Script, Statement, StatementKind};
use crate::lang::lexer::{tokenize, Cursor, TokenKind};

/// Words that cannot be used as names.
pub const KEYWORDS: &[&str] = &[
    "var", "let", "print", "assert", "empty", "equal", "subset", "top", "bottom", "exists",
];

pub fn parse_script(text: &str) -> Result<Script, ParseError> {
    let mut cursor = Cursor::new(tokenize(text, false)?);
    let mut statements = Vec::new();
    while !cursor.at(&TokenKind::Eof) {
        statements.push(statement(&mut cursor)?);
    }
    Ok(Script { statements })
}

fn name(cursor: &mut Cursor, what: &str) -> Result<String, ParseError> {
    cursor.expect_ident(what, KEYWORDS)
}

fn statement(cursor: &mut Cursor) -> Result<Statement, ParseError> {
    let line = cursor.peek().line;
    let kind = if cursor.at_keyword("var") {
        cursor.advance();
        let name = name(cursor, "a variable name")?;
        cursor.expect_symbol(':')?;
        let bits = cursor.expect_width()?;
        StatementKind::Var { name, bits }
    } else if cursor.at_keyword("let") {
        cursor.advance();
        let name = name(cursor, "a set name")?;
        cursor.expect_symbol('=')?;
        let expr = expr(cursor)?;
        StatementKind::Let { name, expr }
    } else if cursor.at_keyword("print") {
        cursor.advance();
        StatementKind::Print(query(cursor)?)
    } else if cursor.at_keyword("assert") {
        cursor.advance();
        StatementKind::Assert(query(cursor)?)
    } else {
        return Err(cursor.unexpected("a statement"));
    };
    cursor.expect_symbol(';')?;
    Ok(Statement { line, kind })
}

fn query(cursor: &mut Cursor) -> Result<Query, ParseError> {
    if cursor.at_keyword("empty") {
        cursor.advance();
        cursor.expect_symbol('(')?;
        let a = expr(cursor)?;
        cursor.expect_symbol(')')?;
        return Ok(Query::Empty(a));
    }

    let binary: fn(Expr, Expr) -> Query = if cursor.at_keyword("equal") {
        Query::Equal
    } else if cursor.at_keyword("subset") {
        Query::Subset
    } else {
        return Err(cursor.unexpected("'empty', 'equal' or 'subset'"));
    };
    cursor.advance();
    cursor.expect_symbol('(')?;
    let a = expr(cursor)?;
    cursor.expect_symbol(',')?;
    let b = expr(cursor)?;
    cursor.expect_symbol(')')?;
    Ok(binary(a, b))
}

fn expr(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    let mut left = term(cursor)?;
    loop {
        if cursor.eat_symbol('|') {
            left = Expr::Union(Box::new(left), Box::new(term(cursor)?));
        } else if cursor.eat_symbol('-') {
            left = Expr::Difference(Box::new(left), Box::new(term(cursor)?));
        } else {
            return Ok(left);
        }
    }
}

fn term(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    let mut left = unary(cursor)?;
    while cursor.eat_symbol('&') {
        left = Expr::Intersect(Box::new(left), Box::new(unary(cursor)?));
    }
    Ok(left)
}

fn unary(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    if cursor.eat_symbol('!') {
        return Ok(Expr::Complement(Box::new(unary(cursor)?)));
    }
    atom(cursor)
}

fn atom(cursor: &mut Cursor) -> Result<Expr, ParseError> {
    if cursor.eat_symbol('(') {
        let inner = expr(cursor)?;
        cursor.expect_symbol(')')?;
        return Ok(inner);
    }
    if cursor.eat_symbol('{') {
        let mut values = Vec::new();
        if !cursor.at_symbol('}') {
            values.push(cursor.expect_number("a value")?);
            while cursor.eat_symbol(',') {
                values.push(cursor.expect_number("a value")?);
            }
        }
        cursor.expect_symbol('}')?;
        return Ok(Expr::Point(values));
    }
    if cursor.at_keyword("top") {
        cursor.advance();
        return Ok(Expr::Top);
    }
    if cursor.at_keyword("bottom") {
        cursor.advance();
        return Ok(Expr::Bottom);
    }
    if cursor.at_keyword("exists") {
        cursor.advance();
        let var = name(cursor, "a variable name")?;
        cursor.expect_symbol('.')?;
        return Ok(Expr::Exists(var, Box::new(unary(cursor)?)));
    }

    let left = name(cursor, "a set expression")?;
    if cursor.at(&TokenKind::EqEq) {
        cursor.advance();
        if let TokenKind::Number(value) = cursor.peek().kind {
            cursor.advance();
            return Ok(Expr::EqConst(left, value));
        }
        let right = name(cursor, "a value or variable name")?;
        return Ok(Expr::EqVar(left, right));
    }
    Ok(Expr::Name(left))
}
