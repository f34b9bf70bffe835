// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tokenizer shared by the script and trace parsers.

use std::fmt;

use crate::errors::ParseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Number(u64),
    /// Single-character punctuation: `; : = | & - ! ( ) { } , .`
    Symbol(char),
    /// `==`
    EqEq,
    /// `->`
    Arrow,
    /// Only produced when the lexer keeps line breaks.
    Newline,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "'{name}'"),
            TokenKind::Number(n) => write!(f, "'{n}'"),
            TokenKind::Symbol(c) => write!(f, "'{c}'"),
            TokenKind::EqEq => f.write_str("'=='"),
            TokenKind::Arrow => f.write_str("'->'"),
            TokenKind::Newline => f.write_str("end of line"),
            TokenKind::Eof => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

const SYMBOLS: &[char] = &[';', ':', '=', '|', '&', '-', '!', '(', ')', '{', '}', ',', '.'];

/// Split `text` into tokens. `#` starts a comment running to end of line.
///
/// With `keep_newlines`, each line break becomes a [`TokenKind::Newline`]
/// (consecutive breaks collapse into one). The list always ends with `Eof`.
pub fn tokenize(text: &str, keep_newlines: bool) -> Result<Vec<Token>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();
    let (mut line, mut col) = (1, 1);

    while let Some(&c) = chars.peek() {
        let (start_line, start_col) = (line, col);
        let mut bump = |chars: &mut std::iter::Peekable<std::str::Chars<'_>>| {
            let c = chars.next();
            if c == Some('\n') {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
            c
        };

        let kind = match c {
            '\n' => {
                bump(&mut chars);
                if !keep_newlines
                    || matches!(tokens.last(), None | Some(Token { kind: TokenKind::Newline, .. }))
                {
                    continue;
                }
                TokenKind::Newline
            }
            c if c.is_whitespace() => {
                bump(&mut chars);
                continue;
            }
            '#' => {
                while chars.peek().is_some_and(|&c| c != '\n') {
                    bump(&mut chars);
                }
                continue;
            }
            c if c.is_ascii_digit() => {
                let mut digits = String::new();
                while let Some(&d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                    digits.push(d);
                    bump(&mut chars);
                }
                let value = digits.parse::<u64>().map_err(|_| {
                    ParseError::new(start_line, start_col, format!("number {digits} is too large"))
                })?;
                TokenKind::Number(value)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut name = String::new();
                while let Some(&d) = chars
                    .peek()
                    .filter(|d| d.is_ascii_alphanumeric() || **d == '_')
                {
                    name.push(d);
                    bump(&mut chars);
                }
                TokenKind::Ident(name)
            }
            '=' => {
                bump(&mut chars);
                if chars.peek() == Some(&'=') {
                    bump(&mut chars);
                    TokenKind::EqEq
                } else {
                    TokenKind::Symbol('=')
                }
            }
            '-' => {
                bump(&mut chars);
                if chars.peek() == Some(&'>') {
                    bump(&mut chars);
                    TokenKind::Arrow
                } else {
                    TokenKind::Symbol('-')
                }
            }
            c if SYMBOLS.contains(&c) => {
                bump(&mut chars);
                TokenKind::Symbol(c)
            }
            other => {
                return Err(ParseError::new(
                    start_line,
                    start_col,
                    format!("unexpected character '{other}'"),
                ))
            }
        };

        tokens.push(Token {
            kind,
            line: start_line,
            col: start_col,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        line,
        col,
    });
    Ok(tokens)
}

/// Read position over a token list ending in `Eof`.
#[derive(Debug)]
pub struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> &Token {
        // `tokenize` always appends Eof, and `advance` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    pub fn at_symbol(&self, symbol: char) -> bool {
        self.at(&TokenKind::Symbol(symbol))
    }

    pub fn at_keyword(&self, keyword: &str) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(name) if name == keyword)
    }

    /// Consume `symbol` if it is next.
    pub fn eat_symbol(&mut self, symbol: char) -> bool {
        let found = self.at_symbol(symbol);
        if found {
            self.advance();
        }
        found
    }

    pub fn error_here(&self, message: impl Into<String>) -> ParseError {
        let token = self.peek();
        ParseError::new(token.line, token.col, message)
    }

    pub fn unexpected(&self, wanted: &str) -> ParseError {
        self.error_here(format!("expected {wanted}, found {}", self.peek().kind))
    }

    pub fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    pub fn expect_symbol(&mut self, symbol: char) -> Result<Token, ParseError> {
        self.expect(&TokenKind::Symbol(symbol))
    }

    pub fn expect_keyword(&mut self, keyword: &str) -> Result<Token, ParseError> {
        if self.at_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&format!("'{keyword}'")))
        }
    }

    /// Any identifier not in `reserved`.
    pub fn expect_ident(&mut self, what: &str, reserved: &[&str]) -> Result<String, ParseError> {
        match &self.peek().kind {
            TokenKind::Ident(name) if !reserved.contains(&name.as_str()) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    pub fn expect_number(&mut self, what: &str) -> Result<u64, ParseError> {
        match self.peek().kind {
            TokenKind::Number(value) => {
                self.advance();
                Ok(value)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    /// A bit width: a positive number that fits `u32`.
    pub fn expect_width(&mut self) -> Result<u32, ParseError> {
        let token = self.peek().clone();
        let bits = self.expect_number("a bit width")?;
        u32::try_from(bits)
            .ok()
            .filter(|&bits| bits > 0)
            .ok_or_else(|| ParseError::new(token.line, token.col, format!("invalid bit width {bits}")))
    }
}
