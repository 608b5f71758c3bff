//! Schema DSL lexer
//!
//! Turns schema text into a flat token stream. Whitespace is emitted as a
//! token rather than skipped; the parser decides where it is legal.
//!
//! Copyright (c) 2025 Schematic Team
//! Licensed under the Apache-2.0 license

use crate::error::{Result, SchemaError};
use serde::Serialize;
use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Token categories recognized by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// `[a-zA-Z_][a-zA-Z0-9_-]*`
    Ident,
    /// Double-quoted literal; `text` holds the raw body without quotes
    String,
    /// One or more ASCII digits
    Int,
    Slash,
    Dot,
    Comma,
    Plus,
    Star,
    Dollar,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    /// Run of spaces, tabs, carriage returns or newlines
    Whitespace,
}

/// A single lexed token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte offset of the token's first character
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

impl TokenKind {
    /// Human readable name used in syntax error messages
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::String => "string",
            TokenKind::Int => "integer",
            TokenKind::Slash => "'/'",
            TokenKind::Dot => "'.'",
            TokenKind::Comma => "','",
            TokenKind::Plus => "'+'",
            TokenKind::Star => "'*'",
            TokenKind::Dollar => "'$'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Whitespace => "whitespace",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Schema text lexer
pub struct Lexer<'a> {
    /// Input string being lexed
    input: &'a str,
    /// Character iterator
    chars: Peekable<Chars<'a>>,
    /// Current byte offset in input
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Consume the whole input and return every token in order
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<Token>> {
        let start = self.position;
        let ch = match self.current_char() {
            Some(ch) => ch,
            None => return Ok(None),
        };

        let token = match ch {
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_integer(),
            '"' => self.lex_string()?,
            ' ' | '\t' | '\r' | '\n' => self.lex_whitespace(),
            _ => {
                let kind = match ch {
                    '/' => TokenKind::Slash,
                    '.' => TokenKind::Dot,
                    ',' => TokenKind::Comma,
                    '+' => TokenKind::Plus,
                    '*' => TokenKind::Star,
                    '$' => TokenKind::Dollar,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    '[' => TokenKind::LBracket,
                    ']' => TokenKind::RBracket,
                    '{' => TokenKind::LBrace,
                    '}' => TokenKind::RBrace,
                    other => {
                        return Err(SchemaError::lex(
                            format!("Unexpected character '{}'", other),
                            start,
                            self.input,
                        ))
                    }
                };
                self.advance();
                Token::new(kind, ch.to_string(), start)
            }
        };

        Ok(Some(token))
    }

    fn lex_identifier(&mut self) -> Token {
        let start = self.position;
        let mut text = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Ident, text, start)
    }

    fn lex_integer(&mut self) -> Token {
        let start = self.position;
        let mut text = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Int, text, start)
    }

    fn lex_whitespace(&mut self) -> Token {
        let start = self.position;
        let mut text = String::new();
        while let Some(ch) = self.current_char() {
            if matches!(ch, ' ' | '\t' | '\r' | '\n') {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Whitespace, text, start)
    }

    /// Lex a double-quoted string. Escapes are kept verbatim: a backslash
    /// only prevents the following character from closing the literal.
    fn lex_string(&mut self) -> Result<Token> {
        let start = self.position;
        self.advance(); // opening quote

        let mut text = String::new();
        loop {
            match self.advance() {
                Some('"') => return Ok(Token::new(TokenKind::String, text, start)),
                Some('\\') => {
                    text.push('\\');
                    match self.advance() {
                        Some(escaped) => text.push(escaped),
                        None => break,
                    }
                }
                Some(ch) => text.push(ch),
                None => break,
            }
        }

        Err(SchemaError::lex("Unterminated string literal", start, self.input))
    }

    fn current_char(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.position += ch.len_utf8();
        Some(ch)
    }
}

/// Tokenize schema text
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}
