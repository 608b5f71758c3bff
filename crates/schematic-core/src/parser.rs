//! Schema DSL parser
//!
//! Recursive descent over the lexer's token stream:
//!
//! ```text
//! Schema     := Part ("/" Part)*
//! Part       := Variable | VariableSet | Wildcard | Regex | Literal
//! Variable   := "$" Ident ("." Modifier)*
//! Modifier   := Ident "(" String ("," String)* ")"
//! VariableSet:= "$" "[" Ident "]"
//! Wildcard   := ("+" | "*") ("{" Int ("," Int)? "}")?
//! Regex      := String
//! Literal    := Ident
//! ```
//!
//! Whitespace is only accepted around modifier arguments.
//!
//! Copyright (c) 2025 Schematic Team
//! Licensed under the Apache-2.0 license

use crate::ast::*;
use crate::error::{Result, SchemaError};
use crate::lexer::{tokenize, Token, TokenKind};

/// Schema text parser
pub struct Parser<'a> {
    /// Input string being parsed
    input: &'a str,
    tokens: Vec<Token>,
    /// Index of the next unconsumed token
    cursor: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser, lexing the input up front
    pub fn new(input: &'a str) -> Result<Self> {
        if input.is_empty() {
            return Err(SchemaError::syntax(
                "Empty schema",
                0,
                input,
                vec!["schema part".to_string()],
                "EOF",
            ));
        }

        Ok(Self {
            input,
            tokens: tokenize(input)?,
            cursor: 0,
        })
    }

    /// Parse the schema into an AST
    pub fn parse(mut self) -> Result<SchemaAst> {
        let mut parts = vec![self.parse_part()?];

        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::Slash => {
                    self.advance();
                    parts.push(self.parse_part()?);
                }
                _ => return Err(self.unexpected("Unexpected token after part", &["'/'", "end of schema"])),
            }
        }

        Ok(SchemaAst::new(parts))
    }

    fn parse_part(&mut self) -> Result<Part> {
        let kind = match self.peek() {
            Some(token) => token.kind,
            None => {
                return Err(self.unexpected(
                    "Unexpected end of schema",
                    &["'$'", "'+'", "'*'", "string", "identifier"],
                ))
            }
        };

        match kind {
            TokenKind::Dollar => self.parse_variable(),
            TokenKind::Plus | TokenKind::Star => self.parse_wildcard(),
            TokenKind::String => Ok(Part::Regex(self.expect(TokenKind::String)?.text)),
            TokenKind::Ident => Ok(Part::Literal(self.expect(TokenKind::Ident)?.text)),
            _ => Err(self.unexpected(
                "Expected a schema part",
                &["'$'", "'+'", "'*'", "string", "identifier"],
            )),
        }
    }

    /// Parse `$name(.modifier(...))*` or `$[name]`
    fn parse_variable(&mut self) -> Result<Part> {
        self.expect(TokenKind::Dollar)?;

        if self.check(TokenKind::LBracket) {
            self.advance();
            let name = self.expect(TokenKind::Ident)?.text;
            self.expect(TokenKind::RBracket)?;
            return Ok(Part::VariableSet { name });
        }

        let name = self.expect(TokenKind::Ident)?.text;
        let mut modifiers = Vec::new();
        while self.check(TokenKind::Dot) {
            self.advance();
            modifiers.push(self.parse_modifier()?);
        }

        Ok(Part::Variable { name, modifiers })
    }

    fn parse_modifier(&mut self) -> Result<ModifierCall> {
        let name = self.expect(TokenKind::Ident)?.text;
        self.expect(TokenKind::LParen)?;

        self.skip_whitespace();
        let mut args = vec![self.expect(TokenKind::String)?.text];
        loop {
            self.skip_whitespace();
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.advance();
            self.skip_whitespace();
            args.push(self.expect(TokenKind::String)?.text);
        }
        self.expect(TokenKind::RParen)?;

        Ok(ModifierCall { name, args })
    }

    fn parse_wildcard(&mut self) -> Result<Part> {
        let symbol = match self.advance() {
            Some(token) if token.kind == TokenKind::Star => WildcardSymbol::Multi,
            _ => WildcardSymbol::Single,
        };

        if !self.check(TokenKind::LBrace) {
            return Ok(Part::Wildcard { symbol, quantifier: None });
        }
        self.advance();

        let min = self.parse_integer()?;
        let max = if self.check(TokenKind::Comma) {
            self.advance();
            self.parse_integer()?
        } else {
            min
        };
        self.expect(TokenKind::RBrace)?;

        Ok(Part::Wildcard {
            symbol,
            quantifier: Some(Quantifier::new(min, max)),
        })
    }

    fn parse_integer(&mut self) -> Result<usize> {
        let token = self.expect(TokenKind::Int)?;
        token.text.parse::<usize>().map_err(|e| {
            SchemaError::syntax(
                format!("Invalid quantifier bound '{}': {}", token.text, e),
                token.position,
                self.input,
                vec!["integer".to_string()],
                token.text.clone(),
            )
        })
    }

    fn skip_whitespace(&mut self) {
        while self.check(TokenKind::Whitespace) {
            self.advance();
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().map(|t| t.kind == kind).unwrap_or(false)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(token)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.check(kind) {
            if let Some(token) = self.advance() {
                return Ok(token);
            }
        }
        Err(self.unexpected(
            &format!("Expected {}", kind.describe()),
            &[kind.describe()],
        ))
    }

    fn unexpected(&self, message: &str, expected: &[&str]) -> SchemaError {
        let expected = expected.iter().map(|e| e.to_string()).collect();
        match self.peek() {
            Some(token) => {
                let found = if token.kind == TokenKind::Whitespace {
                    token.kind.describe().to_string()
                } else {
                    token.text.clone()
                };
                SchemaError::syntax(message, token.position, self.input, expected, found)
            }
            None => SchemaError::syntax(message, self.input.len(), self.input, expected, "EOF"),
        }
    }
}

/// Parse schema text into an AST
pub fn parse(input: &str) -> Result<SchemaAst> {
    Parser::new(input)?.parse()
}
