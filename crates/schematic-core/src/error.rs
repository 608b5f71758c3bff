//! Error types for schema compilation and validation
//!
//! Compile-time failures (lexing, parsing, constraint compilation) and
//! validation failures share a single [`SchemaError`] type. Validation
//! failures raised by an individual constraint are wrapped in
//! [`SchemaError::Constraint`] so the caller learns which constraint rejected
//! which input; [`SchemaError::kind`] looks through that wrapper.
//!
//! Copyright (c) 2025 Schematic Team
//! Licensed under the Apache-2.0 license

use crate::modifiers::ModifierError;
use std::fmt;
use thiserror::Error;

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Errors produced while compiling or evaluating a schema
#[derive(Error, Debug, Clone)]
pub enum SchemaError {
    /// The lexer met a character no token rule accepts
    #[error("Lex error at position {position}: {message}")]
    Lex {
        message: String,
        position: usize,
        input: String,
    },

    /// The token stream does not follow the grammar
    #[error("Syntax error at position {position}: {message}")]
    Syntax {
        message: String,
        position: usize,
        input: String,
        expected: Vec<String>,
        found: String,
    },

    /// Wildcard quantifier with `min > max`
    #[error("Invalid quantifier {{{min},{max}}}: minimum exceeds maximum")]
    QuantifierRange { min: usize, max: usize },

    /// A quantifier was attached to the unbounded `*` wildcard
    #[error("Quantifier {{{min},{max}}} is not allowed on '*'; use '+' for bounded wildcards")]
    MultiWildcardQuantifier { min: usize, max: usize },

    /// A regex part failed to compile
    #[error("Invalid regular expression '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// The store has no value for a variable
    #[error("Variable '{name}' not found in store")]
    VariableNotFound { name: String },

    /// The store has no member list for a variable set
    #[error("Variable set '{name}' not found in store")]
    VariableSetNotFound { name: String },

    /// The store returned an empty member list
    #[error("Variable set '{name}' is empty")]
    EmptySet { name: String },

    /// A variable references a modifier that is not registered
    #[error("Modifier '{name}' is not registered")]
    ModifierNotFound { name: String },

    /// A modifier rejected its arguments or failed while running
    #[error("Modifier '{name}' failed: {source}")]
    Modifier {
        name: String,
        #[source]
        source: ModifierError,
    },

    /// A segment did not match what the constraint expected
    #[error("Expected '{expected}', found '{found}'")]
    SegmentMismatch { expected: String, found: String },

    /// Fewer segments remain than the constraint requires
    #[error("Not enough segments: need {needed}, {available} remaining")]
    InsufficientSegments { needed: usize, available: usize },

    /// Every constraint matched but input segments were left over
    #[error("Unmatched trailing segments: '{}'", leftover.join("/"))]
    TrailingSegments { leftover: Vec<String> },

    /// No member of a variable set matched the remaining input
    #[error("No member of variable set '{name}' matched (tried {tried})")]
    NoSetMemberMatched { name: String, tried: usize },

    /// The context extractor cannot recover bindings from this schema/input pair
    #[error("Context extraction failed for '{input}': {message}")]
    Extraction { message: String, input: String },

    /// Failure raised by a specific constraint, wrapped with its position
    #[error("Constraint #{index} {constraint} rejected '{input}': {source}")]
    Constraint {
        index: usize,
        constraint: String,
        input: String,
        #[source]
        source: Box<SchemaError>,
    },
}

/// Flat classification of [`SchemaError`], independent of wrapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Lex,
    Syntax,
    QuantifierRange,
    MultiWildcardQuantifier,
    InvalidRegex,
    VariableNotFound,
    VariableSetNotFound,
    EmptySet,
    ModifierNotFound,
    ModifierArgument,
    ModifierFailed,
    SegmentMismatch,
    InsufficientSegments,
    TrailingSegments,
    NoSetMemberMatched,
    Extraction,
}

/// Position information for error reporting
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// Zero-based byte offset
    pub offset: usize,
    /// One-based line number
    pub line: usize,
    /// One-based column number
    pub column: usize,
}

impl SchemaError {
    /// Create a lex error
    pub fn lex(message: impl Into<String>, position: usize, input: impl Into<String>) -> Self {
        Self::Lex {
            message: message.into(),
            position,
            input: input.into(),
        }
    }

    /// Create a syntax error with the tokens that would have been accepted
    pub fn syntax(
        message: impl Into<String>,
        position: usize,
        input: impl Into<String>,
        expected: Vec<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
            input: input.into(),
            expected,
            found: found.into(),
        }
    }

    /// Create a context extraction error
    pub fn extraction(message: impl Into<String>, input: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
            input: input.into(),
        }
    }

    /// Wrap a constraint-level failure with the constraint's index and description
    pub fn at_constraint(
        self,
        index: usize,
        constraint: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        Self::Constraint {
            index,
            constraint: constraint.into(),
            input: input.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, looking through constraint wrappers
    pub fn root_cause(&self) -> &SchemaError {
        match self {
            Self::Constraint { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Classify the error, looking through constraint wrappers
    pub fn kind(&self) -> ErrorKind {
        match self.root_cause() {
            Self::Lex { .. } => ErrorKind::Lex,
            Self::Syntax { .. } => ErrorKind::Syntax,
            Self::QuantifierRange { .. } => ErrorKind::QuantifierRange,
            Self::MultiWildcardQuantifier { .. } => ErrorKind::MultiWildcardQuantifier,
            Self::InvalidRegex { .. } => ErrorKind::InvalidRegex,
            Self::VariableNotFound { .. } => ErrorKind::VariableNotFound,
            Self::VariableSetNotFound { .. } => ErrorKind::VariableSetNotFound,
            Self::EmptySet { .. } => ErrorKind::EmptySet,
            Self::ModifierNotFound { .. } => ErrorKind::ModifierNotFound,
            Self::Modifier { source, .. } => match source {
                ModifierError::InvalidArguments { .. } => ErrorKind::ModifierArgument,
                ModifierError::Failed { .. } => ErrorKind::ModifierFailed,
            },
            Self::SegmentMismatch { .. } => ErrorKind::SegmentMismatch,
            Self::InsufficientSegments { .. } => ErrorKind::InsufficientSegments,
            Self::TrailingSegments { .. } => ErrorKind::TrailingSegments,
            Self::NoSetMemberMatched { .. } => ErrorKind::NoSetMemberMatched,
            Self::Extraction { .. } => ErrorKind::Extraction,
            // root_cause never returns a wrapper
            Self::Constraint { source, .. } => source.kind(),
        }
    }

    /// Index of the constraint that failed, if this is a validation failure
    pub fn constraint_index(&self) -> Option<usize> {
        match self {
            Self::Constraint { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Whether the error was raised while turning schema text into a [`crate::Schema`]
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Lex
                | ErrorKind::Syntax
                | ErrorKind::QuantifierRange
                | ErrorKind::MultiWildcardQuantifier
                | ErrorKind::InvalidRegex
        )
    }

    /// Get the error message with a caret pointing into the schema text
    pub fn detailed_message(&self) -> String {
        match self {
            Self::Lex { message, position, input } => {
                let pos = Position::from_offset(input, *position);
                let mut result = format!(
                    "Lex error at line {}, column {}: {}",
                    pos.line, pos.column, message
                );
                push_caret(&mut result, input, &pos);
                result
            }
            Self::Syntax { message, position, input, expected, found } => {
                let pos = Position::from_offset(input, *position);
                let mut result = format!(
                    "Syntax error at line {}, column {}: {}",
                    pos.line, pos.column, message
                );
                if !expected.is_empty() {
                    result.push_str(&format!("\nExpected one of: {}", expected.join(", ")));
                }
                result.push_str(&format!("\nFound: {}", found));
                push_caret(&mut result, input, &pos);
                result
            }
            Self::Constraint { source, .. } => {
                format!("{}\nCaused by: {}", self, source.root_cause())
            }
            _ => self.to_string(),
        }
    }
}

fn push_caret(out: &mut String, input: &str, pos: &Position) {
    if input.is_empty() {
        return;
    }
    let line = input.lines().nth(pos.line - 1).unwrap_or(input);
    out.push_str(&format!("\nSchema: {}", line));
    out.push_str(&format!(
        "\n        {}^",
        " ".repeat(pos.column.saturating_sub(1))
    ));
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Lex => "LexError",
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::QuantifierRange => "QuantifierRangeError",
            ErrorKind::MultiWildcardQuantifier => "MultiWildcardQuantifier",
            ErrorKind::InvalidRegex => "InvalidRegex",
            ErrorKind::VariableNotFound => "VariableNotFound",
            ErrorKind::VariableSetNotFound => "VariableSetNotFound",
            ErrorKind::EmptySet => "EmptySetError",
            ErrorKind::ModifierNotFound => "ModifierNotFound",
            ErrorKind::ModifierArgument => "ModifierArgumentError",
            ErrorKind::ModifierFailed => "ModifierError",
            ErrorKind::SegmentMismatch => "SegmentMismatch",
            ErrorKind::InsufficientSegments => "InsufficientSegments",
            ErrorKind::TrailingSegments => "TrailingSegments",
            ErrorKind::NoSetMemberMatched => "NoSetMemberMatched",
            ErrorKind::Extraction => "ExtractionError",
        };
        f.write_str(name)
    }
}

impl Position {
    /// Create a new position
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self { offset, line, column }
    }

    /// Create position from offset in input
    pub fn from_offset(input: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;

        for (i, ch) in input.char_indices() {
            if i >= offset {
                break;
            }
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }

        Self { offset, line, column }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_creation() {
        let err = SchemaError::syntax("Unexpected token", 2, "a//b", vec!["identifier".into()], "/");
        match err {
            SchemaError::Syntax { message, position, input, expected, found } => {
                assert_eq!(message, "Unexpected token");
                assert_eq!(position, 2);
                assert_eq!(input, "a//b");
                assert_eq!(expected, vec!["identifier".to_string()]);
                assert_eq!(found, "/");
            }
            _ => panic!("Expected syntax error"),
        }
    }

    #[test]
    fn test_detailed_message_points_at_offset() {
        let err = SchemaError::syntax(
            "Unexpected token",
            2,
            "a//b",
            vec!["identifier".to_string(), "$".to_string()],
            "/",
        );

        let detailed = err.detailed_message();
        assert!(detailed.contains("line 1, column 3"));
        assert!(detailed.contains("Expected one of: identifier, $"));
        assert!(detailed.contains("Found: /"));
        assert!(detailed.ends_with("\n          ^"));
    }

    #[test]
    fn test_kind_looks_through_wrapper() {
        let err = SchemaError::VariableNotFound { name: "project".into() }
            .at_constraint(1, "Variable($project)", "a/b");

        assert_eq!(err.kind(), ErrorKind::VariableNotFound);
        assert_eq!(err.constraint_index(), Some(1));
        assert!(!err.is_compile_error());
        assert!(err.to_string().contains("Constraint #1 Variable($project) rejected 'a/b'"));
    }

    #[test]
    fn test_modifier_kinds() {
        let arguments = SchemaError::Modifier {
            name: "strip_last_prefix".into(),
            source: ModifierError::invalid_arguments("strip_last_prefix", "expected at least 1 argument"),
        };
        assert_eq!(arguments.kind(), ErrorKind::ModifierArgument);

        let failed = SchemaError::Modifier {
            name: "upper".into(),
            source: ModifierError::failed("upper", "boom"),
        };
        assert_eq!(failed.kind(), ErrorKind::ModifierFailed);
    }

    #[test]
    fn test_compile_error_classification() {
        assert!(SchemaError::QuantifierRange { min: 3, max: 0 }.is_compile_error());
        assert!(SchemaError::lex("bad", 0, "#").is_compile_error());
        assert!(!SchemaError::TrailingSegments { leftover: vec!["x".into()] }.is_compile_error());
    }

    #[test]
    fn test_position_from_offset() {
        let input = "line1\nline2\nline3";
        let pos = Position::from_offset(input, 8);
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 3);
        assert_eq!(pos.offset, 8);
    }
}
