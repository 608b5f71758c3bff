//! Error types and handling for the CLI
//!
//! This module provides error types and utilities for handling
//! various failure modes in the CLI application.

use std::io;
use std::path::PathBuf;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Schema failed to compile, or a single validation failed
    #[error("Schema error: {0}")]
    Schema(#[from] schematic_core::SchemaError),

    /// One or more paths did not satisfy the schema
    #[error("{failed} of {total} path(s) failed validation")]
    ValidationFailed { failed: usize, total: usize },

    /// File not found
    #[error("File not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Invalid file format
    #[error("Invalid file format for {}: expected {}: {}", path.display(), expected, message)]
    InvalidFormat {
        path: PathBuf,
        expected: String,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Neither the config file nor the command line supplied a schema
    #[error("No schema configured. Set `schema` in the configuration file or pass --schema")]
    MissingSchema,

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML deserialization error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A background validation task panicked or was cancelled
    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Io(_) => 1,
            Self::ValidationFailed { .. } => 2,
            Self::Schema(e) if !e.is_compile_error() => 2,
            Self::Schema(_) => 3,
            Self::FileNotFound { .. } => 4,
            Self::InvalidFormat { .. } => 5,
            Self::Config(_) => 6,
            Self::MissingSchema => 7,
            Self::Json(_) => 12,
            Self::Yaml(_) => 13,
            Self::Toml(_) => 14,
            Self::Task(_) => 98,
            Self::Other { .. } => 99,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::MissingSchema)
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    let message = match error {
        Error::Schema(schema_error) => schema_error.detailed_message(),
        other => other.to_string(),
    };

    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), message)
    } else {
        format!("Error: {}", message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::ValidationFailed { failed: 1, total: 3 }.exit_code(), 2);
        assert_eq!(Error::MissingSchema.exit_code(), 7);

        let compile = schematic_core::compile("+{3,0}").unwrap_err();
        assert_eq!(Error::from(compile).exit_code(), 3);

        let validation = schematic_core::SchemaError::TrailingSegments {
            leftover: vec!["x".to_string()],
        };
        assert_eq!(Error::from(validation).exit_code(), 2);
    }

    #[test]
    fn test_format_error_uses_detailed_schema_message() {
        let err = Error::from(schematic_core::compile("a//b").unwrap_err());
        let formatted = format_error(&err, false);
        assert!(formatted.starts_with("Error: Syntax error at line 1, column 3"));
        assert!(formatted.contains('^'));
    }

    #[test]
    fn test_missing_schema_shows_help() {
        assert!(Error::MissingSchema.should_show_help());
        assert!(!Error::config("bad").should_show_help());
    }
}
