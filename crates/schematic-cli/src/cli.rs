//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Schematic CLI - validate hierarchical paths against a path schema
///
/// Compiles the configured schema once and checks secret or resource paths
/// against it, resolving `$variables` from the environment and `$[sets]`
/// from the configuration file.
#[derive(Parser, Debug)]
#[command(
    name = "schematic",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SCHEMATIC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Schema text, overriding the one in the configuration file
    #[arg(short, long, global = true, env = "SCHEMATIC_SCHEMA")]
    pub schema: Option<String>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate one or more paths against the schema
    Validate(ValidateArgs),

    /// Find `<path:...>` placeholders in YAML files and validate each one
    Scan(ScanArgs),

    /// Recover variable values from a path (experimental)
    Extract(ExtractArgs),

    /// Show the tokens, parts and constraints of a schema
    Inspect(InspectArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Paths to validate
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<String>,

    /// Show the full error chain for failing paths
    #[arg(long)]
    pub detailed: bool,
}

/// Arguments for the scan command
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Directory searched recursively for .yaml and .yml files
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Maximum number of paths validated at the same time
    #[arg(short, long, default_value = "8")]
    pub jobs: usize,

    /// Only report failing placeholders
    #[arg(long)]
    pub failures_only: bool,
}

/// Arguments for the extract command
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Path to recover variables from
    #[arg(value_name = "PATH")]
    pub path: String,
}

/// Arguments for the inspect command
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Schema text to inspect (defaults to the configured schema)
    #[arg(value_name = "SCHEMA")]
    pub schema: Option<String>,

    /// Include the raw token stream
    #[arg(long)]
    pub tokens: bool,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli {
            verbose: 2,
            quiet: false,
            config: None,
            schema: None,
            output: OutputFormat::Human,
            no_color: false,
            command: Commands::Validate(ValidateArgs {
                paths: vec!["a/b".to_string()],
                detailed: false,
            }),
        };
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            verbose: 2,
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_parse_validate_paths() {
        let cli = Cli::parse_from(["schematic", "validate", "a/b", "c/d"]);
        match cli.command {
            Commands::Validate(args) => assert_eq!(args.paths, vec!["a/b", "c/d"]),
            other => panic!("Expected validate, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_schema_override() {
        let cli = Cli::parse_from(["schematic", "scan", "deploy", "--schema", "kv/+", "-o", "json-pretty"]);
        assert_eq!(cli.schema.as_deref(), Some("kv/+"));
        assert_eq!(cli.output, OutputFormat::JsonPretty);
        match cli.command {
            Commands::Scan(args) => {
                assert_eq!(args.dir, PathBuf::from("deploy"));
                assert_eq!(args.jobs, 8);
            }
            other => panic!("Expected scan, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_requires_a_path() {
        assert!(Cli::try_parse_from(["schematic", "validate"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["schematic", "-q", "-v", "inspect"]).is_err());
    }
}
