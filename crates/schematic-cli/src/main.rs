//! Schematic CLI - validate hierarchical paths against path schemas
//!
//! This is the main entry point for the Schematic CLI application, providing
//! commands for validating paths, scanning YAML manifests for `<path:...>`
//! placeholders, extracting variables and inspecting compiled schemas.

mod cli;
mod config;
mod error;
mod handlers;
mod harvest;
mod logging;
mod output;
mod store;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    let result = run(cli).await;

    match result {
        Ok(()) => {
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli), fields(command = ?cli.command))]
async fn run(cli: Cli) -> Result<()> {
    // Configuration comes first since its logging section feeds the subscriber
    let config = Config::load_with_file(cli.config.as_deref())?;

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let _timer = Timer::new("cli_execution");

    let mut output = OutputWriter::new(cli.output, cli.use_color(), cli.quiet);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        inputs = config.inputs.len(),
        "Executing command"
    );

    let schema_override = cli.schema.as_deref();

    match cli.command {
        Commands::Validate(args) => {
            handlers::handle_validate(args, schema_override, &config, &mut output).await
        }
        Commands::Scan(args) => {
            handlers::handle_scan(args, schema_override, &config, &mut output).await
        }
        Commands::Extract(args) => {
            handlers::handle_extract(args, schema_override, &config, &mut output).await
        }
        Commands::Inspect(args) => {
            handlers::handle_inspect(args, schema_override, &config, &mut output).await
        }
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());

    logging_config.merge_with_settings(&config.logging, cli.verbosity_level());

    // Apply environment overrides
    logging_config.merge_with_env();

    // If quiet mode, only log errors
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
