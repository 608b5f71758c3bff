//! Validate command handler

use super::{compile_schema, finish};
use crate::cli::{OutputFormat, ValidateArgs};
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::{OutputFormatter, OutputWriter, PathReport};
use crate::store::ConfigVariableStore;
use schematic_core::ValidationContext;
use tracing::{info, instrument, warn};

/// Handle the validate command
#[instrument(skip(args, config, output), fields(paths = args.paths.len()))]
pub async fn handle_validate(
    args: ValidateArgs,
    schema_override: Option<&str>,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details("validate_command", &format!("paths: {}", args.paths.len()));

    let schema = compile_schema(config, schema_override)?;
    let store = ConfigVariableStore::from_inputs(&config.inputs);
    // One context for the whole batch so variable set members compile once
    let ctx = ValidationContext::new(&store);

    output.info(&format!(
        "Validating {} path(s) against {}",
        args.paths.len(),
        schema
    ))?;

    let reports: Vec<PathReport> = args
        .paths
        .iter()
        .map(|path| {
            let result = schema.validate(path, &ctx);
            match &result {
                Ok(()) => info!(path = %path, "Path is valid"),
                Err(e) => warn!(path = %path, kind = %e.kind(), "Path is invalid"),
            }
            PathReport::from_result(path, &result, args.detailed)
        })
        .collect();

    if args.detailed && output.format() == OutputFormat::Human {
        output.section("Validation Results")?;
        let formatted = output.format().format_reports(&reports)?;
        output.writeln(&formatted)?;
    } else {
        output.reports(&reports)?;
    }

    finish(&reports)
}
