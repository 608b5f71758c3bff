//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod completions;
mod extract;
mod inspect;
mod scan;
mod validate;

pub use completions::handle_completions;
pub use extract::handle_extract;
pub use inspect::handle_inspect;
pub use scan::handle_scan;
pub use validate::handle_validate;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::PathReport;
use schematic_core::Schema;
use tracing::debug;

/// Compile the schema from the command-line override or the config file
fn compile_schema(config: &Config, schema_override: Option<&str>) -> Result<Schema> {
    let text = config.schema_text(schema_override)?;
    let _timer = Timer::with_details("schema_compile", &text);
    let schema = Schema::compile(&text)?;
    debug!(constraints = schema.len(), "Schema ready");
    Ok(schema)
}

/// Turn a batch of reports into the command's result
fn finish(reports: &[PathReport]) -> Result<()> {
    let failed = reports.iter().filter(|r| !r.valid).count();
    if failed > 0 {
        return Err(Error::ValidationFailed {
            failed,
            total: reports.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_schema_prefers_override() {
        let config = Config {
            schema: Some("a/b".to_string()),
            ..Config::default()
        };
        assert_eq!(compile_schema(&config, Some("x/+")).unwrap().source(), "x/+");
        assert_eq!(compile_schema(&config, None).unwrap().source(), "a/b");
    }

    #[test]
    fn test_compile_errors_propagate() {
        let err = compile_schema(&Config::default(), Some("a/+{2,1}")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_finish_counts_failures() {
        let ok = PathReport::from_result("a", &Ok(()), false);
        let bad = PathReport::from_result(
            "b",
            &Err(schematic_core::SchemaError::TrailingSegments {
                leftover: vec!["b".to_string()],
            }),
            false,
        );

        assert!(finish(&[ok.clone()]).is_ok());
        match finish(&[ok, bad]) {
            Err(Error::ValidationFailed { failed, total }) => assert_eq!((failed, total), (1, 2)),
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }
    }
}
