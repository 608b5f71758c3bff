//! Extract command handler

use super::compile_schema;
use crate::cli::{ExtractArgs, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use std::collections::BTreeMap;
use tracing::instrument;

/// Handle the extract command
#[instrument(skip(args, config, output), fields(path = %args.path))]
pub async fn handle_extract(
    args: ExtractArgs,
    schema_override: Option<&str>,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::new("extract_command");

    let schema = compile_schema(config, schema_override)?;
    output.warning("Context extraction is experimental")?;

    let bindings: BTreeMap<String, String> = schema.extract_context(&args.path)?.into_iter().collect();

    if output.format() == OutputFormat::Human {
        if bindings.is_empty() {
            output.info("Schema has no variables to extract")?;
        }
        for (name, value) in &bindings {
            output.writeln(&format!("{} = {}", name, value))?;
        }
        Ok(())
    } else {
        output.data(&bindings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn test_extract_leading_variable() {
        let config = Config {
            schema: Some("$project/+/\"[a-z]+\"".to_string()),
            ..Config::default()
        };
        let mut output = OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(std::io::sink()));
        let args = ExtractArgs {
            path: "group/app/postgres/admin".to_string(),
        };
        assert!(handle_extract(args, None, &config, &mut output).await.is_ok());
    }

    #[tokio::test]
    async fn test_extract_rejects_multi_wildcard() {
        let mut output = OutputWriter::with_writer(OutputFormat::Json, false, false, Box::new(std::io::sink()));
        let args = ExtractArgs {
            path: "a/b/c".to_string(),
        };
        let result = handle_extract(args, Some("$p/*"), &Config::default(), &mut output).await;
        match result {
            Err(Error::Schema(e)) => assert_eq!(e.kind(), schematic_core::ErrorKind::Extraction),
            other => panic!("Expected extraction error, got {:?}", other),
        }
    }
}
