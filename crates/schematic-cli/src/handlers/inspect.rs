//! Inspect command handler

use crate::cli::{InspectArgs, OutputFormat};
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use schematic_core::{compile_ast, parse, tokenize, Constraint, Part, Token};
use serde::Serialize;
use tracing::instrument;

/// Everything the compiler pipeline produces for one schema
#[derive(Debug, Serialize)]
struct InspectReport {
    schema: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tokens: Option<Vec<Token>>,
    parts: Vec<Part>,
    constraints: Vec<Constraint>,
    variables: Vec<String>,
    variable_sets: Vec<String>,
}

/// Handle the inspect command
#[instrument(skip(args, config, output))]
pub async fn handle_inspect(
    args: InspectArgs,
    schema_override: Option<&str>,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::new("inspect_command");

    let text = match args.schema {
        Some(text) => text,
        None => config.schema_text(schema_override)?,
    };
    let report = build_report(&text, args.tokens)?;

    if output.format() != OutputFormat::Human {
        return output.data(&report);
    }

    output.section("Schema")?;
    output.writeln(&report.schema)?;

    if let Some(tokens) = &report.tokens {
        output.section("Tokens")?;
        for token in tokens {
            output.writeln(&format!("{:>4}  {:<12} {:?}", token.position, token.kind.describe(), token.text))?;
        }
    }

    output.section("Constraints")?;
    for (index, (part, constraint)) in report.parts.iter().zip(&report.constraints).enumerate() {
        let rendered = part.to_string();
        output.writeln(&format!("#{:<3} {:<40} {}", index, rendered, constraint))?;
    }

    if !report.variables.is_empty() || !report.variable_sets.is_empty() {
        output.section("Inputs")?;
        for name in &report.variables {
            output.writeln(&format!("${}", name))?;
        }
        for name in &report.variable_sets {
            output.writeln(&format!("$[{}]", name))?;
        }
    }

    Ok(())
}

fn build_report(text: &str, with_tokens: bool) -> Result<InspectReport> {
    let tokens = if with_tokens { Some(tokenize(text)?) } else { None };
    let ast = parse(text)?;
    let schema = compile_ast(&ast)?;

    Ok(InspectReport {
        schema: text.to_string(),
        tokens,
        variables: ast.variable_names().into_iter().map(str::to_string).collect(),
        variable_sets: ast.variable_set_names().into_iter().map(str::to_string).collect(),
        constraints: schema.constraints().to_vec(),
        parts: ast.parts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_build_report() {
        let report = build_report(r#"$app.strip_last_prefix("helm-")/$[dbs]/+{1,2}"#, true).unwrap();
        assert_eq!(report.parts.len(), 3);
        assert_eq!(report.constraints.len(), 3);
        assert_eq!(report.variables, vec!["app"]);
        assert_eq!(report.variable_sets, vec!["dbs"]);
        assert!(report.tokens.unwrap().len() > 10);
    }

    #[test]
    fn test_report_serializes_parts_and_constraints() {
        let report = build_report("kv/+", false).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("tokens").is_none());
        assert_eq!(json["parts"][0]["kind"], "literal");
        assert_eq!(json["parts"][0]["value"], "kv");
        assert!(json["constraints"][0].is_string());
    }

    #[tokio::test]
    async fn test_inspect_invalid_schema() {
        let mut output = OutputWriter::with_writer(OutputFormat::Human, false, false, Box::new(std::io::sink()));
        let args = InspectArgs {
            schema: Some("a/$".to_string()),
            tokens: false,
        };
        let result = handle_inspect(args, None, &Config::default(), &mut output).await;
        assert!(matches!(result, Err(Error::Schema(e)) if e.is_compile_error()));
    }
}
