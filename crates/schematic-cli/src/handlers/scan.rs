//! Scan command handler
//!
//! Harvests `<path:...>` placeholders from a manifest tree and validates
//! each one on the blocking pool. The compiled schema and the store are
//! shared read-only between tasks; every task builds its own
//! [`ValidationContext`] because the member schema cache is not shared.

use super::{compile_schema, finish};
use crate::cli::ScanArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::harvest::harvest_dir;
use crate::logging::timing::Timer;
use crate::output::{OutputWriter, PathReport};
use crate::store::ConfigVariableStore;
use schematic_core::ValidationContext;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument};

/// Handle the scan command
#[instrument(skip(args, config, output), fields(dir = %args.dir.display(), jobs = args.jobs))]
pub async fn handle_scan(
    args: ScanArgs,
    schema_override: Option<&str>,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let _timer = Timer::with_details("scan_command", &args.dir.display().to_string());

    let schema = Arc::new(compile_schema(config, schema_override)?);
    let store = Arc::new(ConfigVariableStore::from_inputs(&config.inputs));

    let placeholders = {
        let _harvest_timer = Timer::new("harvest");
        harvest_dir(&args.dir)?
    };
    info!(placeholders = placeholders.len(), "Harvest complete");

    if placeholders.is_empty() {
        output.warning(&format!(
            "No <path:...> placeholders found under {}",
            args.dir.display()
        ))?;
        return Ok(());
    }

    let spinner = output.spinner(&format!("Validating {} placeholder(s)...", placeholders.len()));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut tasks = JoinSet::new();

    for (index, placeholder) in placeholders.into_iter().enumerate() {
        let permit = Arc::clone(&semaphore)
            .acquire_owned()
            .await
            .map_err(|e| Error::other(format!("Validation pool closed: {}", e)))?;
        let schema = Arc::clone(&schema);
        let store = Arc::clone(&store);

        tasks.spawn_blocking(move || {
            let _permit = permit;
            let ctx = ValidationContext::new(store.as_ref());
            let result = schema.validate(&placeholder.path, &ctx);
            debug!(path = %placeholder.path, valid = result.is_ok(), "Placeholder validated");
            let report = PathReport::from_result(&placeholder.path, &result, false)
                .with_origin(placeholder.file, placeholder.key);
            (index, report)
        });
    }

    let mut indexed = Vec::with_capacity(tasks.len());
    while let Some(joined) = tasks.join_next().await {
        indexed.push(joined?);
    }
    indexed.sort_by_key(|(index, _)| *index);
    let reports: Vec<PathReport> = indexed.into_iter().map(|(_, report)| report).collect();

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let shown: Vec<PathReport> = if args.failures_only {
        reports.iter().filter(|r| !r.valid).cloned().collect()
    } else {
        reports.clone()
    };
    output.reports(&shown)?;

    finish(&reports)
}
