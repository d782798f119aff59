//! `barebones apply`: run the built-in recipe against a project.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, instrument};

use barebones_adapters::{JobBackend, Recipe};
use barebones_core::application::{PlannedOperation, ReportEntry, ScaffoldService};

use crate::{
    cli::ApplyArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// JSON document for a completed run.
#[derive(Debug, Serialize)]
struct RunSummary<'a> {
    app_name: &'a str,
    root: String,
    job_backend: JobBackend,
    finished_at: DateTime<Utc>,
    changes: usize,
    skipped: usize,
    tolerated_failures: usize,
    entries: &'a [ReportEntry],
}

/// JSON document for a dry run.
#[derive(Debug, Serialize)]
struct DryRunSummary<'a> {
    app_name: &'a str,
    root: String,
    job_backend: JobBackend,
    dry_run: bool,
    operations: &'a [PlannedOperation],
}

#[instrument(skip_all, fields(root = %args.root.display()))]
pub fn execute(
    args: ApplyArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let root = args.root.as_path();
    let app_name = match args.name {
        Some(name) => name,
        None => app_name_from_root(root).ok_or_else(|| CliError::MissingAppName {
            root: root.to_path_buf(),
        })?,
    };

    let options = super::recipe_options(&args.recipe, &config);
    let job_backend = options.job_backend;
    let recipe = Recipe::new(app_name.as_str(), options);

    let mut skip = config.recipe.skip.clone();
    skip.extend(args.skip);
    let plan = recipe.plan()?.without(&skip)?;
    info!(
        app = %app_name,
        steps = plan.len(),
        skipped = skip.len(),
        format = output.format().as_str(),
        "Recipe planned"
    );

    let store = super::template_store(
        args.templates
            .as_deref()
            .or(config.templates.local_path.as_deref()),
    )?;
    let engine = super::engine(root, store, &output);
    let service = ScaffoldService::new(engine, recipe.context().clone());

    if args.dry_run {
        let operations = service.describe(&plan)?;
        if output.is_json() {
            return output.json(&DryRunSummary {
                app_name: &app_name,
                root: root.display().to_string(),
                job_backend,
                dry_run: true,
                operations: &operations,
            });
        }
        output.header(&format!(
            "Would apply {} step(s) to {} (dry run)",
            plan.len(),
            root.display()
        ))?;
        for planned in &operations {
            output.planned(planned)?;
        }
        return Ok(());
    }

    if !output.is_json() {
        output.header(&format!("Applying recipe for '{app_name}' to {}", root.display()))?;
    }

    let spinner = output.spinner(&format!("Running {} step(s)", plan.len()));
    let mut write_error = None;
    let result = service.run_with(&plan, |entry| {
        if output.is_json() {
            return;
        }
        if let Some(pb) = &spinner {
            pb.set_message(format!("{}: {}", entry.step, entry.operation));
        }
        let written = match &spinner {
            Some(pb) => pb.suspend(|| output.outcome(&entry.outcome)),
            None => output.outcome(&entry.outcome),
        };
        if let Err(e) = written {
            write_error.get_or_insert(e);
        }
    });
    if let Some(pb) = &spinner {
        pb.finish_and_clear();
    }

    let report = result?;
    if let Some(e) = write_error {
        return Err(e.into());
    }

    if output.is_json() {
        return output.json(&RunSummary {
            app_name: &app_name,
            root: root.display().to_string(),
            job_backend,
            finished_at: Utc::now(),
            changes: report.changes(),
            skipped: report.skipped(),
            tolerated_failures: report.tolerated_failures(),
            entries: &report.entries,
        });
    }

    output.success(&format!(
        "{} change(s), {} file(s) left as they were",
        report.changes(),
        report.skipped()
    ))?;
    if report.tolerated_failures() > 0 {
        output.warning(&format!(
            "{} command(s) failed and were ignored",
            report.tolerated_failures()
        ))?;
    }
    Ok(())
}

/// The last component of `root`, resolving `.` and `..` when the path exists.
fn app_name_from_root(root: &Path) -> Option<String> {
    let resolved = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());
    resolved
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
}
