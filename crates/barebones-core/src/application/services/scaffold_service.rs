//! Scaffold Service - runs a plan through the engine.
//!
//! The workflow for one run:
//! 1. Validate the plan (unique names, prerequisites earlier in the list)
//! 2. Check the project root exists
//! 3. Apply each step's operations in order, stopping at the first failure
//!
//! Operations that already ran stay applied when a later one fails; the
//! returned error names the step that stopped the run.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ApplicationError, Engine},
    domain::{DomainValidator as validator, Operation, Outcome, RenderContext, ScaffoldPlan},
    error::{BarebonesError, BarebonesResult},
};

/// One applied operation in a run report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub step: String,
    pub operation: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Everything a run did, in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub entries: Vec<ReportEntry>,
}

impl RunReport {
    /// Number of operations that changed something on disk.
    pub fn changes(&self) -> usize {
        self.entries.iter().filter(|e| e.outcome.is_change()).count()
    }

    /// Number of writes skipped because the file already existed.
    pub fn skipped(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::SkippedExisting { .. }))
            .count()
    }

    /// Commands whose failure was tolerated.
    pub fn tolerated_failures(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, Outcome::CommandFailedTolerated { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One operation a dry run would apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedOperation {
    pub step: String,
    pub operation: String,
}

/// Main scaffolding service.
///
/// Holds the engine and the render context every template operation of a
/// run shares.
#[derive(Debug)]
pub struct ScaffoldService {
    engine: Engine,
    context: RenderContext,
}

impl ScaffoldService {
    pub fn new(engine: Engine, context: RenderContext) -> Self {
        Self { engine, context }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Apply every step of `plan`, in order.
    pub fn run(&self, plan: &ScaffoldPlan) -> BarebonesResult<RunReport> {
        self.run_with(plan, |_| {})
    }

    /// Like [`run`](Self::run), calling `on_entry` after each operation.
    #[instrument(
        skip_all,
        fields(root = %self.engine.root().display(), steps = plan.len())
    )]
    pub fn run_with<F>(&self, plan: &ScaffoldPlan, mut on_entry: F) -> BarebonesResult<RunReport>
    where
        F: FnMut(&ReportEntry),
    {
        validator::validate_plan(plan)?;
        self.engine.ensure_root()?;

        let mut report = RunReport::default();
        for step in plan.steps() {
            info!(step = step.name(), operations = step.operations().len(), "Running step");

            for operation in step.operations() {
                let outcome = self.apply(operation).map_err(|source| {
                    warn!(step = step.name(), %operation, error = %source, "Step failed");
                    ApplicationError::StepFailed {
                        step: step.name().to_string(),
                        source: Box::new(source),
                    }
                })?;

                debug!(step = step.name(), %outcome);
                let entry = ReportEntry {
                    step: step.name().to_string(),
                    operation: operation.to_string(),
                    outcome,
                };
                on_entry(&entry);
                report.entries.push(entry);
            }
        }

        info!(
            operations = report.entries.len(),
            changes = report.changes(),
            skipped = report.skipped(),
            "Plan completed"
        );
        Ok(report)
    }

    /// List what `plan` would do without touching the project.
    ///
    /// Templates are still rendered, so a missing template or context key
    /// is reported before anything is written.
    #[instrument(skip_all, fields(steps = plan.len()))]
    pub fn describe(&self, plan: &ScaffoldPlan) -> BarebonesResult<Vec<PlannedOperation>> {
        validator::validate_plan(plan)?;

        let mut planned = Vec::with_capacity(plan.operation_count());
        for step in plan.steps() {
            for operation in step.operations() {
                if let Operation::Template { template, .. } = operation {
                    self.engine
                        .render(template, &self.context)
                        .map_err(|source| ApplicationError::StepFailed {
                            step: step.name().to_string(),
                            source: Box::new(source),
                        })?;
                }
                planned.push(PlannedOperation {
                    step: step.name().to_string(),
                    operation: operation.to_string(),
                });
            }
        }
        Ok(planned)
    }

    /// Apply a single operation.
    pub fn apply(&self, operation: &Operation) -> BarebonesResult<Outcome> {
        match operation {
            Operation::Template {
                template,
                destination,
                options,
            } => self
                .engine
                .template(template, destination, &self.context, *options),
            Operation::CreateFile {
                path,
                content,
                options,
            } => self.engine.write(path, content, *options),
            Operation::EmptyDirectory { path } => self.engine.empty_directory(path),
            Operation::Keep { path } => self.engine.keep(path),
            Operation::Inject { path, anchor, text } => self.engine.inject(path, anchor, text),
            Operation::ReplaceAll {
                path,
                pattern,
                replacement,
            } => self.engine.replace_all(path, pattern, replacement),
            Operation::Run {
                command,
                allow_failure,
            } => match self.engine.run(command) {
                Err(BarebonesError::Application(ApplicationError::CommandFailed {
                    command,
                    status,
                })) if *allow_failure => {
                    warn!(%command, ?status, "Ignoring command failure");
                    Ok(Outcome::CommandFailedTolerated { command, status })
                }
                other => other,
            },
        }
    }
}
