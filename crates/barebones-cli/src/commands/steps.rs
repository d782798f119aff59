//! `barebones steps`: list the recipe steps in the order they run.

use serde::Serialize;

use barebones_adapters::Recipe;
use barebones_core::domain::ScaffoldPlan;

use crate::{cli::StepsArgs, config::AppConfig, error::CliResult, output::OutputManager};

/// Placeholder name; step names and ordering do not depend on it.
const SAMPLE_APP: &str = "app";

#[derive(Debug, Serialize, PartialEq)]
struct StepSummary<'a> {
    name: &'a str,
    requires: &'a [String],
    operations: usize,
}

pub fn execute(args: StepsArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let recipe = Recipe::new(SAMPLE_APP, super::recipe_options(&args.recipe, &config));
    let plan = recipe.plan()?;
    let summaries = summarize(&plan);

    if output.is_json() {
        return output.json(&summaries);
    }

    output.header(&format!(
        "Recipe steps ({} job backend):",
        recipe.options().job_backend
    ))?;
    for (index, step) in summaries.iter().enumerate() {
        let mut line = format!("{:>3}. {}", index + 1, step.name);
        if !step.requires.is_empty() {
            line.push_str(&format!("  (after {})", step.requires.join(", ")));
        }
        output.print(&line)?;
    }
    Ok(())
}

fn summarize(plan: &ScaffoldPlan) -> Vec<StepSummary<'_>> {
    plan.steps()
        .iter()
        .map(|step| StepSummary {
            name: step.name(),
            requires: step.prerequisites(),
            operations: step.operations().len(),
        })
        .collect()
}
