//! `barebones replace`: replace every match of a pattern in one file.

use barebones_adapters::InMemoryStore;
use barebones_core::domain::{DomainValidator, Outcome};

use crate::{cli::ReplaceArgs, error::CliResult, output::OutputManager};

pub fn execute(args: ReplaceArgs, output: OutputManager) -> CliResult<()> {
    let pattern = DomainValidator::pattern(&args.pattern, args.regex)?;
    let (root, target) = super::split_target(&args.file)?;
    let engine = super::engine(&root, Box::new(InMemoryStore::new()), &output);
    let outcome = engine.replace_all(&target, &pattern, &args.replacement)?;

    if output.is_json() {
        return output.json(&outcome);
    }
    match outcome {
        Outcome::Replaced { count: 0, .. } => {
            output.warning(&format!("No match for {pattern} in {}", args.file.display()))?
        }
        _ => output.outcome(&outcome)?,
    }
    Ok(())
}
