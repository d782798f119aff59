//! `barebones inject`: insert text next to an anchor in one file.

use barebones_adapters::InMemoryStore;
use barebones_core::domain::{Anchor, DomainValidator, Occurrence, Position};

use crate::{cli::InjectArgs, error::CliResult, output::OutputManager};

pub fn execute(args: InjectArgs, output: OutputManager) -> CliResult<()> {
    let (raw, position) = match (args.before, args.after) {
        (Some(anchor), _) => (anchor, Position::Before),
        (None, Some(anchor)) => (anchor, Position::After),
        (None, None) => {
            return Err(crate::error::CliError::InvalidInput {
                message: "one of --before or --after is required".into(),
                source: None,
            });
        }
    };
    let occurrence = match (args.first, args.last) {
        (true, _) => Occurrence::First,
        (_, true) => Occurrence::Last,
        _ => Occurrence::Unique,
    };
    let anchor =
        Anchor::try_new(DomainValidator::pattern(&raw, args.regex)?, position)?.occurrence(occurrence);

    let (root, target) = super::split_target(&args.file)?;
    let engine = super::engine(&root, Box::new(InMemoryStore::new()), &output);
    let outcome = engine.inject(&target, &anchor, &args.text)?;

    if output.is_json() {
        return output.json(&outcome);
    }
    output.outcome(&outcome)?;
    Ok(())
}
