//! `barebones render`: print one rendered template.

use std::path::Path;

use serde::Serialize;

use barebones_adapters::Recipe;

use crate::{cli::RenderArgs, config::AppConfig, error::CliResult, output::OutputManager};

#[derive(Debug, Serialize)]
struct Rendered<'a> {
    template: &'a str,
    content: &'a str,
}

pub fn execute(args: RenderArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let recipe = Recipe::new(args.name.as_str(), super::recipe_options(&args.recipe, &config));
    let mut context = recipe.context().clone();
    for (key, value) in args.vars {
        context.insert(key, value);
    }

    let store = super::template_store(
        args.templates
            .as_deref()
            .or(config.templates.local_path.as_deref()),
    )?;
    // Rendering never touches the file system, so any root will do.
    let engine = super::engine(Path::new("."), store, &output);
    let content = engine.render(&args.template, &context)?;

    if output.is_json() {
        return output.json(&Rendered {
            template: &args.template,
            content: &content,
        });
    }
    output.raw(&content)?;
    Ok(())
}
