//! Command handlers, one module per subcommand.
//!
//! Handlers build the adapters they need, call into `barebones-core`, and
//! report through the [`OutputManager`](crate::output::OutputManager).

use std::path::{Path, PathBuf};

use barebones_adapters::{
    DirectoryStore, InMemoryStore, LocalFilesystem, PlaceholderRenderer, RecipeOptions,
    ShellRunner,
};
use barebones_core::{
    application::{Engine, TemplateStore},
    domain::{DomainValidator, RelativePath},
};

use crate::{
    cli::RecipeArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub mod apply;
pub mod completions;
pub mod config;
pub mod init;
pub mod inject;
pub mod render;
pub mod replace;
pub mod steps;

/// Recipe options from flags, falling back to the configuration.
pub(crate) fn recipe_options(args: &RecipeArgs, config: &AppConfig) -> RecipeOptions {
    RecipeOptions {
        job_backend: args.jobs.map(Into::into).unwrap_or(config.recipe.job_backend),
        ruby_version: args
            .ruby_version
            .clone()
            .unwrap_or_else(|| config.recipe.ruby_version.clone()),
    }
}

/// Built-in templates, optionally shadowed by a local directory.
pub(crate) fn template_store(dir: Option<&Path>) -> CliResult<Box<dyn TemplateStore>> {
    let builtin = InMemoryStore::with_builtin()?;
    match dir {
        Some(dir) if !dir.is_dir() => Err(CliError::InvalidInput {
            message: format!("template directory '{}' does not exist", dir.display()),
            source: None,
        }),
        Some(dir) => Ok(Box::new(
            DirectoryStore::new(dir).with_fallback(Box::new(builtin)),
        )),
        None => Ok(Box::new(builtin)),
    }
}

/// Engine over the local file system rooted at `root`.
///
/// In JSON mode child process stdout is sent to stderr so stdout carries
/// only the report.
pub(crate) fn engine(root: &Path, store: Box<dyn TemplateStore>, output: &OutputManager) -> Engine {
    Engine::new(
        root,
        store,
        Box::new(PlaceholderRenderer::new()),
        Box::new(LocalFilesystem::new()),
        Box::new(ShellRunner::new().stdout_to_stderr(output.is_json())),
    )
}

/// Split a user-supplied file path into its directory and file name,
/// resolved against the working directory.
pub(crate) fn split_target(file: &Path) -> CliResult<(PathBuf, RelativePath)> {
    let cwd = std::env::current_dir().with_cli_context(|| "Failed to read the working directory")?;
    let full = cwd.join(file);
    let name = full
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CliError::InvalidInput {
            message: format!("'{}' does not name a file", file.display()),
            source: None,
        })?;
    let target = DomainValidator::target_path(name)?;
    let root = full.parent().map(Path::to_path_buf).unwrap_or(cwd);
    Ok((root, target))
}
