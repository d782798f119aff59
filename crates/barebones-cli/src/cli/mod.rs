//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};

use barebones_adapters::JobBackend;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "barebones",
    bin_name = "barebones",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Customize a freshly generated Rails API application",
    long_about = "Barebones applies an opinionated recipe to a newly generated \
                  Rails application: templates, anchored edits to existing \
                  files, and a few shell commands, in a fixed order.",
    after_help = "EXAMPLES:\n\
        \x20 rails new demo --api && barebones apply demo\n\
        \x20 barebones apply . --jobs sidekiq --skip carrierwave\n\
        \x20 barebones steps --jobs none\n\
        \x20 barebones render database.yml --name demo\n\
        \x20 barebones completions bash > /usr/share/bash-completion/completions/barebones",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the built-in recipe against an existing project.
    #[command(
        about = "Apply the recipe to a generated project",
        after_help = "EXAMPLES:\n\
            \x20 barebones apply demo\n\
            \x20 barebones apply . --name demo --jobs sidekiq\n\
            \x20 barebones apply demo --skip carrierwave --skip puma\n\
            \x20 barebones apply demo --dry-run --output-format json"
    )]
    Apply(ApplyArgs),

    /// List the recipe steps.
    #[command(
        visible_alias = "ls",
        about = "List recipe steps in order",
        after_help = "EXAMPLES:\n\
            \x20 barebones steps\n\
            \x20 barebones steps --jobs none"
    )]
    Steps(StepsArgs),

    /// Print a rendered template.
    #[command(
        about = "Render a template to stdout",
        after_help = "EXAMPLES:\n\
            \x20 barebones render secrets.yml --name demo\n\
            \x20 barebones render Gemfile --name demo --var ruby_version=2.3.0\n\
            \x20 barebones render mailer.rb --name demo --templates ./templates"
    )]
    Render(RenderArgs),

    /// Insert text next to an anchor in one file.
    #[command(
        about = "Inject text before or after an anchor",
        after_help = "EXAMPLES:\n\
            \x20 barebones inject config/application.rb --before $'  end\\nend' --text $'    config.x = 1\\n'\n\
            \x20 barebones inject Gemfile --after \"^source .*\\n\" --regex --text \"gem 'pry'\\n\""
    )]
    Inject(InjectArgs),

    /// Replace every match of a pattern in one file.
    #[command(
        about = "Replace all matches in a file",
        after_help = "EXAMPLES:\n\
            \x20 barebones replace Gemfile \"gem 'sqlite3'\" \"gem 'pg'\"\n\
            \x20 barebones replace Gemfile '\\n{2,}' $'\\n\\n' --regex"
    )]
    Replace(ReplaceArgs),

    /// Initialise a Barebones configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 barebones init          # default location\n\
            \x20 barebones init --force  # overwrite an existing file"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 barebones completions bash > ~/.local/share/bash-completion/completions/barebones\n\
            \x20 barebones completions zsh  > ~/.zfunc/_barebones\n\
            \x20 barebones completions fish > ~/.config/fish/completions/barebones.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Barebones configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 barebones config get recipe.job_backend\n\
            \x20 barebones config list\n\
            \x20 barebones config path"
    )]
    Config(ConfigCommands),
}

// ── apply ─────────────────────────────────────────────────────────────────────

/// Arguments for `barebones apply`.
#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Root of the generated application.
    #[arg(value_name = "ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Application name; defaults to the root directory's name.
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: Option<String>,

    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Leave a step out (repeatable).
    #[arg(long = "skip", value_name = "STEP")]
    pub skip: Vec<String>,

    /// Directory of templates that take precedence over the built-in ones.
    #[arg(long = "templates", value_name = "DIR")]
    pub templates: Option<PathBuf>,

    /// Show what would be done without touching the project.
    #[arg(long = "dry-run", help = "Preview without writing anything")]
    pub dry_run: bool,
}

/// Recipe knobs shared by several subcommands.
#[derive(Debug, Clone, Default, Args)]
pub struct RecipeArgs {
    /// Background job library.
    #[arg(short = 'j', long = "jobs", value_name = "BACKEND", value_enum)]
    pub jobs: Option<Jobs>,

    /// Ruby version pinned in `.ruby-version` and the Gemfile.
    #[arg(long = "ruby-version", value_name = "VERSION")]
    pub ruby_version: Option<String>,
}

/// Background job libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Jobs {
    Resque,
    Sidekiq,
    /// No background jobs.
    None,
}

impl From<Jobs> for JobBackend {
    fn from(jobs: Jobs) -> Self {
        match jobs {
            Jobs::Resque => JobBackend::Resque,
            Jobs::Sidekiq => JobBackend::Sidekiq,
            Jobs::None => JobBackend::None,
        }
    }
}

// ── steps ─────────────────────────────────────────────────────────────────────

/// Arguments for `barebones steps`.
#[derive(Debug, Args)]
pub struct StepsArgs {
    #[command(flatten)]
    pub recipe: RecipeArgs,
}

// ── render ────────────────────────────────────────────────────────────────────

/// Arguments for `barebones render`.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Template name, e.g. `database.yml`.
    #[arg(value_name = "TEMPLATE")]
    pub template: String,

    /// Application name used for the name placeholders.
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    pub name: String,

    /// Extra context variable (repeatable).
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    #[command(flatten)]
    pub recipe: RecipeArgs,

    /// Directory of templates that take precedence over the built-in ones.
    #[arg(long = "templates", value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

/// Parse `KEY=VALUE`; the value may itself contain `=`.
fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}

// ── inject ────────────────────────────────────────────────────────────────────

/// Arguments for `barebones inject`.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("anchor").required(true).args(["before", "after"])))]
pub struct InjectArgs {
    /// File to edit, relative to the working directory.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Insert before this anchor.
    #[arg(long = "before", value_name = "ANCHOR", allow_hyphen_values = true)]
    pub before: Option<String>,

    /// Insert after this anchor.
    #[arg(long = "after", value_name = "ANCHOR", allow_hyphen_values = true)]
    pub after: Option<String>,

    /// Text to insert.
    #[arg(short = 't', long = "text", value_name = "TEXT", allow_hyphen_values = true)]
    pub text: String,

    /// Treat the anchor as a regular expression.
    #[arg(long = "regex")]
    pub regex: bool,

    /// Use the first match when the anchor occurs more than once.
    #[arg(long = "first", conflicts_with = "last")]
    pub first: bool,

    /// Use the last match when the anchor occurs more than once.
    #[arg(long = "last")]
    pub last: bool,
}

// ── replace ───────────────────────────────────────────────────────────────────

/// Arguments for `barebones replace`.
#[derive(Debug, Args)]
pub struct ReplaceArgs {
    /// File to edit, relative to the working directory.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Text (or regular expression with `--regex`) to look for.
    #[arg(value_name = "PATTERN", allow_hyphen_values = true)]
    pub pattern: String,

    /// Replacement text. With `--regex`, `$1` and `${name}` expand captures.
    #[arg(value_name = "REPLACEMENT", allow_hyphen_values = true)]
    pub replacement: String,

    /// Treat the pattern as a regular expression.
    #[arg(long = "regex")]
    pub regex: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `barebones init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(short = 'f', long = "force")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `barebones completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for.
    #[arg(value_name = "SHELL", value_enum)]
    pub shell: Shell,
}

/// Supported shells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}

// ── config ────────────────────────────────────────────────────────────────────

/// `barebones config` subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print one configuration value.
    Get {
        /// Dotted key, e.g. `recipe.job_backend`.
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the configuration file path.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
