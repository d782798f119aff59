//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the library crates never see it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `BAREBONES_*` environment variables, `__` between nested keys
//!    (`BAREBONES_RECIPE__JOB_BACKEND=sidekiq`)
//! 3. Config file (`--config FILE` or [`AppConfig::config_path`])
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use barebones_adapters::{JobBackend, recipe::DEFAULT_RUBY_VERSION};

use crate::cli::OutputFormat;

const ENV_PREFIX: &str = "BAREBONES";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Recipe defaults.
    pub recipe: RecipeConfig,
    /// Output settings.
    pub output: OutputConfig,
    /// Template settings.
    pub templates: TemplateConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeConfig {
    pub job_backend: JobBackend,
    pub ruby_version: String,
    /// Steps left out of every `apply`.
    pub skip: Vec<String>,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        Self {
            job_backend: JobBackend::default(),
            ruby_version: DEFAULT_RUBY_VERSION.to_string(),
            skip: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// Used when `--output-format` is left at `auto`.
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory searched before the built-in templates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration, layering file and environment over the defaults.
    ///
    /// An explicit `config_file` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        Self::load_from(&path, required, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_from(path: &Path, required: bool, env: Environment) -> anyhow::Result<Self> {
        let env = env
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("recipe.skip");

        let settings = Config::builder()
            .add_source(File::new(&path.to_string_lossy(), FileFormat::Toml).required(required))
            .add_source(env)
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.barebones.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "barebones", "barebones")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".barebones.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::Map;

    fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX).source(Some(Map::new()))
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<Map<_, _>>();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn defaults_pin_resque_and_ruby() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.recipe.job_backend, JobBackend::Resque);
        assert_eq!(cfg.recipe.ruby_version, DEFAULT_RUBY_VERSION);
        assert!(!cfg.output.no_color);
        assert_eq!(cfg.output.format, OutputFormat::Auto);
    }

    #[test]
    fn missing_optional_file_yields_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let cfg = AppConfig::load_from(&dir.path().join("none.toml"), false, no_env()).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn missing_required_file_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(AppConfig::load_from(&dir.path().join("none.toml"), true, no_env()).is_err());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[recipe]\njob_backend = \"sidekiq\"\nskip = [\"puma\"]\n\n[output]\nformat = \"json\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load_from(&path, true, no_env()).unwrap();

        assert_eq!(cfg.recipe.job_backend, JobBackend::Sidekiq);
        assert_eq!(cfg.recipe.skip, ["puma"]);
        assert_eq!(cfg.recipe.ruby_version, DEFAULT_RUBY_VERSION);
        assert_eq!(cfg.output.format, OutputFormat::Json);
    }

    #[test]
    fn environment_overrides_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[recipe]\njob_backend = \"sidekiq\"\n").unwrap();

        let cfg = AppConfig::load_from(
            &path,
            true,
            env(&[
                ("BAREBONES_RECIPE__JOB_BACKEND", "none"),
                ("BAREBONES_RECIPE__SKIP", "puma,carrierwave"),
            ]),
        )
        .unwrap();

        assert_eq!(cfg.recipe.job_backend, JobBackend::None);
        assert_eq!(cfg.recipe.skip, ["puma", "carrierwave"]);
    }

    #[test]
    fn unknown_job_backend_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[recipe]\njob_backend = \"delayed_job\"\n").unwrap();

        assert!(AppConfig::load_from(&path, true, no_env()).is_err());
    }

    #[test]
    fn defaults_round_trip_through_toml() {
        let text = toml::to_string_pretty(&AppConfig::default()).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, AppConfig::default());
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
