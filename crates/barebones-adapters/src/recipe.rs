//! The built-in Rails API recipe.
//!
//! Each step is a small function returning a [`Step`]; [`Recipe::plan`]
//! strings them together in order. Steps that depend on an earlier step's
//! edits declare it with `requires`, and the plan is validated before it
//! runs.
//!
//! The recipe runs against a freshly generated Rails application: it
//! expects `config/application.rb`, `config/environments/development.rb`
//! and `test/test_helper.rb` to exist.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use barebones_core::domain::{
    Anchor, DomainError, Pattern, RenderContext, ScaffoldPlan, Snippet, Step,
};

/// Ruby version pinned by `.ruby-version` and the Gemfile by default.
pub const DEFAULT_RUBY_VERSION: &str = "2.2.3";

/// Closing lines of the `Application` class in `config/application.rb`.
const APPLICATION_CLASS_END: &str = "  end\nend";
/// Closing line of the test case class in `test/test_helper.rb`.
const TEST_CASE_END: &str = "end\n";
const LAST_TEST_REQUIRE: &str = "require 'rails/test_help'\n";

const APPLICATION_RB: &str = "config/application.rb";
const TEST_HELPER: &str = "test/test_helper.rb";
const DEVELOPMENT_RB: &str = "config/environments/development.rb";

/// Background job library wired into the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobBackend {
    #[default]
    Resque,
    Sidekiq,
    None,
}

impl JobBackend {
    pub const ALL: [JobBackend; 3] = [Self::Resque, Self::Sidekiq, Self::None];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resque => "resque",
            Self::Sidekiq => "sidekiq",
            Self::None => "none",
        }
    }

    fn adapter_symbol(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Self::Resque => Some(("Resque", ":resque")),
            Self::Sidekiq => Some(("Sidekiq", ":sidekiq")),
            Self::None => None,
        }
    }

    fn gems(&self) -> &'static str {
        match self {
            Self::Resque => "gem 'redis-namespace'\ngem 'resque'",
            Self::Sidekiq => "gem 'redis-namespace'\ngem 'sidekiq'",
            Self::None => "",
        }
    }
}

impl fmt::Display for JobBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown job backend '{0}' (expected resque, sidekiq or none)")]
pub struct ParseJobBackendError(String);

impl FromStr for JobBackend {
    type Err = ParseJobBackendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseJobBackendError(s.to_string()))
    }
}

/// Knobs the recipe exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecipeOptions {
    pub job_backend: JobBackend,
    pub ruby_version: String,
}

impl Default for RecipeOptions {
    fn default() -> Self {
        Self {
            job_backend: JobBackend::default(),
            ruby_version: DEFAULT_RUBY_VERSION.to_string(),
        }
    }
}

/// The recipe for one application.
#[derive(Debug, Clone)]
pub struct Recipe {
    context: RenderContext,
    options: RecipeOptions,
}

impl Recipe {
    pub fn new(app_name: impl Into<String>, options: RecipeOptions) -> Self {
        let context = RenderContext::for_app(app_name)
            .with_variable("ruby_version", options.ruby_version.clone())
            .with_variable("job_gems", options.job_backend.gems());
        Self { context, options }
    }

    /// Variables every recipe template may use.
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    pub fn options(&self) -> &RecipeOptions {
        &self.options
    }

    /// Build the ordered, validated plan.
    pub fn plan(&self) -> Result<ScaffoldPlan, DomainError> {
        let underscored = self
            .context
            .get("app_name_underscored")
            .unwrap_or_default()
            .to_string();

        let mut plan = ScaffoldPlan::new()
            .with_step(readme())
            .with_step(gemfile()?)
            .with_step(gitignore())
            .with_step(app(&underscored))
            .with_step(database_yml())
            .with_step(ruby_version(&self.options.ruby_version))
            .with_step(gemset(&underscored))
            .with_step(autoload_paths())
            .with_step(routes())
            .with_step(multi_json())
            .with_step(api_constraints())
            .with_step(api_v1_defaults())
            .with_step(api_configurations())
            .with_step(api_layouts())
            .with_step(secrets())
            .with_step(raise_delivery_errors())
            .with_step(staging_environment())
            .with_step(minitest())
            .with_step(factory_girl());

        if let Some((library, symbol)) = self.options.job_backend.adapter_symbol() {
            plan.push(active_job_adapter(library, symbol));
            plan.push(redis());
            match self.options.job_backend {
                JobBackend::Resque => plan.push(resque()),
                JobBackend::Sidekiq => plan.push(sidekiq()),
                JobBackend::None => {}
            }
            plan.push(test_job());
            if self.options.job_backend == JobBackend::Resque {
                plan.push(resque_rake_task());
            }
        }

        plan.push(carrierwave());
        plan.push(puma());

        plan.validate()?;
        Ok(plan)
    }
}

// ── Steps ─────────────────────────────────────────────────────────────────────

fn readme() -> Step {
    Step::new("readme").template("README.md", "README.md")
}

fn gemfile() -> Result<Step, DomainError> {
    Ok(Step::new("gemfile")
        .template("Gemfile", "Gemfile")
        .replace_all("Gemfile", Pattern::regex(r"\n{2,}")?, "\n\n"))
}

fn gitignore() -> Step {
    Step::new("gitignore").template("gitignore", ".gitignore")
}

fn app(underscored: &str) -> Step {
    Step::new("app")
        .keep("app/services")
        .keep("app/decorators")
        .template(
            "decorator.rb",
            format!("app/decorators/{underscored}_decorator.rb"),
        )
}

fn database_yml() -> Step {
    Step::new("database_yml").template("database.yml", "config/database.yml")
}

fn ruby_version(version: &str) -> Step {
    Step::new("ruby_version").create_file(".ruby-version", version)
}

fn gemset(underscored: &str) -> Step {
    Step::new("gemset").create_file(".ruby-gemset", underscored)
}

fn autoload_paths() -> Step {
    Step::new("autoload_paths").inject(
        APPLICATION_RB,
        Anchor::before(APPLICATION_CLASS_END),
        Snippet::new()
            .blank()
            .line(4, "# Autoload 'lib' folder")
            .line(4, r##"config.autoload_paths += Dir["#{config.root}/lib/**/"]"##)
            .build(),
    )
}

fn routes() -> Step {
    Step::new("routes").template_forced("routes.rb", "config/routes.rb")
}

fn multi_json() -> Step {
    Step::new("multi_json").template("multi_json.rb", "config/initializers/multi_json.rb")
}

fn api_constraints() -> Step {
    Step::new("api_constraints").template("api_constraints.rb", "lib/api_constraints.rb")
}

fn api_v1_defaults() -> Step {
    Step::new("api_v1_defaults")
        .empty_directory("app/controllers/api")
        .empty_directory("app/controllers/api/v1")
        .template(
            "api_application_controller.rb",
            "app/controllers/api/v1/application_controller.rb",
        )
        .template(
            "api_defaults_concern.rb",
            "app/controllers/concerns/api_defaults.rb",
        )
}

fn api_configurations() -> Step {
    Step::new("api_configurations")
        .empty_directory("app/views/api/v1/configs")
        .template(
            "configs_controller.rb",
            "app/controllers/api/v1/configs_controller.rb",
        )
        .template(
            "config_ping.json.jbuilder",
            "app/views/api/v1/configs/ping.json.jbuilder",
        )
}

fn api_layouts() -> Step {
    Step::new("api_layouts")
        .empty_directory("app/views/layouts/api/v1")
        .template(
            "layout.json.jbuilder",
            "app/views/layouts/api/v1/application.json.jbuilder",
        )
        .empty_directory("app/views/api/v1/defaults")
        .create_file("app/views/api/v1/defaults/default.json.jbuilder", "")
}

fn secrets() -> Step {
    Step::new("secrets").template_forced("secrets.yml", "config/secrets.yml")
}

fn raise_delivery_errors() -> Step {
    Step::new("raise_delivery_errors").replace_all(
        DEVELOPMENT_RB,
        Pattern::literal("config.action_mailer.raise_delivery_errors = false"),
        "config.action_mailer.raise_delivery_errors = true",
    )
}

fn staging_environment() -> Step {
    Step::new("staging_environment")
        .requires("raise_delivery_errors")
        .run("cp config/environments/development.rb config/environments/staging.rb")
}

fn minitest() -> Step {
    Step::new("minitest")
        .inject(
            APPLICATION_RB,
            Anchor::before(APPLICATION_CLASS_END),
            Snippet::new()
                .blank()
                .line(4, "# Auto generate test files")
                .line(4, "config.generators do |g|")
                .line(6, "g.test_framework :minitest, spec: true, fixture: false")
                .line(4, "end")
                .build(),
        )
        .inject(
            TEST_HELPER,
            Anchor::after(LAST_TEST_REQUIRE),
            Snippet::new()
                .line(0, "require 'minitest/reporters'")
                .line(0, "require 'minitest/spec'")
                .line(0, "require 'mocha/mini_test'")
                .line(0, "# Require all support helpers")
                .line(0, "Dir[Rails.root.join('test/support/**/*.rb')].each { |f| require f }")
                .blank()
                .line(0, "Minitest::Reporters.use!(")
                .lines(
                    2,
                    [
                        "Minitest::Reporters::DefaultReporter.new,",
                        "ENV,",
                        "Minitest.backtrace_filter",
                    ],
                )
                .line(0, ")")
                .build(),
        )
}

fn factory_girl() -> Step {
    Step::new("factory_girl")
        .requires("minitest")
        .inject(
            APPLICATION_RB,
            Anchor::before(APPLICATION_CLASS_END),
            Snippet::new()
                .blank()
                .line(4, "# Generate Factories instead of Fixtures")
                .line(4, "config.generators do |g|")
                .line(6, "g.factory_girl true")
                .line(4, "end")
                .build(),
        )
        .inject(
            TEST_HELPER,
            Anchor::after(TEST_CASE_END),
            Snippet::new()
                .line(
                    0,
                    "# Minitest does not provide a way to include or extend a module into every test class",
                )
                .line(0, "# without re-opening the test case class")
                .line(0, "module Minitest")
                .line(2, "class Test")
                .line(4, "include FactoryGirl::Syntax::Methods")
                .line(2, "end")
                .line(0, "end")
                .build(),
        )
}

fn active_job_adapter(library: &str, symbol: &str) -> Step {
    Step::new("active_job_adapter")
        .requires("autoload_paths")
        .inject(
            APPLICATION_RB,
            Anchor::before(APPLICATION_CLASS_END),
            Snippet::new()
                .blank()
                .line(4, format!("# Set ActiveJob to use {library}"))
                .line(4, format!("config.active_job.queue_adapter = {symbol}"))
                .build(),
        )
}

fn redis() -> Step {
    Step::new("redis").template("redis.rb", "config/initializers/redis.rb")
}

fn resque() -> Step {
    Step::new("resque").template("resque.rb", "config/initializers/resque.rb")
}

fn sidekiq() -> Step {
    Step::new("sidekiq").template("sidekiq.rb", "config/initializers/sidekiq.rb")
}

fn test_job() -> Step {
    Step::new("test_job")
        .requires("active_job_adapter")
        .template("test_job.rb", "app/jobs/test_job.rb")
}

fn resque_rake_task() -> Step {
    Step::new("resque_rake_task")
        .requires("resque")
        .template("resque.rake", "lib/tasks/resque.rake")
}

fn carrierwave() -> Step {
    Step::new("carrierwave").template("carrierwave.rb", "config/initializers/carrierwave.rb")
}

fn puma() -> Step {
    Step::new("puma")
        .template("Procfile", "Procfile")
        .template_forced("puma.rb", "config/puma.rb")
}
