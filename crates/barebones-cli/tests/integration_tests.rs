//! Integration tests for the `barebones` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary, isolated from the user's config, `.env` and `RUST_LOG`.
#[allow(deprecated)]
fn barebones(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("barebones").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("NO_COLOR")
        .env_remove("BAREBONES_RECIPE__JOB_BACKEND");
    cmd
}

const APPLICATION_RB: &str = "require File.expand_path('../boot', __FILE__)

require 'rails/all'

Bundler.require(*Rails.groups)

module Shop
  class Application < Rails::Application
    config.active_record.raise_in_transactional_callbacks = true
  end
end
";

const DEVELOPMENT_RB: &str = "Rails.application.configure do
  config.action_mailer.raise_delivery_errors = false
end
";

const TEST_HELPER: &str = "ENV['RAILS_ENV'] ||= 'test'
require File.expand_path('../../config/environment', __FILE__)
require 'rails/test_help'

class ActiveSupport::TestCase
  fixtures :all
end
";

/// A generated Rails skeleton at `<tmp>/shop`.
fn skeleton(home: &Path) -> std::path::PathBuf {
    let root = home.join("shop");
    for (rel, content) in [
        ("config/application.rb", APPLICATION_RB),
        ("config/environments/development.rb", DEVELOPMENT_RB),
        ("test/test_helper.rb", TEST_HELPER),
    ] {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    root
}

// ── meta ──────────────────────────────────────────────────────────────────────

#[test]
fn help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    barebones(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("apply"))
        .stdout(predicate::str::contains("inject"))
        .stdout(predicate::str::contains("replace"));
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    barebones(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn completions_mention_binary() {
    let home = TempDir::new().unwrap();
    barebones(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("barebones"));
}

// ── steps ─────────────────────────────────────────────────────────────────────

#[test]
fn steps_lists_recipe_in_order() {
    let home = TempDir::new().unwrap();
    barebones(home.path())
        .args(["steps", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. readme"))
        .stdout(predicate::str::contains("staging_environment  (after raise_delivery_errors)"))
        .stdout(predicate::str::contains("resque_rake_task"));
}

#[test]
fn steps_json_without_jobs() {
    let home = TempDir::new().unwrap();
    let output = barebones(home.path())
        .args(["steps", "--jobs", "none", "--output-format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let steps: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = steps
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.first(), Some(&"readme"));
    assert_eq!(names.last(), Some(&"puma"));
    assert!(!names.contains(&"redis"));
}

// ── render ────────────────────────────────────────────────────────────────────

#[test]
fn render_builtin_template() {
    let home = TempDir::new().unwrap();
    barebones(home.path())
        .args(["render", "database.yml", "--name", "Shop Api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("database: shop_api_development"))
        .stdout(predicate::str::contains("{{").not());
}

#[test]
fn render_local_template_with_variables() {
    let home = TempDir::new().unwrap();
    let templates = home.path().join("templates");
    fs::create_dir(&templates).unwrap();
    fs::write(templates.join("greeting"), "{{greeting}} from {{app_const}}\n").unwrap();

    barebones(home.path())
        .args(["render", "greeting", "--name", "shop", "--var", "greeting=hello"])
        .arg("--templates")
        .arg(&templates)
        .assert()
        .success()
        .stdout("hello from Shop\n");
}

// ── inject / replace ──────────────────────────────────────────────────────────

#[test]
fn inject_before_anchor() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("config").join("application.rb");
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(&file, APPLICATION_RB).unwrap();

    barebones(home.path())
        .args([
            "inject",
            "config/application.rb",
            "--before",
            "  end\nend",
            "--text",
            "    config.x = 1\n",
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&file).unwrap();
    assert!(content.ends_with("    config.x = 1\n  end\nend\n"));
}

#[test]
fn inject_after_last_match() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("list.txt"), "- a\n- b\n").unwrap();

    barebones(home.path())
        .args(["inject", "list.txt", "--after", "(?m)^- .\\n", "--regex", "--last", "--text", "- c\n"])
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(home.path().join("list.txt")).unwrap(),
        "- a\n- b\n- c\n"
    );
}

#[test]
fn replace_counts_matches() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("Gemfile"), "gem 'sqlite3'\n\n\n\ngem 'rails'\n").unwrap();

    barebones(home.path())
        .args(["replace", "Gemfile", "\\n{2,}", "\n\n", "--regex", "--output-format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 1"));

    assert_eq!(
        fs::read_to_string(home.path().join("Gemfile")).unwrap(),
        "gem 'sqlite3'\n\ngem 'rails'\n"
    );
}

#[test]
fn replace_without_match_warns_and_leaves_file() {
    let home = TempDir::new().unwrap();
    fs::write(home.path().join("Gemfile"), "gem 'rails'\n").unwrap();

    barebones(home.path())
        .args(["replace", "Gemfile", "sqlite3", "pg", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No match"));

    assert_eq!(fs::read_to_string(home.path().join("Gemfile")).unwrap(), "gem 'rails'\n");
}

// ── apply ─────────────────────────────────────────────────────────────────────

#[cfg(unix)]
#[test]
fn apply_customizes_skeleton() {
    let home = TempDir::new().unwrap();
    let root = skeleton(home.path());

    barebones(home.path())
        .args(["apply", "shop", "--jobs", "sidekiq", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("create  Gemfile"))
        .stdout(predicate::str::contains("inject  config/application.rb"));

    assert_eq!(fs::read_to_string(root.join(".ruby-gemset")).unwrap(), "shop");
    assert!(root.join("config/initializers/sidekiq.rb").is_file());
    assert!(!root.join("lib/tasks/resque.rake").exists());
    assert!(
        fs::read_to_string(root.join("config/application.rb"))
            .unwrap()
            .contains("config.active_job.queue_adapter = :sidekiq")
    );
}

#[cfg(unix)]
#[test]
fn apply_json_report() {
    let home = TempDir::new().unwrap();
    skeleton(home.path());

    let output = barebones(home.path())
        .args(["apply", "shop", "--name", "shop", "--skip", "puma", "--output-format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["app_name"], "shop");
    assert_eq!(report["job_backend"], "resque");
    assert!(report["changes"].as_u64().unwrap() > 0);
    assert!(report["finished_at"].is_string());
    let entries = report["entries"].as_array().unwrap();
    assert_eq!(entries[0]["step"], "readme");
    assert_eq!(entries[0]["outcome"], "created");
    assert!(entries.iter().all(|e| e["step"] != "puma"));
}

#[cfg(unix)]
#[test]
fn second_apply_skips_existing_files() {
    let home = TempDir::new().unwrap();
    let root = skeleton(home.path());
    fs::write(root.join("README.md"), "mine\n").unwrap();

    barebones(home.path())
        .args(["apply", "shop", "--jobs", "none", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skip  README.md"));

    assert_eq!(fs::read_to_string(root.join("README.md")).unwrap(), "mine\n");
}

#[test]
fn dry_run_touches_nothing() {
    let home = TempDir::new().unwrap();
    let root = skeleton(home.path());

    barebones(home.path())
        .args(["apply", "shop", "--dry-run", "--output-format", "plain"])
        .assert()
        .success()
        .stdout(predicate::str::contains("template Gemfile -> Gemfile"))
        .stdout(predicate::str::contains("cp config/environments/development.rb"));

    assert!(!root.join("Gemfile").exists());
    assert_eq!(
        fs::read_to_string(root.join("config/application.rb")).unwrap(),
        APPLICATION_RB
    );
}

// ── config ────────────────────────────────────────────────────────────────────

#[test]
fn init_then_get_from_explicit_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("conf").join("barebones.toml");

    barebones(home.path())
        .arg("init")
        .arg("-c")
        .arg(&config)
        .assert()
        .success();
    assert!(config.is_file());

    barebones(home.path())
        .args(["config", "get", "recipe.job_backend", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout("resque\n");
}

#[test]
fn init_keeps_existing_file_without_force() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("barebones.toml");
    fs::write(&config, "[recipe]\njob_backend = \"none\"\n").unwrap();

    barebones(home.path())
        .args(["init", "--output-format", "plain", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    assert_eq!(
        fs::read_to_string(&config).unwrap(),
        "[recipe]\njob_backend = \"none\"\n"
    );
}

#[test]
fn environment_overrides_config_file() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("barebones.toml");
    fs::write(&config, "[recipe]\njob_backend = \"none\"\n").unwrap();

    barebones(home.path())
        .env("BAREBONES_RECIPE__JOB_BACKEND", "sidekiq")
        .args(["config", "get", "recipe.job_backend", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout("sidekiq\n");
}

#[test]
fn config_path_honours_flag() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("custom.toml");
    fs::write(&config, "").unwrap();

    barebones(home.path())
        .args(["config", "path", "-c"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}
