//! Property tests for the engine operations over the in-memory adapters.

use std::path::Path;

use proptest::prelude::*;

use barebones_adapters::{InMemoryStore, MemoryFilesystem, PlaceholderRenderer, ShellRunner};
use barebones_core::{
    application::{ApplicationError, Engine},
    domain::{Pattern, RelativePath, RenderContext, WriteOptions},
    error::BarebonesError,
};

const ROOT: &str = "/project";

fn engine(fs: &MemoryFilesystem, store: InMemoryStore) -> Engine {
    Engine::new(
        ROOT,
        Box::new(store),
        Box::new(PlaceholderRenderer::new()),
        Box::new(fs.clone()),
        Box::new(ShellRunner::new()),
    )
}

fn read(fs: &MemoryFilesystem, rel: &str) -> Option<String> {
    fs.read_file(&Path::new(ROOT).join(rel))
}

/// Template text: plain chunks interleaved with known placeholders.
fn template_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z .\n]{0,12}",
            Just("{{app_name}}".to_string()),
            Just("{{app_const}}".to_string()),
            Just("{{ app_name_underscored }}".to_string()),
        ],
        0..12,
    )
    .prop_map(|chunks| chunks.concat())
}

proptest! {
    #[test]
    fn rendering_is_pure(source in template_strategy(), name in "[a-z][a-z_ ]{0,10}") {
        let store = InMemoryStore::new();
        store.insert("t", source).unwrap();
        let e = engine(&MemoryFilesystem::new().with_dir(ROOT), store);
        let ctx = RenderContext::for_app(name);

        let first = e.render("t", &ctx).unwrap();
        let second = e.render("t", &ctx).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn unforced_write_never_modifies_existing(existing in "[ -~\n]{0,64}", new in "[ -~\n]{0,64}") {
        let fs = MemoryFilesystem::new().with_file("/project/config/routes.rb", existing.clone());
        let e = engine(&fs, InMemoryStore::new());

        e.write(&RelativePath::new("config/routes.rb"), &new, WriteOptions::new()).unwrap();

        prop_assert_eq!(read(&fs, "config/routes.rb"), Some(existing));
    }

    #[test]
    fn forced_write_reads_back(existing in "[ -~\n]{0,64}", new in "[ -~\n]{0,64}") {
        let fs = MemoryFilesystem::new().with_file("/project/config/puma.rb", existing);
        let e = engine(&fs, InMemoryStore::new());

        e.write(&RelativePath::new("config/puma.rb"), &new, WriteOptions::forced()).unwrap();

        prop_assert_eq!(read(&fs, "config/puma.rb"), Some(new));
    }

    #[test]
    fn injection_splits_at_unique_anchor(
        prefix in "[a-z \n]{0,40}",
        suffix in "[a-z \n]{0,40}",
        text in "[a-z \n]{0,20}",
    ) {
        const ANCHOR: &str = "<<anchor>>";
        let original = format!("{prefix}{ANCHOR}{suffix}");
        let fs = MemoryFilesystem::new()
            .with_file("/project/before.rb", original.clone())
            .with_file("/project/after.rb", original);
        let e = engine(&fs, InMemoryStore::new());

        e.inject_before(&RelativePath::new("before.rb"), Pattern::literal(ANCHOR), &text).unwrap();
        e.inject_after(&RelativePath::new("after.rb"), Pattern::literal(ANCHOR), &text).unwrap();

        prop_assert_eq!(read(&fs, "before.rb"), Some(format!("{prefix}{text}{ANCHOR}{suffix}")));
        prop_assert_eq!(read(&fs, "after.rb"), Some(format!("{prefix}{ANCHOR}{text}{suffix}")));
    }

    #[test]
    fn missing_anchor_leaves_file_unmodified(content in "[a-z \n]{0,60}", text in "[a-z]{1,10}") {
        let fs = MemoryFilesystem::new().with_file("/project/f.rb", content.clone());
        let e = engine(&fs, InMemoryStore::new());

        let err = e
            .inject_after(&RelativePath::new("f.rb"), Pattern::literal("<<missing>>"), &text)
            .unwrap_err();

        let is_not_found = matches!(
            err,
            BarebonesError::Application(ApplicationError::AnchorNotFound { .. })
        );
        prop_assert!(is_not_found);
        prop_assert_eq!(read(&fs, "f.rb"), Some(content));
    }

    #[test]
    fn replace_without_matches_is_identity(content in "[a-z \n]{0,60}") {
        let fs = MemoryFilesystem::new().with_file("/project/Gemfile", content.clone());
        let e = engine(&fs, InMemoryStore::new());

        let outcome = e
            .replace_all(&RelativePath::new("Gemfile"), &Pattern::literal("XYZ"), "abc")
            .unwrap();

        prop_assert!(!outcome.is_change());
        prop_assert_eq!(read(&fs, "Gemfile"), Some(content));
    }
}

#[test]
fn inject_before_application_class_end() {
    let original = "module Demo\n  class Application < Rails::Application\n    config.a = 0\n  end\nend\n";
    let fs = MemoryFilesystem::new().with_file("/project/config/application.rb", original);
    let e = engine(&fs, InMemoryStore::new());

    e.inject_before(
        &RelativePath::new("config/application.rb"),
        Pattern::literal("  end\nend"),
        "  config.x = 1\n",
    )
    .unwrap();

    let lines: Vec<String> = read(&fs, "config/application.rb")
        .unwrap()
        .lines()
        .map(String::from)
        .collect();
    assert_eq!(
        lines,
        [
            "module Demo",
            "  class Application < Rails::Application",
            "    config.a = 0",
            "  config.x = 1",
            "  end",
            "end",
        ]
    );
}

#[test]
fn render_replaces_every_placeholder_and_nothing_else() {
    let store = InMemoryStore::new();
    store
        .insert("db", "name: {{app_name}}\ntest: {{app_name}}_test\n{ braces } stay\n")
        .unwrap();
    let e = engine(&MemoryFilesystem::new(), store);
    let ctx = RenderContext::new().with_variable("app_name", "demo_app");

    assert_eq!(
        e.render("db", &ctx).unwrap(),
        "name: demo_app\ntest: demo_app_test\n{ braces } stay\n"
    );
}

#[test]
fn crlf_files_stay_crlf_after_injection() {
    let fs = MemoryFilesystem::new()
        .with_file("/project/config/application.rb", "class A\r\n  end\r\nend\r\n");
    let e = engine(&fs, InMemoryStore::new());

    e.inject_before(
        &RelativePath::new("config/application.rb"),
        Pattern::literal("  end\nend"),
        "    x = 1\n",
    )
    .unwrap();

    assert_eq!(
        read(&fs, "config/application.rb").as_deref(),
        Some("class A\r\n    x = 1\r\n  end\r\nend\r\n")
    );
}
