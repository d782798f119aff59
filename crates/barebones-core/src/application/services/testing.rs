//! In-crate fakes for service tests.
//!
//! Stateful ports are easier to reason about as tiny fakes than as mock
//! expectations; `mockall` mocks cover the command runner.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use crate::{
    application::{
        ApplicationError, Engine,
        ports::{CommandStatus, Filesystem, MockCommandRunner, TemplateRenderer, TemplateStore},
    },
    domain::RenderContext,
    error::BarebonesResult,
};

pub const ROOT: &str = "/project";

#[derive(Debug, Default, Clone)]
pub struct FakeFs {
    inner: Arc<Mutex<FakeFsInner>>,
}

#[derive(Debug, Default)]
struct FakeFsInner {
    files: BTreeMap<PathBuf, String>,
    dirs: BTreeSet<PathBuf>,
    writes: usize,
}

impl FakeFs {
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        let path = Path::new(ROOT).join(rel);
        {
            let mut inner = self.inner.lock().unwrap();
            let mut dir = PathBuf::new();
            for c in path.parent().unwrap().components() {
                dir.push(c);
                inner.dirs.insert(dir.clone());
            }
            inner.files.insert(path, content.to_string());
        }
        self
    }

    pub fn read(&self, rel: &str) -> Option<String> {
        let inner = self.inner.lock().unwrap();
        inner.files.get(&Path::new(ROOT).join(rel)).cloned()
    }

    pub fn has_dir(&self, rel: &str) -> bool {
        self.inner.lock().unwrap().dirs.contains(&Path::new(ROOT).join(rel))
    }

    pub fn writes(&self) -> usize {
        self.inner.lock().unwrap().writes
    }
}

impl Filesystem for FakeFs {
    fn read_to_string(&self, path: &Path) -> BarebonesResult<String> {
        let inner = self.inner.lock().unwrap();
        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into()
        })
    }

    fn write_atomic(&self, path: &Path, content: &str) -> BarebonesResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let parent = path.parent().unwrap().to_path_buf();
        if !inner.dirs.contains(&parent) {
            return Err(ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "parent directory does not exist".into(),
            }
            .into());
        }
        inner.writes += 1;
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> BarebonesResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let mut dir = PathBuf::new();
        for c in path.components() {
            dir.push(c);
            inner.dirs.insert(dir.clone());
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.files.contains_key(path) || inner.dirs.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner.lock().unwrap().dirs.contains(path)
    }
}

#[derive(Debug, Default)]
pub struct FakeStore {
    templates: BTreeMap<String, String>,
}

impl FakeStore {
    pub fn with(mut self, name: &str, source: &str) -> Self {
        self.templates.insert(name.into(), source.into());
        self
    }
}

impl TemplateStore for FakeStore {
    fn get(&self, name: &str) -> BarebonesResult<String> {
        self.templates.get(name).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                name: name.to_string(),
            }
            .into()
        })
    }

    fn names(&self) -> BarebonesResult<Vec<String>> {
        Ok(self.templates.keys().cloned().collect())
    }
}

pub struct ContextRenderer;

impl TemplateRenderer for ContextRenderer {
    fn render(&self, name: &str, source: &str, context: &RenderContext) -> BarebonesResult<String> {
        Ok(context.render(name, source)?)
    }
}

/// Engine over fakes; the runner succeeds for every command.
pub fn engine(fs: FakeFs, store: FakeStore) -> Engine {
    let mut runner = MockCommandRunner::new();
    runner
        .expect_run()
        .returning(|_, _| Ok(CommandStatus::exited(0)));
    engine_with_runner(fs, store, runner)
}

pub fn engine_with_runner(fs: FakeFs, store: FakeStore, runner: MockCommandRunner) -> Engine {
    let fs = fs.with_root();
    Engine::new(
        ROOT,
        Box::new(store),
        Box::new(ContextRenderer),
        Box::new(fs),
        Box::new(runner),
    )
}

impl FakeFs {
    fn with_root(self) -> Self {
        self.create_dir_all(Path::new(ROOT)).unwrap();
        self
    }
}
