//! User template directory, layered over a fallback store.
//!
//! A template's name is its path relative to the directory, with forward
//! slashes (`config/puma.rb`). Names the directory lacks are looked up in
//! the fallback, so a directory only needs the templates it overrides.

use std::{
    collections::BTreeSet,
    fs,
    path::{Component, Path, PathBuf},
};

use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use barebones_core::{
    application::{ApplicationError, ports::TemplateStore},
    error::BarebonesResult,
};

/// Templates read from disk on demand.
pub struct DirectoryStore {
    root: PathBuf,
    fallback: Option<Box<dyn TemplateStore>>,
}

impl DirectoryStore {
    /// Store over `root` with no fallback.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            fallback: None,
        }
    }

    /// Consult `fallback` for names the directory does not contain.
    pub fn with_fallback(mut self, fallback: Box<dyn TemplateStore>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a template name to a file under the root.
    ///
    /// Names that would escape the root resolve to nothing.
    fn locate(&self, name: &str) -> Option<PathBuf> {
        let relative = Path::new(name);
        let confined = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if name.is_empty() || !confined {
            warn!(name, "Ignoring template name outside the template directory");
            return None;
        }
        let path = self.root.join(relative);
        path.is_file().then_some(path)
    }

    fn not_found(&self, name: &str) -> ApplicationError {
        ApplicationError::TemplateNotFound {
            name: name.to_string(),
        }
    }
}

impl TemplateStore for DirectoryStore {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn get(&self, name: &str) -> BarebonesResult<String> {
        if let Some(path) = self.locate(name) {
            debug!(path = %path.display(), "Using template from directory");
            return fs::read_to_string(&path).map_err(|e| {
                ApplicationError::FilesystemError {
                    path,
                    reason: format!("Failed to read template: {e}"),
                }
                .into()
            });
        }

        match &self.fallback {
            Some(fallback) => fallback.get(name),
            None => Err(self.not_found(name).into()),
        }
    }

    fn names(&self) -> BarebonesResult<Vec<String>> {
        let mut names = BTreeSet::new();

        if self.root.is_dir() {
            for entry in WalkDir::new(&self.root).min_depth(1) {
                let entry = entry.map_err(|e| ApplicationError::FilesystemError {
                    path: self.root.clone(),
                    reason: format!("Directory walk error: {e}"),
                })?;
                if !entry.file_type().is_file() {
                    continue;
                }
                if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                    names.insert(normalize(relative));
                }
            }
        } else {
            warn!(root = %self.root.display(), "Template directory does not exist");
        }

        if let Some(fallback) = &self.fallback {
            names.extend(fallback.names()?);
        }
        Ok(names.into_iter().collect())
    }
}

fn normalize(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
