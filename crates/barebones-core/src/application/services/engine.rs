//! The file-generation engine.
//!
//! Every operation takes a path relative to the project root, touches at
//! most one file (or one directory and its marker) and reports what it did
//! as an [`Outcome`]. Writes go through `Filesystem::write_atomic`, so a
//! failed operation never leaves a half-written file behind.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{CommandRunner, Filesystem, TemplateRenderer, TemplateStore},
    },
    domain::{Anchor, AnchorMiss, Outcome, Pattern, Position, RelativePath, RenderContext, WriteOptions},
    error::BarebonesResult,
};

/// Marker file that keeps otherwise empty directories under version control.
pub const KEEP_MARKER: &str = ".keep";

/// Applies single operations against one project root.
pub struct Engine {
    root: PathBuf,
    store: Box<dyn TemplateStore>,
    renderer: Box<dyn TemplateRenderer>,
    filesystem: Box<dyn Filesystem>,
    runner: Box<dyn CommandRunner>,
}

impl Engine {
    /// Create an engine with injected dependencies.
    pub fn new(
        root: impl Into<PathBuf>,
        store: Box<dyn TemplateStore>,
        renderer: Box<dyn TemplateRenderer>,
        filesystem: Box<dyn Filesystem>,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        Self {
            root: root.into(),
            store,
            renderer,
            filesystem,
            runner,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Fail unless the project root is an existing directory.
    pub fn ensure_root(&self) -> BarebonesResult<()> {
        if self.filesystem.is_dir(&self.root) {
            Ok(())
        } else {
            Err(ApplicationError::ProjectRootMissing {
                path: self.root.clone(),
            }
            .into())
        }
    }

    /// Names the template store can serve.
    pub fn template_names(&self) -> BarebonesResult<Vec<String>> {
        self.store.names()
    }

    /// Render a named template. Pure apart from the store lookup.
    #[instrument(skip(self, context))]
    pub fn render(&self, name: &str, context: &RenderContext) -> BarebonesResult<String> {
        let source = self.store.get(name)?;
        self.renderer.render(name, &source, context)
    }

    /// Materialize `content` at `path`, creating parent directories.
    ///
    /// An existing file is left untouched unless `options.force` is set.
    pub fn write(
        &self,
        path: &RelativePath,
        content: &str,
        options: WriteOptions,
    ) -> BarebonesResult<Outcome> {
        let full = path.resolve(&self.root);
        let existed = self.filesystem.exists(&full);

        if existed && !options.force {
            debug!(path = %path, "File exists, leaving it untouched");
            return Ok(Outcome::SkippedExisting { path: path.clone() });
        }
        if existed && self.filesystem.is_dir(&full) {
            return Err(ApplicationError::FilesystemError {
                path: full,
                reason: "a directory is in the way".into(),
            }
            .into());
        }

        if let Some(parent) = full.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_atomic(&full, content)?;

        debug!(path = %path, bytes = content.len(), overwritten = existed, "Wrote file");
        Ok(if existed {
            Outcome::Overwritten { path: path.clone() }
        } else {
            Outcome::Created { path: path.clone() }
        })
    }

    /// Render `name` and write it to `destination`.
    ///
    /// Rendering happens first, so a missing template or key never creates
    /// the destination.
    pub fn template(
        &self,
        name: &str,
        destination: &RelativePath,
        context: &RenderContext,
        options: WriteOptions,
    ) -> BarebonesResult<Outcome> {
        let content = self.render(name, context)?;
        self.write(destination, &content, options)
    }

    /// Create `dir` (and parents) without any marker.
    pub fn empty_directory(&self, dir: &RelativePath) -> BarebonesResult<Outcome> {
        self.filesystem.create_dir_all(&dir.resolve(&self.root))?;
        debug!(path = %dir, "Created directory");
        Ok(Outcome::DirectoryCreated { path: dir.clone() })
    }

    /// Create `dir` and an empty `.keep` marker inside it.
    ///
    /// An existing marker is never rewritten.
    pub fn keep(&self, dir: &RelativePath) -> BarebonesResult<Outcome> {
        let full = dir.resolve(&self.root);
        self.filesystem.create_dir_all(&full)?;

        let marker = full.join(KEEP_MARKER);
        let marker_created = !self.filesystem.exists(&marker);
        if marker_created {
            self.filesystem.write_atomic(&marker, "")?;
        }

        debug!(path = %dir, marker_created, "Kept directory");
        Ok(Outcome::DirectoryKept {
            path: dir.clone(),
            marker_created,
        })
    }

    /// Splice `text` into an existing file at `anchor`.
    pub fn inject(
        &self,
        path: &RelativePath,
        anchor: &Anchor,
        text: &str,
    ) -> BarebonesResult<Outcome> {
        let full = path.resolve(&self.root);
        let content = self.filesystem.read_to_string(&full)?;

        let updated = anchor.splice(&content, text).map_err(|miss| match miss {
            AnchorMiss::NotFound => ApplicationError::AnchorNotFound {
                path: full.clone(),
                anchor: anchor.pattern().to_string(),
            },
            AnchorMiss::Ambiguous { matches } => ApplicationError::AnchorAmbiguous {
                path: full.clone(),
                anchor: anchor.pattern().to_string(),
                matches,
            },
        })?;

        self.filesystem.write_atomic(&full, &updated)?;
        debug!(path = %path, %anchor, "Injected text");
        Ok(Outcome::Injected { path: path.clone() })
    }

    /// Insert `text` immediately before the unique match of `pattern`.
    pub fn inject_before(
        &self,
        path: &RelativePath,
        pattern: Pattern,
        text: &str,
    ) -> BarebonesResult<Outcome> {
        let anchor = Anchor::try_new(pattern, Position::Before)?;
        self.inject(path, &anchor, text)
    }

    /// Insert `text` immediately after the unique match of `pattern`.
    pub fn inject_after(
        &self,
        path: &RelativePath,
        pattern: Pattern,
        text: &str,
    ) -> BarebonesResult<Outcome> {
        let anchor = Anchor::try_new(pattern, Position::After)?;
        self.inject(path, &anchor, text)
    }

    /// Replace every non-overlapping match of `pattern` in the file.
    ///
    /// Zero matches is not an error; the file is then left unwritten.
    pub fn replace_all(
        &self,
        path: &RelativePath,
        pattern: &Pattern,
        replacement: &str,
    ) -> BarebonesResult<Outcome> {
        let full = path.resolve(&self.root);
        let content = self.filesystem.read_to_string(&full)?;
        let (updated, count) = pattern.replace_all(&content, replacement);

        if count == 0 {
            debug!(path = %path, %pattern, "No matches");
        } else if updated != content {
            self.filesystem.write_atomic(&full, &updated)?;
            debug!(path = %path, %pattern, count, "Replaced matches");
        }

        Ok(Outcome::Replaced {
            path: path.clone(),
            count,
        })
    }

    /// Run a shell command from the project root.
    ///
    /// Output goes straight to the terminal; a non-zero exit is `CommandFailed`.
    #[instrument(skip(self))]
    pub fn run(&self, command: &str) -> BarebonesResult<Outcome> {
        let status = self.runner.run(command, &self.root)?;
        if status.success() {
            Ok(Outcome::CommandSucceeded {
                command: command.to_string(),
            })
        } else {
            warn!(command, code = ?status.code, "Command exited unsuccessfully");
            Err(ApplicationError::CommandFailed {
                command: command.to_string(),
                status: status.code,
            }
            .into())
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("root", &self.root).finish_non_exhaustive()
    }
}
