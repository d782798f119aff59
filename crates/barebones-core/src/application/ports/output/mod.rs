//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the engine needs from external systems.
//! The `barebones-adapters` crate provides implementations.

use std::path::Path;

use crate::domain::RenderContext;
use crate::error::BarebonesResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `barebones_adapters::filesystem::LocalFilesystem` (production)
/// - `barebones_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths handed to the port are already resolved against the project root.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Read a whole text file. Missing files map to `FileNotFound`.
    fn read_to_string(&self, path: &Path) -> BarebonesResult<String>;

    /// Replace the file's content so readers see either the old or the new
    /// bytes, never a partial write. The parent directory must exist.
    fn write_atomic(&self, path: &Path, content: &str) -> BarebonesResult<()>;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> BarebonesResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// Port for template storage and retrieval.
///
/// Implemented by:
/// - `barebones_adapters::template_store::InMemoryStore` (built-in templates)
/// - `barebones_adapters::template_store::DirectoryStore` (user templates on disk)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateStore: Send + Sync {
    /// Raw text of the named template. Unknown names map to `TemplateNotFound`.
    fn get(&self, name: &str) -> BarebonesResult<String>;

    /// All template names, sorted.
    fn names(&self) -> BarebonesResult<Vec<String>>;
}

/// Port for template rendering.
///
/// Implemented by:
/// - `barebones_adapters::renderer::PlaceholderRenderer` (`{{name}}` substitution)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRenderer: Send + Sync {
    /// Substitute every placeholder in `source` (the raw text of `name`).
    fn render(&self, name: &str, source: &str, context: &RenderContext) -> BarebonesResult<String>;
}

/// Exit status of an external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl CommandStatus {
    pub const fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub const fn success(&self) -> bool {
        matches!(self.code, Some(0))
    }
}

/// Port for running external commands.
///
/// Implemented by:
/// - `barebones_adapters::command::ShellRunner` (`sh -c`)
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion with `cwd` as working directory.
    ///
    /// A non-zero status is returned as `Ok`; only failure to start the
    /// process is an error.
    fn run(&self, command: &str, cwd: &Path) -> BarebonesResult<CommandStatus>;
}
