//! Application layer errors.
//!
//! These errors represent failures while applying operations to the outside
//! world (template store, file system, processes). Pure rule violations are
//! `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::{BarebonesError, ErrorCategory};

/// Errors that occur while executing engine operations.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The template store has no template under this name.
    #[error("Template not found: {name}")]
    TemplateNotFound { name: String },

    /// The file an operation reads does not exist.
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The anchor does not occur in the target file.
    #[error("Anchor {anchor} not found in {path}")]
    AnchorNotFound { path: PathBuf, anchor: String },

    /// The anchor occurs more than once and the caller required a unique match.
    #[error("Anchor {anchor} matches {matches} locations in {path}")]
    AnchorAmbiguous {
        path: PathBuf,
        anchor: String,
        matches: usize,
    },

    /// External command exited unsuccessfully (`None` when killed by a signal).
    #[error("Command `{command}` failed{}", .status.map(|c| format!(" with exit status {c}")).unwrap_or_default())]
    CommandFailed {
        command: String,
        status: Option<i32>,
    },

    /// External command could not be started at all.
    #[error("Command `{command}` could not be started: {reason}")]
    CommandUnavailable { command: String, reason: String },

    /// Access to a path was denied by the operating system.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Any other filesystem failure.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// The project root does not exist or is not a directory.
    #[error("Project root {path} is not a directory")]
    ProjectRootMissing { path: PathBuf },

    /// Shared adapter state was poisoned.
    #[error("Adapter state lock poisoned")]
    StoreLockError,

    /// A plan step failed; carries the underlying failure.
    #[error("Step '{step}' failed: {source}")]
    StepFailed {
        step: String,
        #[source]
        source: Box<BarebonesError>,
    },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { name } => vec![
                format!("No template named '{name}'"),
                "Check the --templates directory or the templates.local_path setting".into(),
            ],
            Self::FileNotFound { path } => vec![
                format!("Expected file: {}", path.display()),
                "Run against a freshly generated project skeleton".into(),
            ],
            Self::AnchorNotFound { path, .. } => vec![
                format!("The anchor text is missing from {}", path.display()),
                "The file may have been edited, or a previous step did not run".into(),
            ],
            Self::AnchorAmbiguous { .. } => vec![
                "Use a longer, more specific anchor".into(),
                "Or pick a match explicitly with --first / --last".into(),
            ],
            Self::CommandFailed { command, .. } => vec![
                format!("Command failed: {command}"),
                "Check the command output above for details".into(),
            ],
            Self::CommandUnavailable { .. } => vec![
                "Ensure a POSIX shell is available in your PATH".into(),
            ],
            Self::PermissionDenied { path } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check available disk space and permissions".into(),
            ],
            Self::ProjectRootMissing { path } => vec![
                format!("Create the project first, then run barebones in {}", path.display()),
            ],
            Self::StepFailed { source, .. } => source.suggestions(),
            Self::StoreLockError => vec!["Check the error details above".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. }
            | Self::FileNotFound { .. }
            | Self::AnchorNotFound { .. }
            | Self::ProjectRootMissing { .. } => ErrorCategory::NotFound,
            Self::AnchorAmbiguous { .. } => ErrorCategory::Validation,
            Self::CommandFailed { .. } | Self::CommandUnavailable { .. } => ErrorCategory::Command,
            Self::PermissionDenied { .. } | Self::FilesystemError { .. } | Self::StoreLockError => {
                ErrorCategory::Internal
            }
            Self::StepFailed { source, .. } => source.category(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_failed_message_includes_status() {
        let e = ApplicationError::CommandFailed {
            command: "cp a b".into(),
            status: Some(1),
        };
        assert_eq!(e.to_string(), "Command `cp a b` failed with exit status 1");
    }

    #[test]
    fn command_failed_without_status() {
        let e = ApplicationError::CommandFailed {
            command: "cp a b".into(),
            status: None,
        };
        assert_eq!(e.to_string(), "Command `cp a b` failed");
    }

    #[test]
    fn step_failed_inherits_category() {
        let inner: BarebonesError = ApplicationError::FileNotFound {
            path: "Gemfile".into(),
        }
        .into();
        let e = ApplicationError::StepFailed {
            step: "gemfile".into(),
            source: Box::new(inner),
        };
        assert_eq!(e.category(), ErrorCategory::NotFound);
    }
}
