use std::fmt;

use serde::Serialize;

use crate::domain::entities::common::RelativePath;

/// Result of one successful engine operation.
///
/// `SkippedExisting` is not an error: it records that a non-forced write
/// left an existing file alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    Created { path: RelativePath },
    Overwritten { path: RelativePath },
    SkippedExisting { path: RelativePath },
    DirectoryCreated { path: RelativePath },
    DirectoryKept { path: RelativePath, marker_created: bool },
    Injected { path: RelativePath },
    Replaced { path: RelativePath, count: usize },
    CommandSucceeded { command: String },
    CommandFailedTolerated { command: String, status: Option<i32> },
}

impl Outcome {
    /// Short verb for report columns.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Created { .. } => "create",
            Self::Overwritten { .. } => "force",
            Self::SkippedExisting { .. } => "skip",
            Self::DirectoryCreated { .. } => "mkdir",
            Self::DirectoryKept { .. } => "keep",
            Self::Injected { .. } => "inject",
            Self::Replaced { .. } => "gsub",
            Self::CommandSucceeded { .. } => "run",
            Self::CommandFailedTolerated { .. } => "failed",
        }
    }

    /// `true` if the operation changed something on disk.
    pub fn is_change(&self) -> bool {
        match self {
            Self::SkippedExisting { .. } => false,
            Self::Replaced { count, .. } => *count > 0,
            Self::DirectoryKept { marker_created, .. } => *marker_created,
            Self::CommandFailedTolerated { .. } => false,
            _ => true,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = self.label();
        match self {
            Self::Created { path }
            | Self::Overwritten { path }
            | Self::SkippedExisting { path }
            | Self::DirectoryCreated { path }
            | Self::DirectoryKept { path, .. }
            | Self::Injected { path } => write!(f, "{label:>7}  {path}"),
            Self::Replaced { path, count } => write!(f, "{label:>7}  {path} ({count} match(es))"),
            Self::CommandSucceeded { command } => write!(f, "{label:>7}  {command}"),
            Self::CommandFailedTolerated { command, status } => match status {
                Some(code) => write!(f, "{label:>7}  {command} (exit {code})"),
                None => write!(f, "{label:>7}  {command} (terminated)"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skipped_is_not_a_change() {
        let o = Outcome::SkippedExisting {
            path: RelativePath::new("README.md"),
        };
        assert!(!o.is_change());
        assert_eq!(o.label(), "skip");
    }

    #[test]
    fn zero_replacements_is_not_a_change() {
        let o = Outcome::Replaced {
            path: RelativePath::new("Gemfile"),
            count: 0,
        };
        assert!(!o.is_change());
    }

    #[test]
    fn display_aligns_label() {
        let o = Outcome::Created {
            path: RelativePath::new("Procfile"),
        };
        assert_eq!(o.to_string(), " create  Procfile");
    }

    #[test]
    fn serializes_with_tag() {
        let o = Outcome::Replaced {
            path: RelativePath::new("Gemfile"),
            count: 3,
        };
        let v = serde_json::to_value(&o).unwrap();
        assert_eq!(v["outcome"], "replaced");
        assert_eq!(v["count"], 3);
    }
}
