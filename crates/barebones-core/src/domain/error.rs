// ============================================================================
// domain/error.rs - DOMAIN RULE VIOLATIONS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (reports keep a copy of the failure)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Rendering
    // ========================================================================
    #[error("template '{template}' references '{{{{{key}}}}}' which is not in the render context")]
    MissingContextKey { template: String, key: String },

    // ========================================================================
    // Paths and patterns
    // ========================================================================
    #[error("invalid target path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("anchor cannot be empty")]
    EmptyAnchor,

    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    // ========================================================================
    // Plan ordering
    // ========================================================================
    #[error("step '{name}' appears more than once in the plan")]
    DuplicateStep { name: String },

    #[error("step '{step}' requires '{requires}', which is not part of the plan")]
    UnknownPrerequisite { step: String, requires: String },

    #[error("step '{step}' must run after '{requires}', but is ordered before it")]
    OrderViolation { step: String, requires: String },

    #[error("cannot skip '{requires}': step '{step}' depends on it")]
    SkippedPrerequisite { step: String, requires: String },

    #[error("no step named '{name}'")]
    UnknownStep { name: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MissingContextKey { key, .. } => vec![
                format!("Provide a value for '{key}'"),
                "Use --var KEY=VALUE to add variables to the render context".into(),
            ],
            Self::InvalidPath { .. } => vec![
                "Target paths must be relative to the project root".into(),
                "Remove leading '/' and any '..' components".into(),
            ],
            Self::InvalidPattern { .. } => vec![
                "Check the regular expression syntax".into(),
                "Drop --regex to match the pattern literally".into(),
            ],
            Self::OrderViolation { step, requires } => vec![
                format!("Move '{requires}' before '{step}' in the plan"),
            ],
            Self::SkippedPrerequisite { step, requires } => vec![
                format!("Skip '{step}' as well, or keep '{requires}'"),
            ],
            Self::UnknownStep { .. } => vec!["List the available steps: barebones steps".into()],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingContextKey { .. }
            | Self::InvalidPath { .. }
            | Self::EmptyAnchor
            | Self::InvalidPattern { .. } => ErrorCategory::Validation,
            Self::DuplicateStep { .. }
            | Self::UnknownPrerequisite { .. }
            | Self::OrderViolation { .. }
            | Self::SkippedPrerequisite { .. } => ErrorCategory::Ordering,
            Self::UnknownStep { .. } => ErrorCategory::NotFound,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Ordering,
    NotFound,
}
