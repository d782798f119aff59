use crate::domain::{
    entities::{anchor::Pattern, common::RelativePath, plan::ScaffoldPlan},
    error::DomainError,
};

/// Centralized domain validation.
///
/// Input arriving from outside the crate (CLI arguments, config files) goes
/// through here before it reaches the engine.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_plan(plan: &ScaffoldPlan) -> Result<(), DomainError> {
        plan.validate()
    }

    pub fn target_path(raw: &str) -> Result<RelativePath, DomainError> {
        RelativePath::try_new(raw)
    }

    /// Literal unless `regex` is set.
    pub fn pattern(raw: &str, regex: bool) -> Result<Pattern, DomainError> {
        if regex {
            Pattern::regex(raw)
        } else {
            Ok(Pattern::literal(raw))
        }
    }
}
