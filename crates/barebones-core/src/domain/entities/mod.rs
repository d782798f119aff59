pub mod anchor;
pub mod common;
pub mod context;
pub mod outcome;
pub mod plan;
pub mod snippet;

pub use crate::domain::DomainError;
pub use anchor::Anchor;
pub use context::RenderContext;
pub use plan::{ScaffoldPlan, Step};
