//! Core domain layer for Barebones.
//!
//! Pure text and plan logic: rendering, anchor splicing, pattern
//! substitution and step ordering. No I/O happens here; the engine in
//! `crate::application` applies these results to the file system through
//! ports.
//!
//! - **No async**: domain logic is synchronous
//! - **No I/O**: no filesystem or process calls
//! - **Few crates**: std plus `regex` (patterns), `heck` (name casing),
//!   `serde` (reports) and `thiserror`
pub mod entities;
pub mod error;

mod validation;

// Re-exports for convenience
pub use entities::{
    anchor::{Anchor, AnchorMiss, LineEnding, Occurrence, Pattern, Position},
    common::{RelativePath, WriteOptions},
    context::RenderContext,
    outcome::Outcome,
    plan::{Operation, ScaffoldPlan, Step},
    snippet::{Snippet, spaces},
};

pub use error::{DomainError, ErrorCategory};
pub use validation::DomainValidator;
