//! Application layer for Barebones.
//!
//! This layer contains:
//! - **Services**: the `Engine` (the five file operations) and the
//!   `ScaffoldService` that runs ordered plans through it
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! Text manipulation itself lives in `crate::domain`; this layer reads,
//! writes and runs.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{Engine, PlannedOperation, ReportEntry, RunReport, ScaffoldService};

// Re-export port traits (for adapter implementation)
pub use ports::{CommandRunner, CommandStatus, Filesystem, TemplateRenderer, TemplateStore};

pub use error::ApplicationError;
