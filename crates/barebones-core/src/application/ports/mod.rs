//! Application ports (traits) for external dependencies.
//!
//! Ports define what the engine needs from the outside world. Adapters in
//! `barebones-adapters` implement them.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: called by the engine, implemented by infrastructure
//!   - `Filesystem`: file reads and atomic writes
//!   - `TemplateStore`: raw template text by name
//!   - `TemplateRenderer`: placeholder substitution
//!   - `CommandRunner`: external process execution
//!
//! - **Driving (Input) Ports**: the `Engine` and `ScaffoldService` themselves,
//!   called by the CLI

pub mod output;

pub use output::{CommandRunner, CommandStatus, Filesystem, TemplateRenderer, TemplateStore};

#[cfg(test)]
pub use output::{MockCommandRunner, MockFilesystem, MockTemplateRenderer, MockTemplateStore};
