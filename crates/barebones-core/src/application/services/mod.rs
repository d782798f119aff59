//! Application services.
//!
//! The engine applies single operations; the scaffold service runs a whole
//! plan through the engine in order.

pub mod engine;
pub mod scaffold_service;

#[cfg(test)]
mod testing;

pub use engine::Engine;
pub use scaffold_service::{PlannedOperation, ReportEntry, RunReport, ScaffoldService};
