//! Barebones Core - scaffolding engine
//!
//! This crate provides the domain and application layers for the Barebones
//! project customizer: a small file-generation engine plus an ordered plan
//! runner, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          barebones-cli (CLI)            │
//! │       (Drives the application)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │       (ScaffoldService, Engine)         │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │       Application Ports (Traits)        │
//! │  (Filesystem, Store, Render, Command)   │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    barebones-adapters (Infrastructure)  │
//! │ (LocalFilesystem, ShellRunner, recipe)  │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │  (RenderContext, Anchor, ScaffoldPlan)  │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use barebones_core::prelude::*;
//!
//! # fn adapters() -> (Box<dyn TemplateStore>, Box<dyn TemplateRenderer>, Box<dyn Filesystem>, Box<dyn CommandRunner>) { unimplemented!() }
//! let (store, renderer, filesystem, runner) = adapters();
//! let engine = Engine::new("./demo", store, renderer, filesystem, runner);
//! let service = ScaffoldService::new(engine, RenderContext::for_app("demo"));
//!
//! let plan = ScaffoldPlan::new()
//!     .with_step(Step::new("app").keep("app/services"));
//! let report = service.run(&plan)?;
//! println!("{} change(s)", report.changes());
//! # Ok::<(), BarebonesError>(())
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Engine, PlannedOperation, ReportEntry, RunReport, ScaffoldService,
        ports::{CommandRunner, CommandStatus, Filesystem, TemplateRenderer, TemplateStore},
    };
    pub use crate::domain::{
        Anchor, Occurrence, Operation, Outcome, Pattern, Position, RelativePath, RenderContext,
        ScaffoldPlan, Snippet, Step, WriteOptions,
    };
    pub use crate::error::{BarebonesError, BarebonesResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
