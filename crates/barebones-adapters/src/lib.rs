//! Infrastructure adapters for Barebones.
//!
//! This crate implements the ports defined in `barebones_core::application::ports`
//! and ships the built-in Rails recipe with its templates.
//! It contains all external dependencies and I/O operations.

pub mod builtin_templates;
pub mod command;
pub mod filesystem;
pub mod recipe;
pub mod renderer;
pub mod template_store;

// Re-export commonly used adapters
pub use command::ShellRunner;
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use recipe::{JobBackend, Recipe, RecipeOptions};
pub use renderer::PlaceholderRenderer;
pub use template_store::{DirectoryStore, InMemoryStore};
