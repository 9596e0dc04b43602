//! Infrastructure adapters for Hatch.
//!
//! This crate implements the ports defined in `hatch_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod installer;
pub mod prompt;
pub mod template_store;
pub mod workdir;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use installer::NpmInstaller;
pub use prompt::NonInteractivePrompter;
pub use template_store::{FilesystemTemplateStore, InMemoryStore};
pub use workdir::{MemoryWorkingDir, ProcessWorkingDir};
