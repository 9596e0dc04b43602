//! Application layer for Hatch.
//!
//! This layer contains:
//! - **Services**: the pipeline components and the `Orchestrator` that runs them
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    Abort, DEFAULT_BASE_PACKAGES, DirectoryGuard, FileTransformer, Orchestrator,
    OrchestratorOptions, RollbackReport, RunOutcome, Selections, TemplateMaterializer,
    TemplateService,
};

// Re-export port traits (for adapter implementation)
pub use ports::{
    Filesystem, Installer, NoopObserver, PipelineObserver, Prompter, TemplateStore,
    WorkingDirectory,
};

pub use error::ApplicationError;
