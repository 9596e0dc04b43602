//! Application services - orchestrate use cases.
//!
//! Each pipeline component is its own service borrowing the ports it
//! needs; the `Orchestrator` owns the ports and sequences the others.

pub mod directory_guard;
pub mod materializer;
pub mod orchestrator;
pub mod template_service;
pub mod transform;

pub use directory_guard::DirectoryGuard;
pub use materializer::TemplateMaterializer;
pub use orchestrator::{
    Abort, DEFAULT_BASE_PACKAGES, Orchestrator, OrchestratorOptions, RollbackReport, RunOutcome,
    Selections,
};
pub use template_service::TemplateService;
pub use transform::FileTransformer;
