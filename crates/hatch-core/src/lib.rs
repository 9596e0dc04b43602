//! Hatch Core - Hexagonal Architecture Implementation
//!
//! Domain and application layers for the `hatch` Twitch-extension
//! scaffolder, following hexagonal (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │            hatch-cli (CLI)              │
//! │   (argument parsing, prompts, output)   │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (Orchestrator, Guard, Materializer,    │
//! │   FileTransformer, TemplateService)     │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Application Ports (Traits)       │
//! │ (Filesystem, TemplateStore, Installer,  │
//! │   Prompter, WorkingDirectory)           │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     hatch-adapters (Infrastructure)     │
//! │ (LocalFilesystem, NpmInstaller, etc.)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//! use hatch_core::application::{Orchestrator, RunOutcome, Selections};
//!
//! # fn adapters() -> Orchestrator { unimplemented!() }
//! let orchestrator: Orchestrator = adapters();
//! match orchestrator.run(Path::new("my-extension"), Selections::default()) {
//!     RunOutcome::Success(path) => println!("created {}", path.display()),
//!     RunOutcome::Aborted(abort) => eprintln!("{}", abort.reason),
//! }
//! ```

pub mod application;
pub mod domain;
pub mod error;

/// Public API - what external crates should use.
pub mod prelude {
    pub use crate::application::{
        Abort, ApplicationError, Orchestrator, OrchestratorOptions, RollbackReport, RunOutcome,
        Selections, TemplateService,
        ports::{
            Filesystem, Installer, NoopObserver, PipelineObserver, Prompter, TemplateStore,
            WorkingDirectory,
        },
    };
    pub use crate::domain::{
        DirEntry, DomainError, GeneratedManifest, GuardReport, PipelineState, ProjectName,
        ProjectRequest, TemplateDescriptor, TemplateFragment, TemplateId, TemplateSource,
        ViewDefinition, ViewId,
    };
    pub use crate::error::{ErrorCategory, HatchError, HatchResult};
}
