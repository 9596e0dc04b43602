//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `hatch-adapters` (and the
//! prompt adapter in `hatch-cli`) implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `TemplateStore`: Template lookup
//!   - `Installer`: External package installer
//!   - `Prompter`: Interactive template/view selection
//!   - `WorkingDirectory`: The process working directory
//!   - `PipelineObserver`: Progress notifications
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    Filesystem, Installer, NoopObserver, PipelineObserver, Prompter, TemplateStore,
    WorkingDirectory,
};
