//! Core domain layer for Hatch.
//!
//! Pure rules and value types with no I/O: naming policy, the directory
//! allow-list, the manifest merge, the view table, and the pipeline states.
//! Everything that touches the outside world goes through the ports in
//! `crate::application::ports`.

pub mod directory;
pub mod error;
pub mod manifest;
pub mod name;
pub mod pipeline;
pub mod render;
pub mod template;
pub mod view;

pub use directory::{DirEntry, GuardReport};
pub use error::{DomainError, ErrorCategory};
pub use manifest::GeneratedManifest;
pub use name::ProjectName;
pub use pipeline::{PipelineState, ProjectRequest};
pub use render::RenderContext;
pub use template::{
    DependencySpec, TemplateDescriptor, TemplateFragment, TemplateId, TemplateSource,
};
pub use view::{ViewDefinition, ViewId};
