//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `hatch-adapters` crate provides implementations.

use std::path::{Path, PathBuf};

use crate::application::ApplicationError;
use crate::domain::{
    DirEntry, PipelineState, TemplateDescriptor, TemplateId, TemplateSource, ViewDefinition,
    ViewId,
};
use crate::error::{HatchError, HatchResult};

/// Port for filesystem operations.
///
/// Implemented by:
/// - `hatch_adapters::filesystem::LocalFilesystem` (production)
/// - `hatch_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Listings never follow symlinks and are sorted by name, so callers observe
/// the same order on every platform.
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> HatchResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// List the immediate entries of a directory.
    fn read_dir(&self, path: &Path) -> HatchResult<Vec<DirEntry>>;

    /// Read a whole file.
    fn read(&self, path: &Path) -> HatchResult<Vec<u8>>;

    /// Create or truncate a file.
    fn write(&self, path: &Path, content: &[u8]) -> HatchResult<()>;

    /// Append to the end of an existing file.
    fn append(&self, path: &Path, content: &[u8]) -> HatchResult<()>;

    /// Move a file. Fails if `to` already exists.
    fn rename(&self, from: &Path, to: &Path) -> HatchResult<()>;

    fn remove_file(&self, path: &Path) -> HatchResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> HatchResult<()>;

    /// Recursively copy the contents of `from` into `to`, creating
    /// directories as needed and overwriting files that already exist.
    fn copy_tree(&self, from: &Path, to: &Path) -> HatchResult<()>;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> HatchResult<String> {
        let bytes = self.read(path)?;
        String::from_utf8(bytes).map_err(|e| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: format!("not valid UTF-8: {e}"),
            }
            .into()
        })
    }

    /// Remove a file or a directory tree.
    fn remove(&self, path: &Path) -> HatchResult<()> {
        if self.is_dir(path) {
            self.remove_dir_all(path)
        } else {
            self.remove_file(path)
        }
    }
}

/// Port for template lookup.
///
/// Implemented by:
/// - `hatch_adapters::template_store::FilesystemTemplateStore` (templates on disk)
/// - `hatch_adapters::template_store::InMemoryStore` (testing)
pub trait TemplateStore: Send + Sync {
    /// Resolve a template id to its file tree and manifest fragment.
    ///
    /// Fails with `ApplicationError::TemplateNotFound` when the template is absent.
    fn resolve(&self, id: &TemplateId) -> HatchResult<TemplateSource>;

    /// List all available templates, sorted by id.
    fn list(&self) -> HatchResult<Vec<TemplateDescriptor>>;
}

/// Port for the external package installer.
///
/// Implemented by `hatch_adapters::installer::NpmInstaller`.
pub trait Installer: Send + Sync {
    /// Install `packages` into `target_dir`, saving exact versions.
    ///
    /// An empty list syncs installed state to the manifest. Only a zero exit
    /// status is success; anything else is `ApplicationError::InstallFailed`
    /// carrying the command line.
    fn install(&self, target_dir: &Path, packages: &[String]) -> HatchResult<()>;
}

/// Port for the two interactive selections.
///
/// Both calls block until the user answers. Implementations must re-prompt
/// on empty or invalid answers and fail with
/// `ApplicationError::PromptUnavailable` when no terminal is available.
pub trait Prompter {
    fn select_template(&self, choices: &[TemplateDescriptor]) -> HatchResult<TemplateId>;

    /// Returns at least one view.
    fn select_views(&self, choices: &[&'static ViewDefinition]) -> HatchResult<Vec<ViewId>>;
}

/// Port for the process-wide working directory.
///
/// Implemented by:
/// - `hatch_adapters::workdir::ProcessWorkingDir` (production)
/// - `hatch_adapters::workdir::MemoryWorkingDir` (testing)
pub trait WorkingDirectory: Send + Sync {
    fn current(&self) -> HatchResult<PathBuf>;

    fn change_to(&self, path: &Path) -> HatchResult<()>;
}

/// Progress notifications for user-facing output.
///
/// Every method has a no-op default; the pipeline also logs each event
/// through `tracing`.
pub trait PipelineObserver {
    fn state_entered(&self, _state: PipelineState) {}

    /// The directory passed the guard and generation is starting.
    fn creating(&self, _target: &Path) {}

    fn installing(&self, _packages: &[String]) {}

    /// A failure after the directory was guarded; rollback follows.
    fn aborting(&self, _state: PipelineState, _reason: &HatchError) {}

    /// A known generated artifact is being deleted during rollback.
    fn removing_generated(&self, _name: &str) {}

    /// The now-empty target directory is being deleted during rollback.
    fn removing_target(&self, _name: &str, _parent: &Path) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}
