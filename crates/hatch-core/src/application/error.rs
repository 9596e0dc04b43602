//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DirEntry;
use crate::error::ErrorCategory;

/// Errors that occur while running the scaffolding pipeline.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The target directory holds entries that could be overwritten.
    #[error("The directory {name} contains files that could conflict")]
    DirectoryConflict {
        name: String,
        conflicts: Vec<DirEntry>,
    },

    /// The template's file tree or fragment is missing.
    #[error("Could not locate supplied template: {id}")]
    TemplateNotFound { id: String, path: PathBuf },

    /// The installer exited non-zero or could not be spawned.
    #[error("{command} has failed")]
    InstallFailed {
        command: String,
        detail: Option<String>,
    },

    /// Prompts cannot be rendered (non-interactive terminal or aborted input).
    #[error("Prompt couldn't be rendered in the current environment: {reason}")]
    PromptUnavailable { reason: String },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Working directory could not be read or changed.
    #[error("Cannot change working directory to {path}: {reason}")]
    WorkingDirectory { path: PathBuf, reason: String },

    /// Store access failed (lock poisoned, etc.).
    #[error("Template store error")]
    StoreLockError,
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DirectoryConflict { conflicts, .. } => {
                let mut out: Vec<String> = conflicts.iter().map(|c| format!("  {c}")).collect();
                out.push(
                    "Either try using a new directory name, or remove the files listed above."
                        .into(),
                );
                out
            }
            Self::TemplateNotFound { path, .. } => vec![
                format!("Looked in: {}", path.display()),
                "Run 'hatch list' to see available templates".into(),
                "Set templates.local_path in your config to use your own templates".into(),
            ],
            Self::InstallFailed { command, detail } => {
                let mut out = vec![format!("  {command} has failed.")];
                if let Some(detail) = detail {
                    out.push(format!("  {detail}"));
                }
                out.push("Check the installer output above for details".into());
                out.push("Ensure the installer is on your PATH".into());
                out
            }
            Self::PromptUnavailable { .. } => vec![
                "Run hatch from an interactive terminal".into(),
                "Or pass --template and --view to skip the prompts".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::WorkingDirectory { path, .. } => vec![
                format!("Check that {} exists and is accessible", path.display()),
            ],
            Self::StoreLockError => vec![
                "The template store is locked".into(),
                "Try again in a moment".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DirectoryConflict { .. } => ErrorCategory::Validation,
            Self::TemplateNotFound { .. } => ErrorCategory::NotFound,
            Self::InstallFailed { .. } | Self::PromptUnavailable { .. } => {
                ErrorCategory::External
            }
            Self::FilesystemError { .. }
            | Self::WorkingDirectory { .. }
            | Self::StoreLockError => ErrorCategory::Internal,
        }
    }
}
