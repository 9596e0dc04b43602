//! Unified error handling for Hatch Core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with rich context and user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for Hatch Core operations.
#[derive(Debug, Error, Clone)]
pub enum HatchError {
    /// Errors from the domain layer (naming rules, unknown views, bad manifests).
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Errors from the application layer (pipeline failures).
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl HatchError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {message}"),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "Unexpected error. Please report it as a bug:".into(),
                "https://github.com/cosecruz/hatch/issues".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::NotFound => ErrorCategory::NotFound,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// The failed command line, for errors caused by an external process.
    pub fn command(&self) -> Option<&str> {
        match self {
            Self::Application(ApplicationError::InstallFailed { command, .. }) => Some(command),
            _ => None,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    /// An external collaborator (installer, terminal) failed.
    External,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type HatchResult<T> = Result<T, HatchError>;
