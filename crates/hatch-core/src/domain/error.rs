// ============================================================================
// domain/error.rs - DOMAIN RULE VIOLATIONS
// ============================================================================

use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (carried inside `RunOutcome`)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors
    // ========================================================================
    /// The project name breaks one or more npm naming rules.
    ///
    /// Every violated rule is listed, not just the first one found.
    #[error("cannot create a project named \"{name}\" because of npm naming restrictions")]
    NameInvalid { name: String, reasons: Vec<String> },

    #[error("unknown view '{view}'")]
    UnknownView { view: String },

    #[error("invalid template id '{id}': {reason}")]
    InvalidTemplateId { id: String, reason: String },

    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    // ========================================================================
    // Not Found Errors
    // ========================================================================
    #[error("no template with id '{id}'")]
    UnknownTemplate { id: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NameInvalid { reasons, .. } => {
                let mut out: Vec<String> = reasons.iter().map(|r| format!("  * {r}")).collect();
                out.push("Please choose a different project name.".into());
                out
            }
            Self::UnknownView { view } => vec![
                format!("'{view}' is not a known extension view"),
                "Available views: overlay, component, panel, mobile, live_config".into(),
                "The config view is always generated and cannot be selected".into(),
            ],
            Self::InvalidTemplateId { reason, .. } => vec![
                format!("Template ids are directory names: {reason}"),
                "Run 'hatch list' to see available templates".into(),
            ],
            Self::InvalidManifest(msg) => vec![
                format!("package.json could not be processed: {msg}"),
                "Check that the file is valid JSON with an object at the top level".into(),
            ],
            Self::UnknownTemplate { id } => vec![
                format!("No template named '{id}'"),
                "Run 'hatch list' to see available templates".into(),
            ],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NameInvalid { .. }
            | Self::UnknownView { .. }
            | Self::InvalidTemplateId { .. } => ErrorCategory::Validation,
            Self::UnknownTemplate { .. } => ErrorCategory::NotFound,
            Self::InvalidManifest(_) => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
