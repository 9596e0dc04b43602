//! Error handling for the Hatch CLI.
//!
//! Core errors already carry suggestions; this layer adds the failures that
//! only the binary can hit (config files, terminal I/O, usage) and renders
//! everything for the terminal.

use std::{
    error::Error,
    path::{Path, PathBuf},
};

use owo_colors::OwoColorize;
use thiserror::Error;

use hatch_core::error::{ErrorCategory as CoreCategory, HatchError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Every way a `hatch` invocation can fail.
#[derive(Debug, Error)]
pub enum CliError {
    /// An error propagated from `hatch-core`, already rolled back.
    #[error("{0}")]
    Core(#[from] HatchError),

    /// A configuration file could not be read, parsed, or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        /// The file that was being read or written, when there is one.
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn Error + Send + Sync>>,
    },

    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// The invocation itself makes no sense (no directory, or a directory
    /// combined with a subcommand).
    #[error("{message}")]
    Usage { message: String },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// A config file at `path` could not be loaded.
    pub fn config(path: &Path, err: anyhow::Error) -> Self {
        CliError::ConfigError {
            message: format!("{err:#}"),
            path: Some(path.to_path_buf()),
            source: Some(err.into()),
        }
    }

    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Core(core_err) => core_err.suggestions(),

            Self::ConfigError { path, .. } => vec![
                format!(
                    "Check your config file at {}",
                    path.clone()
                        .unwrap_or_else(crate::config::AppConfig::config_path)
                        .display()
                ),
                "Use 'hatch init --force' to recreate a default config".into(),
                "HATCH_* environment variables override the file".into(),
            ],

            Self::IoError { .. } => vec![
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Usage { .. } => vec![
                "For example:".into(),
                "  hatch my-twitch-extension".into(),
                "Run 'hatch --help' to see all options.".into(),
            ],
        }
    }

    /// Get the error category for styling and logging.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Core(core) => match core.category() {
                CoreCategory::Validation => ErrorCategory::UserError,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::External => ErrorCategory::External,
                CoreCategory::Configuration => ErrorCategory::Configuration,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError { .. } => ErrorCategory::Internal,
            Self::Usage { .. } => ErrorCategory::UserError,
        }
    }

    /// Exit code to pass to the OS.  Every failure exits 1; clap's own
    /// argument errors (exit 2) never reach this type.
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            for cause in self.chain() {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    cause.to_string().dimmed()
                ));
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], no ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {self}\n"));

        if verbose {
            for cause in self.chain() {
                out.push_str(&format!("  Caused by: {cause}\n"));
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::UserError => tracing::warn!("User error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::External => tracing::error!("External command failed: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        for cause in self.chain() {
            tracing::debug!("Caused by: {}", cause);
        }
    }

    /// Sources below the top-level message.  Core errors are transparent,
    /// so the first source would repeat the message and is skipped.
    fn chain(&self) -> impl Iterator<Item = &(dyn Error + 'static)> {
        let first = match self {
            Self::Core(inner) => inner.source(),
            _ => self.source(),
        };
        std::iter::successors(first, |&err| err.source())
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// User input error (validation, invalid arguments).
    UserError,
    /// Resource not found.
    NotFound,
    /// The installer or the terminal failed.
    External,
    /// Configuration error.
    Configuration,
    /// Internal/system error.
    Internal,
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
///
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}
