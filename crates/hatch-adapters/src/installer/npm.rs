//! npm-compatible installer invoked as an external process.

use std::{
    path::Path,
    process::{Command, Stdio},
};

use tracing::{debug, instrument, warn};

use hatch_core::{
    application::{ApplicationError, ports::Installer},
    error::HatchResult,
};

pub const DEFAULT_PROGRAM: &str = "npm";

const INSTALL_FLAGS: &[&str] = &["install", "--save", "--save-exact", "--loglevel", "error"];

/// Runs `<program> install --save --save-exact --loglevel error <pkg>...`.
///
/// Output goes straight to the user's terminal. Only the exit status is
/// inspected; there is no timeout and no retry.
#[derive(Debug, Clone)]
pub struct NpmInstaller {
    program: String,
}

impl NpmInstaller {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Full argument vector, program first.
    pub fn command_line(&self, packages: &[String]) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(INSTALL_FLAGS.iter().map(|s| s.to_string()))
            .chain(packages.iter().cloned())
            .collect()
    }
}

impl Default for NpmInstaller {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl Installer for NpmInstaller {
    #[instrument(skip(self), fields(program = %self.program, dir = %target_dir.display()))]
    fn install(&self, target_dir: &Path, packages: &[String]) -> HatchResult<()> {
        let command = self.command_line(packages).join(" ");
        debug!(%command, "Spawning installer");

        let status = Command::new(&self.program)
            .args(INSTALL_FLAGS)
            .args(packages)
            .current_dir(target_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| {
                warn!(%command, error = %e, "Installer could not be started");
                ApplicationError::InstallFailed {
                    command: command.clone(),
                    detail: Some(format!("failed to start {}: {e}", self.program)),
                }
            })?;

        if status.success() {
            debug!("Installer finished");
            return Ok(());
        }

        warn!(%command, code = ?status.code(), "Installer exited with failure");
        Err(ApplicationError::InstallFailed {
            command,
            detail: status.code().map(|c| format!("exit code {c}")),
        }
        .into())
    }
}
