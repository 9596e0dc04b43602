//! Working-directory adapters.

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use tracing::debug;

use hatch_core::{
    application::{ApplicationError, ports::WorkingDirectory},
    error::HatchResult,
};

/// The real process working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessWorkingDir;

impl WorkingDirectory for ProcessWorkingDir {
    fn current(&self) -> HatchResult<PathBuf> {
        std::env::current_dir().map_err(|e| {
            ApplicationError::WorkingDirectory {
                path: PathBuf::from("."),
                reason: e.to_string(),
            }
            .into()
        })
    }

    fn change_to(&self, path: &Path) -> HatchResult<()> {
        debug!(path = %path.display(), "chdir");
        std::env::set_current_dir(path).map_err(|e| {
            ApplicationError::WorkingDirectory {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
            .into()
        })
    }
}

/// Working directory held in memory, with a history of every change.
#[derive(Debug, Clone)]
pub struct MemoryWorkingDir {
    inner: Arc<Mutex<(PathBuf, Vec<PathBuf>)>>,
}

impl MemoryWorkingDir {
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self {
            inner: Arc::new(Mutex::new((start.into(), Vec::new()))),
        }
    }

    /// Every directory changed to, in order.
    pub fn history(&self) -> Vec<PathBuf> {
        self.inner
            .lock()
            .map(|inner| inner.1.clone())
            .unwrap_or_default()
    }
}

impl WorkingDirectory for MemoryWorkingDir {
    fn current(&self) -> HatchResult<PathBuf> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?;
        Ok(inner.0.clone())
    }

    fn change_to(&self, path: &Path) -> HatchResult<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.0 = path.to_path_buf();
        inner.1.push(path.to_path_buf());
        Ok(())
    }
}
