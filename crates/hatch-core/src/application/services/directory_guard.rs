//! Directory Guard - decides whether a target directory may be generated into.

use std::path::Path;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::ports::Filesystem,
    domain::{GuardReport, directory},
    error::HatchResult,
};

/// Validates a target directory before anything is written into it.
pub struct DirectoryGuard<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> DirectoryGuard<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Inspect `root`, which must already exist.
    ///
    /// Entries on the allow-list are ignored. Stale `npm-debug.log*` files
    /// are never conflicts, and they are deleted only when the directory is
    /// safe. Any other entry makes the directory unsafe and nothing is
    /// touched.
    ///
    /// # Errors
    ///
    /// Fails if `root` cannot be listed. A failed log deletion is logged and
    /// ignored.
    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn validate(&self, root: &Path, display_name: &str) -> HatchResult<GuardReport> {
        let entries = self.filesystem.read_dir(root)?;
        let (conflicts, logs) = directory::classify(&entries);

        if !conflicts.is_empty() {
            info!(
                name = display_name,
                conflicts = conflicts.len(),
                "Target directory has conflicting entries"
            );
            return Ok(GuardReport::Unsafe { conflicts });
        }

        for log in logs {
            let path = root.join(&log.name);
            debug!(path = %path.display(), "Removing stale error log");
            if let Err(e) = self.filesystem.remove(&path) {
                warn!(path = %path.display(), error = %e, "Could not remove stale error log");
            }
        }

        Ok(GuardReport::Safe)
    }
}
