//! Local filesystem adapter using std::fs.

use std::{
    fs::{self, OpenOptions},
    io::{self, Write},
    path::Path,
};

use tracing::{debug, instrument};
use walkdir::WalkDir;

use hatch_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::DirEntry,
    error::{HatchError, HatchResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> HatchResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn exists(&self, path: &Path) -> bool {
        // A dangling symlink still occupies the name.
        fs::symlink_metadata(path).is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_dir(&self, path: &Path) -> HatchResult<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path).map_err(|e| map_io_error(path, e, "list directory"))? {
            let entry = entry.map_err(|e| map_io_error(path, e, "list directory"))?;
            let is_dir = entry
                .file_type()
                .map(|t| t.is_dir())
                .map_err(|e| map_io_error(&entry.path(), e, "inspect entry"))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            entries.push(DirEntry { name, is_dir });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &Path) -> HatchResult<Vec<u8>> {
        fs::read(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write(&self, path: &Path, content: &[u8]) -> HatchResult<()> {
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn append(&self, path: &Path, content: &[u8]) -> HatchResult<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(path)
            .map_err(|e| map_io_error(path, e, "open file for append"))?;
        file.write_all(content)
            .map_err(|e| map_io_error(path, e, "append to file"))
    }

    fn rename(&self, from: &Path, to: &Path) -> HatchResult<()> {
        if self.exists(to) {
            return Err(ApplicationError::FilesystemError {
                path: to.to_path_buf(),
                reason: "Destination already exists".into(),
            }
            .into());
        }
        fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }

    fn remove_file(&self, path: &Path) -> HatchResult<()> {
        fs::remove_file(path).map_err(|e| map_io_error(path, e, "remove file"))
    }

    fn remove_dir_all(&self, path: &Path) -> HatchResult<()> {
        fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    #[instrument(skip(self), fields(from = %from.display(), to = %to.display()))]
    fn copy_tree(&self, from: &Path, to: &Path) -> HatchResult<()> {
        let mut copied = 0usize;
        for entry in WalkDir::new(from).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(from).to_path_buf();
                HatchError::from(ApplicationError::FilesystemError {
                    path,
                    reason: format!("Failed to walk template: {e}"),
                })
            })?;

            let relative = entry.path().strip_prefix(from).map_err(|e| HatchError::Internal {
                message: format!("walked outside of {}: {e}", from.display()),
            })?;
            let dest = to.join(relative);

            if entry.file_type().is_dir() {
                self.create_dir_all(&dest)?;
            } else {
                if let Some(parent) = dest.parent() {
                    self.create_dir_all(parent)?;
                }
                fs::copy(entry.path(), &dest).map_err(|e| map_io_error(&dest, e, "copy file"))?;
                copied += 1;
            }
        }
        debug!(files = copied, "Copied template tree");
        Ok(())
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> HatchError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}
