//! In-memory filesystem adapter for testing.

use std::{
    collections::{BTreeMap, BTreeSet, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use hatch_core::{
    application::{ApplicationError, ports::Filesystem},
    domain::DirEntry,
    error::HatchResult,
};

/// In-memory filesystem for testing.
///
/// Clones share the same tree, so a test can keep a handle while the
/// orchestrator owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, Vec<u8>>,
    directories: BTreeSet<PathBuf>,
    /// Paths whose mutation fails, for exercising error paths.
    failing: HashSet<PathBuf>,
}

impl MemoryFilesystemInner {
    fn ensure_dirs(&mut self, path: &Path) {
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            self.directories.insert(current.clone());
        }
    }

    fn check(&self, path: &Path, operation: &str) -> HatchResult<()> {
        if self.failing.contains(path) {
            return Err(fs_error(path, format!("Injected failure on {operation}")));
        }
        Ok(())
    }
}

impl MemoryFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a file and any missing parents (testing helper).
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl AsRef<[u8]>) {
        let path = path.as_ref();
        if let Ok(mut inner) = self.inner.write() {
            if let Some(parent) = path.parent() {
                inner.ensure_dirs(parent);
            }
            inner
                .files
                .insert(path.to_path_buf(), content.as_ref().to_vec());
        }
    }

    /// Create a directory and any missing parents (testing helper).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.ensure_dirs(path.as_ref());
        }
    }

    /// Make every later mutation of `path` fail.
    pub fn fail_on(&self, path: impl AsRef<Path>) {
        if let Ok(mut inner) = self.inner.write() {
            inner.failing.insert(path.as_ref().to_path_buf());
        }
    }

    /// Read a file's content as UTF-8 (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        let inner = self.inner.read().ok()?;
        let bytes = inner.files.get(path.as_ref())?;
        String::from_utf8(bytes.clone()).ok()
    }

    /// List all files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.inner
            .read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn read_lock(&self) -> HatchResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }

    fn write_lock(&self) -> HatchResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        Ok(self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?)
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> HatchResult<()> {
        let mut inner = self.write_lock()?;
        inner.check(path, "create directory")?;
        if inner.files.contains_key(path) {
            return Err(fs_error(path, "A file exists at this path"));
        }
        inner.ensure_dirs(path);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner
            .read()
            .map(|inner| inner.directories.contains(path))
            .unwrap_or(false)
    }

    fn read_dir(&self, path: &Path) -> HatchResult<Vec<DirEntry>> {
        let inner = self.read_lock()?;
        if !inner.directories.contains(path) {
            return Err(fs_error(path, "Not a directory"));
        }

        let child_name = |p: &PathBuf| {
            (p.parent() == Some(path))
                .then(|| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .flatten()
        };

        let mut entries: Vec<DirEntry> = inner
            .directories
            .iter()
            .filter_map(|p| child_name(p).map(DirEntry::dir))
            .chain(
                inner
                    .files
                    .keys()
                    .filter_map(|p| child_name(p).map(DirEntry::file)),
            )
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &Path) -> HatchResult<Vec<u8>> {
        let inner = self.read_lock()?;
        inner
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| fs_error(path, "No such file"))
    }

    fn write(&self, path: &Path, content: &[u8]) -> HatchResult<()> {
        let mut inner = self.write_lock()?;
        inner.check(path, "write")?;

        let orphaned = path
            .parent()
            .is_some_and(|p| !p.as_os_str().is_empty() && !inner.directories.contains(p));
        if orphaned {
            return Err(fs_error(path, "Parent directory does not exist"));
        }
        if inner.directories.contains(path) {
            return Err(fs_error(path, "Is a directory"));
        }

        inner.files.insert(path.to_path_buf(), content.to_vec());
        Ok(())
    }

    fn append(&self, path: &Path, content: &[u8]) -> HatchResult<()> {
        let mut inner = self.write_lock()?;
        inner.check(path, "append")?;
        let file = inner
            .files
            .get_mut(path)
            .ok_or_else(|| fs_error(path, "No such file"))?;
        file.extend_from_slice(content);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> HatchResult<()> {
        let mut inner = self.write_lock()?;
        inner.check(from, "rename")?;
        if inner.files.contains_key(to) || inner.directories.contains(to) {
            return Err(fs_error(to, "Destination already exists"));
        }
        let data = inner
            .files
            .remove(from)
            .ok_or_else(|| fs_error(from, "No such file"))?;
        inner.files.insert(to.to_path_buf(), data);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> HatchResult<()> {
        let mut inner = self.write_lock()?;
        inner.check(path, "remove file")?;
        inner
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| fs_error(path, "No such file"))
    }

    fn remove_dir_all(&self, path: &Path) -> HatchResult<()> {
        let mut inner = self.write_lock()?;
        inner.check(path, "remove directory")?;
        if !inner.directories.contains(path) {
            return Err(fs_error(path, "No such directory"));
        }
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn copy_tree(&self, from: &Path, to: &Path) -> HatchResult<()> {
        let mut inner = self.write_lock()?;
        if !inner.directories.contains(from) {
            return Err(fs_error(from, "Failed to walk template: no such directory"));
        }
        inner.ensure_dirs(to);

        let dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter_map(|p| p.strip_prefix(from).ok())
            .filter(|rel| !rel.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect();
        for rel in dirs {
            inner.ensure_dirs(&to.join(rel));
        }

        let files: Vec<(PathBuf, Vec<u8>)> = inner
            .files
            .iter()
            .filter_map(|(p, data)| {
                p.strip_prefix(from)
                    .ok()
                    .map(|rel| (to.join(rel), data.clone()))
            })
            .collect();
        for (dest, data) in files {
            inner.check(&dest, "copy file")?;
            inner.files.insert(dest, data);
        }
        Ok(())
    }
}

fn fs_error(path: &Path, reason: impl Into<String>) -> hatch_core::error::HatchError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
    .into()
}
