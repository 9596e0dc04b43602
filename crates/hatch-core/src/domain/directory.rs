//! Rules about what may already live in a target directory, and what the
//! pipeline is allowed to delete from it.

use std::fmt;

use serde::Serialize;

/// Entries that may exist before generation without counting as conflicts:
/// VCS metadata, editor droppings, and documentation.
pub const ALLOWED_ENTRIES: &[&str] = &[
    ".DS_Store",
    ".git",
    ".gitattributes",
    ".gitignore",
    ".gitlab-ci.yml",
    ".hg",
    ".hgcheck",
    ".hgignore",
    ".idea",
    ".npmignore",
    ".travis.yml",
    "docs",
    "LICENSE",
    "README.md",
    "mkdocs.yml",
    "Thumbs.db",
];

/// Prefixes of logs left behind by a failed install.
pub const ERROR_LOG_PREFIXES: &[&str] = &["npm-debug.log"];

/// Artifacts rollback may delete: the manifest, the installer lockfile, and
/// the dependency cache.
pub const KNOWN_GENERATED: &[&str] = &["package.json", "package-lock.json", "node_modules"];

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// Directories render with a trailing `/`.
impl fmt::Display for DirEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dir {
            write!(f, "{}/", self.name)
        } else {
            f.write_str(&self.name)
        }
    }
}

pub fn is_allowed(name: &str) -> bool {
    ALLOWED_ENTRIES.contains(&name)
}

pub fn is_error_log(name: &str) -> bool {
    ERROR_LOG_PREFIXES.iter().any(|p| name.starts_with(p))
}

pub fn is_known_generated(name: &str) -> bool {
    KNOWN_GENERATED.contains(&name)
}

/// Result of inspecting a target directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardReport {
    Safe,
    Unsafe { conflicts: Vec<DirEntry> },
}

impl GuardReport {
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe)
    }

    pub fn conflicts(&self) -> &[DirEntry] {
        match self {
            Self::Safe => &[],
            Self::Unsafe { conflicts } => conflicts,
        }
    }
}

/// Partition a listing into conflicts and stale logs.
///
/// Order of both lists follows the listing.
pub fn classify(entries: &[DirEntry]) -> (Vec<DirEntry>, Vec<DirEntry>) {
    let mut conflicts = Vec::new();
    let mut logs = Vec::new();
    for entry in entries {
        if is_error_log(&entry.name) {
            logs.push(entry.clone());
        } else if !is_allowed(&entry.name) {
            conflicts.push(entry.clone());
        }
    }
    (conflicts, logs)
}
