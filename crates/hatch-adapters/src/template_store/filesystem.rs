//! Filesystem-backed template store.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! └── template-plain/
//!     ├── template.json        ← manifest fragment (required)
//!     └── template/            ← copied verbatim into the project
//!         ├── webpack.common.ejs
//!         ├── gitignore
//!         └── src/
//!             └── index.js
//! ```
//!
//! # `template.json` format
//!
//! ```json
//! {
//!   "name": "Vanilla JavaScript",
//!   "description": "Plain JS views bundled with webpack",
//!   "package": {
//!     "scripts": { "build": "webpack --config webpack.prod.js" },
//!     "devDependencies": { "webpack": "^5.0.0" },
//!     "dependencies": ["jquery"]
//!   }
//! }
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, instrument, warn};

use hatch_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{TemplateDescriptor, TemplateFragment, TemplateId, TemplateSource},
    error::{HatchError, HatchResult},
};

/// Fragment file next to each template's tree.
pub const FRAGMENT_FILE: &str = "template.json";

/// Subdirectory holding the files copied into the project.
pub const TREE_DIR: &str = "template";

/// Reads templates from `<root>/<id>/`.
#[derive(Debug, Clone)]
pub struct FilesystemTemplateStore {
    root: PathBuf,
}

impl FilesystemTemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn not_found(id: &TemplateId, path: PathBuf) -> HatchError {
        ApplicationError::TemplateNotFound {
            id: id.to_string(),
            path,
        }
        .into()
    }
}

impl TemplateStore for FilesystemTemplateStore {
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn resolve(&self, id: &TemplateId) -> HatchResult<TemplateSource> {
        let dir = self.root.join(id.as_str());
        if !dir.is_dir() {
            return Err(Self::not_found(id, dir));
        }

        let files_dir = dir.join(TREE_DIR);
        if !files_dir.is_dir() {
            return Err(Self::not_found(id, files_dir));
        }

        let fragment_path = dir.join(FRAGMENT_FILE);
        let raw = fs::read_to_string(&fragment_path)
            .map_err(|_| Self::not_found(id, fragment_path.clone()))?;
        let fragment = TemplateFragment::from_json(&raw)?;

        debug!(files = %files_dir.display(), "Template resolved");
        Ok(TemplateSource {
            id: id.clone(),
            files_dir,
            fragment,
        })
    }

    /// Every subdirectory that resolves cleanly. Broken templates are
    /// skipped with a warning so one bad directory does not hide the rest.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    fn list(&self) -> HatchResult<Vec<TemplateDescriptor>> {
        let entries = fs::read_dir(&self.root).map_err(|e| HatchError::Configuration {
            message: format!(
                "cannot read templates directory {}: {e}",
                self.root.display()
            ),
        })?;

        let mut descriptors = Vec::new();
        for entry in entries.flatten() {
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let resolved = TemplateId::parse(name.as_str())
                .map_err(HatchError::from)
                .and_then(|id| self.resolve(&id));
            match resolved {
                Ok(source) => descriptors.push(source.descriptor()),
                Err(e) => warn!(template = %name, error = %e, "Skipping invalid template"),
            }
        }

        descriptors.sort_by(|a, b| a.id.cmp(&b.id));
        debug!(count = descriptors.len(), "Finished listing templates");
        Ok(descriptors)
    }
}
