//! Template Materializer - copies a template tree and merges its manifest
//! fragment into the generated `package.json`.

use std::path::Path;

use tracing::{debug, info, instrument};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateStore},
    },
    domain::{GeneratedManifest, TemplateId, TemplateSource, manifest::MANIFEST_FILE},
    error::HatchResult,
};

pub struct TemplateMaterializer<'a> {
    store: &'a dyn TemplateStore,
    filesystem: &'a dyn Filesystem,
}

impl<'a> TemplateMaterializer<'a> {
    pub fn new(store: &'a dyn TemplateStore, filesystem: &'a dyn Filesystem) -> Self {
        Self { store, filesystem }
    }

    /// Copy every file and directory of the template's tree into `app_path`.
    ///
    /// # Errors
    ///
    /// `TemplateNotFound` if the template or its tree is missing; nothing is
    /// written in that case. A copy that fails midway is left for the
    /// caller's rollback.
    #[instrument(skip(self), fields(app = %app_path.display(), template = %template_id))]
    pub fn materialize(&self, app_path: &Path, template_id: &TemplateId) -> HatchResult<()> {
        let source = self.resolve(template_id)?;
        self.filesystem.copy_tree(&source.files_dir, app_path)?;
        info!(from = %source.files_dir.display(), "Template files copied");
        Ok(())
    }

    /// Replace the manifest's merged sections with the template's fragment.
    ///
    /// The manifest is re-read from disk rather than trusted from an earlier
    /// step, then rewritten in place.
    ///
    /// # Errors
    ///
    /// `TemplateNotFound` before the manifest is read if the template is
    /// missing; `InvalidManifest` if `package.json` is not a JSON object.
    #[instrument(skip(self), fields(app = %app_path.display(), template = %template_id))]
    pub fn merge_manifest(&self, app_path: &Path, template_id: &TemplateId) -> HatchResult<()> {
        let source = self.resolve(template_id)?;
        let manifest_path = app_path.join(MANIFEST_FILE);

        let raw = self.filesystem.read_to_string(&manifest_path)?;
        let mut manifest = GeneratedManifest::parse(&raw)?;
        manifest.apply_fragment(&source.fragment);
        self.filesystem
            .write(&manifest_path, manifest.to_json().as_bytes())?;

        debug!(path = %manifest_path.display(), "Manifest merged");
        Ok(())
    }

    /// Resolve through the store and double-check the tree is really there.
    pub fn resolve(&self, template_id: &TemplateId) -> HatchResult<TemplateSource> {
        let source = self.store.resolve(template_id)?;
        if !self.filesystem.is_dir(&source.files_dir) {
            return Err(ApplicationError::TemplateNotFound {
                id: template_id.to_string(),
                path: source.files_dir,
            }
            .into());
        }
        Ok(source)
    }
}
