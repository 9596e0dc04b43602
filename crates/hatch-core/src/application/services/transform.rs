//! File Transform Step - post-copy rewrites of the materialized tree.

use std::path::Path;

use tracing::{debug, instrument};

use crate::{
    application::ports::Filesystem,
    domain::{ProjectName, RenderContext, ViewId, view::DEFAULT_VIEWS},
    error::HatchResult,
};

/// Config template staged by the materializer.
pub const CONFIG_TEMPLATE: &str = "webpack.common.ejs";

/// Final name of the rendered config.
pub const CONFIG_OUTPUT: &str = "webpack.common.js";

/// Ignore file as shipped in templates (npm strips dot-files from packages).
pub const IGNORE_TEMPLATE: &str = "gitignore";

pub const IGNORE_OUTPUT: &str = ".gitignore";

/// Separator between rendered view fragments.
const FRAGMENT_SEPARATOR: &str = ",\n    ";

pub struct FileTransformer<'a> {
    filesystem: &'a dyn Filesystem,
}

impl<'a> FileTransformer<'a> {
    pub fn new(filesystem: &'a dyn Filesystem) -> Self {
        Self { filesystem }
    }

    /// Render [`CONFIG_TEMPLATE`] in place.
    ///
    /// The selected views resolve to fragments in the given order, followed
    /// by the default views whatever the selection was. The joined list
    /// replaces `{{HTML_VIEWS}}`. A template that ships no config is left
    /// alone.
    #[instrument(skip(self, name), fields(app = %app_path.display()))]
    pub fn render(&self, app_path: &Path, name: &ProjectName, views: &[ViewId]) -> HatchResult<()> {
        let path = app_path.join(CONFIG_TEMPLATE);
        if !self.filesystem.exists(&path) {
            debug!("No config template staged, skipping render");
            return Ok(());
        }
        let source = self.filesystem.read_to_string(&path)?;

        let fragments: Vec<String> = views
            .iter()
            .chain(DEFAULT_VIEWS)
            .map(|v| v.fragment())
            .collect();

        let rendered = RenderContext::new(name)
            .with_variable("HTML_VIEWS", fragments.join(FRAGMENT_SEPARATOR))
            .render(&source);

        self.filesystem.write(&path, rendered.as_bytes())?;
        debug!(views = fragments.len(), "Config template rendered");
        Ok(())
    }

    /// Move `old_name` to `new_name` inside `app_path`.
    ///
    /// If `new_name` already exists, `old_name`'s bytes are appended to the
    /// end of it and `old_name` is removed, so successive generation steps
    /// can accumulate ignore rules. A missing `old_name` is a no-op.
    #[instrument(skip(self), fields(app = %app_path.display()))]
    pub fn rename(&self, app_path: &Path, old_name: &str, new_name: &str) -> HatchResult<()> {
        let from = app_path.join(old_name);
        let to = app_path.join(new_name);

        if !self.filesystem.exists(&from) {
            debug!("Nothing to rename");
            return Ok(());
        }

        if self.filesystem.exists(&to) {
            let data = self.filesystem.read(&from)?;
            self.filesystem.append(&to, &data)?;
            self.filesystem.remove_file(&from)?;
            debug!("Appended to existing file");
        } else {
            self.filesystem.rename(&from, &to)?;
            debug!("Renamed");
        }
        Ok(())
    }
}
