//! In-memory template store.

use std::{
    collections::BTreeMap,
    path::PathBuf,
    sync::{Arc, RwLock},
};

use hatch_core::{
    application::{ApplicationError, ports::TemplateStore},
    domain::{TemplateDescriptor, TemplateId, TemplateSource},
    error::HatchResult,
};

/// Thread-safe in-memory template store.
///
/// The file trees themselves live wherever `files_dir` points, typically a
/// `MemoryFilesystem` in tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<BTreeMap<TemplateId, TemplateSource>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a template.
    pub fn insert(&self, source: TemplateSource) -> HatchResult<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| ApplicationError::StoreLockError)?;
        inner.insert(source.id.clone(), source);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|inner| inner.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TemplateStore for InMemoryStore {
    fn resolve(&self, id: &TemplateId) -> HatchResult<TemplateSource> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        inner.get(id).cloned().ok_or_else(|| {
            ApplicationError::TemplateNotFound {
                id: id.to_string(),
                path: PathBuf::from(id.as_str()),
            }
            .into()
        })
    }

    fn list(&self) -> HatchResult<Vec<TemplateDescriptor>> {
        let inner = self
            .inner
            .read()
            .map_err(|_| ApplicationError::StoreLockError)?;

        Ok(inner.values().map(TemplateSource::descriptor).collect())
    }
}
