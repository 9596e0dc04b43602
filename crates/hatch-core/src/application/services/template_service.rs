//! Template Service - read-only template queries.
//!
//! Backs `hatch list`.

use crate::{
    application::ports::TemplateStore,
    domain::TemplateDescriptor,
    error::HatchResult,
};

/// Service for template lookups.
pub struct TemplateService {
    store: Box<dyn TemplateStore>,
}

impl TemplateService {
    pub fn new(store: Box<dyn TemplateStore>) -> Self {
        Self { store }
    }

    /// List all templates, sorted by id.
    pub fn list(&self) -> HatchResult<Vec<TemplateDescriptor>> {
        self.store.list()
    }
}
