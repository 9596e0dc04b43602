//! Prompt adapters that never touch a terminal.

use hatch_core::{
    application::{ApplicationError, ports::Prompter},
    domain::{TemplateDescriptor, TemplateId, ViewDefinition, ViewId},
    error::HatchResult,
};

/// Fails every selection with `PromptUnavailable`.
///
/// Used when stdin is not a terminal or the binary is built without the
/// `interactive` feature; callers must then pass every answer up front.
#[derive(Debug, Clone)]
pub struct NonInteractivePrompter {
    reason: String,
}

impl NonInteractivePrompter {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn unavailable(&self) -> ApplicationError {
        ApplicationError::PromptUnavailable {
            reason: self.reason.clone(),
        }
    }
}

impl Default for NonInteractivePrompter {
    fn default() -> Self {
        Self::new("no interactive terminal")
    }
}

impl Prompter for NonInteractivePrompter {
    fn select_template(&self, _choices: &[TemplateDescriptor]) -> HatchResult<TemplateId> {
        Err(self.unavailable().into())
    }

    fn select_views(&self, _choices: &[&'static ViewDefinition]) -> HatchResult<Vec<ViewId>> {
        Err(self.unavailable().into())
    }
}
