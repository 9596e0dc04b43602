//! `{{VARIABLE}}` substitution for staged config templates.

use std::collections::HashMap;

use super::ProjectName;

/// Variable map for textual substitution.
///
/// Standard variables are the contract between hatch and its templates:
/// `{{PROJECT_NAME}}` and `{{HTML_VIEWS}}` are always defined once the
/// transform step builds a context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    variables: HashMap<String, String>,
}

impl RenderContext {
    pub fn new(project_name: &ProjectName) -> Self {
        let mut variables = HashMap::new();
        variables.insert("PROJECT_NAME".to_string(), project_name.to_string());
        Self { variables }
    }

    /// Add a variable, consuming self.
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    /// Replace every `{{KEY}}` with its value in one left-to-right pass.
    ///
    /// Unknown placeholders stay as they are. Substituted values are never
    /// scanned again.
    pub fn render(&self, template: &str) -> String {
        let mut result = String::with_capacity(template.len());
        let mut rest = template;
        while let Some(open) = rest.find("{{") {
            result.push_str(&rest[..open]);
            let after = &rest[open + 2..];
            let Some(close) = after.find("}}") else {
                rest = &rest[open..];
                break;
            };
            match self.variables.get(&after[..close]) {
                Some(value) => result.push_str(value),
                None => result.push_str(&rest[open..open + 2 + close + 2]),
            }
            rest = &after[close + 2..];
        }
        result.push_str(rest);
        result
    }
}
