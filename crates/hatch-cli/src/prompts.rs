//! Terminal prompts for the template and view selections.

use hatch_core::application::ports::Prompter;

#[cfg(feature = "interactive")]
pub use interactive::TerminalPrompter;

/// The prompter for this build and terminal.
pub fn prompter() -> Box<dyn Prompter> {
    #[cfg(feature = "interactive")]
    {
        Box::new(TerminalPrompter::new())
    }
    #[cfg(not(feature = "interactive"))]
    {
        Box::new(hatch_adapters::NonInteractivePrompter::new(
            "hatch was built without the `interactive` feature",
        ))
    }
}

#[cfg(feature = "interactive")]
mod interactive {
    use console::Term;
    use dialoguer::{MultiSelect, Select, theme::ColorfulTheme};
    use tracing::debug;

    use hatch_core::{
        application::{ApplicationError, ports::Prompter},
        domain::{TemplateDescriptor, TemplateId, ViewDefinition, ViewId},
        error::{HatchError, HatchResult},
    };

    /// `dialoguer` prompts on stderr.
    pub struct TerminalPrompter {
        theme: ColorfulTheme,
        term: Term,
    }

    impl Default for TerminalPrompter {
        fn default() -> Self {
            Self::new()
        }
    }

    impl TerminalPrompter {
        pub fn new() -> Self {
            Self {
                theme: ColorfulTheme::default(),
                term: Term::stderr(),
            }
        }

        fn ensure_terminal(&self) -> HatchResult<()> {
            if self.term.is_term() {
                Ok(())
            } else {
                Err(unavailable("stdin/stderr is not an interactive terminal"))
            }
        }
    }

    impl Prompter for TerminalPrompter {
        fn select_template(&self, choices: &[TemplateDescriptor]) -> HatchResult<TemplateId> {
            self.ensure_terminal()?;
            if choices.is_empty() {
                return Err(HatchError::Configuration {
                    message: "no templates are installed".into(),
                });
            }

            let labels: Vec<String> = choices.iter().map(template_label).collect();
            let picked = Select::with_theme(&self.theme)
                .with_prompt("Select project type")
                .items(&labels)
                .default(0)
                .interact_on_opt(&self.term)
                .map_err(|e| unavailable(e.to_string()))?
                .ok_or_else(|| unavailable("template selection was abandoned"))?;

            debug!(template = %choices[picked].id, "Template selected");
            Ok(choices[picked].id.clone())
        }

        fn select_views(&self, choices: &[&'static ViewDefinition]) -> HatchResult<Vec<ViewId>> {
            self.ensure_terminal()?;
            let labels: Vec<String> = choices.iter().map(|d| view_label(d)).collect();

            loop {
                let picked = MultiSelect::with_theme(&self.theme)
                    .with_prompt("Select your extension type(s)")
                    .items(&labels)
                    .interact_on_opt(&self.term)
                    .map_err(|e| unavailable(e.to_string()))?
                    .ok_or_else(|| unavailable("view selection was abandoned"))?;

                if picked.is_empty() {
                    self.term
                        .write_line("You must choose at least one type.")
                        .map_err(|e| unavailable(e.to_string()))?;
                    continue;
                }

                let views: Vec<ViewId> = picked.into_iter().map(|i| choices[i].id).collect();
                debug!(views = ?views, "Views selected");
                return Ok(views);
            }
        }
    }

    fn template_label(descriptor: &TemplateDescriptor) -> String {
        if descriptor.description.is_empty() {
            descriptor.name.clone()
        } else {
            format!("{} ({})", descriptor.name, descriptor.description)
        }
    }

    fn view_label(definition: &ViewDefinition) -> String {
        if definition.additional {
            format!("{} [additional]", definition.label)
        } else {
            definition.label.to_string()
        }
    }

    fn unavailable(reason: impl Into<String>) -> HatchError {
        ApplicationError::PromptUnavailable {
            reason: reason.into(),
        }
        .into()
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn additional_views_are_marked() {
            let labels: Vec<String> = ViewId::selectable().map(view_label).collect();
            assert_eq!(labels[0], "Video Overlay");
            assert!(labels.last().unwrap().ends_with("[additional]"));
            assert!(!labels.iter().any(|l| l.starts_with("Configuration")));
        }

        #[test]
        fn template_label_includes_description() {
            let descriptor = TemplateDescriptor {
                id: TemplateId::parse("template-plain").unwrap(),
                name: "Vanilla JavaScript".into(),
                description: "webpack".into(),
            };
            assert_eq!(template_label(&descriptor), "Vanilla JavaScript (webpack)");
        }
    }
}
