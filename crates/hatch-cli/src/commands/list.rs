//! Implementation of the `hatch list` command.

use serde::Serialize;

use hatch_adapters::FilesystemTemplateStore;
use hatch_core::{
    application::TemplateService,
    domain::{TemplateDescriptor, ViewDefinition, ViewId},
};

use crate::{
    cli::{ListArgs, ListFormat},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Machine-readable listing.
#[derive(Debug, Serialize)]
struct Listing<'a> {
    templates: &'a [TemplateDescriptor],
    views: Vec<ViewEntry>,
}

#[derive(Debug, Serialize)]
struct ViewEntry {
    id: &'static str,
    label: &'static str,
    filename: &'static str,
    additional: bool,
}

impl From<&ViewDefinition> for ViewEntry {
    fn from(def: &ViewDefinition) -> Self {
        Self {
            id: def.id.as_str(),
            label: def.label,
            filename: def.filename,
            additional: def.additional,
        }
    }
}

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let store = FilesystemTemplateStore::new(config.templates_root());
    let templates = TemplateService::new(Box::new(store)).list()?;

    match args.format {
        ListFormat::Table => {
            output.header("Available Templates:")?;
            if templates.is_empty() {
                output.warning("No templates found")?;
            }
            for t in &templates {
                let description = if t.description.is_empty() {
                    String::new()
                } else {
                    format!(" - {}", t.description)
                };
                output.print(&format!(
                    "  {:<20} {}{description}",
                    output.cyan(t.id.as_str()),
                    t.name
                ))?;
            }

            output.blank()?;
            output.header("Views:")?;
            for view in ViewId::selectable() {
                output.print(&format!("  {:<12} {}", view.id.as_str(), view.label))?;
            }
            output.print(&format!(
                "  {:<12} always included",
                ViewId::Config.as_str()
            ))?;
        }

        ListFormat::List => {
            // Bypasses quiet mode: this format exists for scripts.
            for t in &templates {
                println!("{}", t.id);
            }
        }

        ListFormat::Json => {
            let listing = Listing {
                templates: &templates,
                views: ViewId::selectable().map(ViewEntry::from).collect(),
            };
            let json = serde_json::to_string_pretty(&listing).map_err(|e| CliError::IoError {
                message: "Failed to serialise template listing".into(),
                source: e.into(),
            })?;
            println!("{json}");
        }
    }

    Ok(())
}
