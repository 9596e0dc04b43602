//! `hatch <project-directory>`: generate a Twitch extension project.
//!
//! Responsibility: turn CLI arguments and config into adapters plus
//! [`Selections`], run the orchestrator, and report the outcome.  The
//! pipeline itself lives in `hatch-core`.

use std::path::Path;

use tracing::{info, instrument};

use hatch_adapters::{FilesystemTemplateStore, LocalFilesystem, NpmInstaller, ProcessWorkingDir};
use hatch_core::{
    application::{Orchestrator, OrchestratorOptions, RunOutcome, Selections},
    domain::{TemplateId, view::ordered_unique},
};

use crate::{
    cli::CreateArgs,
    config::AppConfig,
    error::{CliError, CliResult},
    output::{ConsoleObserver, OutputManager, report_rollback},
    prompts,
};

/// Execute the default action.
///
/// Anything not preset on the command line is prompted for.  On failure
/// the orchestrator has already rolled back by the time this returns.
#[instrument(skip_all)]
pub fn execute(
    args: CreateArgs,
    target: &Path,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let selections = selections(&args)?;
    let program = args
        .installer
        .clone()
        .unwrap_or_else(|| config.installer.program.clone());
    let templates_root = config.templates_root();
    info!(
        target = %target.display(),
        templates = %templates_root.display(),
        installer = %program,
        "Starting generation"
    );

    let orchestrator = Orchestrator::new(
        Box::new(LocalFilesystem::new()),
        Box::new(FilesystemTemplateStore::new(templates_root)),
        Box::new(NpmInstaller::new(program)),
        prompts::prompter(),
        Box::new(ProcessWorkingDir),
    )
    .with_observer(Box::new(ConsoleObserver::new(output.clone())))
    .with_options(OrchestratorOptions {
        base_packages: config.installer.base_packages.clone(),
    });

    match orchestrator.run(target, selections) {
        RunOutcome::Success(path) => {
            display_complete_message(&output, &path)?;
            Ok(())
        }
        RunOutcome::Aborted(abort) => {
            if let Some(report) = &abort.rollback {
                report_rollback(&output, report)?;
            }
            Err(CliError::Core(abort.reason))
        }
    }
}

/// Presets from the command line.  An empty `--view` list means "prompt".
fn selections(args: &CreateArgs) -> CliResult<Selections> {
    let template = args
        .template
        .as_deref()
        .map(TemplateId::parse)
        .transpose()
        .map_err(|e| CliError::Core(e.into()))?;
    let views = (!args.views.is_empty()).then(|| ordered_unique(args.views.iter().copied()));
    Ok(Selections { template, views })
}

fn display_complete_message(output: &OutputManager, path: &Path) -> CliResult<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    output.blank()?;
    output.success(&format!("Success! Created {name} at {}", path.display()))?;
    output.print("Inside that directory, you can run several commands:")?;
    output.blank()?;
    output.print(&format!("  {}", output.cyan("npm start")))?;
    output.print("    Starts the development server.")?;
    output.blank()?;
    output.print(&format!("  {}", output.cyan("npm run build")))?;
    output.print("    Builds extension for production.")?;
    output.blank()?;
    output.print(&output.green("  To get started, begin by typing:"))?;
    output.print(&format!("    {} {name}", output.cyan("cd")))?;
    output.print(&format!("    {}", output.cyan("npm start")))?;
    Ok(())
}
