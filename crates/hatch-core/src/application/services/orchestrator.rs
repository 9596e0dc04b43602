//! Orchestrator - drives the scaffolding state machine.
//!
//! The run is strictly sequential:
//!
//! ```text
//! Init → NameValidated → DirectoryGuarded → BaseInstalled → TemplateSelected
//!      → ViewsSelected → Materialized → TransformsApplied → DepsInstalled → Done
//! ```
//!
//! Any failure moves to `Aborted`. Failures once the directory has been
//! guarded trigger a best-effort rollback that leaves the target either
//! absent or as it was found.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, error, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{
            Filesystem, Installer, NoopObserver, PipelineObserver, Prompter, TemplateStore,
            WorkingDirectory,
        },
        services::{
            directory_guard::DirectoryGuard,
            materializer::TemplateMaterializer,
            transform::{
                CONFIG_OUTPUT, CONFIG_TEMPLATE, FileTransformer, IGNORE_OUTPUT, IGNORE_TEMPLATE,
            },
        },
    },
    domain::{
        GeneratedManifest, GuardReport, PipelineState, ProjectName, ProjectRequest, TemplateId,
        ViewId, directory::KNOWN_GENERATED, manifest::MANIFEST_FILE,
    },
    error::{HatchError, HatchResult},
};

/// Packages installed right after the initial manifest is written.
pub const DEFAULT_BASE_PACKAGES: &[&str] = &["jsonwebtoken"];

/// Tunables for a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorOptions {
    pub base_packages: Vec<String>,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            base_packages: DEFAULT_BASE_PACKAGES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Answers supplied up front. Anything left as `None` is prompted for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    pub template: Option<TemplateId>,
    pub views: Option<Vec<ViewId>>,
}

/// Terminal result of [`Orchestrator::run`].
#[derive(Debug)]
pub enum RunOutcome {
    /// The absolute path of the generated project.
    Success(PathBuf),
    Aborted(Abort),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn into_result(self) -> Result<PathBuf, Abort> {
        match self {
            Self::Success(path) => Ok(path),
            Self::Aborted(abort) => Err(abort),
        }
    }
}

/// Why and where a run stopped.
#[derive(Debug)]
pub struct Abort {
    /// The last state reached before the failure.
    pub state: PipelineState,
    pub reason: HatchError,
    /// `None` when the failure happened before anything was written.
    pub rollback: Option<RollbackReport>,
}

/// What a rollback managed to undo.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollbackReport {
    /// Known generated entries that were deleted, in deletion order.
    pub removed: Vec<String>,
    pub target_removed: bool,
    /// Steps that failed. Rollback carries on past them.
    pub failures: Vec<String>,
}

impl RollbackReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// True if this rollback changed nothing on disk.
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && !self.target_removed && self.failures.is_empty()
    }
}

/// Enters a directory and returns to the previous one when dropped.
struct WorkdirScope<'a> {
    workdir: &'a dyn WorkingDirectory,
    previous: PathBuf,
    restored: bool,
}

impl<'a> WorkdirScope<'a> {
    fn enter(workdir: &'a dyn WorkingDirectory, target: &Path) -> HatchResult<Self> {
        let previous = workdir.current()?;
        workdir.change_to(target)?;
        debug!(from = %previous.display(), to = %target.display(), "Entered working directory");
        Ok(Self {
            workdir,
            previous,
            restored: false,
        })
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        match self.workdir.change_to(&self.previous) {
            Ok(()) => debug!(to = %self.previous.display(), "Restored working directory"),
            Err(e) => warn!(
                to = %self.previous.display(),
                error = %e,
                "Failed to restore working directory"
            ),
        }
    }
}

impl Drop for WorkdirScope<'_> {
    fn drop(&mut self) {
        self.restore();
    }
}

/// Runs the whole scaffolding pipeline against injected ports.
pub struct Orchestrator {
    filesystem: Box<dyn Filesystem>,
    store: Box<dyn TemplateStore>,
    installer: Box<dyn Installer>,
    prompter: Box<dyn Prompter>,
    workdir: Box<dyn WorkingDirectory>,
    observer: Box<dyn PipelineObserver>,
    options: OrchestratorOptions,
}

impl Orchestrator {
    pub fn new(
        filesystem: Box<dyn Filesystem>,
        store: Box<dyn TemplateStore>,
        installer: Box<dyn Installer>,
        prompter: Box<dyn Prompter>,
        workdir: Box<dyn WorkingDirectory>,
    ) -> Self {
        Self {
            filesystem,
            store,
            installer,
            prompter,
            workdir,
            observer: Box::new(NoopObserver),
            options: OrchestratorOptions::default(),
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn PipelineObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: OrchestratorOptions) -> Self {
        self.options = options;
        self
    }

    /// Generate a project at `target`.
    ///
    /// A relative `target` is resolved against the current working
    /// directory. The outcome is terminal; on abort the working directory
    /// has been restored and rollback, if any, has already run.
    #[instrument(skip(self, selections), fields(target = %target.display()))]
    pub fn run(&self, target: &Path, selections: Selections) -> RunOutcome {
        let mut state = PipelineState::Init;
        let mut scope = None;

        let path = match self.resolve_target(target) {
            Ok(path) => path,
            Err(reason) => return self.abort(target, state, reason, &mut scope),
        };

        match self.drive(&path, selections, &mut state, &mut scope) {
            Ok(path) => {
                drop(scope);
                info!(path = %path.display(), "Project generated");
                RunOutcome::Success(path)
            }
            Err(reason) => self.abort(&path, state, reason, &mut scope),
        }
    }

    /// Undo whatever a failed run left at `app_path`.
    ///
    /// Deletes the known generated entries that are present, then removes
    /// the directory if nothing else is left in it. Safe to call more than
    /// once: a second call on an already rolled-back target changes nothing.
    #[instrument(skip(self), fields(app = %app_path.display()))]
    pub fn rollback(&self, app_path: &Path) -> RollbackReport {
        self.rollback_within(app_path, &mut None)
    }

    fn resolve_target(&self, target: &Path) -> HatchResult<PathBuf> {
        let joined = if target.is_absolute() {
            target.to_path_buf()
        } else {
            self.workdir.current()?.join(target)
        };
        Ok(normalize(&joined))
    }

    fn abort<'s>(
        &'s self,
        path: &Path,
        state: PipelineState,
        reason: HatchError,
        scope: &mut Option<WorkdirScope<'s>>,
    ) -> RunOutcome {
        error!(state = %state, error = %reason, "Pipeline aborted");
        let mut source = std::error::Error::source(&reason);
        while let Some(cause) = source {
            error!(cause = %cause, "Caused by");
            source = cause.source();
        }

        let rollback = if state.requires_rollback() {
            self.observer.aborting(state, &reason);
            warn!("Rolling back generated files");
            Some(self.rollback_within(path, scope))
        } else {
            None
        };
        if let Some(mut active) = scope.take() {
            active.restore();
        }
        self.observer.state_entered(PipelineState::Aborted);

        RunOutcome::Aborted(Abort {
            state,
            reason,
            rollback,
        })
    }

    fn drive<'s>(
        &'s self,
        target: &Path,
        selections: Selections,
        state: &mut PipelineState,
        scope: &mut Option<WorkdirScope<'s>>,
    ) -> HatchResult<PathBuf> {
        // Init → NameValidated
        let display_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let project_name = ProjectName::parse(display_name.as_str())?;
        self.advance(state, PipelineState::NameValidated);

        // → DirectoryGuarded
        self.filesystem.create_dir_all(target)?;
        let guard = DirectoryGuard::new(self.filesystem.as_ref());
        if let GuardReport::Unsafe { conflicts } = guard.validate(target, &display_name)? {
            return Err(ApplicationError::DirectoryConflict {
                name: display_name,
                conflicts,
            }
            .into());
        }
        self.advance(state, PipelineState::DirectoryGuarded);

        // → BaseInstalled
        self.observer.creating(target);
        info!(name = %project_name, "Creating a new Twitch extension");
        let manifest = GeneratedManifest::initial(&project_name);
        self.filesystem
            .write(&target.join(MANIFEST_FILE), manifest.to_json().as_bytes())?;
        *scope = Some(WorkdirScope::enter(self.workdir.as_ref(), target)?);
        self.install(target, &self.options.base_packages)?;
        self.advance(state, PipelineState::BaseInstalled);

        // → TemplateSelected
        let template_id = match selections.template {
            Some(id) => id,
            None => {
                let choices = self.store.list()?;
                self.prompter.select_template(&choices)?
            }
        };
        self.advance(state, PipelineState::TemplateSelected);

        // → ViewsSelected
        let views = match selections.views {
            Some(views) if !views.is_empty() => views,
            _ => {
                let choices: Vec<_> = ViewId::selectable().collect();
                self.prompter.select_views(&choices)?
            }
        };
        let request = ProjectRequest::new(target, project_name, template_id, views);
        debug!(
            template = %request.template_id(),
            views = ?request.selected_views(),
            "Project request assembled"
        );
        self.advance(state, PipelineState::ViewsSelected);

        // → Materialized
        let materializer = TemplateMaterializer::new(self.store.as_ref(), self.filesystem.as_ref());
        materializer.materialize(request.target_path(), request.template_id())?;
        materializer.merge_manifest(request.target_path(), request.template_id())?;
        self.advance(state, PipelineState::Materialized);

        // → TransformsApplied
        let transformer = FileTransformer::new(self.filesystem.as_ref());
        transformer.render(
            request.target_path(),
            request.project_name(),
            request.selected_views(),
        )?;
        transformer.rename(request.target_path(), CONFIG_TEMPLATE, CONFIG_OUTPUT)?;
        transformer.rename(request.target_path(), IGNORE_TEMPLATE, IGNORE_OUTPUT)?;
        self.advance(state, PipelineState::TransformsApplied);

        // → DepsInstalled
        let dependencies = materializer
            .resolve(request.template_id())?
            .fragment
            .install_args();
        if !dependencies.is_empty() {
            self.install(request.target_path(), &dependencies)?;
        }
        self.install(request.target_path(), &[])?;
        self.advance(state, PipelineState::DepsInstalled);

        self.advance(state, PipelineState::Done);
        Ok(request.target_path().to_path_buf())
    }

    fn install(&self, target: &Path, packages: &[String]) -> HatchResult<()> {
        self.observer.installing(packages);
        info!(packages = ?packages, "Installing packages");
        self.installer.install(target, packages)
    }

    fn advance(&self, state: &mut PipelineState, to: PipelineState) {
        debug_assert_eq!(state.next(), Some(to), "illegal transition from {state}");
        *state = to;
        info!(state = %to, "Pipeline state");
        self.observer.state_entered(to);
    }

    fn rollback_within<'s>(
        &'s self,
        app_path: &Path,
        scope: &mut Option<WorkdirScope<'s>>,
    ) -> RollbackReport {
        let mut report = RollbackReport::default();

        if !self.filesystem.is_dir(app_path) {
            debug!("Target is gone, nothing to roll back");
            return report;
        }

        for name in KNOWN_GENERATED {
            let path = app_path.join(name);
            if !self.filesystem.exists(&path) {
                continue;
            }
            self.observer.removing_generated(name);
            match self.filesystem.remove(&path) {
                Ok(()) => {
                    debug!(entry = name, "Removed generated entry");
                    report.removed.push((*name).to_string());
                }
                Err(e) => {
                    warn!(entry = name, error = %e, "Could not remove generated entry");
                    report.failures.push(format!("{name}: {e}"));
                }
            }
        }

        match self.filesystem.read_dir(app_path) {
            Ok(entries) if entries.is_empty() => {
                // The process must leave the directory before it can go.
                if let Some(mut active) = scope.take() {
                    active.restore();
                }
                let name = app_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let parent = app_path.parent().unwrap_or(app_path);
                self.observer.removing_target(&name, parent);
                match self.filesystem.remove_dir_all(app_path) {
                    Ok(()) => {
                        info!("Removed empty target directory");
                        report.target_removed = true;
                    }
                    Err(e) => {
                        warn!(error = %e, "Could not remove target directory");
                        report.failures.push(format!("{name}: {e}"));
                    }
                }
            }
            Ok(entries) => {
                debug!(remaining = entries.len(), "Target not empty, leaving it in place");
            }
            Err(e) => {
                warn!(error = %e, "Could not list target during rollback");
                report.failures.push(e.to_string());
            }
        }

        report
    }
}

/// Drop `.` and fold `..` into its parent without touching the disk, so the
/// last component is the directory that will actually be created.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}
