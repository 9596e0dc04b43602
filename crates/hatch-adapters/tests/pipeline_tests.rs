//! End-to-end runs of the orchestrator over in-memory adapters.

use std::{
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use mockall::mock;

use hatch_adapters::{InMemoryStore, MemoryFilesystem, MemoryWorkingDir, NonInteractivePrompter};
use hatch_core::{
    application::{
        ApplicationError, Orchestrator, OrchestratorOptions, PipelineObserver, RunOutcome,
        Selections,
        ports::{Filesystem, Installer, Prompter, WorkingDirectory},
    },
    domain::{
        DirEntry, DomainError, GeneratedManifest, PipelineState, TemplateDescriptor,
        TemplateFragment, TemplateId, TemplateSource, ViewDefinition, ViewId,
    },
    error::{HatchError, HatchResult},
};

mock! {
    pub Installer {}

    impl Installer for Installer {
        fn install(&self, target_dir: &Path, packages: &[String]) -> HatchResult<()>;
    }
}

const HOME: &str = "/home/dev";
const TARGET: &str = "/home/dev/my-ext";
const TEMPLATE_TREE: &str = "/templates/template-plain/template";

const WEBPACK: &str = "module.exports = {\n  name: '{{PROJECT_NAME}}',\n  views: [\n    {{HTML_VIEWS}}\n  ],\n}\n";

const FRAGMENT: &str = r#"{
    "name": "Vanilla JavaScript",
    "description": "Plain JS views",
    "package": {
        "scripts": { "build": "x", "start": "webpack serve" },
        "devDependencies": { "webpack": "5.90.0" },
        "dependencies": { "pkg": "1.0.0" }
    }
}"#;

fn target() -> &'static Path {
    Path::new(TARGET)
}

fn plain() -> TemplateId {
    TemplateId::parse("template-plain").unwrap()
}

fn presets(views: &[ViewId]) -> Selections {
    Selections {
        template: Some(plain()),
        views: Some(views.to_vec()),
    }
}

struct Harness {
    fs: MemoryFilesystem,
    store: InMemoryStore,
    workdir: MemoryWorkingDir,
}

impl Harness {
    fn new() -> Self {
        let fs = MemoryFilesystem::new();
        fs.add_dir(HOME);
        fs.add_file(format!("{TEMPLATE_TREE}/webpack.common.ejs"), WEBPACK);
        fs.add_file(format!("{TEMPLATE_TREE}/gitignore"), "node_modules\ndist\n");
        fs.add_file(format!("{TEMPLATE_TREE}/src/index.js"), "// entry\n");
        fs.add_file(format!("{TEMPLATE_TREE}/public/template.html"), "<html></html>\n");

        let store = InMemoryStore::new();
        store
            .insert(TemplateSource {
                id: plain(),
                files_dir: TEMPLATE_TREE.into(),
                fragment: TemplateFragment::from_json(FRAGMENT).unwrap(),
            })
            .unwrap();

        Self {
            fs,
            store,
            workdir: MemoryWorkingDir::new(HOME),
        }
    }

    fn orchestrator(&self, installer: MockInstaller, prompter: impl Prompter + 'static) -> Orchestrator {
        Orchestrator::new(
            Box::new(self.fs.clone()),
            Box::new(self.store.clone()),
            Box::new(installer),
            Box::new(prompter),
            Box::new(self.workdir.clone()),
        )
    }

    /// Installer that behaves like npm: creates the lockfile and cache dir,
    /// and records each package list.
    fn npm_like(&self, calls: Arc<Mutex<Vec<Vec<String>>>>) -> MockInstaller {
        let fs = self.fs.clone();
        let mut installer = MockInstaller::new();
        installer.expect_install().returning(move |dir, packages| {
            calls.lock().unwrap().push(packages.to_vec());
            fs.add_dir(dir.join("node_modules"));
            fs.add_file(dir.join("package-lock.json"), "{}\n");
            Ok(())
        });
        installer
    }

    /// npm-like installer that fails on the `fail_at`-th call (0-based).
    fn failing_at(&self, fail_at: usize) -> MockInstaller {
        let fs = self.fs.clone();
        let count = AtomicUsize::new(0);
        let mut installer = MockInstaller::new();
        installer.expect_install().returning(move |dir, packages| {
            fs.add_dir(dir.join("node_modules"));
            fs.add_file(dir.join("package-lock.json"), "{}\n");
            if count.fetch_add(1, Ordering::SeqCst) == fail_at {
                return Err(ApplicationError::InstallFailed {
                    command: format!("npm install {}", packages.join(" ")),
                    detail: Some("exit code 1".into()),
                }
                .into());
            }
            Ok(())
        });
        installer
    }

    fn manifest(&self) -> GeneratedManifest {
        GeneratedManifest::parse(&self.fs.read_file(target().join("package.json")).unwrap())
            .unwrap()
    }
}

/// Answers prompts from a script and counts how often it was asked.
#[derive(Clone)]
struct ScriptedPrompter {
    template: TemplateId,
    views: Vec<ViewId>,
    asked: Arc<AtomicUsize>,
}

impl ScriptedPrompter {
    fn new(views: &[ViewId]) -> Self {
        Self {
            template: plain(),
            views: views.to_vec(),
            asked: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn select_template(&self, choices: &[TemplateDescriptor]) -> HatchResult<TemplateId> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        assert!(choices.iter().any(|c| c.id == self.template));
        Ok(self.template.clone())
    }

    fn select_views(&self, choices: &[&'static ViewDefinition]) -> HatchResult<Vec<ViewId>> {
        self.asked.fetch_add(1, Ordering::SeqCst);
        assert!(choices.iter().all(|c| c.id != ViewId::Config));
        Ok(self.views.clone())
    }
}

#[derive(Clone, Default)]
struct RecordingObserver {
    states: Arc<Mutex<Vec<PipelineState>>>,
    removed: Arc<Mutex<Vec<String>>>,
    aborted_at: Arc<Mutex<Option<PipelineState>>>,
}

impl PipelineObserver for RecordingObserver {
    fn state_entered(&self, state: PipelineState) {
        self.states.lock().unwrap().push(state);
    }

    fn aborting(&self, state: PipelineState, _reason: &HatchError) {
        *self.aborted_at.lock().unwrap() = Some(state);
    }

    fn removing_generated(&self, name: &str) {
        self.removed.lock().unwrap().push(name.to_string());
    }
}

fn aborted(outcome: RunOutcome) -> hatch_core::application::Abort {
    match outcome {
        RunOutcome::Aborted(abort) => abort,
        RunOutcome::Success(path) => panic!("expected abort, got success at {}", path.display()),
    }
}

// ── Success ──────────────────────────────────────────────────────────────────

#[test]
fn successful_run_generates_project() {
    let h = Harness::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let orchestrator = h.orchestrator(h.npm_like(calls.clone()), NonInteractivePrompter::default());

    let outcome = orchestrator.run(target(), presets(&[ViewId::Panel]));

    assert_eq!(outcome.into_result().unwrap(), PathBuf::from(TARGET));

    let manifest = h.manifest();
    assert_eq!(manifest.name(), Some("my-ext"));
    assert_eq!(manifest.get("version").and_then(|v| v.as_str()), Some("0.0.1"));
    assert_eq!(
        manifest.section_entry("scripts", "build").and_then(|v| v.as_str()),
        Some("x")
    );

    assert!(h.fs.exists(&target().join("src/index.js")));
    assert!(h.fs.exists(&target().join("webpack.common.js")));
    assert!(!h.fs.exists(&target().join("webpack.common.ejs")));
    assert!(h.fs.exists(&target().join(".gitignore")));
    assert!(!h.fs.exists(&target().join("gitignore")));

    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            vec!["jsonwebtoken".to_string()],
            vec!["pkg@1.0.0".to_string()],
            Vec::<String>::new(),
        ]
    );
}

#[test]
fn working_directory_is_restored_after_success() {
    let h = Harness::new();
    let orchestrator = h.orchestrator(
        h.npm_like(Arc::default()),
        NonInteractivePrompter::default(),
    );

    assert!(orchestrator.run(target(), presets(&[ViewId::Panel])).is_success());

    assert_eq!(h.workdir.current().unwrap(), Path::new(HOME));
    assert_eq!(
        h.workdir.history(),
        vec![PathBuf::from(TARGET), PathBuf::from(HOME)]
    );
}

#[test]
fn config_lists_views_in_selection_order_then_config() {
    let h = Harness::new();
    let orchestrator = h.orchestrator(
        h.npm_like(Arc::default()),
        NonInteractivePrompter::default(),
    );

    orchestrator
        .run(target(), presets(&[ViewId::Overlay, ViewId::Component, ViewId::Overlay]))
        .into_result()
        .unwrap();

    let config = h.fs.read_file(target().join("webpack.common.js")).unwrap();
    let overlay = config.find("video_overlay.html").unwrap();
    let component = config.find("video_component.html").unwrap();
    let settings = config.find("config.html").unwrap();
    assert!(overlay < component && component < settings);
    assert_eq!(config.matches("video_overlay.html").count(), 1);
    assert!(config.contains("name: 'my-ext'"));
}

#[test]
fn single_file_template_end_to_end() {
    let h = Harness::new();
    h.fs.add_file("/templates/template-a/template/a.txt", "a\n");
    h.store
        .insert(TemplateSource {
            id: TemplateId::parse("template-a").unwrap(),
            files_dir: "/templates/template-a/template".into(),
            fragment: TemplateFragment::from_json(
                r#"{ "package": { "scripts": { "build": "x" }, "dependencies": { "pkg": "1.0.0" } } }"#,
            )
            .unwrap(),
        })
        .unwrap();
    let orchestrator = h.orchestrator(
        h.npm_like(Arc::default()),
        NonInteractivePrompter::default(),
    );

    let outcome = orchestrator.run(
        target(),
        Selections {
            template: Some(TemplateId::parse("template-a").unwrap()),
            views: Some(vec![ViewId::Panel]),
        },
    );

    assert!(outcome.is_success());
    assert_eq!(h.fs.read_file(target().join("a.txt")).as_deref(), Some("a\n"));
    assert_eq!(
        h.manifest()
            .section_entry("scripts", "build")
            .and_then(|v| v.as_str()),
        Some("x")
    );
}

#[test]
fn existing_gitignore_is_extended() {
    let h = Harness::new();
    h.fs.add_file(target().join(".gitignore"), "secrets.env\n");
    let orchestrator = h.orchestrator(
        h.npm_like(Arc::default()),
        NonInteractivePrompter::default(),
    );

    assert!(orchestrator.run(target(), presets(&[ViewId::Panel])).is_success());

    assert_eq!(
        h.fs.read_file(target().join(".gitignore")).as_deref(),
        Some("secrets.env\nnode_modules\ndist\n")
    );
}

#[test]
fn prompts_fill_in_missing_selections() {
    let h = Harness::new();
    let prompter = ScriptedPrompter::new(&[ViewId::Mobile]);
    let asked = prompter.asked.clone();
    let orchestrator = h.orchestrator(h.npm_like(Arc::default()), prompter);

    assert!(orchestrator.run(target(), Selections::default()).is_success());

    assert_eq!(asked.load(Ordering::SeqCst), 2);
    let config = h.fs.read_file(target().join("webpack.common.js")).unwrap();
    assert!(config.contains("mobile.html"));
}

#[test]
fn relative_target_resolves_against_working_directory() {
    let h = Harness::new();
    let orchestrator = h.orchestrator(
        h.npm_like(Arc::default()),
        NonInteractivePrompter::default(),
    );

    let outcome = orchestrator.run(Path::new("my-ext"), presets(&[ViewId::Panel]));
    assert_eq!(outcome.into_result().unwrap(), PathBuf::from(TARGET));
}

#[test]
fn trailing_parent_dir_names_the_resolved_directory() {
    let h = Harness::new();
    let orchestrator = h.orchestrator(
        h.npm_like(Arc::default()),
        NonInteractivePrompter::default(),
    );

    let outcome = orchestrator.run(Path::new("my-ext/nested/.."), presets(&[ViewId::Panel]));
    assert_eq!(outcome.into_result().unwrap(), PathBuf::from(TARGET));
    assert_eq!(h.manifest().name(), Some("my-ext"));
    assert!(!h.fs.exists(&target().join("nested")));
}

#[test]
fn observer_sees_every_state_in_order() {
    let h = Harness::new();
    let observer = RecordingObserver::default();
    let states = observer.states.clone();
    let orchestrator = h
        .orchestrator(h.npm_like(Arc::default()), NonInteractivePrompter::default())
        .with_observer(Box::new(observer));

    assert!(orchestrator.run(target(), presets(&[ViewId::Panel])).is_success());

    let states = states.lock().unwrap();
    assert_eq!(states.first(), Some(&PipelineState::NameValidated));
    assert_eq!(states.last(), Some(&PipelineState::Done));
    assert_eq!(states.len(), 9);
    assert!(states.windows(2).all(|w| w[0].next() == Some(w[1])));
}

#[test]
fn configured_base_packages_replace_default() {
    let h = Harness::new();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let orchestrator = h
        .orchestrator(h.npm_like(calls.clone()), NonInteractivePrompter::default())
        .with_options(OrchestratorOptions {
            base_packages: vec!["twitch-ext-helper".into()],
        });

    assert!(orchestrator.run(target(), presets(&[ViewId::Panel])).is_success());
    assert_eq!(calls.lock().unwrap()[0], vec!["twitch-ext-helper".to_string()]);
}

// ── Failures before the guard ────────────────────────────────────────────────

#[test]
fn invalid_name_aborts_without_touching_disk() {
    let h = Harness::new();
    let mut installer = MockInstaller::new();
    installer.expect_install().never();
    let orchestrator = h.orchestrator(installer, NonInteractivePrompter::default());

    let abort = aborted(orchestrator.run(Path::new("/home/dev/My_Ext"), presets(&[ViewId::Panel])));

    assert_eq!(abort.state, PipelineState::Init);
    assert!(abort.rollback.is_none());
    match abort.reason {
        HatchError::Domain(DomainError::NameInvalid { name, reasons }) => {
            assert_eq!(name, "My_Ext");
            assert!(!reasons.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!h.fs.exists(Path::new("/home/dev/My_Ext")));
    assert!(h.workdir.history().is_empty());
}

#[test]
fn conflicting_directory_is_left_untouched() {
    let h = Harness::new();
    h.fs.add_file(target().join("README.md"), "# mine\n");
    h.fs.add_file(target().join("src/main.rs"), "fn main() {}\n");
    h.fs.add_file(target().join("npm-debug.log.1234"), "");
    let mut installer = MockInstaller::new();
    installer.expect_install().never();
    let orchestrator = h.orchestrator(installer, NonInteractivePrompter::default());

    let abort = aborted(orchestrator.run(target(), presets(&[ViewId::Panel])));

    assert_eq!(abort.state, PipelineState::NameValidated);
    assert!(abort.rollback.is_none());
    match abort.reason {
        HatchError::Application(ApplicationError::DirectoryConflict { name, conflicts }) => {
            assert_eq!(name, "my-ext");
            assert_eq!(conflicts, vec![DirEntry::dir("src")]);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(h.fs.exists(&target().join("npm-debug.log.1234")));
    assert!(!h.fs.exists(&target().join("package.json")));
}

// ── Failures after the guard ─────────────────────────────────────────────────

#[test]
fn base_install_failure_removes_everything() {
    let h = Harness::new();
    h.fs.add_file(target().join("npm-debug.log"), "stale");
    let orchestrator = h.orchestrator(h.failing_at(0), NonInteractivePrompter::default());

    let abort = aborted(orchestrator.run(target(), presets(&[ViewId::Panel])));

    assert_eq!(abort.state, PipelineState::DirectoryGuarded);
    assert!(abort.reason.command().is_some());
    let report = abort.rollback.unwrap();
    assert_eq!(
        report.removed,
        vec!["package.json", "package-lock.json", "node_modules"]
    );
    assert!(report.target_removed);
    assert!(report.is_clean());
    assert!(!h.fs.exists(target()));
    assert_eq!(h.workdir.current().unwrap(), Path::new(HOME));
}

#[test]
fn late_install_failure_keeps_user_files() {
    let h = Harness::new();
    h.fs.add_file(target().join("README.md"), "# mine\n");
    h.fs.add_dir(target().join(".git"));
    let observer = RecordingObserver::default();
    let removed = observer.removed.clone();
    let aborted_at = observer.aborted_at.clone();
    let orchestrator = h
        .orchestrator(h.failing_at(1), NonInteractivePrompter::default())
        .with_observer(Box::new(observer));

    let abort = aborted(orchestrator.run(target(), presets(&[ViewId::Panel])));

    assert_eq!(abort.state, PipelineState::TransformsApplied);
    assert_eq!(*aborted_at.lock().unwrap(), Some(PipelineState::TransformsApplied));
    let report = abort.rollback.unwrap();
    assert!(!report.target_removed);
    assert_eq!(report.removed.len(), 3);
    assert_eq!(*removed.lock().unwrap(), report.removed);

    assert!(h.fs.exists(&target().join("README.md")));
    assert!(h.fs.exists(&target().join(".git")));
    assert!(!h.fs.exists(&target().join("package.json")));
    assert!(!h.fs.exists(&target().join("node_modules")));
    assert_eq!(h.workdir.current().unwrap(), Path::new(HOME));
}

#[test]
fn unknown_template_rolls_back() {
    let h = Harness::new();
    let orchestrator = h.orchestrator(
        h.npm_like(Arc::default()),
        NonInteractivePrompter::default(),
    );

    let abort = aborted(orchestrator.run(
        target(),
        Selections {
            template: Some(TemplateId::parse("template-nope").unwrap()),
            views: Some(vec![ViewId::Panel]),
        },
    ));

    assert_eq!(abort.state, PipelineState::ViewsSelected);
    assert!(matches!(
        abort.reason,
        HatchError::Application(ApplicationError::TemplateNotFound { .. })
    ));
    assert!(abort.rollback.unwrap().target_removed);
    assert!(!h.fs.exists(target()));
}

#[test]
fn unavailable_prompt_rolls_back() {
    let h = Harness::new();
    let orchestrator = h.orchestrator(
        h.npm_like(Arc::default()),
        NonInteractivePrompter::new("stdin is not a terminal"),
    );

    let abort = aborted(orchestrator.run(target(), Selections::default()));

    assert_eq!(abort.state, PipelineState::BaseInstalled);
    assert!(matches!(
        abort.reason,
        HatchError::Application(ApplicationError::PromptUnavailable { .. })
    ));
    assert!(!h.fs.exists(target()));
    assert_eq!(h.workdir.current().unwrap(), Path::new(HOME));
}

#[test]
fn rollback_is_idempotent() {
    let h = Harness::new();
    h.fs.add_file(target().join("LICENSE"), "MIT");
    let orchestrator = h.orchestrator(h.failing_at(0), NonInteractivePrompter::default());

    let abort = aborted(orchestrator.run(target(), presets(&[ViewId::Panel])));
    assert!(!abort.rollback.unwrap().is_noop());
    let files_after_first = h.fs.list_files();

    let second = orchestrator.rollback(target());

    assert!(second.is_noop());
    assert_eq!(h.fs.list_files(), files_after_first);
    assert!(h.fs.exists(&target().join("LICENSE")));
}

#[test]
fn rollback_continues_past_failures() {
    let h = Harness::new();
    h.fs.add_dir(target());
    h.fs.fail_on(target().join("package-lock.json"));
    let orchestrator = h.orchestrator(h.failing_at(0), NonInteractivePrompter::default());

    let report = aborted(orchestrator.run(target(), presets(&[ViewId::Panel])))
        .rollback
        .unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.removed, vec!["package.json", "node_modules"]);
    assert!(!report.target_removed);
    assert!(h.fs.exists(&target().join("package-lock.json")));
}
