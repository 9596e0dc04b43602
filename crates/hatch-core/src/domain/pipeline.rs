//! Pipeline states and the request that drives generation.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use super::{ProjectName, TemplateId, ViewId, view::ordered_unique};

/// Steps of a scaffolding run, in execution order.
///
/// `Aborted` is absorbing: no transition leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineState {
    Init,
    NameValidated,
    DirectoryGuarded,
    BaseInstalled,
    TemplateSelected,
    ViewsSelected,
    Materialized,
    TransformsApplied,
    DepsInstalled,
    Done,
    Aborted,
}

impl PipelineState {
    /// The only state reachable from `self` on success, or `None` for
    /// terminal states.
    pub fn next(self) -> Option<Self> {
        use PipelineState::*;
        match self {
            Init => Some(NameValidated),
            NameValidated => Some(DirectoryGuarded),
            DirectoryGuarded => Some(BaseInstalled),
            BaseInstalled => Some(TemplateSelected),
            TemplateSelected => Some(ViewsSelected),
            ViewsSelected => Some(Materialized),
            Materialized => Some(TransformsApplied),
            TransformsApplied => Some(DepsInstalled),
            DepsInstalled => Some(Done),
            Done | Aborted => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Whether a failure *while leaving* this state must roll back.
    ///
    /// Nothing is written before the directory passes the guard, so failures
    /// up to and including the guard leave the disk untouched.
    pub fn requires_rollback(self) -> bool {
        self >= Self::DirectoryGuarded && self != Self::Aborted
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::NameValidated => "name-validated",
            Self::DirectoryGuarded => "directory-guarded",
            Self::BaseInstalled => "base-installed",
            Self::TemplateSelected => "template-selected",
            Self::ViewsSelected => "views-selected",
            Self::Materialized => "materialized",
            Self::TransformsApplied => "transforms-applied",
            Self::DepsInstalled => "deps-installed",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything generation needs, fixed once template and views are chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    target_path: PathBuf,
    project_name: ProjectName,
    template_id: TemplateId,
    selected_views: Vec<ViewId>,
}

impl ProjectRequest {
    /// Duplicate views are dropped, keeping first-occurrence order.
    pub fn new(
        target_path: impl Into<PathBuf>,
        project_name: ProjectName,
        template_id: TemplateId,
        views: impl IntoIterator<Item = ViewId>,
    ) -> Self {
        Self {
            target_path: target_path.into(),
            project_name,
            template_id,
            selected_views: ordered_unique(views),
        }
    }

    pub fn target_path(&self) -> &Path {
        &self.target_path
    }

    pub fn project_name(&self) -> &ProjectName {
        &self.project_name
    }

    pub fn template_id(&self) -> &TemplateId {
        &self.template_id
    }

    pub fn selected_views(&self) -> &[ViewId] {
        &self.selected_views
    }
}
