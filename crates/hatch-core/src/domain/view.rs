//! Extension views and their webpack `HtmlWebpackPlugin` fragments.

use std::{fmt, str::FromStr};

use super::DomainError;

/// One HTML entry point of a Twitch extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewId {
    Overlay,
    Component,
    Panel,
    Mobile,
    LiveConfig,
    /// Broadcaster configuration page. Always generated, never selectable.
    Config,
}

/// Static description of a view: what the prompt shows and what ends up in
/// the generated webpack config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewDefinition {
    pub id: ViewId,
    pub label: &'static str,
    /// `true` for views listed under "Additional Views" in the prompt.
    pub additional: bool,
    pub title: &'static str,
    pub filename: &'static str,
}

/// View-to-fragment table, in prompt order. `Config` is last.
pub const VIEW_TABLE: &[ViewDefinition] = &[
    ViewDefinition {
        id: ViewId::Overlay,
        label: "Video Overlay",
        additional: false,
        title: "Video Overlay",
        filename: "video_overlay.html",
    },
    ViewDefinition {
        id: ViewId::Component,
        label: "Video Component",
        additional: false,
        title: "Video Component",
        filename: "video_component.html",
    },
    ViewDefinition {
        id: ViewId::Panel,
        label: "Panel",
        additional: false,
        title: "Panel",
        filename: "panel.html",
    },
    ViewDefinition {
        id: ViewId::Mobile,
        label: "Mobile",
        additional: false,
        title: "Mobile",
        filename: "mobile.html",
    },
    ViewDefinition {
        id: ViewId::LiveConfig,
        label: "Live Configuration View (Shows on Broadcaster Dashboard)",
        additional: true,
        title: "Live Configuration",
        filename: "live_config.html",
    },
    ViewDefinition {
        id: ViewId::Config,
        label: "Configuration",
        additional: true,
        title: "Configuration",
        filename: "config.html",
    },
];

/// Views appended after the user's selection, in this order.
pub const DEFAULT_VIEWS: &[ViewId] = &[ViewId::Config];

impl ViewId {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Overlay => "overlay",
            Self::Component => "component",
            Self::Panel => "panel",
            Self::Mobile => "mobile",
            Self::LiveConfig => "live_config",
            Self::Config => "config",
        }
    }

    pub fn definition(self) -> &'static ViewDefinition {
        VIEW_TABLE
            .iter()
            .find(|d| d.id == self)
            .unwrap_or(&VIEW_TABLE[VIEW_TABLE.len() - 1])
    }

    /// Views the user may pick.
    pub fn selectable() -> impl Iterator<Item = &'static ViewDefinition> {
        VIEW_TABLE.iter().filter(|d| !DEFAULT_VIEWS.contains(&d.id))
    }

    /// The JavaScript object literal inserted into `webpack.common.js`.
    pub fn fragment(self) -> String {
        let def = self.definition();
        format!(
            "{{ title: '{}', template: './public/template.html', filename: '{}' }}",
            def.title, def.filename
        )
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewId {
    type Err = DomainError;

    /// Parses a *selectable* view; `config` is rejected because it is always
    /// appended.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ViewId::selectable()
            .map(|d| d.id)
            .find(|id| id.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownView { view: s.to_string() })
    }
}

/// Deduplicate views, keeping first-occurrence order.
pub fn ordered_unique(views: impl IntoIterator<Item = ViewId>) -> Vec<ViewId> {
    let mut out: Vec<ViewId> = Vec::new();
    for v in views {
        if !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_selectable_views() {
        assert_eq!("overlay".parse::<ViewId>().unwrap(), ViewId::Overlay);
        assert_eq!("Live-Config".parse::<ViewId>().unwrap(), ViewId::LiveConfig);
        assert_eq!(" panel ".parse::<ViewId>().unwrap(), ViewId::Panel);
    }

    #[test]
    fn config_is_not_selectable() {
        assert!(matches!(
            "config".parse::<ViewId>(),
            Err(DomainError::UnknownView { .. })
        ));
        assert!(ViewId::selectable().all(|d| d.id != ViewId::Config));
    }

    #[test]
    fn every_view_has_a_definition() {
        for def in VIEW_TABLE {
            assert_eq!(def.id.definition(), def);
        }
    }

    #[test]
    fn fragment_names_output_file() {
        let frag = ViewId::Panel.fragment();
        assert!(frag.contains("filename: 'panel.html'"));
        assert!(frag.starts_with('{') && frag.ends_with('}'));
    }

    #[test]
    fn ordered_unique_keeps_first_occurrence() {
        let got = ordered_unique([
            ViewId::Panel,
            ViewId::Overlay,
            ViewId::Panel,
            ViewId::Mobile,
        ]);
        assert_eq!(got, vec![ViewId::Panel, ViewId::Overlay, ViewId::Mobile]);
    }
}
