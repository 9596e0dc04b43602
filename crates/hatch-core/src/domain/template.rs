//! Templates: identity, manifest fragment, and resolved location.

use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::DomainError;

/// Name of the template used when nothing else is chosen.
pub const DEFAULT_TEMPLATE: &str = "template-plain";

/// Identifier of a template: the name of its directory under the templates root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TemplateId(String);

impl TemplateId {
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTemplateId`] for empty ids or ids that
    /// would escape the templates root.
    pub fn parse(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        let reason = if id.trim().is_empty() {
            Some("id cannot be empty")
        } else if id.contains('/') || id.contains('\\') {
            Some("id cannot contain path separators")
        } else if id == "." || id == ".." {
            Some("id cannot be a relative directory")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(DomainError::InvalidTemplateId {
                id,
                reason: reason.into(),
            }),
            None => Ok(Self(id)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Package section of a template's `template.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageFragment {
    #[serde(default)]
    pub scripts: Option<Map<String, Value>>,
    #[serde(default)]
    pub dev_dependencies: Option<Map<String, Value>>,
    #[serde(default)]
    pub dependencies: Option<DependencySpec>,
}

/// Runtime dependencies a template asks the installer for.
///
/// Accepts either a plain list of package names or a `{ name: version }` map.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DependencySpec {
    Names(Vec<String>),
    Pinned(Map<String, Value>),
}

impl DependencySpec {
    /// Installer arguments, e.g. `["lodash", "pkg@1.0.0"]`.
    pub fn to_install_args(&self) -> Vec<String> {
        match self {
            Self::Names(names) => names.clone(),
            Self::Pinned(map) => map
                .iter()
                .map(|(name, version)| match version.as_str() {
                    Some(v) if !v.is_empty() => format!("{name}@{v}"),
                    _ => name.clone(),
                })
                .collect(),
        }
    }
}

/// Deserialised `template.json`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TemplateFragment {
    /// Display name shown in the template prompt.
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub package: PackageFragment,
}

impl TemplateFragment {
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidManifest`] when the JSON does not match
    /// the fragment shape.
    pub fn from_json(raw: &str) -> Result<Self, DomainError> {
        serde_json::from_str(raw)
            .map_err(|e| DomainError::InvalidManifest(format!("template.json: {e}")))
    }

    /// Packages to install after materialization.
    pub fn install_args(&self) -> Vec<String> {
        self.package
            .dependencies
            .as_ref()
            .map(DependencySpec::to_install_args)
            .unwrap_or_default()
    }
}

/// Human-facing entry for the template prompt and `hatch list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDescriptor {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
}

/// A template resolved by a store: where its file tree lives and what it
/// merges into the manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSource {
    pub id: TemplateId,
    /// Root of the tree copied verbatim into the project.
    pub files_dir: PathBuf,
    pub fragment: TemplateFragment,
}

impl TemplateSource {
    pub fn descriptor(&self) -> TemplateDescriptor {
        TemplateDescriptor {
            id: self.id.clone(),
            name: self
                .fragment
                .name
                .clone()
                .unwrap_or_else(|| self.id.to_string()),
            description: self.fragment.description.clone().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_id_rejects_traversal() {
        assert!(TemplateId::parse("template-plain").is_ok());
        assert!(TemplateId::parse("").is_err());
        assert!(TemplateId::parse("../etc").is_err());
        assert!(TemplateId::parse("..").is_err());
    }

    #[test]
    fn fragment_with_name_list() {
        let f = TemplateFragment::from_json(
            r#"{"package":{"scripts":{"start":"webpack serve"},"dependencies":["a","b"]}}"#,
        )
        .unwrap();
        assert_eq!(f.install_args(), vec!["a", "b"]);
        assert_eq!(
            f.package.scripts.unwrap()["start"],
            Value::String("webpack serve".into())
        );
        assert!(f.package.dev_dependencies.is_none());
    }

    #[test]
    fn fragment_with_pinned_map() {
        let f = TemplateFragment::from_json(
            r#"{"package":{"dependencies":{"pkg":"1.0.0","other":""}}}"#,
        )
        .unwrap();
        assert_eq!(f.install_args(), vec!["pkg@1.0.0", "other"]);
    }

    #[test]
    fn fragment_without_package_is_empty() {
        let f = TemplateFragment::from_json("{}").unwrap();
        assert!(f.install_args().is_empty());
        assert_eq!(f.package, PackageFragment::default());
    }

    #[test]
    fn malformed_fragment_is_invalid_manifest() {
        assert!(matches!(
            TemplateFragment::from_json("[1,2]"),
            Err(DomainError::InvalidManifest(_))
        ));
    }

    #[test]
    fn descriptor_falls_back_to_id() {
        let src = TemplateSource {
            id: TemplateId::parse("t").unwrap(),
            files_dir: PathBuf::from("/t/template"),
            fragment: TemplateFragment::default(),
        };
        assert_eq!(src.descriptor().name, "t");
    }
}
