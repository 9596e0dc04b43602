//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `HATCH_*` environment variables, `__` between nested keys
//!    (`HATCH_INSTALLER__PROGRAM=pnpm`)
//! 3. The TOML config file (`--config`, or the platform config directory)
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

use hatch_adapters::installer::DEFAULT_PROGRAM;
use hatch_core::application::DEFAULT_BASE_PACKAGES;

use crate::error::{CliError, CliResult};

/// Environment variable prefix.
const ENV_PREFIX: &str = "HATCH";

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Package manager settings.
    pub installer: InstallerConfig,
    /// Template settings.
    pub templates: TemplateConfig,
    /// Output settings.
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstallerConfig {
    pub program: String,
    /// Installed into every project before the prompts run.
    pub base_packages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory holding `<id>/template.json` and `<id>/template/`.
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    pub format: String,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.into(),
            base_packages: DEFAULT_BASE_PACKAGES.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "human".into(),
        }
    }
}

impl AppConfig {
    /// Load configuration: defaults, then the TOML file, then the
    /// environment.
    ///
    /// A file passed with `--config` must exist; the default location is
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> CliResult<Self> {
        let (path, required) = match config_file {
            Some(path) => (path.clone(), true),
            None => (Self::config_path(), false),
        };
        debug!(path = %path.display(), required, "Loading configuration");

        Self::layered(&path, required).map_err(|e| CliError::config(&path, e))
    }

    fn layered(path: &Path, required: bool) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .context("Failed to serialise default configuration")?;

        let settings = Config::builder()
            .add_source(defaults)
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("installer.base_packages"),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("Configuration has an invalid shape")
    }

    /// Path to the default configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.hatch.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "hatch", "hatch")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".hatch.toml"))
    }

    /// Where templates are read from.
    ///
    /// `templates.local_path` wins; otherwise a `templates/` directory next
    /// to the executable, and finally the one shipped in the source tree.
    pub fn templates_root(&self) -> PathBuf {
        if let Some(path) = &self.templates.local_path {
            return path.clone();
        }
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("templates")))
            .filter(|dir| dir.is_dir())
            .unwrap_or_else(bundled_templates)
    }

    /// Look up a dotted key such as `installer.program`.
    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let mut value = serde_json::to_value(self).ok()?;
        for part in key.split('.') {
            value = value.get_mut(part)?.take();
        }
        Some(value)
    }
}

fn bundled_templates() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_install_with_npm() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.installer.program, "npm");
        assert_eq!(cfg.installer.base_packages, vec!["jsonwebtoken"]);
        assert!(!cfg.output.no_color);
    }

    #[test]
    fn file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("hatch.toml");
        fs::write(
            &path,
            "[installer]\nprogram = \"pnpm\"\n\n[templates]\nlocal_path = \"/srv/templates\"\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.installer.program, "pnpm");
        assert_eq!(cfg.installer.base_packages, vec!["jsonwebtoken"]);
        assert_eq!(cfg.templates_root(), PathBuf::from("/srv/templates"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.toml");
        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, CliError::ConfigError { path: Some(ref p), .. } if *p == path));
        assert!(err.suggestions()[0].contains("missing.toml"));
    }

    #[test]
    fn malformed_file_names_the_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        fs::write(&path, "[installer\nprogram = ").unwrap();
        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn dotted_lookup() {
        let cfg = AppConfig::default();
        assert_eq!(
            cfg.get("installer.program"),
            Some(serde_json::Value::from("npm"))
        );
        assert_eq!(
            cfg.get("output.no_color"),
            Some(serde_json::Value::from(false))
        );
        assert!(cfg.get("installer.nope").is_none());
        assert!(cfg.get("nope").is_none());
    }

    #[test]
    fn config_path_is_not_empty() {
        let p = AppConfig::config_path();
        assert!(!p.as_os_str().is_empty());
    }
}
