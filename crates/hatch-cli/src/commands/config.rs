//! `hatch config`: inspect configuration values.

use std::path::Path;

use serde_json::Value;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    config: AppConfig,
    path: &Path,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            output.print(&get_config_value(&config, &key)?)?;
        }

        ConfigCommands::List => {
            output.header("Current Configuration:")?;
            let serialised =
                toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                    message: format!("Failed to serialise config: {e}"),
                    path: Some(path.to_path_buf()),
                    source: Some(Box::new(e)),
                })?;
            output.print(&serialised)?;
        }

        ConfigCommands::Path => {
            output.print(&path.display().to_string())?;
        }
    }

    Ok(())
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// Strings print bare, everything else as JSON.  Unset optional keys print
/// an empty line.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    match config.get(key) {
        Some(Value::String(s)) => Ok(s),
        Some(Value::Null) => Ok(String::new()),
        Some(other) => Ok(other.to_string()),
        None => Err(CliError::ConfigError {
            message: format!("Unknown config key: '{key}'"),
            path: None,
            source: None,
        }),
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_known_keys() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "installer.program").unwrap(), "npm");
        assert_eq!(
            get_config_value(&cfg, "installer.base_packages").unwrap(),
            r#"["jsonwebtoken"]"#
        );
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
        assert_eq!(get_config_value(&cfg, "templates.local_path").unwrap(), "");
    }

    #[test]
    fn get_unknown_key_is_error() {
        let cfg = AppConfig::default();
        assert!(matches!(
            get_config_value(&cfg, "does.not.exist"),
            Err(CliError::ConfigError { .. })
        ));
    }
}
