//! `hatch init`: create a default configuration file.

use std::path::Path;

use crate::{
    cli::InitArgs,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Write the built-in defaults to the platform config path, or to the
/// `--config` path when one was given.
pub fn execute(args: InitArgs, path: &Path, output: OutputManager) -> CliResult<()> {
    output.info("Initialising configuration...")?;

    if path.exists() && !args.force {
        output.warning(&format!(
            "Config already exists at {}  (use --force to overwrite)",
            path.display(),
        ))?;
        return Ok(());
    }

    write_default(path)?;
    output.success(&format!("Configuration created at {}", path.display()))?;
    Ok(())
}

fn write_default(path: &Path) -> CliResult<()> {
    let toml = toml::to_string_pretty(&AppConfig::default()).map_err(|e| CliError::ConfigError {
        message: format!("Failed to serialise default config: {e}"),
        path: Some(path.to_path_buf()),
        source: Some(Box::new(e)),
    })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_cli_context(|| {
            format!("Failed to create config directory '{}'", parent.display())
        })?;
    }

    std::fs::write(path, toml)
        .with_cli_context(|| format!("Failed to write config to '{}'", path.display()))
}
