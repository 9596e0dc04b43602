//! # Hatch CLI
//!
//! Scaffolds Twitch extension projects.
//!
//! ## Startup sequence
//!
//! 1. Load `.env`, then parse CLI arguments (clap handles `--help` /
//!    `--version` early-exit).
//! 2. Initialise the tracing subscriber (logging).
//! 3. Load configuration (defaults, file, environment).
//! 4. Build the [`OutputManager`].
//! 5. Dispatch to the appropriate command handler.
//! 6. Translate any [`CliError`] into a user-facing message and exit code.
//!
//! ## Exit codes
//!
//! | Code | Meaning                                   |
//! |------|-------------------------------------------|
//! |  0   | Success                                   |
//! |  1   | Any failure, reported after rollback      |
//! |  2   | Malformed arguments (rejected by clap)    |

use std::{io::IsTerminal, process::ExitCode};

use clap::Parser;
use tracing::{debug, info, instrument};

use crate::{
    cli::{Cli, Commands},
    config::AppConfig,
    error::{CliError, CliResult},
    logging::init_logging,
    output::OutputManager,
};

mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod prompts;

fn main() -> ExitCode {
    // Missing .env is the normal case.
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too, with exit code 0.
            let _ = e.print();
            return ExitCode::from(u8::try_from(e.exit_code()).unwrap_or(2));
        }
    };

    if let Err(e) = init_logging(&cli.global) {
        eprintln!("Failed to initialise logging: {e}");
        return ExitCode::from(1);
    }

    debug!(
        verbose = cli.global.verbose,
        quiet = cli.global.quiet,
        no_color = cli.global.no_color,
        "CLI started"
    );

    let verbose = cli.global.verbose > 0;
    let config = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => return handle_error(e, verbose),
    };

    let output = OutputManager::new(&cli.global, &config);

    match run(cli, config, output) {
        Ok(()) => {
            info!("Hatch completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => handle_error(e, verbose),
    }
}

/// Load configuration for this invocation.
///
/// `init` writes the file, so a missing or unreadable one is not fatal there.
fn load_config(cli: &Cli) -> CliResult<AppConfig> {
    match AppConfig::load(cli.global.config.as_ref()) {
        Ok(config) => Ok(config),
        Err(e) if matches!(cli.command, Some(Commands::Init(_))) => {
            debug!(error = %e, "Configuration unreadable, init starts from defaults");
            Ok(AppConfig::default())
        }
        Err(e) => Err(e),
    }
}

/// Dispatch to the correct command handler.
#[instrument(skip_all)]
fn run(cli: Cli, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let config_path = cli
        .global
        .config
        .clone()
        .unwrap_or_else(AppConfig::config_path);

    match (cli.command, cli.create.project_directory.clone()) {
        (Some(_), Some(dir)) => Err(CliError::Usage {
            message: format!(
                "A project directory ({}) cannot be combined with a subcommand",
                dir.display()
            ),
        }),
        (Some(Commands::List(cmd)), None) => commands::list::execute(cmd, config, output),
        (Some(Commands::Init(cmd)), None) => commands::init::execute(cmd, &config_path, output),
        (Some(Commands::Completions(cmd)), None) => commands::completions::execute(cmd),
        (Some(Commands::Config(cmd)), None) => {
            commands::config::execute(cmd, config, &config_path, output)
        }
        (None, Some(dir)) => commands::create::execute(cli.create, &dir, config, output),
        (None, None) => Err(CliError::Usage {
            message: "Please specify the project directory: hatch <project-directory>".into(),
        }),
    }
}

/// Translate a `CliError` into a user message and an exit code.
fn handle_error(err: CliError, verbose: bool) -> ExitCode {
    err.log();

    // stderr, so the message survives a redirected stdout.
    let msg = if std::io::stderr().is_terminal() {
        err.format_colored(verbose)
    } else {
        err.format_plain(verbose)
    };
    eprint!("{msg}");

    ExitCode::from(err.exit_code())
}

// ── tests ─────────────────────────────────────────────────────────────────────
