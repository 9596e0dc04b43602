//! Output management and formatting.

use std::{
    io::{self, IsTerminal},
    path::Path,
};

use console::Term;
use owo_colors::OwoColorize;
use tracing::debug;

use hatch_core::{
    application::{PipelineObserver, RollbackReport},
    domain::PipelineState,
    error::HatchError,
};

use crate::cli::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
#[derive(Debug, Clone)]
pub struct OutputManager {
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        let resolved_format = args.output_format.resolve(io::stdout().is_terminal());

        Self {
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format == OutputFormat::Plain,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Empty line; suppressed in quiet mode.
    pub fn blank(&self) -> io::Result<()> {
        self.print("")
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    // ── Inline styling ────────────────────────────────────────────────────

    /// Commands, file names and package names.
    pub fn cyan(&self, text: &str) -> String {
        if self.no_color {
            text.to_owned()
        } else {
            text.cyan().to_string()
        }
    }

    /// Paths and project names.
    pub fn green(&self, text: &str) -> String {
        if self.no_color {
            text.to_owned()
        } else {
            text.green().to_string()
        }
    }
}

// ── Pipeline progress ─────────────────────────────────────────────────────────

/// Prints pipeline progress the way a user expects to read it.
///
/// Terminal write failures are logged and otherwise ignored: losing a
/// progress line must not abort a half-built project.
#[derive(Debug, Clone)]
pub struct ConsoleObserver {
    output: OutputManager,
}

impl ConsoleObserver {
    pub fn new(output: OutputManager) -> Self {
        Self { output }
    }

    fn emit(&self, lines: impl IntoIterator<Item = String>) {
        for line in lines {
            if let Err(e) = self.output.print(&line) {
                debug!(error = %e, "Could not write progress line");
            }
        }
    }
}

impl PipelineObserver for ConsoleObserver {
    fn state_entered(&self, state: PipelineState) {
        debug!(state = %state, "Progress");
    }

    fn creating(&self, target: &Path) {
        let root = self.output.green(&target.display().to_string());
        self.emit([
            String::new(),
            format!("Creating a new Twitch Extension in {root}"),
            String::new(),
        ]);
    }

    fn installing(&self, packages: &[String]) {
        if packages.is_empty() {
            self.emit(["Completing project setup...".to_string()]);
            return;
        }
        let names: Vec<String> = packages.iter().map(|p| self.output.cyan(p)).collect();
        self.emit([
            "Installing packages. This might take a couple of minutes.".to_string(),
            format!("Installing {} ...", names.join(", ")),
            String::new(),
        ]);
    }

    fn aborting(&self, _state: PipelineState, reason: &HatchError) {
        let mut lines = vec![String::new(), "Aborting installation.".to_string()];
        match reason.command() {
            Some(command) => lines.push(format!("  {} has failed.", self.output.cyan(command))),
            None => lines.push(format!("  {reason}")),
        }
        lines.push(String::new());
        self.emit(lines);
    }

    fn removing_generated(&self, name: &str) {
        self.emit([format!("Deleting generated file... {}", self.output.cyan(name))]);
    }

    fn removing_target(&self, name: &str, parent: &Path) {
        self.emit([format!(
            "Deleting {} from {}",
            self.output.cyan(&format!("{name}/")),
            self.output.cyan(&parent.display().to_string())
        )]);
    }
}

/// Summarise a rollback once the pipeline has given up.
pub fn report_rollback(output: &OutputManager, report: &RollbackReport) -> io::Result<()> {
    for failure in &report.failures {
        output.warning(&format!("Could not remove {failure}"))?;
    }
    output.print("Done.")
}

// ── tests ─────────────────────────────────────────────────────────────────────
