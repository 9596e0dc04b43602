//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use hatch_core::domain::ViewId;

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
///
/// `hatch <project-directory>` creates a project; the subcommands are
/// housekeeping.  A directory literally named like a subcommand can be
/// created with a path prefix (`hatch ./list`).
#[derive(Debug, Parser)]
#[command(
    name    = "hatch",
    bin_name = "hatch",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Scaffold a Twitch extension project",
    long_about = "Hatch creates a ready-to-build Twitch extension: it copies a \
                  template, wires the selected views into the webpack config, \
                  and installs the npm dependencies.",
    override_usage = "hatch [OPTIONS] <PROJECT_DIRECTORY>\n       hatch [OPTIONS] <COMMAND>",
    after_help = "EXAMPLES:\n\
        \x20 hatch my-twitch-extension\n\
        \x20 hatch my-ext --template template-plain --view panel --view mobile\n\
        \x20 hatch list\n\
        \x20 hatch completions bash > /usr/share/bash-completion/completions/hatch",
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(flatten)]
    pub create: CreateArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for creating a project (the default action).
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Where to create the project.  The last path component is the
    /// package name.
    #[arg(value_name = "PROJECT_DIRECTORY", help = "Directory to create the extension in")]
    pub project_directory: Option<PathBuf>,

    /// Skip the template prompt.
    #[arg(
        short = 't',
        long = "template",
        value_name = "ID",
        help = "Template to use (see `hatch list`)"
    )]
    pub template: Option<String>,

    /// Skip the view prompt.  Repeat for several views; `config` is always
    /// added.
    #[arg(
        long = "view",
        value_name = "VIEW",
        help = "Extension view to generate (overlay, component, panel, mobile, live_config)"
    )]
    pub views: Vec<ViewId>,

    /// Package manager executable.
    #[arg(
        long = "installer",
        value_name = "PROGRAM",
        help = "Installer program to run (default: npm)"
    )]
    pub installer: Option<String>,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List available templates and views.
    #[command(
        visible_alias = "ls",
        about = "List available templates and views",
        after_help = "EXAMPLES:\n\
            \x20 hatch list\n\
            \x20 hatch list --format json"
    )]
    List(ListArgs),

    /// Initialise a Hatch configuration file.
    #[command(
        about = "Initialise configuration",
        after_help = "EXAMPLES:\n\
            \x20 hatch init\n\
            \x20 hatch init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 hatch completions bash > ~/.local/share/bash-completion/completions/hatch\n\
            \x20 hatch completions zsh  > ~/.zfunc/_hatch\n\
            \x20 hatch completions fish > ~/.config/fish/completions/hatch.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the Hatch configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 hatch config get installer.program\n\
            \x20 hatch config list\n\
            \x20 hatch config path"
    )]
    Config(ConfigCommands),
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `hatch list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format.
    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One template id per line.
    List,
    /// JSON object with `templates` and `views`.
    Json,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `hatch init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Overwrite an existing config file.
    #[arg(short = 'f', long = "force", help = "Overwrite existing configuration")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `hatch completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `hatch config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `installer.program`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
