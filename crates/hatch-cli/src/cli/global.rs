//! Flags accepted both by `hatch <dir>` and by every subcommand.

use std::path::PathBuf;

use clap::{ArgAction, Args, ValueEnum};

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Log more: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Never emit ANSI colours (also set by NO_COLOR)
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Read settings from FILE instead of the user config directory
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Rendering of progress and results
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Auto)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human on a terminal, plain otherwise
    #[default]
    Auto,
    /// Coloured, for people
    Human,
    /// Uncoloured, for logs and pipes
    Plain,
}

impl OutputFormat {
    /// Settle `Auto` against whether stdout is a terminal.
    pub fn resolve(self, is_terminal: bool) -> Self {
        match self {
            Self::Auto if is_terminal => Self::Human,
            Self::Auto => Self::Plain,
            other => other,
        }
    }
}
