//! Tracing subscriber setup for the `hatch` binary.
//!
//! The library crates only emit events. The filter defaults to WARN and is
//! raised by `-v` (INFO), `-vv` (DEBUG) and `-vvv` (TRACE); `--quiet` drops
//! it to ERROR. A `RUST_LOG` value replaces the derived filter entirely.

use std::io::IsTerminal as _;

use tracing_subscriber::{
    EnvFilter, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::cli::GlobalArgs;

const CRATES: [&str; 3] = ["hatch", "hatch_core", "hatch_adapters"];

/// Install the global subscriber. Call once, before any event fires.
pub fn init_logging(args: &GlobalArgs) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directives(level_for(args))));

    // Events share stderr with dialoguer prompts; stdout stays for results.
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(!args.no_color && std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("tracing subscriber already installed: {e}"))
}

fn level_for(args: &GlobalArgs) -> LevelFilter {
    if args.quiet {
        return LevelFilter::ERROR;
    }
    match args.verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn directives(level: LevelFilter) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}
