//! Command-line entry point shape, grounded on
//! `forest/daemon/src/cli.rs`'s thin `clap::Parser` wrapper.

use std::path::PathBuf;

use clap::Parser;

/// Compares two static-timing-analysis reports and attributes the
/// differences to the arcs, paths and fanouts that caused them.
#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), version, about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// Path to the run configuration (SPEC_FULL.md §6.1).
    pub config: PathBuf,

    /// Increases log verbosity; repeatable (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
