use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser)]
#[clap(version, about = "Ocean Notes - a searchable local notes application")]
pub struct Cli {
    /// Path to the notes store file (defaults to the per-user data directory)
    #[clap(long, value_parser)]
    pub store: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the ocean-notes application
    #[clap(subcommand)]
    pub command: Commands,
}
