use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for locdb
#[derive(Debug, Parser)]
#[command(
    name = "locdb",
    version,
    about = "Diacritic-tolerant city lookup over a countries/cities snapshot"
)]
pub struct CliArgs {
    /// Path to the JSON snapshot, optionally `.gz` (default: bundled locations.json)
    #[arg(short = 'i', long = "input", env = "LOCDB_INPUT", global = true)]
    pub input: Option<PathBuf>,

    /// Open this binary cache instead of the snapshot
    #[arg(short = 'c', long = "cache", global = true, conflicts_with = "no_cache")]
    pub cache: Option<PathBuf>,

    /// Always build from the snapshot; neither read nor write a cache
    #[arg(long = "no-cache", global = true)]
    pub no_cache: bool,

    /// Skip malformed records instead of aborting the build
    #[arg(long = "skip-invalid", global = true)]
    pub skip_invalid: bool,

    /// More log output (-v info, -vv debug); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show a summary of the index contents
    Stats,

    /// List all countries
    Countries,

    /// Search cities; every word must occur in the city or country name
    Search {
        /// Query text (e.g. "war poland", "łódź")
        #[arg(required = true)]
        query: Vec<String>,
    },

    /// List cities whose name starts with a prefix (diacritics ignored)
    Prefix {
        prefix: String,
    },

    /// Build the index from the snapshot and write a binary cache
    Build {
        /// Output file (default: next to the snapshot)
        output: Option<PathBuf>,
    },

    /// Interactive search loop; type `exit()` to quit
    Repl,
}
