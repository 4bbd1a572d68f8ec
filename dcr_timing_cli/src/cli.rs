//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Mine time distributions of DCR conditions and responses from event logs.
///
/// Delays are mined for conditions, deadlines for responses. The mined bounds
/// are written back into copies of the model.
#[derive(Debug, Parser)]
#[command(name = "dcr-timing", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Mine timings of all conditions and responses of a model.
    Mine {
        /// Event log (`.xes`, `.xes.gz`, `.csv`, `.csv.gz` or `.json`).
        log: PathBuf,

        /// DCR model text file.
        model: PathBuf,

        /// Directory to write results to (created if missing).
        #[arg(short, long, default_value = ".")]
        output: PathBuf,

        /// JSON file with mining and import options (see `schema`).
        #[arg(long)]
        options: Option<PathBuf>,
    },

    /// Print the JSON schema of the options file.
    Schema,
}
