//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Split group expenses across rounds and print who owes what.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(name = "dutch")]
pub struct Cli {
    /// Configuration file; defaults to config/default and config/$RUN_MODE
    #[arg(short, long, env = "DUTCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Dutch commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate a settlement request and print the checklist
    Check {
        /// Request JSON file, or `-` for stdin
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Validate and settle a request
    Settle {
        /// Request JSON file, or `-` for stdin
        #[arg(short, long)]
        input: PathBuf,

        /// Output rendering
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Chat)]
        format: OutputFormat,
    },

    /// Print the amount a piece of text parses to
    ParseAmount {
        /// Amount text such as `3만500` or `12,000`
        text: String,
    },
}

/// Settlement output rendering.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Per-participant chat breakdown, leader omitted
    Chat,
    /// One line per participant, leader included
    Summary,
    /// Full result as JSON
    Json,
}
