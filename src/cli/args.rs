use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::reporting::OutputFormat;

#[derive(Parser)]
#[command(
    name = "infoflow",
    version,
    about = "Interaction graph and propagation analysis for community forums"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,
    /// Config file (default: ./infoflow.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the graph and rank likely spreaders of flagged content
    Analyze {
        /// Dump files or directories of `*.json` dumps
        #[arg(long, short, required = true, value_name = "PATH")]
        input: Vec<PathBuf>,
        /// Flagged content ids: JSON array or id -> severity object
        #[arg(long, value_name = "FILE")]
        flagged: Option<PathBuf>,
        /// Cascade window; repeat to sweep several windows
        #[arg(long = "window-hours", value_name = "HOURS")]
        window_hours: Vec<u64>,
        /// Only keep records from this subreddit
        #[arg(long)]
        subreddit: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Terminal)]
        format: OutputFormat,
        /// Spreaders shown in the terminal report
        #[arg(long)]
        top: Option<usize>,
        /// Disable worker threads
        #[arg(long)]
        sequential: bool,
    },
    /// Normalize dumps into interaction events
    Ingest {
        #[arg(long, short, required = true, value_name = "PATH")]
        input: Vec<PathBuf>,
        #[arg(long)]
        subreddit: Option<String>,
        /// Write events here instead of stdout
        #[arg(long, short, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// Arguments for the analyze command (used by handlers)
#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    pub input: Vec<PathBuf>,
    pub flagged: Option<PathBuf>,
    pub window_hours: Vec<u64>,
    pub subreddit: Option<String>,
    pub format: OutputFormat,
    pub top: Option<usize>,
    pub sequential: bool,
}
