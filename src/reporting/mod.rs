// src/reporting/mod.rs
//! Output formatting for analysis runs.

pub mod console;
pub mod json;
mod shared;

use clap::ValueEnum;

pub use console::{print_ingest_summary, print_report, render_report};
pub use json::{print_json, RunOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Terminal,
    Json,
}
