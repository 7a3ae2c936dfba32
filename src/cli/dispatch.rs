//! Command dispatch logic extracted from the binary.

use std::path::Path;

use anyhow::Result;

use super::args::{AnalyzeArgs, Commands};
use super::handlers::{handle_analyze, handle_config, handle_ingest};
use crate::exit::InfoflowExit;

/// Executes the parsed command.
///
/// # Errors
/// Returns error if the command handler fails.
pub fn execute(command: Commands, config: Option<&Path>) -> Result<InfoflowExit> {
    match command {
        Commands::Analyze {
            input,
            flagged,
            window_hours,
            subreddit,
            format,
            top,
            sequential,
        } => handle_analyze(
            &AnalyzeArgs {
                input,
                flagged,
                window_hours,
                subreddit,
                format,
                top,
                sequential,
            },
            config,
        ),
        Commands::Ingest {
            input,
            subreddit,
            out,
        } => handle_ingest(&input, subreddit.as_deref(), out.as_deref(), config),
        Commands::Config => handle_config(config),
    }
}
