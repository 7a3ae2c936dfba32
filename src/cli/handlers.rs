// src/cli/handlers.rs
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use colored::Colorize;

use crate::cli::args::AnalyzeArgs;
use crate::config::Config;
use crate::error::InfoflowError;
use crate::exit::InfoflowExit;
use crate::ingest;
use crate::pipeline::Analyzer;
use crate::reporting::{self, OutputFormat, RunOutput};
use crate::types::Annotations;

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(p) => Config::load_from(p)?,
        None => Config::load()?,
    };
    Ok(config)
}

/// Windows to run: the flags if given, else the configured window.
fn resolve_windows(args: &AnalyzeArgs, config: &Config) -> Result<Vec<u64>> {
    if args.window_hours.contains(&0) {
        return Err(InfoflowError::InvalidInput("--window-hours must be at least 1".into()).into());
    }
    if args.window_hours.is_empty() {
        return Ok(vec![config.propagation.cascade_window_hours]);
    }
    let mut windows = args.window_hours.clone();
    windows.sort_unstable();
    windows.dedup();
    Ok(windows)
}

/// Handles the analyze command.
///
/// # Errors
/// Returns error if config, input or flagged files cannot be read.
pub fn handle_analyze(args: &AnalyzeArgs, config_path: Option<&Path>) -> Result<InfoflowExit> {
    let mut config = load_config(config_path)?;
    if args.sequential {
        config.run.parallel = false;
    }
    if let Some(top) = args.top {
        config.run.top_n = top;
    }
    let windows = resolve_windows(args, &config)?;

    let batch = ingest::load_with(&args.input, args.subreddit.as_deref(), config.deleted_author())?;
    let annotations = match &args.flagged {
        Some(path) => ingest::load_annotations(path)?,
        None => Annotations::new(),
    };

    let top = config.run.top_n;
    let analyzer = Analyzer::new(config);
    let graph = analyzer.build_graph(&batch.events, &batch.origins)?;
    let runs = analyzer.sweep(&graph, &annotations, &windows)?;

    match args.format {
        OutputFormat::Json => reporting::print_json(&RunOutput {
            ingest: &batch.report,
            runs: &runs,
        })?,
        OutputFormat::Terminal => {
            reporting::print_ingest_summary(&batch.report)?;
            for run in &runs {
                reporting::print_report(run, top)?;
            }
        }
    }
    Ok(InfoflowExit::Success)
}

/// Handles the ingest command.
///
/// # Errors
/// Returns error if config or inputs cannot be read, or the output cannot be
/// written.
pub fn handle_ingest(
    input: &[PathBuf],
    subreddit: Option<&str>,
    out: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<InfoflowExit> {
    let config = load_config(config_path)?;
    let batch = ingest::load_with(input, subreddit, config.deleted_author())?;
    let json = serde_json::to_string_pretty(&batch.events)?;

    match out {
        Some(path) => {
            fs::write(path, json).map_err(|e| InfoflowError::io(e, path))?;
            eprintln!(
                "{} wrote {} events to {}",
                "[OK]".green().bold(),
                batch.events.len(),
                path.display()
            );
        }
        None => println!("{json}"),
    }
    reporting::print_ingest_summary(&batch.report)?;
    Ok(InfoflowExit::Success)
}

/// Handles the config command.
///
/// # Errors
/// Returns error if the config file is invalid.
pub fn handle_config(config_path: Option<&Path>) -> Result<InfoflowExit> {
    let config = load_config(config_path)?;
    print!("{}", config.to_toml()?);
    Ok(InfoflowExit::Success)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_window_is_rejected() {
        let args = AnalyzeArgs {
            window_hours: vec![24, 0],
            ..AnalyzeArgs::default()
        };
        assert!(resolve_windows(&args, &Config::new()).is_err());
    }

    #[test]
    fn windows_default_to_config_and_are_sorted() {
        let config = Config::new();
        assert_eq!(
            resolve_windows(&AnalyzeArgs::default(), &config).unwrap(),
            [72]
        );
        let args = AnalyzeArgs {
            window_hours: vec![72, 6, 72],
            ..AnalyzeArgs::default()
        };
        assert_eq!(resolve_windows(&args, &config).unwrap(), [6, 72]);
    }
}
