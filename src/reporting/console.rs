// src/reporting/console.rs
//! Human-readable run summary for the terminal.

use std::fmt::Write;

use anyhow::Result;
use colored::Colorize;

use super::shared::{cell, pluralize, score};
use crate::ingest::IngestReport;
use crate::pipeline::AnalysisReport;

const USER_WIDTH: usize = 24;

/// Prints one analysis run to stdout.
///
/// # Errors
/// Returns error if formatting fails.
pub fn print_report(report: &AnalysisReport, top: usize) -> Result<()> {
    print!("{}", render_report(report, top)?);
    Ok(())
}

/// Formats one analysis run, listing at most `top` spreaders.
///
/// # Errors
/// Returns error if formatting fails.
pub fn render_report(report: &AnalysisReport, top: usize) -> Result<String> {
    let mut out = String::new();
    write_network(&mut out, report)?;
    write_cascades(&mut out, report)?;
    write_spreaders(&mut out, report, top)?;
    writeln!(out, "{} {}", "digest".dimmed(), report.ranking_digest.dimmed())?;
    Ok(out)
}

fn write_network(out: &mut String, report: &AnalysisReport) -> Result<()> {
    let m = &report.metrics;
    writeln!(out, "{}", "NETWORK".cyan().bold())?;
    writeln!(
        out,
        "  {} {}, {} {}, density {}",
        m.num_nodes,
        pluralize("user", m.num_nodes),
        m.num_edges,
        pluralize("edge", m.num_edges),
        score(m.density)
    )?;
    writeln!(
        out,
        "  {} {}, {} {} (largest {}), modularity {}",
        m.component_count,
        pluralize("component", m.component_count),
        m.community_count,
        if m.community_count == 1 { "community" } else { "communities" },
        m.largest_community_size,
        score(m.modularity)
    )?;
    if !m.subreddit_activity.is_empty() {
        let activity: Vec<String> = m
            .subreddit_activity
            .iter()
            .map(|(sub, a)| {
                format!(
                    "r/{sub} {} {}, {} {}",
                    a.posts,
                    pluralize("post", a.posts),
                    a.replies,
                    if a.replies == 1 { "reply" } else { "replies" }
                )
            })
            .collect();
        writeln!(out, "  {}", activity.join(", ").dimmed())?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_cascades(out: &mut String, report: &AnalysisReport) -> Result<()> {
    let s = &report.summary;
    writeln!(
        out,
        "{} ({}h window: {} of {} flagged)",
        "CASCADES".cyan().bold(),
        report.window_hours,
        s.cascades_built,
        s.flagged_requested
    )?;
    for c in &report.cascades {
        writeln!(
            out,
            "  {} by {}  depth {}  users {}  velocity {}/h  {}",
            c.root_content_id.yellow(),
            c.root_user_id,
            c.depth,
            c.size(),
            score(c.velocity),
            c.subreddits
                .iter()
                .map(|s| format!("r/{s}"))
                .collect::<Vec<_>>()
                .join(" ")
                .dimmed()
        )?;
    }
    for skipped in &s.skipped {
        writeln!(
            out,
            "  {} {} ({:?})",
            "skipped".yellow(),
            skipped.content_id,
            skipped.reason
        )?;
    }
    writeln!(out)?;
    Ok(())
}

fn write_spreaders(out: &mut String, report: &AnalysisReport, top: usize) -> Result<()> {
    writeln!(out, "{}", "SPREADERS".cyan().bold())?;
    if report.ranking.is_empty() {
        writeln!(out, "  {}", "no users".dimmed())?;
        writeln!(out)?;
        return Ok(());
    }
    writeln!(
        out,
        "  {:>3}  {}  {:>8}  {:>9}  {:>6}  {:>7}  {}",
        "#",
        cell("user", USER_WIDTH),
        "risk",
        "influence",
        "bridge",
        "cascades",
        "main factor"
    )?;
    for (i, s) in report.ranking.iter().take(top).enumerate() {
        let factor = s.rationale.first().map_or("-", |f| f.factor.label());
        let risk = score(s.risk_score);
        let risk = if i == 0 && s.risk_score > 0.0 {
            risk.red().bold()
        } else {
            risk.normal()
        };
        writeln!(
            out,
            "  {:>3}  {}  {:>8}  {:>9}  {:>6}  {:>7}  {}",
            i + 1,
            cell(&s.user_id, USER_WIDTH),
            risk,
            score(s.influence_score),
            format!("{:.2}", s.community_bridge_score),
            s.cascade_participation_count,
            factor.dimmed()
        )?;
    }
    writeln!(out)?;
    Ok(())
}

/// Prints what ingestion kept and rejected.
///
/// # Errors
/// Returns error if formatting fails.
pub fn print_ingest_summary(report: &IngestReport) -> Result<()> {
    let mut out = String::new();
    writeln!(
        out,
        "{} {} {}, {} {}, {} {} accepted",
        "INGEST".cyan().bold(),
        report.files_read,
        pluralize("file", report.files_read),
        report.origins_accepted,
        pluralize("post", report.origins_accepted),
        report.events_accepted,
        pluralize("event", report.events_accepted)
    )?;
    if report.filtered_out > 0 {
        writeln!(out, "  {} outside the subreddit filter", report.filtered_out)?;
    }
    if report.rejected_count() > 0 {
        writeln!(
            out,
            "  {} {} rejected",
            report.rejected_count().to_string().yellow(),
            pluralize("record", report.rejected_count())
        )?;
    }
    eprint!("{out}");
    Ok(())
}
