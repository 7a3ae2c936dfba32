//! Interaction graph and propagation analysis.
//!
//! Stages run in a fixed order: [`graph::build`], [`centrality::compute`],
//! [`community::partition`], [`propagation::analyze_cascades`] and
//! [`ranking::rank`]. [`pipeline::Analyzer`] composes them for one run.

pub mod cache;
pub mod centrality;
pub mod cli;
pub mod community;
pub mod config;
pub mod error;
pub mod exit;
pub mod graph;
pub mod ingest;
pub mod pipeline;
pub mod propagation;
pub mod ranking;
pub mod reporting;
pub mod types;
