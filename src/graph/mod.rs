// src/graph/mod.rs
//! The user interaction graph.

pub mod builder;
pub mod components;
pub mod exclusion;
pub mod model;
pub mod union_find;

#[cfg(test)]
pub(crate) mod test_support;

pub use builder::{build, build_with_origins};
pub use exclusion::Exclusion;
pub use model::{ContentIndex, ContentRecord, Edge, InteractionGraph, SubredditActivity};
