// src/config/mod.rs
pub mod types;

pub use self::types::{
    CentralityWeighting, CommunityConfig, GraphConfig, InfoflowToml, PropagationConfig,
    RunConfig, DEFAULT_COMMUNITY_SEED,
};

use crate::error::{InfoflowError, Result};
use crate::ingest::DELETED_SENTINEL;
use chrono::Duration;
use regex::Regex;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "infoflow.toml";

/// Effective configuration for one analysis run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub graph: GraphConfig,
    pub propagation: PropagationConfig,
    pub centrality: CentralityWeighting,
    pub community: CommunityConfig,
    pub run: RunConfig,
}

impl From<InfoflowToml> for Config {
    fn from(file: InfoflowToml) -> Self {
        Self {
            graph: file.graph,
            propagation: file.propagation,
            centrality: file.centrality,
            community: file.community,
            run: file.run,
        }
    }
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `infoflow.toml` from the working directory, falling back to
    /// defaults when the file does not exist.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::load_from(path)
        } else {
            Ok(Self::new())
        }
    }

    /// Loads and validates configuration from an explicit path.
    ///
    /// # Errors
    /// Returns an error on I/O failure, malformed TOML, or invalid values.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| InfoflowError::io(e, path))?;
        let config = Self::parse_toml(&content)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parses and validates TOML content.
    ///
    /// # Errors
    /// Returns an error on malformed TOML or invalid values.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let file: InfoflowToml = toml::from_str(content)?;
        let config = Self::from(file);
        config.validate()?;
        Ok(config)
    }

    /// Validates value ranges and exclusion patterns.
    ///
    /// # Errors
    /// Returns `InvalidConfig` for out-of-range values and `Pattern` for
    /// regexes that do not compile.
    pub fn validate(&self) -> Result<()> {
        let w = &self.centrality;
        if !w.degree_weight.is_finite() || !w.betweenness_weight.is_finite() {
            return Err(InfoflowError::InvalidConfig(
                "centrality weights must be finite".into(),
            ));
        }
        if w.degree_weight < 0.0 || w.betweenness_weight < 0.0 {
            return Err(InfoflowError::InvalidConfig(
                "centrality weights must be non-negative".into(),
            ));
        }
        if w.degree_weight + w.betweenness_weight <= 0.0 {
            return Err(InfoflowError::InvalidConfig(
                "centrality weights must not both be zero".into(),
            ));
        }
        if self.propagation.cascade_window_hours == 0 {
            return Err(InfoflowError::InvalidConfig(
                "cascade_window_hours must be at least 1".into(),
            ));
        }
        let resolution = self.community.resolution;
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(InfoflowError::InvalidConfig(
                "community resolution must be a positive finite number".into(),
            ));
        }
        if self.community.max_levels == 0 || self.community.max_passes == 0 {
            return Err(InfoflowError::InvalidConfig(
                "community max_levels and max_passes must be at least 1".into(),
            ));
        }
        self.exclusion_patterns()?;
        Ok(())
    }

    /// Compiles `graph.exclude_patterns`.
    ///
    /// # Errors
    /// Returns the first pattern that fails to compile.
    pub fn exclusion_patterns(&self) -> Result<Vec<Regex>> {
        self.graph
            .exclude_patterns
            .iter()
            .map(|p| Regex::new(p).map_err(InfoflowError::from))
            .collect()
    }

    /// Placeholder written for unknown authors at ingestion: the first
    /// configured sentinel, or `[deleted]` when none is configured.
    #[must_use]
    pub fn deleted_author(&self) -> &str {
        self.graph
            .deleted_sentinels
            .first()
            .map_or(DELETED_SENTINEL, String::as_str)
    }

    #[must_use]
    pub fn cascade_window(&self) -> Duration {
        window_from_hours(self.propagation.cascade_window_hours)
    }

    /// Serializes the effective configuration.
    ///
    /// # Errors
    /// Returns error if serialization fails.
    pub fn to_toml(&self) -> Result<String> {
        let file = InfoflowToml {
            graph: self.graph.clone(),
            propagation: self.propagation.clone(),
            centrality: self.centrality,
            community: self.community,
            run: self.run,
        };
        toml::to_string_pretty(&file).map_err(|e| InfoflowError::InvalidConfig(e.to_string()))
    }
}

/// Longest window accepted; far beyond any real collection period.
const MAX_WINDOW_HOURS: u64 = 1_000_000_000;

/// Converts a whole-hour window, clamping absurd values instead of overflowing.
#[must_use]
pub fn window_from_hours(hours: u64) -> Duration {
    let clamped = hours.min(MAX_WINDOW_HOURS);
    #[allow(clippy::cast_possible_wrap)]
    Duration::hours(clamped as i64)
}
