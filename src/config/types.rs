use serde::{Deserialize, Serialize};

/// Who is kept out of the interaction graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Explicit user ids to drop (bots, moderators, test accounts).
    #[serde(default)]
    pub exclude_ids: Vec<String>,
    /// Placeholder authors the platform substitutes for deleted accounts.
    #[serde(default = "default_deleted_sentinels")]
    pub deleted_sentinels: Vec<String>,
    /// Regexes matched against every observed user id.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            exclude_ids: Vec::new(),
            deleted_sentinels: default_deleted_sentinels(),
            exclude_patterns: Vec::new(),
        }
    }
}

fn default_deleted_sentinels() -> Vec<String> {
    vec!["[deleted]".to_string(), "[removed]".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropagationConfig {
    #[serde(default = "default_window_hours")]
    pub cascade_window_hours: u64,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            cascade_window_hours: default_window_hours(),
        }
    }
}

const fn default_window_hours() -> u64 { 72 }

/// Weights of the two centrality measures inside `influence_score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralityWeighting {
    #[serde(default = "default_half")]
    pub degree_weight: f64,
    #[serde(default = "default_half")]
    pub betweenness_weight: f64,
}

impl Default for CentralityWeighting {
    fn default() -> Self {
        Self {
            degree_weight: default_half(),
            betweenness_weight: default_half(),
        }
    }
}

impl CentralityWeighting {
    /// Returns the weights scaled to sum to one.
    #[must_use]
    pub fn normalized(&self) -> (f64, f64) {
        let total = self.degree_weight + self.betweenness_weight;
        if total <= 0.0 {
            return (0.5, 0.5);
        }
        (self.degree_weight / total, self.betweenness_weight / total)
    }
}

const fn default_half() -> f64 { 0.5 }

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommunityConfig {
    /// Seeds the node visiting order of the local-moving phase.
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_resolution")]
    pub resolution: f64,
    /// Local-moving sweeps per level before giving up on convergence.
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,
    /// Aggregation levels.
    #[serde(default = "default_max_levels")]
    pub max_levels: usize,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            resolution: default_resolution(),
            max_passes: default_max_passes(),
            max_levels: default_max_levels(),
        }
    }
}

pub const DEFAULT_COMMUNITY_SEED: u64 = 0x1F0_F10E;

const fn default_seed() -> u64 { DEFAULT_COMMUNITY_SEED }
const fn default_resolution() -> f64 { 1.0 }
const fn default_max_passes() -> usize { 64 }
const fn default_max_levels() -> usize { 16 }

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Fan per-component and per-cascade work out over rayon.
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Users listed per measure in the network summary.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            top_n: default_top_n(),
        }
    }
}

const fn default_true() -> bool { true }
const fn default_top_n() -> usize { 10 }

/// On-disk shape of `infoflow.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoflowToml {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub propagation: PropagationConfig,
    #[serde(default)]
    pub centrality: CentralityWeighting,
    #[serde(default)]
    pub community: CommunityConfig,
    #[serde(default)]
    pub run: RunConfig,
}
