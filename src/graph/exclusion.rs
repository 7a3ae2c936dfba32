// src/graph/exclusion.rs
//! Accounts kept out of the graph: explicit ids, deleted-account
//! placeholders, and bot-name patterns.

use std::collections::BTreeSet;

use regex::Regex;

use crate::config::Config;
use crate::error::Result;
use crate::types::UserId;

#[derive(Debug, Clone, Default)]
pub struct Exclusion {
    ids: BTreeSet<UserId>,
    patterns: Vec<Regex>,
}

impl Exclusion {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the exclusion from `[graph]` settings.
    ///
    /// # Errors
    /// Returns an error if an exclusion pattern does not compile.
    pub fn from_config(config: &Config) -> Result<Self> {
        let ids = config
            .graph
            .exclude_ids
            .iter()
            .chain(config.graph.deleted_sentinels.iter())
            .cloned()
            .chain(std::iter::once(config.deleted_author().to_string()))
            .collect();
        Ok(Self {
            ids,
            patterns: config.exclusion_patterns()?,
        })
    }

    #[must_use]
    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<UserId>,
    {
        self.ids.extend(ids.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn is_excluded(&self, user_id: &str) -> bool {
        user_id.is_empty()
            || self.ids.contains(user_id)
            || self.patterns.iter().any(|p| p.is_match(user_id))
    }
}

impl From<&BTreeSet<UserId>> for Exclusion {
    fn from(ids: &BTreeSet<UserId>) -> Self {
        Self::new().with_ids(ids.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_exclusion_covers_sentinels_and_patterns() {
        let mut config = Config::new();
        config.graph.exclude_ids.push("spam_account".into());
        config.graph.exclude_patterns.push("(?i)bot$".into());
        let ex = Exclusion::from_config(&config).unwrap();

        assert!(ex.is_excluded("[deleted]"));
        assert!(ex.is_excluded("spam_account"));
        assert!(ex.is_excluded("HelperBot"));
        assert!(!ex.is_excluded("alice"));
    }

    #[test]
    fn empty_id_is_always_excluded() {
        assert!(Exclusion::new().is_excluded(""));
    }
}
