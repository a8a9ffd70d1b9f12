use crate::error::{Result, TrackingError};
use crate::search_key::MatchStrategy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for the tracker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Strategies to apply, most precise first. The tracker never reorders them.
    pub strategies: Vec<MatchStrategy>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            strategies: MatchStrategy::CASCADE.to_vec(),
        }
    }
}

impl TrackerConfig {
    /// Cascade without the server key pass, for findings never synced to a server
    pub fn content_only() -> Self {
        Self {
            strategies: MatchStrategy::CASCADE
                .into_iter()
                .filter(|s| s.is_content_based())
                .collect(),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.strategies.is_empty() {
            return Err(TrackingError::invalid_config(
                "at least one strategy is required",
            ));
        }

        let mut seen = HashSet::new();
        for &strategy in &self.strategies {
            if !seen.insert(strategy) {
                return Err(TrackingError::DuplicateStrategy(strategy));
            }
        }

        Ok(())
    }
}
