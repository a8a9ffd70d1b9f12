use crate::search_key::MatchStrategy;
use thiserror::Error;

/// Result type for tracking operations
pub type Result<T> = std::result::Result<T, TrackingError>;

/// Errors raised while building findings or configuring a tracker.
///
/// Matching itself never fails: a finding without a counterpart is simply
/// left unmatched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackingError {
    /// A finding was built without a rule key
    #[error("Finding has an empty rule key")]
    EmptyRuleKey,

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The same strategy was listed twice
    #[error("Strategy listed more than once: {0}")]
    DuplicateStrategy(MatchStrategy),
}

impl TrackingError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
