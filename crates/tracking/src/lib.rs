//! # Issue Tracking
//!
//! Keeps the identity of findings stable across successive analyses of a file.
//!
//! Line numbers shift, code is edited, messages and ranges drift between two
//! analysis runs. The tracker decides which newly found ("raw") finding
//! continues which previously known ("base") finding, so that history such as
//! creation date, resolution or server key survives the edit.
//!
//! ## Architecture
//!
//! ```text
//! raw findings + base findings
//!     │
//!     ├──> Tracker: cascade of strategies, most precise first
//!     │      ├─ 1. rule + line + text range hash
//!     │      ├─ 2. rule + text range hash + message
//!     │      ├─ 3. rule + line + message
//!     │      ├─ 4. rule + text range hash
//!     │      ├─ 5. rule + line + line hash
//!     │      ├─ 6. rule + line hash
//!     │      └─ 7. server issue key
//!     │
//!     ├──> Tracking: raw → base mapping, unmatched raws (new issues),
//!     │              unmatched bases (candidates for closing)
//!     │
//!     └──> History: copy identity onto matched raws, stamp new ones
//! ```
//!
//! ## Example
//!
//! ```rust
//! use issue_tracking::{Finding, MatchStrategy, Tracker};
//!
//! let base = vec![Finding::new("S100", "Rename this method")
//!     .unwrap()
//!     .with_line(10)
//!     .with_text_range_hash(555)];
//! let raw = vec![Finding::new("S100", "Rename this method")
//!     .unwrap()
//!     .with_line(12)
//!     .with_text_range_hash(555)];
//!
//! let tracking = Tracker::default().track(&raw, &base);
//! assert_eq!(tracking.strategy_for(0), Some(MatchStrategy::TextRangeHashAndMessage));
//! assert_eq!(tracking.unmatched_bases().count(), 0);
//! ```

mod checksum;
mod config;
mod error;
mod history;
mod search_key;
mod tracker;
mod tracking;
mod types;

pub use checksum::checksum;
pub use config::TrackerConfig;
pub use error::{Result, TrackingError};
pub use history::{HistoryMatchSummary, LocalHistoryTracker, ServerIssueTracker, ServerMatchSummary};
pub use search_key::{MatchStrategy, SearchKey};
pub use tracker::Tracker;
pub use tracking::{Match, SingleTracking, Tracking};
pub use types::{Finding, IssueSeverity, RuleType, Trackable};
