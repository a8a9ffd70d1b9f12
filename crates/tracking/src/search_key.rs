use crate::types::Trackable;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One pass of the tracking cascade.
///
/// Each strategy derives a [`SearchKey`] from a finding; two findings with
/// equal keys are the same issue at that strategy's precision. Variants are
/// listed from the most to the least precise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Same rule, same line, same flagged text (message may differ)
    LineAndTextRangeHash,
    /// Same rule, same flagged text, same message (line may have moved)
    TextRangeHashAndMessage,
    /// Same rule, same line, same message (range may have been recomputed)
    LineAndMessage,
    /// Same rule and flagged text, line and message both changed
    TextRangeHash,
    /// Same rule, same line, same line content
    LineAndLineHash,
    /// Same rule and line content anywhere in the file
    LineHash,
    /// Same non-blank server issue key, content ignored
    ServerIssueKey,
}

impl MatchStrategy {
    /// Every strategy, in the order the tracker applies them
    pub const CASCADE: [Self; 7] = [
        Self::LineAndTextRangeHash,
        Self::TextRangeHashAndMessage,
        Self::LineAndMessage,
        Self::TextRangeHash,
        Self::LineAndLineHash,
        Self::LineHash,
        Self::ServerIssueKey,
    ];

    /// Derive the search key of `trackable` under this strategy.
    ///
    /// Returns `None` when the finding can never match under this strategy,
    /// which only happens for a blank or missing server issue key. Missing
    /// optional attributes otherwise take part in equality as a value.
    pub fn search_key<'a, T: Trackable + ?Sized>(self, trackable: &'a T) -> Option<SearchKey<'a>> {
        let rule_key = trackable.rule_key();
        let key = match self {
            Self::LineAndTextRangeHash => SearchKey::LineAndTextRangeHash {
                rule_key,
                line: trackable.line(),
                text_range_hash: trackable.text_range_hash(),
            },
            Self::TextRangeHashAndMessage => SearchKey::TextRangeHashAndMessage {
                rule_key,
                message: trackable.message(),
                text_range_hash: trackable.text_range_hash(),
            },
            Self::LineAndMessage => SearchKey::LineAndMessage {
                rule_key,
                message: trackable.message(),
                line: trackable.line(),
            },
            Self::TextRangeHash => SearchKey::TextRangeHash {
                rule_key,
                text_range_hash: trackable.text_range_hash(),
            },
            Self::LineAndLineHash => SearchKey::LineAndLineHash {
                rule_key,
                line: trackable.line(),
                line_hash: trackable.line_hash(),
            },
            Self::LineHash => SearchKey::LineHash {
                rule_key,
                line_hash: trackable.line_hash(),
            },
            Self::ServerIssueKey => {
                let server_issue_key = trackable
                    .server_issue_key()
                    .filter(|key| !key.trim().is_empty())?;
                SearchKey::ServerIssue { server_issue_key }
            }
        };
        Some(key)
    }

    /// Whether this strategy looks at finding content (as opposed to server identity)
    #[must_use]
    pub const fn is_content_based(self) -> bool {
        !matches!(self, Self::ServerIssueKey)
    }

    /// Get the config/report name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LineAndTextRangeHash => "line_and_text_range_hash",
            Self::TextRangeHashAndMessage => "text_range_hash_and_message",
            Self::LineAndMessage => "line_and_message",
            Self::TextRangeHash => "text_range_hash",
            Self::LineAndLineHash => "line_and_line_hash",
            Self::LineHash => "line_hash",
            Self::ServerIssueKey => "server_issue_key",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key derived from a finding by one [`MatchStrategy`].
///
/// Keys borrow from the finding they were derived from. Keys of different
/// strategies are distinct variants and never compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchKey<'a> {
    LineAndTextRangeHash {
        rule_key: &'a str,
        line: Option<usize>,
        text_range_hash: Option<i32>,
    },
    TextRangeHashAndMessage {
        rule_key: &'a str,
        message: &'a str,
        text_range_hash: Option<i32>,
    },
    LineAndMessage {
        rule_key: &'a str,
        message: &'a str,
        line: Option<usize>,
    },
    TextRangeHash {
        rule_key: &'a str,
        text_range_hash: Option<i32>,
    },
    LineAndLineHash {
        rule_key: &'a str,
        line: Option<usize>,
        line_hash: Option<i32>,
    },
    LineHash {
        rule_key: &'a str,
        line_hash: Option<i32>,
    },
    ServerIssue {
        server_issue_key: &'a str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Finding;

    fn finding(rule: &str, line: usize, text_range_hash: i32, message: &str) -> Finding {
        Finding::new(rule, message)
            .unwrap()
            .with_line(line)
            .with_text_range_hash(text_range_hash)
    }

    #[test]
    fn test_cascade_order() {
        assert_eq!(MatchStrategy::CASCADE[0], MatchStrategy::LineAndTextRangeHash);
        assert_eq!(MatchStrategy::CASCADE[6], MatchStrategy::ServerIssueKey);
        let content = MatchStrategy::CASCADE
            .iter()
            .filter(|s| s.is_content_based())
            .count();
        assert_eq!(content, 6);
    }

    #[test]
    fn test_line_and_text_range_hash_ignores_message() {
        let a = finding("S100", 10, 555, "one");
        let b = finding("S100", 10, 555, "two");
        let s = MatchStrategy::LineAndTextRangeHash;
        assert_eq!(s.search_key(&a), s.search_key(&b));
    }

    #[test]
    fn test_rule_key_always_part_of_key() {
        let a = finding("S100", 10, 555, "m");
        let b = finding("S200", 10, 555, "m");
        for strategy in MatchStrategy::CASCADE {
            if strategy.is_content_based() {
                assert_ne!(strategy.search_key(&a), strategy.search_key(&b), "{strategy}");
            }
        }
    }

    #[test]
    fn test_missing_values_compare_equal() {
        let a = Finding::new("S100", "m").unwrap();
        let b = Finding::new("S100", "m").unwrap();
        for strategy in MatchStrategy::CASCADE {
            if strategy.is_content_based() {
                assert_eq!(strategy.search_key(&a), strategy.search_key(&b), "{strategy}");
            }
        }

        let c = Finding::new("S100", "m").unwrap().with_line(1);
        let s = MatchStrategy::LineAndMessage;
        assert_ne!(s.search_key(&a), s.search_key(&c));
    }

    #[test]
    fn test_blank_server_key_has_no_search_key() {
        let s = MatchStrategy::ServerIssueKey;
        let none = Finding::new("S100", "m").unwrap();
        let blank = Finding::new("S100", "m").unwrap().with_server_issue_key("   ");
        let empty = Finding::new("S100", "m").unwrap().with_server_issue_key("");
        assert_eq!(s.search_key(&none), None);
        assert_eq!(s.search_key(&blank), None);
        assert_eq!(s.search_key(&empty), None);
    }

    #[test]
    fn test_server_key_ignores_content() {
        let s = MatchStrategy::ServerIssueKey;
        let a = finding("S100", 1, 1, "a").with_server_issue_key("AX-1");
        let b = finding("S999", 2, 2, "b").with_server_issue_key("AX-1");
        assert_eq!(s.search_key(&a), Some(SearchKey::ServerIssue { server_issue_key: "AX-1" }));
        assert_eq!(s.search_key(&a), s.search_key(&b));
    }

    #[test]
    fn test_strategy_serializes_as_config_name() {
        for strategy in MatchStrategy::CASCADE {
            let json = serde_json::to_string(&strategy).unwrap();
            assert_eq!(json, format!("\"{}\"", strategy.as_str()));
        }
    }
}
