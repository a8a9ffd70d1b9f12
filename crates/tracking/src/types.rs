use crate::checksum::checksum;
use crate::error::{Result, TrackingError};
use serde::{Deserialize, Serialize};

/// Identity attributes of a finding, as seen by the tracker.
///
/// Implementations are read-only views: the tracker never mutates them.
/// `rule_key` must never be empty; reject such findings when they are built.
pub trait Trackable {
    /// Key of the rule that raised the finding
    fn rule_key(&self) -> &str;

    /// 1-indexed line the finding is anchored to, if any
    fn line(&self) -> Option<usize>;

    /// Checksum of the exact flagged text
    fn text_range_hash(&self) -> Option<i32>;

    /// Checksum of the whole line holding the finding
    fn line_hash(&self) -> Option<i32>;

    /// Finding message, compared for equality
    fn message(&self) -> &str;

    /// Key assigned by a remote server once the finding was synced there
    fn server_issue_key(&self) -> Option<&str>;
}

impl<T: Trackable + ?Sized> Trackable for &T {
    fn rule_key(&self) -> &str {
        (**self).rule_key()
    }

    fn line(&self) -> Option<usize> {
        (**self).line()
    }

    fn text_range_hash(&self) -> Option<i32> {
        (**self).text_range_hash()
    }

    fn line_hash(&self) -> Option<i32> {
        (**self).line_hash()
    }

    fn message(&self) -> &str {
        (**self).message()
    }

    fn server_issue_key(&self) -> Option<&str> {
        (**self).server_issue_key()
    }
}

/// A finding with its identity attributes and the history it carries
/// across analyses.
///
/// The rule key is only set through [`Finding::new`] or deserialization,
/// both of which reject a blank key. Read it with [`Trackable::rule_key`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "FindingFields")]
pub struct Finding {
    /// Rule that raised the finding
    rule_key: String,

    /// Finding message
    pub message: String,

    /// Start line (1-indexed)
    #[serde(default)]
    pub line: Option<usize>,

    /// Checksum of the flagged text range
    #[serde(default)]
    pub text_range_hash: Option<i32>,

    /// Checksum of the full line
    #[serde(default)]
    pub line_hash: Option<i32>,

    /// Server-side issue key, once synced
    #[serde(default)]
    pub server_issue_key: Option<String>,

    /// First time the finding was seen (millis since epoch)
    #[serde(default)]
    pub creation_date: Option<i64>,

    /// Marked resolved (locally or on the server)
    #[serde(default)]
    pub resolved: bool,

    /// Assignee login on the server
    #[serde(default)]
    pub assignee: Option<String>,

    #[serde(default)]
    pub severity: Option<IssueSeverity>,

    #[serde(default)]
    pub rule_type: Option<RuleType>,
}

impl Finding {
    /// Create a finding for `rule_key` with `message`.
    ///
    /// Fails with [`TrackingError::EmptyRuleKey`] when the rule key is blank.
    pub fn new(rule_key: impl Into<String>, message: impl Into<String>) -> Result<Self> {
        let finding = Self {
            rule_key: rule_key.into(),
            message: message.into(),
            line: None,
            text_range_hash: None,
            line_hash: None,
            server_issue_key: None,
            creation_date: None,
            resolved: false,
            assignee: None,
            severity: None,
            rule_type: None,
        };
        finding.validate()?;
        Ok(finding)
    }

    fn validate(&self) -> Result<()> {
        if self.rule_key.trim().is_empty() {
            return Err(TrackingError::EmptyRuleKey);
        }
        Ok(())
    }

    /// Builder: set line
    #[must_use]
    pub const fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Builder: set text range hash
    #[must_use]
    pub const fn with_text_range_hash(mut self, hash: i32) -> Self {
        self.text_range_hash = Some(hash);
        self
    }

    /// Builder: set line hash
    #[must_use]
    pub const fn with_line_hash(mut self, hash: i32) -> Self {
        self.line_hash = Some(hash);
        self
    }

    /// Builder: hash the flagged text
    #[must_use]
    pub fn with_text_range_content(mut self, content: &str) -> Self {
        self.text_range_hash = Some(checksum(content));
        self
    }

    /// Builder: hash the content of the whole line
    #[must_use]
    pub fn with_line_content(mut self, content: &str) -> Self {
        self.line_hash = Some(checksum(content));
        self
    }

    /// Builder: set server issue key
    #[must_use]
    pub fn with_server_issue_key(mut self, key: impl Into<String>) -> Self {
        self.server_issue_key = Some(key.into());
        self
    }

    /// Builder: set creation date
    #[must_use]
    pub const fn with_creation_date(mut self, millis: i64) -> Self {
        self.creation_date = Some(millis);
        self
    }

    /// Builder: set resolved flag
    #[must_use]
    pub const fn with_resolved(mut self, resolved: bool) -> Self {
        self.resolved = resolved;
        self
    }

    /// Builder: set assignee
    #[must_use]
    pub fn with_assignee(mut self, assignee: impl Into<String>) -> Self {
        self.assignee = Some(assignee.into());
        self
    }

    /// Builder: set severity
    #[must_use]
    pub const fn with_severity(mut self, severity: IssueSeverity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Builder: set rule type
    #[must_use]
    pub const fn with_rule_type(mut self, rule_type: RuleType) -> Self {
        self.rule_type = Some(rule_type);
        self
    }
}

/// Serialized form of [`Finding`], checked before it becomes one
#[derive(Deserialize)]
struct FindingFields {
    rule_key: String,
    message: String,
    #[serde(default)]
    line: Option<usize>,
    #[serde(default)]
    text_range_hash: Option<i32>,
    #[serde(default)]
    line_hash: Option<i32>,
    #[serde(default)]
    server_issue_key: Option<String>,
    #[serde(default)]
    creation_date: Option<i64>,
    #[serde(default)]
    resolved: bool,
    #[serde(default)]
    assignee: Option<String>,
    #[serde(default)]
    severity: Option<IssueSeverity>,
    #[serde(default)]
    rule_type: Option<RuleType>,
}

impl TryFrom<FindingFields> for Finding {
    type Error = TrackingError;

    fn try_from(fields: FindingFields) -> Result<Self> {
        let finding = Self {
            rule_key: fields.rule_key,
            message: fields.message,
            line: fields.line,
            text_range_hash: fields.text_range_hash,
            line_hash: fields.line_hash,
            server_issue_key: fields.server_issue_key,
            creation_date: fields.creation_date,
            resolved: fields.resolved,
            assignee: fields.assignee,
            severity: fields.severity,
            rule_type: fields.rule_type,
        };
        finding.validate()?;
        Ok(finding)
    }
}

impl Trackable for Finding {
    fn rule_key(&self) -> &str {
        &self.rule_key
    }

    fn line(&self) -> Option<usize> {
        self.line
    }

    fn text_range_hash(&self) -> Option<i32> {
        self.text_range_hash
    }

    fn line_hash(&self) -> Option<i32> {
        self.line_hash
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn server_issue_key(&self) -> Option<&str> {
        self.server_issue_key.as_deref()
    }
}

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueSeverity {
    Blocker,
    Critical,
    Major,
    Minor,
    Info,
}

/// Kind of rule that raised a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleType {
    CodeSmell,
    Bug,
    Vulnerability,
    SecurityHotspot,
}
