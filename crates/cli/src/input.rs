use anyhow::{Context as AnyhowContext, Result};
use issue_tracking::{checksum, Finding, IssueSeverity, RuleType, TrackerConfig};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Finding as written in input files.
///
/// Hashes may be given directly, or as the text they are computed from.
#[derive(Debug, Deserialize)]
struct FindingRecord {
    rule_key: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    line: Option<usize>,
    #[serde(default)]
    text_range_hash: Option<i32>,
    #[serde(default)]
    text_range_content: Option<String>,
    #[serde(default)]
    line_hash: Option<i32>,
    #[serde(default)]
    line_content: Option<String>,
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

impl FindingRecord {
    fn into_finding(self) -> issue_tracking::Result<Finding> {
        let mut finding = Finding::new(self.rule_key, self.message)?;
        finding.line = self.line;
        finding.text_range_hash = self
            .text_range_hash
            .or_else(|| self.text_range_content.as_deref().map(checksum));
        finding.line_hash = self
            .line_hash
            .or_else(|| self.line_content.as_deref().map(checksum));
        finding.server_issue_key = self.server_issue_key;
        finding.creation_date = self.creation_date;
        finding.resolved = self.resolved;
        finding.assignee = self.assignee;
        finding.severity = self.severity;
        finding.rule_type = self.rule_type;
        Ok(finding)
    }
}

/// Load a JSON array of findings
pub fn load_findings(path: &Path) -> Result<Vec<Finding>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read findings from {}", path.display()))?;
    parse_findings(&raw).with_context(|| format!("Invalid findings in {}", path.display()))
}

fn parse_findings(raw: &str) -> Result<Vec<Finding>> {
    let records: Vec<FindingRecord> = serde_json::from_str(raw).context("Expected a JSON array")?;
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            record
                .into_finding()
                .with_context(|| format!("Finding #{idx} is invalid"))
        })
        .collect()
}

/// Load tracker configuration from TOML, or the default cascade
pub fn load_config(path: Option<&Path>) -> Result<TrackerConfig> {
    let Some(path) = path else {
        return Ok(TrackerConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let config: TrackerConfig =
        toml::from_str(&raw).with_context(|| format!("Invalid config in {}", path.display()))?;
    Ok(config)
}
