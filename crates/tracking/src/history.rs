//! Applying a tracking outcome to findings.
//!
//! Two reconciliations are supported:
//! - against the local history of a file (the findings of the previous
//!   analysis), so that a re-raised issue keeps its creation date and
//!   server identity;
//! - against the issues stored on a remote server, which are authoritative
//!   for the server key, resolution, assignee, severity and type.

use crate::tracker::Tracker;
use crate::tracking::Match;
use crate::types::Finding;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Counts produced by one local history reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMatchSummary {
    /// Raw findings that continue a previous finding
    pub matched: usize,
    /// Raw findings seen for the first time
    pub new: usize,
    /// Previous findings still unclaimed for the file
    pub unmatched_previous: usize,
}

/// Reconciles each analysis of a file with the findings of its previous analysis.
///
/// Previous findings are kept per file. A previous finding claimed by a raw
/// finding leaves the pool, so later calls for the same file cannot claim it
/// a second time.
#[derive(Debug, Clone, Default)]
pub struct LocalHistoryTracker {
    tracker: Tracker,
    previous: HashMap<String, Vec<Finding>>,
}

impl LocalHistoryTracker {
    pub fn new(tracker: Tracker) -> Self {
        Self {
            tracker,
            previous: HashMap::new(),
        }
    }

    /// Create a tracker seeded with the previous findings of each file
    pub fn with_previous(tracker: Tracker, previous: HashMap<String, Vec<Finding>>) -> Self {
        Self { tracker, previous }
    }

    /// Replace the previous findings of `file`
    pub fn set_previous(&mut self, file: impl Into<String>, findings: Vec<Finding>) {
        self.previous.insert(file.into(), findings);
    }

    /// Previous findings of `file` that no raw finding claimed yet
    pub fn unmatched_previous(&self, file: &str) -> &[Finding] {
        self.previous.get(file).map_or(&[], Vec::as_slice)
    }

    /// Forget `file`, returning its unclaimed previous findings
    pub fn close_file(&mut self, file: &str) -> Vec<Finding> {
        self.previous.remove(file).unwrap_or_default()
    }

    /// Reconcile the raw findings of `file` with its previous findings.
    ///
    /// A matched raw finding inherits the creation date, server issue key,
    /// resolution and assignee of the previous finding, and keeps its own
    /// severity and type. An unmatched raw finding is new: it is stamped with
    /// `now` and any server details it carried are wiped.
    pub fn match_with_previous_findings(
        &mut self,
        file: &str,
        raws: &mut [Finding],
        now: i64,
    ) -> HistoryMatchSummary {
        let mut no_history = Vec::new();
        let pool = self.previous.get_mut(file).unwrap_or(&mut no_history);
        let matches: Vec<Match> = self.tracker.track(&*raws, pool.as_slice()).matches().collect();

        let mut raw_matched = vec![false; raws.len()];
        let mut base_claimed = vec![false; pool.len()];
        for m in &matches {
            copy_from_previous(&mut raws[m.raw], &pool[m.base]);
            raw_matched[m.raw] = true;
            base_claimed[m.base] = true;
        }

        for (raw, _) in raws.iter_mut().zip(&raw_matched).filter(|(_, matched)| !**matched) {
            mark_new(raw, now);
        }

        let mut claimed = base_claimed.into_iter();
        pool.retain(|_| !claimed.next().unwrap_or(false));

        let summary = HistoryMatchSummary {
            matched: matches.len(),
            new: raws.len() - matches.len(),
            unmatched_previous: pool.len(),
        };
        log::debug!(
            "{file}: {} finding(s) matched local history, {} new, {} previous left",
            summary.matched,
            summary.new,
            summary.unmatched_previous
        );
        summary
    }

    /// Reconcile a single raw finding of `file`; returns whether it matched
    pub fn match_with_previous_finding(&mut self, file: &str, raw: &mut Finding, now: i64) -> bool {
        let summary = self.match_with_previous_findings(file, std::slice::from_mut(raw), now);
        summary.matched == 1
    }
}

fn copy_from_previous(raw: &mut Finding, previous: &Finding) {
    raw.creation_date = previous.creation_date;
    raw.server_issue_key.clone_from(&previous.server_issue_key);
    raw.resolved = previous.resolved;
    raw.assignee.clone_from(&previous.assignee);
}

fn mark_new(raw: &mut Finding, now: i64) {
    if raw.server_issue_key.is_some() {
        raw.server_issue_key = None;
        raw.resolved = false;
        raw.assignee = None;
    }
    raw.creation_date = Some(now);
}

/// Counts produced by one server reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerMatchSummary {
    /// Local findings matched to a server issue
    pub matched: usize,
    /// Local findings that lost a server key because the server issue is gone
    pub dropped_server_keys: usize,
    /// Server issues with no local counterpart
    pub unmatched_server: usize,
}

/// Reconciles local findings with the issues known to a remote server
#[derive(Debug, Clone, Default)]
pub struct ServerIssueTracker {
    tracker: Tracker,
}

impl ServerIssueTracker {
    pub fn new(tracker: Tracker) -> Self {
        Self { tracker }
    }

    /// Copy server state onto the local findings that match a server issue.
    ///
    /// Local findings are the raw side, server issues the base side. A local
    /// finding with a server key but no match loses the key; its creation
    /// date and severity are kept.
    pub fn match_local_with_server_findings(
        &self,
        server: &[Finding],
        local: &mut [Finding],
    ) -> ServerMatchSummary {
        let matches: Vec<Match> = self.tracker.track(&*local, server).matches().collect();

        let mut local_matched = vec![false; local.len()];
        for m in &matches {
            copy_from_server(&mut local[m.raw], &server[m.base]);
            local_matched[m.raw] = true;
        }

        let mut dropped_server_keys = 0;
        for (finding, _) in local.iter_mut().zip(&local_matched).filter(|(_, matched)| !**matched) {
            if finding.server_issue_key.take().is_some() {
                dropped_server_keys += 1;
            }
        }

        let summary = ServerMatchSummary {
            matched: matches.len(),
            dropped_server_keys,
            unmatched_server: server.len() - matches.len(),
        };
        log::debug!(
            "Server reconciliation: {} matched, {} server key(s) dropped, {} server issue(s) without local finding",
            summary.matched,
            summary.dropped_server_keys,
            summary.unmatched_server
        );
        summary
    }
}

fn copy_from_server(local: &mut Finding, server: &Finding) {
    local.server_issue_key.clone_from(&server.server_issue_key);
    local.resolved = server.resolved;
    local.assignee.clone_from(&server.assignee);
    if server.severity.is_some() {
        local.severity = server.severity;
    }
    if server.rule_type.is_some() {
        local.rule_type = server.rule_type;
    }
}
