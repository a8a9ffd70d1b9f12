use issue_tracking::{Finding, MatchStrategy, Trackable, Tracking};
use serde::Serialize;
use std::fmt::Write as _;

#[derive(Debug, Serialize)]
pub struct MatchEntry {
    pub raw: usize,
    pub base: usize,
    pub strategy: MatchStrategy,
}

/// Outcome of a `track` run
#[derive(Debug, Serialize)]
pub struct TrackReport {
    pub matches: Vec<MatchEntry>,
    pub unmatched_raws: Vec<usize>,
    pub unmatched_bases: Vec<usize>,
}

impl TrackReport {
    pub fn from_tracking(tracking: &Tracking<'_, Finding, Finding>) -> Self {
        Self {
            matches: tracking
                .matches()
                .map(|m| MatchEntry {
                    raw: m.raw,
                    base: m.base,
                    strategy: m.strategy,
                })
                .collect(),
            unmatched_raws: tracking.unmatched_raw_indices().collect(),
            unmatched_bases: tracking.unmatched_base_indices().collect(),
        }
    }
}

pub fn render_text(tracking: &Tracking<'_, Finding, Finding>) -> String {
    let mut out = String::new();
    let raws = tracking.raws();
    let bases = tracking.bases();

    let _ = writeln!(out, "Matched: {}", tracking.matched_count());
    for m in tracking.matches() {
        let _ = writeln!(
            out,
            "  raw #{} -> base #{} [{}] {}: {}",
            m.raw, m.base, m.strategy, raws[m.raw].rule_key(), raws[m.raw].message
        );
    }

    let _ = writeln!(out, "New: {}", tracking.unmatched_raw_count());
    for idx in tracking.unmatched_raw_indices() {
        let _ = writeln!(out, "  raw #{idx} {}: {}", raws[idx].rule_key(), raws[idx].message);
    }

    let _ = writeln!(out, "Unmatched base: {}", tracking.unmatched_base_count());
    for idx in tracking.unmatched_base_indices() {
        let _ = writeln!(out, "  base #{idx} {}: {}", bases[idx].rule_key(), bases[idx].message);
    }

    out
}
