use crate::config::TrackerConfig;
use crate::error::Result;
use crate::search_key::{MatchStrategy, SearchKey};
use crate::tracking::{SingleTracking, Tracking};
use crate::types::Trackable;
use std::collections::{HashMap, VecDeque};
use std::slice;

/// Matches raw findings of the latest analysis with previously known base findings.
///
/// The tracker runs its strategies from the most to the least precise. Each
/// pass only sees what earlier passes left unmatched, so a pairing found by a
/// stricter strategy is never revisited. When several bases share the raw
/// finding's key, the first one in input order wins.
///
/// The tracker holds no per-run state and can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    config: TrackerConfig,
}

impl Tracker {
    /// Create a tracker with a validated configuration
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Track a whole collection of raw findings against the base findings
    pub fn track<'a, R, B>(&self, raws: &'a [R], bases: &'a [B]) -> Tracking<'a, R, B>
    where
        R: Trackable,
        B: Trackable,
    {
        let mut tracking = Tracking::new(raws, bases);

        for &strategy in &self.config.strategies {
            if tracking.is_complete() {
                break;
            }
            match_with(&mut tracking, strategy);
        }

        log::debug!(
            "Tracked {} raw finding(s) against {} base(s): {} matched, {} new, {} unmatched base(s)",
            raws.len(),
            bases.len(),
            tracking.matched_count(),
            tracking.unmatched_raw_count(),
            tracking.unmatched_base_count()
        );

        tracking
    }

    /// Track one raw finding against the base findings
    pub fn track_single<'a, R, B>(&self, raw: &'a R, bases: &'a [B]) -> SingleTracking<'a, R, B>
    where
        R: Trackable,
        B: Trackable,
    {
        SingleTracking::new(self.track(slice::from_ref(raw), bases))
    }
}

/// Candidates and matches of one strategy pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct PassStats {
    raws_considered: usize,
    bases_considered: usize,
    matched: usize,
}

/// Run one strategy over the still-unmatched raws and bases
fn match_with<R, B>(tracking: &mut Tracking<'_, R, B>, strategy: MatchStrategy) -> PassStats
where
    R: Trackable,
    B: Trackable,
{
    let (raws, bases) = (tracking.raws(), tracking.bases());
    let mut stats = PassStats::default();

    let mut base_search: HashMap<SearchKey<'_>, VecDeque<usize>> = HashMap::new();
    for base in tracking.unmatched_base_indices() {
        if let Some(key) = strategy.search_key(&bases[base]) {
            base_search.entry(key).or_default().push_back(base);
            stats.bases_considered += 1;
        }
    }
    if base_search.is_empty() {
        log::trace!("{strategy}: no searchable base left");
        return stats;
    }

    let pending: Vec<usize> = tracking.unmatched_raw_indices().collect();
    for raw in pending {
        let Some(raw_key) = strategy.search_key(&raws[raw]) else {
            continue;
        };
        stats.raws_considered += 1;
        // First candidate wins, ties are not broken by any other signal.
        if let Some(base) = base_search.get_mut(&raw_key).and_then(VecDeque::pop_front) {
            log::trace!("{strategy}: raw #{raw} matched base #{base}");
            tracking.record(raw, base, strategy);
            stats.matched += 1;
        }
    }

    log::debug!(
        "{strategy}: {} raw x {} base candidate(s), {} match(es), {} raw / {} base left",
        stats.raws_considered,
        stats.bases_considered,
        stats.matched,
        tracking.unmatched_raw_count(),
        tracking.unmatched_base_count()
    );
    stats
}
