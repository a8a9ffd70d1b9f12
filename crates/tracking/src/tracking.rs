use crate::search_key::MatchStrategy;

/// One raw finding paired with the base finding it continues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Index in the raw collection
    pub raw: usize,
    /// Index in the base collection
    pub base: usize,
    /// Strategy that produced the pairing
    pub strategy: MatchStrategy,
}

/// Outcome of tracking a collection of raw findings against base findings.
///
/// The mapping is one-to-one: a raw finding maps to at most one base and a
/// base is claimed by at most one raw. Findings are identified by their
/// position in the input slices, so equal-valued findings stay distinct.
#[derive(Debug, Clone)]
pub struct Tracking<'a, R, B> {
    raws: &'a [R],
    bases: &'a [B],
    raw_to_base: Vec<Option<(usize, MatchStrategy)>>,
    base_matched: Vec<bool>,
    matched: usize,
}

impl<'a, R, B> Tracking<'a, R, B> {
    pub(crate) fn new(raws: &'a [R], bases: &'a [B]) -> Self {
        Self {
            raws,
            bases,
            raw_to_base: vec![None; raws.len()],
            base_matched: vec![false; bases.len()],
            matched: 0,
        }
    }

    pub(crate) fn record(&mut self, raw: usize, base: usize, strategy: MatchStrategy) {
        debug_assert!(self.raw_to_base[raw].is_none(), "raw {raw} matched twice");
        debug_assert!(!self.base_matched[base], "base {base} claimed twice");
        self.raw_to_base[raw] = Some((base, strategy));
        self.base_matched[base] = true;
        self.matched += 1;
    }

    /// Raw findings this tracking was computed for
    pub fn raws(&self) -> &'a [R] {
        self.raws
    }

    /// Base findings this tracking was computed against
    pub fn bases(&self) -> &'a [B] {
        self.bases
    }

    /// True once no further match is possible: every raw is matched or no base is left
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.matched == self.raws.len() || self.matched == self.bases.len()
    }

    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.matched
    }

    #[must_use]
    pub fn unmatched_raw_count(&self) -> usize {
        self.raws.len() - self.matched
    }

    #[must_use]
    pub fn unmatched_base_count(&self) -> usize {
        self.bases.len() - self.matched
    }

    #[must_use]
    pub fn is_raw_matched(&self, raw: usize) -> bool {
        matches!(self.raw_to_base.get(raw), Some(Some(_)))
    }

    #[must_use]
    pub fn is_base_matched(&self, base: usize) -> bool {
        self.base_matched.get(base).copied().unwrap_or(false)
    }

    /// Base finding matched by the raw finding at `raw`
    pub fn base_for(&self, raw: usize) -> Option<&'a B> {
        let bases = self.bases;
        self.raw_to_base
            .get(raw)
            .copied()
            .flatten()
            .map(|(base, _)| &bases[base])
    }

    /// Strategy that matched the raw finding at `raw`
    #[must_use]
    pub fn strategy_for(&self, raw: usize) -> Option<MatchStrategy> {
        self.raw_to_base
            .get(raw)
            .copied()
            .flatten()
            .map(|(_, strategy)| strategy)
    }

    /// All matches, in raw order
    pub fn matches(&self) -> impl Iterator<Item = Match> + '_ {
        self.raw_to_base
            .iter()
            .enumerate()
            .filter_map(|(raw, &entry)| entry.map(|(base, strategy)| Match { raw, base, strategy }))
    }

    /// Matched (raw, base) pairs, in raw order
    pub fn matched_raws(&self) -> impl Iterator<Item = (&'a R, &'a B)> + '_ {
        let (raws, bases) = (self.raws, self.bases);
        self.matches().map(move |m| (&raws[m.raw], &bases[m.base]))
    }

    pub fn unmatched_raw_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.raw_to_base
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_none())
            .map(|(raw, _)| raw)
    }

    /// Raw findings with no counterpart: new issues
    pub fn unmatched_raws(&self) -> impl Iterator<Item = &'a R> + '_ {
        let raws = self.raws;
        self.unmatched_raw_indices().map(move |raw| &raws[raw])
    }

    pub fn unmatched_base_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.base_matched
            .iter()
            .enumerate()
            .filter(|(_, matched)| !**matched)
            .map(|(base, _)| base)
    }

    /// Base findings nothing claimed: candidates for closing
    pub fn unmatched_bases(&self) -> impl Iterator<Item = &'a B> + '_ {
        let bases = self.bases;
        self.unmatched_base_indices().map(move |base| &bases[base])
    }
}

/// Outcome of tracking a single raw finding against a pool of base findings
#[derive(Debug, Clone)]
pub struct SingleTracking<'a, R, B> {
    inner: Tracking<'a, R, B>,
}

impl<'a, R, B> SingleTracking<'a, R, B> {
    pub(crate) fn new(inner: Tracking<'a, R, B>) -> Self {
        debug_assert_eq!(inner.raws().len(), 1);
        Self { inner }
    }

    /// The tracked raw finding
    pub fn raw(&self) -> &'a R {
        &self.inner.raws()[0]
    }

    #[must_use]
    pub fn is_raw_matched(&self) -> bool {
        self.inner.is_raw_matched(0)
    }

    /// Base finding the raw finding continues, if any
    pub fn matched_base(&self) -> Option<&'a B> {
        self.inner.base_for(0)
    }

    /// Index of the matched base finding in the base pool
    #[must_use]
    pub fn matched_base_index(&self) -> Option<usize> {
        self.inner.matches().next().map(|m| m.base)
    }

    /// Strategy that produced the match
    #[must_use]
    pub fn matched_by(&self) -> Option<MatchStrategy> {
        self.inner.strategy_for(0)
    }

    /// Every base finding except the matched one, in pool order
    pub fn unmatched_bases(&self) -> impl Iterator<Item = &'a B> + '_ {
        self.inner.unmatched_bases()
    }

    /// Full collection view of this tracking
    pub fn as_tracking(&self) -> &Tracking<'a, R, B> {
        &self.inner
    }
}
