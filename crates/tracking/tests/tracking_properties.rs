use issue_tracking::{Finding, MatchStrategy, Trackable, Tracker, TrackerConfig};
use pretty_assertions::assert_eq;

fn finding(rule: &str, line: usize, text_range_hash: i32, message: &str) -> Finding {
    Finding::new(rule, message)
        .unwrap()
        .with_line(line)
        .with_text_range_hash(text_range_hash)
}

/// Finding as stored by a server: no content hashes, just a key
struct ServerIssue {
    key: String,
    rule: String,
    message: String,
}

impl Trackable for ServerIssue {
    fn rule_key(&self) -> &str {
        &self.rule
    }

    fn line(&self) -> Option<usize> {
        None
    }

    fn text_range_hash(&self) -> Option<i32> {
        None
    }

    fn line_hash(&self) -> Option<i32> {
        None
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn server_issue_key(&self) -> Option<&str> {
        Some(&self.key)
    }
}

#[test]
fn concrete_scenario_walks_down_the_cascade() {
    let tracker = Tracker::default();
    let base = vec![finding("S100", 10, 555, "Rename this method")];

    let same = finding("S100", 10, 555, "Rename this method");
    assert_eq!(
        tracker.track_single(&same, &base).matched_by(),
        Some(MatchStrategy::LineAndTextRangeHash)
    );

    let moved = finding("S100", 12, 555, "Rename this method");
    assert_eq!(
        tracker.track_single(&moved, &base).matched_by(),
        Some(MatchStrategy::TextRangeHashAndMessage)
    );

    let reworded = finding("S100", 10, 777, "Rename this function");
    let base_same_message = vec![finding("S100", 10, 555, "Rename this function")];
    assert_eq!(
        tracker.track_single(&reworded, &base_same_message).matched_by(),
        Some(MatchStrategy::LineAndMessage)
    );

    let other_rule = finding("S200", 10, 555, "Rename this method");
    let tracking = tracker.track_single(&other_rule, &base);
    assert!(!tracking.is_raw_matched());
    assert_eq!(tracking.matched_by(), None);
}

#[test]
fn stricter_strategy_wins_over_earlier_candidate() {
    let raw = finding("S100", 10, 555, "msg").with_line_hash(9);
    let bases = vec![
        // Only the line hash agrees
        finding("S100", 40, 111, "other").with_line_hash(9),
        // Rule, line and text range hash agree
        finding("S100", 10, 555, "changed message").with_line_hash(1),
    ];

    let tracking = Tracker::default().track_single(&raw, &bases);

    assert_eq!(tracking.matched_base_index(), Some(1));
    assert_eq!(tracking.matched_by(), Some(MatchStrategy::LineAndTextRangeHash));
}

#[test]
fn moved_text_with_same_message_still_matches() {
    let raw = finding("S100", 20, 555, "Remove this unused import");
    let base = vec![finding("S100", 3, 555, "Remove this unused import")];

    let tracking = Tracker::default().track_single(&raw, &base);

    assert_eq!(tracking.matched_by(), Some(MatchStrategy::TextRangeHashAndMessage));
}

#[test]
fn text_range_hash_alone_tolerates_new_line_and_message() {
    let raw = finding("S100", 20, 555, "new wording");
    let base = vec![finding("S100", 3, 555, "old wording")];

    let tracking = Tracker::default().track_single(&raw, &base);

    assert_eq!(tracking.matched_by(), Some(MatchStrategy::TextRangeHash));
}

#[test]
fn line_hash_fallbacks() {
    let tracker = Tracker::default();

    let raw = finding("S100", 10, 1, "a").with_line_hash(77);
    let base = vec![finding("S100", 10, 2, "b").with_line_hash(77)];
    assert_eq!(
        tracker.track_single(&raw, &base).matched_by(),
        Some(MatchStrategy::LineAndLineHash)
    );

    let raw = finding("S100", 30, 1, "a").with_line_hash(77);
    assert_eq!(
        tracker.track_single(&raw, &base).matched_by(),
        Some(MatchStrategy::LineHash)
    );
}

#[test]
fn blank_server_keys_never_match() {
    let tracker = Tracker::new(TrackerConfig {
        strategies: vec![MatchStrategy::ServerIssueKey],
    })
    .unwrap();

    let raws = vec![
        Finding::new("S100", "").unwrap(),
        Finding::new("S100", "").unwrap().with_server_issue_key(""),
        Finding::new("S100", "").unwrap().with_server_issue_key("  "),
    ];
    let bases = raws.clone();

    let tracking = tracker.track(&raws, &bases);

    assert_eq!(tracking.matched_count(), 0);
    assert_eq!(tracking.unmatched_bases().count(), 3);
}

#[test]
fn server_key_matches_across_types_and_content() {
    let raws = vec![finding("S100", 10, 555, "local")
        .with_line_hash(3)
        .with_server_issue_key("AX-42")];
    let server = vec![
        ServerIssue {
            key: "AX-1".into(),
            rule: "S100".into(),
            message: "unrelated".into(),
        },
        ServerIssue {
            key: "AX-42".into(),
            rule: "S999".into(),
            message: "remote".into(),
        },
    ];

    let tracking = Tracker::default().track(&raws, &server);

    assert_eq!(tracking.strategy_for(0), Some(MatchStrategy::ServerIssueKey));
    assert_eq!(tracking.base_for(0).map(|b| b.key.as_str()), Some("AX-42"));
}

#[test]
fn first_candidate_wins_ties() {
    let raw = finding("S100", 10, 555, "m");
    let bases = vec![
        finding("S100", 10, 555, "m").with_creation_date(1),
        finding("S100", 10, 555, "m").with_creation_date(2),
    ];

    let tracking = Tracker::default().track_single(&raw, &bases);

    assert_eq!(tracking.matched_base_index(), Some(0));
    assert_eq!(tracking.matched_base().and_then(|b| b.creation_date), Some(1));
}

#[test]
fn tracking_is_deterministic() {
    let raws: Vec<Finding> = (0..20)
        .map(|i| finding("S100", i % 5, (i % 3) as i32, "m").with_line_hash((i % 4) as i32))
        .collect();
    let bases: Vec<Finding> = (0..15)
        .map(|i| finding("S100", (i + 1) % 5, (i % 3) as i32, "m").with_line_hash((i % 2) as i32))
        .collect();
    let tracker = Tracker::default();

    let first: Vec<_> = tracker.track(&raws, &bases).matches().collect();
    for _ in 0..5 {
        let again: Vec<_> = tracker.track(&raws, &bases).matches().collect();
        assert_eq!(first, again);
    }
}

#[test]
fn no_base_claimed_twice_in_one_run() {
    let raws: Vec<Finding> = (0..6).map(|_| finding("S100", 10, 555, "m")).collect();
    let bases: Vec<Finding> = (0..4).map(|_| finding("S100", 10, 555, "m")).collect();

    let tracking = Tracker::default().track(&raws, &bases);

    let mut claimed: Vec<usize> = tracking.matches().map(|m| m.base).collect();
    assert_eq!(claimed.len(), 4);
    claimed.sort_unstable();
    claimed.dedup();
    assert_eq!(claimed, vec![0, 1, 2, 3]);
    // Raws are served in input order
    assert_eq!(tracking.unmatched_raw_indices().collect::<Vec<_>>(), vec![4, 5]);
    assert!(tracking.is_complete());
}

#[test]
fn no_base_claimed_twice_across_single_calls() {
    let raws: Vec<Finding> = (0..3).map(|_| finding("S100", 10, 555, "m")).collect();
    let mut pool: Vec<Finding> = vec![finding("S100", 10, 555, "m"), finding("S100", 10, 555, "m")];
    let tracker = Tracker::default();

    let mut matched = 0;
    for raw in &raws {
        let claimed = tracker.track_single(raw, &pool).matched_base_index();
        if let Some(index) = claimed {
            pool.remove(index);
            matched += 1;
        }
    }

    assert_eq!(matched, 2);
    assert!(pool.is_empty());
}

#[test]
fn unmatched_bases_accounting() {
    let bases = vec![
        finding("S1", 1, 1, "a"),
        finding("S2", 2, 2, "b"),
        finding("S3", 3, 3, "c"),
    ];
    let tracker = Tracker::default();

    let unmatched = finding("S9", 1, 1, "a");
    let tracking = tracker.track_single(&unmatched, &bases);
    assert_eq!(tracking.unmatched_bases().cloned().collect::<Vec<_>>(), bases);

    let matched = finding("S2", 2, 2, "b");
    let tracking = tracker.track_single(&matched, &bases);
    assert_eq!(
        tracking.unmatched_bases().cloned().collect::<Vec<_>>(),
        vec![bases[0].clone(), bases[2].clone()]
    );
    assert!(!tracking
        .unmatched_bases()
        .any(|b| std::ptr::eq(b, &bases[1])));
}

#[test]
fn collection_and_single_tracking_agree() {
    let bases = vec![
        finding("S100", 10, 555, "a"),
        finding("S100", 20, 666, "b"),
        finding("S200", 30, 777, "c"),
    ];
    let raw = finding("S100", 25, 666, "b");
    let tracker = Tracker::default();

    let single = tracker.track_single(&raw, &bases);
    let collection = tracker.track(std::slice::from_ref(&raw), &bases);

    assert_eq!(single.matched_base_index(), collection.matches().next().map(|m| m.base));
    assert_eq!(single.matched_by(), collection.strategy_for(0));
}
