//! Severity aggregation: reduce resolved pairs into a display-ready report.

use std::cmp::Reverse;

use crate::models::{AggregateReport, SeverityCounts};
use crate::resolver::ResolveOutcome;

/// Reduce a resolve outcome into counts, sorted records and the safe flag.
///
/// Sorting is severity-descending and stable, so pairs within one tier keep
/// the resolver's enumeration order. Unresolved pairs count in their own
/// `unknown` tally and block the all-clear together with critical findings.
pub fn aggregate(outcome: &ResolveOutcome) -> AggregateReport {
    let mut counts = SeverityCounts::default();
    for record in &outcome.found {
        counts.record(record.severity);
    }
    counts.unknown = outcome.unresolved.len();

    let mut records = outcome.found.clone();
    records.sort_by_key(|r| Reverse(r.severity));

    // No pairs checked means no claim of safety either way.
    let safe = if outcome.pairs_checked == 0 {
        None
    } else {
        Some(counts.critical == 0 && counts.unknown == 0)
    };

    let summary = build_summary(&counts, outcome.pairs_checked);

    AggregateReport {
        counts,
        records,
        unresolved: outcome.unresolved.clone(),
        safe,
        distinct_drugs: outcome.distinct_drugs,
        pairs_checked: outcome.pairs_checked,
        checked_at: chrono::Utc::now().to_rfc3339(),
        summary,
    }
}

fn build_summary(counts: &SeverityCounts, pairs_checked: usize) -> String {
    if pairs_checked == 0 {
        return "No check performed: fewer than two distinct medicines.".into();
    }
    if counts.critical > 0 {
        let mut s = format!(
            "Found {} serious interaction(s) requiring attention!",
            counts.critical
        );
        if counts.unknown > 0 {
            s.push_str(&format!(" {} pair(s) could not be verified.", counts.unknown));
        }
        return s;
    }
    if counts.unknown > 0 {
        return format!(
            "{} pair(s) could not be verified; do not treat this result as all clear.",
            counts.unknown
        );
    }
    if counts.moderate > 0 {
        return format!(
            "Found {} moderate interaction(s). Review recommended.",
            counts.moderate
        );
    }
    if counts.minor > 0 {
        return format!(
            "Found {} minor interaction(s). Generally manageable.",
            counts.minor
        );
    }
    "No known interactions found.".into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DrugPair, InteractionRecord, Severity, UnresolvedPair};

    fn record(a: &str, b: &str, severity: Severity) -> InteractionRecord {
        InteractionRecord {
            pair: DrugPair::new(a, b).unwrap(),
            severity,
            title: "t".into(),
            description: "d".into(),
            recommended_action: "r".into(),
            source: "test".into(),
        }
    }

    fn outcome(
        found: Vec<InteractionRecord>,
        unresolved: Vec<UnresolvedPair>,
        pairs_checked: usize,
    ) -> ResolveOutcome {
        ResolveOutcome {
            found,
            unresolved,
            distinct_drugs: 0,
            pairs_checked,
        }
    }

    #[test]
    fn test_empty_input_leaves_safe_unset() {
        let report = aggregate(&outcome(vec![], vec![], 0));
        assert_eq!(report.safe, None);
        assert_eq!(report.counts, SeverityCounts::default());
    }

    #[test]
    fn test_clean_check_is_safe() {
        let report = aggregate(&outcome(vec![], vec![], 3));
        assert_eq!(report.safe, Some(true));
        assert_eq!(report.summary, "No known interactions found.");
    }

    #[test]
    fn test_moderate_only_is_still_safe() {
        let report = aggregate(&outcome(
            vec![record("clopidogrel", "pantoprazole", Severity::Moderate)],
            vec![],
            1,
        ));
        assert_eq!(report.counts.moderate, 1);
        assert_eq!(report.safe, Some(true));
    }

    #[test]
    fn test_critical_blocks_safe() {
        let report = aggregate(&outcome(
            vec![record("warfarin", "aspirin", Severity::Critical)],
            vec![],
            1,
        ));
        assert_eq!(report.safe, Some(false));
        assert!(report.summary.contains("serious"));
    }

    #[test]
    fn test_unknown_blocks_safe() {
        let report = aggregate(&outcome(
            vec![],
            vec![UnresolvedPair {
                pair: DrugPair::new("drugx", "drugy").unwrap(),
                reason: "timeout".into(),
            }],
            1,
        ));
        assert_eq!(report.counts.unknown, 1);
        assert_eq!(report.counts.minor, 0); // never folded into minor
        assert_eq!(report.safe, Some(false));
        assert!(report.summary.contains("could not be verified"));
    }

    #[test]
    fn test_sort_is_severity_descending_and_stable() {
        let report = aggregate(&outcome(
            vec![
                record("a", "b", Severity::Minor),
                record("c", "d", Severity::Critical),
                record("e", "f", Severity::Moderate),
                record("g", "h", Severity::Critical),
            ],
            vec![],
            6,
        ));

        let severities: Vec<_> = report.records.iter().map(|r| r.severity).collect();
        assert_eq!(
            severities,
            vec![
                Severity::Critical,
                Severity::Critical,
                Severity::Moderate,
                Severity::Minor
            ]
        );
        // Stable: the two criticals keep their enumeration order
        assert_eq!(report.records[0].pair.key(), "c|d");
        assert_eq!(report.records[1].pair.key(), "g|h");
    }

    #[test]
    fn test_safe_flag_invariant() {
        // safe == (critical == 0 && unknown == 0) whenever a check ran
        for (criticals, unknowns) in [(0, 0), (1, 0), (0, 1), (2, 3)] {
            let found = (0..criticals)
                .map(|i| record(&format!("a{i}"), &format!("b{i}"), Severity::Critical))
                .collect();
            let unresolved = (0..unknowns)
                .map(|i| UnresolvedPair {
                    pair: DrugPair::new(&format!("x{i}"), &format!("y{i}")).unwrap(),
                    reason: "err".into(),
                })
                .collect();
            let report = aggregate(&outcome(found, unresolved, 10));
            assert_eq!(report.safe, Some(criticals == 0 && unknowns == 0));
        }
    }
}
