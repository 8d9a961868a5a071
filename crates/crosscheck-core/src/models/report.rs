//! Check results: aggregated reports and annotated interactions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{InteractionRecord, ScheduleEntry, Severity, Slot, UnresolvedPair};

/// Tallies per severity tier.
///
/// `unknown` counts failed lookups, never interaction records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeverityCounts {
    pub critical: usize,
    pub moderate: usize,
    pub minor: usize,
    pub unknown: usize,
}

impl SeverityCounts {
    /// Tally one record.
    pub fn record(&mut self, severity: Severity) {
        match severity {
            Severity::Critical => self.critical += 1,
            Severity::Moderate => self.moderate += 1,
            Severity::Minor => self.minor += 1,
        }
    }

    pub fn total_found(&self) -> usize {
        self.critical + self.moderate + self.minor
    }
}

/// Aggregated outcome of one interaction check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateReport {
    pub counts: SeverityCounts,
    /// Found records, severity descending; ties keep resolver enumeration order
    pub records: Vec<InteractionRecord>,
    /// Pairs whose lookup failed (status unknown, blocks the all-clear)
    pub unresolved: Vec<UnresolvedPair>,
    /// `Some(true)` only when zero critical findings AND zero unknowns.
    /// `None` when no pair was checked, so no claim of safety is made.
    pub safe: Option<bool>,
    /// Number of distinct drugs after normalization
    pub distinct_drugs: usize,
    /// Number of pairs queried (C(n,2) over distinct drugs)
    pub pairs_checked: usize,
    /// RFC3339 timestamp of the check
    pub checked_at: String,
    /// One-line human-readable summary
    pub summary: String,
}

impl AggregateReport {
    /// Deduplicated clinical recommendations, most severe first.
    pub fn recommendations(&self) -> Vec<String> {
        let mut recs = Vec::new();
        for record in &self.records {
            let rec = match record.severity {
                Severity::Critical => {
                    format!("Avoid combining {} and {}", record.pair.a, record.pair.b)
                }
                Severity::Moderate => {
                    format!("Monitor closely: {}", record.pair)
                }
                Severity::Minor => continue,
            };
            if !recs.contains(&rec) {
                recs.push(rec);
            }
        }
        for unresolved in &self.unresolved {
            let rec = format!("Could not verify {}; re-check before relying on this result", unresolved.pair);
            if !recs.contains(&rec) {
                recs.push(rec);
            }
        }
        recs
    }
}

/// An interaction record annotated with prescription provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotatedInteraction {
    pub record: InteractionRecord,
    /// True when the two drugs come from prescriptions with no prescriber in
    /// common, so no single prescriber had visibility into both
    pub cross_source: bool,
    /// Source labels for the pair's first drug (canonical order)
    pub sources_a: Vec<String>,
    /// Source labels for the pair's second drug
    pub sources_b: Vec<String>,
}

/// Combined result of a multi-prescription check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MultiRxReport {
    pub aggregate: AggregateReport,
    pub interactions: Vec<AnnotatedInteraction>,
    /// Unified daily schedule with per-entry conflict flags
    pub schedule: BTreeMap<Slot, Vec<ScheduleEntry>>,
}

impl MultiRxReport {
    /// Interactions spanning prescription boundaries.
    pub fn cross_source_interactions(&self) -> impl Iterator<Item = &AnnotatedInteraction> {
        self.interactions.iter().filter(|i| i.cross_source)
    }
}
