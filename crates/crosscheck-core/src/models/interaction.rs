//! Interaction records and severity tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DrugPair;

/// Interaction severity tier.
///
/// Ordering follows clinical weight: `Minor < Moderate < Critical`. The
/// `unknown` state (failed lookup) is not a severity; it is tracked separately
/// so a degraded check can never masquerade as a mild finding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Minor,
    Moderate,
    Critical,
}

impl Severity {
    /// Parse a knowledge-base severity label.
    ///
    /// Source databases use a wider vocabulary than the engine's three tiers;
    /// the heavier labels all collapse into `Critical`.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "minor" | "mild" => Some(Severity::Minor),
            "moderate" => Some(Severity::Moderate),
            "critical" | "major" | "severe" | "contraindicated" | "contraindication" => {
                Some(Severity::Critical)
            }
            _ => None,
        }
    }

    /// Canonical lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Minor => "minor",
            Severity::Moderate => "moderate",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A known interaction between an unordered pair of drugs.
///
/// Read-only within the engine; the knowledge source owns de-duplication, and
/// at most one record exists per pair per source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRecord {
    /// The interacting pair (canonical order)
    pub pair: DrugPair,
    pub severity: Severity,
    /// Short human-readable title (e.g., "Increased bleeding risk")
    pub title: String,
    pub description: String,
    /// What the patient/prescriber should do about it
    pub recommended_action: String,
    /// Which knowledge layer produced the record (e.g., "local", "openfda")
    pub source: String,
}

/// A pair whose lookup failed.
///
/// Distinct from "no interaction": the pair's status is unknown and the
/// overall result must reflect that.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnresolvedPair {
    pub pair: DrugPair,
    pub reason: String,
}
