//! Provenance tracking: which prescription contributed which drug.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{AnnotatedInteraction, InteractionRecord, Prescription};
use crate::resolver::Normalizer;

/// Mapping from drug identifier to the prescription sources that include it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvenanceMap {
    sources: HashMap<String, BTreeSet<String>>,
}

impl ProvenanceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the map from a prescription list: every drug a prescription
    /// names is attributed to that prescription's source id.
    pub fn from_prescriptions(prescriptions: &[Prescription]) -> Self {
        let mut map = Self::new();
        for rx in prescriptions {
            for drug in rx.drugs() {
                map.record(&drug.id, &rx.source_id);
            }
        }
        map
    }

    /// Attribute a drug to a source.
    pub fn record(&mut self, drug_id: &str, source: &str) {
        self.sources
            .entry(drug_id.to_string())
            .or_default()
            .insert(source.to_string());
    }

    /// Sources that included a drug, if known.
    pub fn sources_for(&self, drug_id: &str) -> Option<&BTreeSet<String>> {
        self.sources.get(drug_id)
    }

    /// Rewrite keys through the normalizer so provenance built from raw names
    /// lines up with the canonical identifiers in interaction records.
    pub fn canonicalized(&self, normalizer: &Normalizer) -> Self {
        let mut map = Self::new();
        for (drug_id, sources) in &self.sources {
            let canonical = normalizer.canonical(drug_id);
            for source in sources {
                map.record(&canonical, source);
            }
        }
        map
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Attach provenance to each record and flag cross-source pairs.
///
/// A pair is cross-source only on affirmative evidence: both drugs have known
/// source sets and those sets are disjoint. A drug missing from the map is
/// treated as a single unknown source and never produces a crossing claim —
/// the flag marks novelty, not risk, so it must not fire on missing data.
pub fn annotate(
    records: &[InteractionRecord],
    provenance: &ProvenanceMap,
) -> Vec<AnnotatedInteraction> {
    records
        .iter()
        .map(|record| {
            let sources_a = provenance.sources_for(&record.pair.a);
            let sources_b = provenance.sources_for(&record.pair.b);

            let cross_source = match (sources_a, sources_b) {
                (Some(a), Some(b)) => !a.is_empty() && !b.is_empty() && a.is_disjoint(b),
                _ => false,
            };

            AnnotatedInteraction {
                record: record.clone(),
                cross_source,
                sources_a: sources_a.map(|s| s.iter().cloned().collect()).unwrap_or_default(),
                sources_b: sources_b.map(|s| s.iter().cloned().collect()).unwrap_or_default(),
            }
        })
        .collect()
}
