//! In-memory knowledge source with built-in fallback pairs.

use std::collections::HashMap;

use async_trait::async_trait;

use super::{KnowledgeSource, SourceResult};
use crate::models::{DrugPair, InteractionRecord, Severity};

/// Map-backed knowledge source.
///
/// Ships a small built-in set of well-established interactions so a check can
/// run before any external data has been imported. Also the workhorse source
/// for unit tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: HashMap<DrugPair, InteractionRecord>,
}

impl MemorySource {
    /// An empty source (returns "no interaction" for every pair).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in fallback set of common, well-documented interactions.
    pub fn builtin() -> Self {
        let mut source = Self::default();

        source.insert_parts(
            "warfarin",
            "aspirin",
            Severity::Critical,
            "Increased bleeding risk",
            "Both agents impair clotting; combined use raises the risk of serious bleeding.",
            "Monitor INR closely or avoid combination",
        );
        source.insert_parts(
            "clopidogrel",
            "pantoprazole",
            Severity::Moderate,
            "Reduced antiplatelet effect",
            "Proton pump inhibitors can reduce activation of clopidogrel.",
            "Review PPI choice with the prescriber",
        );
        source.insert_parts(
            "simvastatin",
            "clarithromycin",
            Severity::Critical,
            "Increased statin levels",
            "CYP3A4 inhibition raises statin exposure with risk of muscle damage.",
            "Use an alternative antibiotic or hold the statin",
        );
        source.insert_parts(
            "lisinopril",
            "spironolactone",
            Severity::Moderate,
            "Risk of high potassium",
            "ACE inhibitor plus potassium-sparing diuretic can cause hyperkalemia.",
            "Monitor potassium levels",
        );
        source.insert_parts(
            "metformin",
            "contrast dye",
            Severity::Critical,
            "Risk of lactic acidosis",
            "Iodinated contrast can impair renal clearance of metformin.",
            "Hold metformin 48 hours before and after contrast",
        );
        source.insert_parts(
            "amoxicillin",
            "probenecid",
            Severity::Minor,
            "Increased amoxicillin levels",
            "Probenecid slows renal excretion of amoxicillin.",
            "Usually beneficial, no action needed",
        );

        source
    }

    /// Add a record, replacing any existing record for its pair.
    pub fn insert(&mut self, record: InteractionRecord) {
        self.records.insert(record.pair.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn insert_parts(
        &mut self,
        a: &str,
        b: &str,
        severity: Severity,
        title: &str,
        description: &str,
        action: &str,
    ) {
        if let Some(pair) = DrugPair::new(a, b) {
            self.insert(InteractionRecord {
                pair,
                severity,
                title: title.into(),
                description: description.into(),
                recommended_action: action.into(),
                source: "builtin".into(),
            });
        }
    }
}

#[async_trait]
impl KnowledgeSource for MemorySource {
    async fn lookup(&self, pair: &DrugPair) -> SourceResult<Option<InteractionRecord>> {
        Ok(self.records.get(pair).cloned())
    }

    fn name(&self) -> &str {
        "builtin"
    }
}
