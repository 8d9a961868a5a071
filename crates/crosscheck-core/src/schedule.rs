//! Schedule merge: fold per-prescription dosing slots into one daily view.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{AnnotatedInteraction, Prescription, ScheduleEntry, Slot};
use crate::resolver::Normalizer;

/// Merge prescriptions into a unified daily schedule.
///
/// Entries are never deduplicated across prescriptions: a drug two prescribers
/// both ordered for the morning appears twice, each entry tagged with its own
/// source, so the patient sees the duplication instead of silently losing it.
///
/// An entry's conflict flag is set when its drug participates in any
/// cross-source interaction, letting the presentation layer render a warning
/// without recomputing interaction logic.
pub fn merge(
    prescriptions: &[Prescription],
    interactions: &[AnnotatedInteraction],
    normalizer: &Normalizer,
) -> BTreeMap<Slot, Vec<ScheduleEntry>> {
    let conflicted: BTreeSet<&str> = interactions
        .iter()
        .filter(|i| i.cross_source)
        .flat_map(|i| [i.record.pair.a.as_str(), i.record.pair.b.as_str()])
        .collect();

    let mut schedule: BTreeMap<Slot, Vec<ScheduleEntry>> = BTreeMap::new();
    for rx in prescriptions {
        for assignment in &rx.assignments {
            let canonical = normalizer.canonical(&assignment.drug.display_name);
            schedule.entry(assignment.slot).or_default().push(ScheduleEntry {
                drug: assignment.drug.clone(),
                dose: assignment.dose.clone(),
                source: rx.source_id.clone(),
                prescriber: rx.prescriber.clone(),
                conflict: conflicted.contains(canonical.as_str()),
            });
        }
    }
    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Drug, DrugPair, InteractionRecord, Severity};

    fn cross_interaction(a: &str, b: &str) -> AnnotatedInteraction {
        AnnotatedInteraction {
            record: InteractionRecord {
                pair: DrugPair::new(a, b).unwrap(),
                severity: Severity::Moderate,
                title: "t".into(),
                description: "d".into(),
                recommended_action: "r".into(),
                source: "test".into(),
            },
            cross_source: true,
            sources_a: vec!["rx1".into()],
            sources_b: vec!["rx2".into()],
        }
    }

    #[test]
    fn test_merge_keeps_entries_per_source() {
        let mut rx1 = Prescription::with_source_id("rx1", "Dr. A");
        rx1.assign(Drug::new("Metformin"), Some("500 mg".into()), Slot::Morning);
        let mut rx2 = Prescription::with_source_id("rx2", "Dr. B");
        rx2.assign(Drug::new("Metformin"), Some("500 mg".into()), Slot::Morning);

        let schedule = merge(&[rx1, rx2], &[], &Normalizer::new());

        let morning = &schedule[&Slot::Morning];
        assert_eq!(morning.len(), 2); // no cross-prescription dedup
        assert_eq!(morning[0].source, "rx1");
        assert_eq!(morning[1].source, "rx2");
    }

    #[test]
    fn test_conflict_flags_on_cross_source_drugs() {
        let mut rx1 = Prescription::with_source_id("rx1", "Dr. A");
        rx1.assign(Drug::new("Clopidogrel"), None, Slot::Morning);
        let mut rx2 = Prescription::with_source_id("rx2", "Dr. B");
        rx2.assign(Drug::new("Pantoprazole"), None, Slot::Morning);
        rx2.assign(Drug::new("Metformin"), None, Slot::Night);

        let interactions = vec![cross_interaction("clopidogrel", "pantoprazole")];
        let schedule = merge(&[rx1, rx2], &interactions, &Normalizer::new());

        let morning = &schedule[&Slot::Morning];
        assert!(morning.iter().all(|e| e.conflict));
        let night = &schedule[&Slot::Night];
        assert!(!night[0].conflict);
    }

    #[test]
    fn test_conflict_matches_through_brand_alias() {
        // Prescription written with a brand name still matches the generic
        // identifiers carried by interaction records.
        let mut rx = Prescription::with_source_id("rx1", "Dr. A");
        rx.assign(Drug::new("Plavix"), None, Slot::Morning);

        let interactions = vec![cross_interaction("clopidogrel", "pantoprazole")];
        let schedule = merge(&[rx], &interactions, &Normalizer::new());

        assert!(schedule[&Slot::Morning][0].conflict);
    }

    #[test]
    fn test_non_cross_source_interactions_do_not_flag() {
        let mut rx = Prescription::with_source_id("rx1", "Dr. A");
        rx.assign(Drug::new("Clopidogrel"), None, Slot::Morning);

        let mut same_source = cross_interaction("clopidogrel", "pantoprazole");
        same_source.cross_source = false;

        let schedule = merge(&[rx], &[same_source], &Normalizer::new());
        assert!(!schedule[&Slot::Morning][0].conflict);
    }
}
