//! Engine entry points consumed by the presentation layer.

use std::sync::Arc;

use tracing::debug;

use crate::aggregate::aggregate;
use crate::models::{AggregateReport, Drug, MultiRxReport, Prescription};
use crate::provenance::{annotate, ProvenanceMap};
use crate::resolver::{CancelFlag, Normalizer, PairResolver, ResolverResult};
use crate::schedule;
use crate::source::KnowledgeSource;

/// The interaction check engine.
///
/// Stateless across calls: every check derives its result from the supplied
/// input and the knowledge source's current data, so retrying with the same
/// input is always safe.
pub struct InteractionEngine {
    resolver: PairResolver,
}

impl InteractionEngine {
    pub fn new(source: Arc<dyn KnowledgeSource>) -> Self {
        Self {
            resolver: PairResolver::new(source),
        }
    }

    pub fn with_normalizer(source: Arc<dyn KnowledgeSource>, normalizer: Normalizer) -> Self {
        Self {
            resolver: PairResolver::with_normalizer(source, normalizer),
        }
    }

    /// Override the lookup concurrency limit.
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.resolver = self.resolver.with_max_in_flight(max_in_flight);
        self
    }

    pub fn normalizer(&self) -> &Normalizer {
        self.resolver.normalizer()
    }

    /// Check every pair in a flat drug list.
    pub async fn check_interactions(&self, drugs: &[Drug]) -> ResolverResult<AggregateReport> {
        self.check_interactions_with_cancel(drugs, &CancelFlag::new())
            .await
    }

    /// Check a flat drug list with caller-initiated cancellation.
    pub async fn check_interactions_with_cancel(
        &self,
        drugs: &[Drug],
        cancel: &CancelFlag,
    ) -> ResolverResult<AggregateReport> {
        let outcome = self.resolver.resolve(drugs, cancel).await?;
        let report = aggregate(&outcome);
        debug!(
            pairs = report.pairs_checked,
            found = report.counts.total_found(),
            unknown = report.counts.unknown,
            "interaction check finished"
        );
        Ok(report)
    }

    /// Check across prescriptions: aggregate, annotate cross-source pairs and
    /// build the unified daily schedule.
    pub async fn check_multi_prescription(
        &self,
        prescriptions: &[Prescription],
        provenance: &ProvenanceMap,
    ) -> ResolverResult<MultiRxReport> {
        self.check_multi_prescription_with_cancel(prescriptions, provenance, &CancelFlag::new())
            .await
    }

    /// Multi-prescription check with caller-initiated cancellation.
    pub async fn check_multi_prescription_with_cancel(
        &self,
        prescriptions: &[Prescription],
        provenance: &ProvenanceMap,
        cancel: &CancelFlag,
    ) -> ResolverResult<MultiRxReport> {
        let drugs: Vec<Drug> = prescriptions
            .iter()
            .flat_map(|rx| rx.drugs().cloned())
            .collect();

        let aggregate_report = self.check_interactions_with_cancel(&drugs, cancel).await?;

        // Provenance may be keyed by raw names; line it up with the canonical
        // identifiers the records carry.
        let canonical_provenance = provenance.canonicalized(self.normalizer());
        let interactions = annotate(&aggregate_report.records, &canonical_provenance);
        let schedule = schedule::merge(prescriptions, &interactions, self.normalizer());

        Ok(MultiRxReport {
            aggregate: aggregate_report,
            interactions,
            schedule,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Slot;
    use crate::source::MemorySource;

    #[tokio::test]
    async fn test_check_interactions_counts() {
        let engine = InteractionEngine::new(Arc::new(MemorySource::builtin()));
        let drugs = vec![Drug::new("Clopidogrel"), Drug::new("Pantoprazole")];

        let report = engine.check_interactions(&drugs).await.unwrap();
        assert_eq!(report.counts.moderate, 1);
        assert_eq!(report.counts.critical, 0);
        assert_eq!(report.counts.unknown, 0);
        assert_eq!(report.safe, Some(true));
    }

    #[tokio::test]
    async fn test_multi_prescription_end_to_end() {
        let engine = InteractionEngine::new(Arc::new(MemorySource::builtin()));

        let mut rx1 = Prescription::with_source_id("rx1", "Dr. Mehta");
        rx1.assign(Drug::new("Clopidogrel"), Some("75 mg".into()), Slot::Morning);
        let mut rx2 = Prescription::with_source_id("rx2", "Dr. Rao");
        rx2.assign(Drug::new("Pantoprazole"), Some("40 mg".into()), Slot::Morning);

        let prescriptions = vec![rx1, rx2];
        let provenance = ProvenanceMap::from_prescriptions(&prescriptions);
        let report = engine
            .check_multi_prescription(&prescriptions, &provenance)
            .await
            .unwrap();

        assert_eq!(report.interactions.len(), 1);
        assert!(report.interactions[0].cross_source);

        let morning = &report.schedule[&Slot::Morning];
        assert_eq!(morning.len(), 2);
        assert!(morning.iter().all(|e| e.conflict));
    }
}
