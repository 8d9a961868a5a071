//! Knowledge sources backed by OpenFDA label data.

use std::collections::HashMap;

use async_trait::async_trait;

use crosscheck_core::models::{normalize_name, DrugPair, InteractionRecord};
use crosscheck_core::source::{KnowledgeSource, SourceResult};

use crate::labels::{to_records, DrugLabel};

#[cfg(feature = "remote")]
pub use remote::OpenFdaClient;

/// In-memory label store implementing [`KnowledgeSource`].
///
/// Serves pre-loaded labels the same way the remote client serves live ones,
/// so pipelines can be exercised without network access.
#[derive(Debug, Clone, Default)]
pub struct MockLabelStore {
    labels: HashMap<String, DrugLabel>,
}

impl MockLabelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a label under its generic name.
    pub fn insert(&mut self, label: DrugLabel) {
        self.labels.insert(label.generic_name.clone(), label);
    }

    pub fn get(&self, generic: &str) -> Option<&DrugLabel> {
        self.labels.get(&normalize_name(generic))
    }

    fn record_for(&self, generic: &str, pair: &DrugPair) -> Option<InteractionRecord> {
        let label = self.labels.get(generic)?;
        to_records(label).into_iter().find(|r| &r.pair == pair)
    }
}

#[async_trait]
impl KnowledgeSource for MockLabelStore {
    async fn lookup(&self, pair: &DrugPair) -> SourceResult<Option<InteractionRecord>> {
        // Either drug's label may carry the clause.
        let record = self
            .record_for(&pair.a, pair)
            .or_else(|| self.record_for(&pair.b, pair));
        Ok(record)
    }

    fn name(&self) -> &str {
        "openfda-mock"
    }
}

#[cfg(feature = "remote")]
mod remote {
    use anyhow::Context;
    use async_trait::async_trait;
    use tracing::debug;

    use crosscheck_core::models::{DrugPair, InteractionRecord};
    use crosscheck_core::source::{KnowledgeSource, SourceError, SourceResult};

    use crate::labels::{parse_label_response, to_records, DrugLabel};

    const DEFAULT_BASE_URL: &str = "https://api.fda.gov/drug/label.json";

    /// Knowledge source querying the OpenFDA label API.
    ///
    /// Each pair lookup fetches the label for one drug and scans its
    /// interaction clauses for the other; request failures surface as
    /// [`SourceError::Remote`] so the resolver marks the pair unknown.
    pub struct OpenFdaClient {
        http: reqwest::Client,
        base_url: String,
    }

    impl Default for OpenFdaClient {
        fn default() -> Self {
            Self::new()
        }
    }

    impl OpenFdaClient {
        pub fn new() -> Self {
            Self::with_base_url(DEFAULT_BASE_URL)
        }

        /// Point the client at a different endpoint (e.g., a caching proxy).
        pub fn with_base_url(base_url: impl Into<String>) -> Self {
            Self {
                http: reqwest::Client::new(),
                base_url: base_url.into(),
            }
        }

        /// Fetch labels whose generic name matches.
        pub async fn fetch_labels(&self, generic: &str) -> anyhow::Result<Vec<DrugLabel>> {
            let url = format!(
                "{}?search=openfda.generic_name:\"{}\"&limit=5",
                self.base_url, generic
            );
            debug!(%url, "fetching openfda labels");

            let body = self
                .http
                .get(&url)
                .send()
                .await
                .context("openfda request failed")?
                .error_for_status()
                .context("openfda returned an error status")?
                .text()
                .await
                .context("openfda response body unreadable")?;

            Ok(parse_label_response(&body)?)
        }

        async fn record_for(
            &self,
            generic: &str,
            pair: &DrugPair,
        ) -> SourceResult<Option<InteractionRecord>> {
            let labels = self
                .fetch_labels(generic)
                .await
                .map_err(|e| SourceError::Remote(e.to_string()))?;
            Ok(labels
                .iter()
                .flat_map(to_records)
                .find(|record| &record.pair == pair))
        }
    }

    #[async_trait]
    impl KnowledgeSource for OpenFdaClient {
        async fn lookup(&self, pair: &DrugPair) -> SourceResult<Option<InteractionRecord>> {
            if let Some(record) = self.record_for(&pair.a, pair).await? {
                return Ok(Some(record));
            }
            self.record_for(&pair.b, pair).await
        }

        fn name(&self) -> &str {
            "openfda"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crosscheck_core::models::Severity;

    fn warfarin_label() -> DrugLabel {
        DrugLabel {
            generic_name: "warfarin".into(),
            interaction_text:
                "Aspirin: increased risk of serious bleeding, avoid combination.\nAmiodarone: monitor INR and reduce dose as needed."
                    .into(),
        }
    }

    #[tokio::test]
    async fn test_mock_store_lookup() {
        let mut store = MockLabelStore::new();
        store.insert(warfarin_label());

        let hit = store
            .lookup(&DrugPair::new("aspirin", "warfarin").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.severity, Severity::Critical);
        assert_eq!(hit.source, "openfda");

        // Pair order does not matter; either side's label is consulted.
        let hit = store
            .lookup(&DrugPair::new("warfarin", "amiodarone").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hit.severity, Severity::Moderate);

        let miss = store
            .lookup(&DrugPair::new("warfarin", "metformin").unwrap())
            .await
            .unwrap();
        assert!(miss.is_none());
    }
}
