//! Pair resolver: enumerate drug pairs and query the knowledge source.
//!
//! Pipeline: normalize + dedupe -> stable pair enumeration -> bounded
//! concurrent lookups -> deterministic reassembly.

mod normalizer;

pub use normalizer::*;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Notify, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::models::{Drug, DrugPair, InteractionRecord, UnresolvedPair};
use crate::source::{KnowledgeSource, SourceResult};

/// Upper bound on in-flight knowledge source queries per resolve call.
const DEFAULT_MAX_IN_FLIGHT: usize = 8;

/// Resolver errors.
#[derive(Error, Debug)]
pub enum ResolverError {
    #[error("check cancelled by caller")]
    Cancelled,
}

pub type ResolverResult<T> = Result<T, ResolverError>;

/// Caller-held cancellation flag for an in-flight check.
///
/// Cloning shares the flag; `cancel` wakes every waiting resolve call, which
/// abandons its in-flight lookups and discards partial results.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag {
    inner: Arc<CancelInner>,
}

#[derive(Debug, Default)]
struct CancelInner {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once the flag is set.
    pub async fn cancelled(&self) {
        loop {
            // Register before checking so a concurrent cancel cannot be missed.
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }
}

/// Raw output of one resolve call, before aggregation.
#[derive(Debug, Clone, Default)]
pub struct ResolveOutcome {
    /// Records found, in deterministic pair-enumeration order
    pub found: Vec<InteractionRecord>,
    /// Pairs whose lookup failed, same order
    pub unresolved: Vec<UnresolvedPair>,
    /// Distinct drugs after normalization
    pub distinct_drugs: usize,
    /// Pairs queried: C(distinct_drugs, 2)
    pub pairs_checked: usize,
}

/// Enumerate all unordered pairs over sorted distinct identifiers.
///
/// The i < j traversal over a sorted slice fixes the order, so repeated calls
/// with the same set always yield the same pair sequence.
pub fn enumerate_pairs(ids: &[String]) -> Vec<DrugPair> {
    let mut pairs = Vec::with_capacity(ids.len() * ids.len().saturating_sub(1) / 2);
    for i in 0..ids.len() {
        for j in (i + 1)..ids.len() {
            if let Some(pair) = DrugPair::new(&ids[i], &ids[j]) {
                pairs.push(pair);
            }
        }
    }
    pairs
}

/// Resolver that coordinates normalization, enumeration and lookup.
pub struct PairResolver {
    source: Arc<dyn KnowledgeSource>,
    normalizer: Normalizer,
    max_in_flight: usize,
}

impl PairResolver {
    pub fn new(source: Arc<dyn KnowledgeSource>) -> Self {
        Self {
            source,
            normalizer: Normalizer::new(),
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    pub fn with_normalizer(source: Arc<dyn KnowledgeSource>, normalizer: Normalizer) -> Self {
        Self {
            source,
            normalizer,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    /// Override the lookup concurrency limit (must be >= 1).
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Sorted distinct canonical identifiers for a drug list.
    pub fn distinct_ids(&self, drugs: &[Drug]) -> Vec<String> {
        let set: BTreeSet<String> = drugs
            .iter()
            .map(|d| self.normalizer.canonical(&d.display_name))
            .filter(|id| !id.is_empty())
            .collect();
        set.into_iter().collect()
    }

    /// Check every unordered pair in the drug set against the knowledge source.
    ///
    /// Fewer than two distinct drugs is a valid, trivially safe input: the
    /// outcome is empty with `pairs_checked == 0`. Each pair is queried exactly
    /// once; lookups run concurrently but results are reassembled into the
    /// deterministic enumeration order before returning.
    pub async fn resolve(
        &self,
        drugs: &[Drug],
        cancel: &CancelFlag,
    ) -> ResolverResult<ResolveOutcome> {
        let ids = self.distinct_ids(drugs);
        let pairs = enumerate_pairs(&ids);

        if pairs.is_empty() {
            return Ok(ResolveOutcome {
                distinct_drugs: ids.len(),
                ..ResolveOutcome::default()
            });
        }

        debug!(drugs = ids.len(), pairs = pairs.len(), "resolving pair set");

        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));
        let mut join_set = JoinSet::new();
        for (idx, pair) in pairs.iter().cloned().enumerate() {
            let source = Arc::clone(&self.source);
            let semaphore = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                (idx, source.lookup(&pair).await)
            });
        }

        let mut slots: Vec<Option<SourceResult<Option<InteractionRecord>>>> =
            (0..pairs.len()).map(|_| None).collect();

        loop {
            let joined = tokio::select! {
                _ = cancel.cancelled() => {
                    // Dropping the join set aborts the in-flight lookups.
                    return Err(ResolverError::Cancelled);
                }
                joined = join_set.join_next() => joined,
            };
            let Some(result) = joined else { break };
            if let Ok((idx, outcome)) = result {
                slots[idx] = Some(outcome);
            }
        }

        let mut outcome = ResolveOutcome {
            distinct_drugs: ids.len(),
            pairs_checked: pairs.len(),
            ..ResolveOutcome::default()
        };

        for (idx, pair) in pairs.iter().enumerate() {
            match slots[idx].take() {
                Some(Ok(Some(record))) => outcome.found.push(record),
                Some(Ok(None)) => {}
                Some(Err(e)) => {
                    warn!(%pair, error = %e, "pair lookup failed; marking unknown");
                    outcome.unresolved.push(UnresolvedPair {
                        pair: pair.clone(),
                        reason: e.to_string(),
                    });
                }
                None => {
                    warn!(%pair, "pair lookup task died; marking unknown");
                    outcome.unresolved.push(UnresolvedPair {
                        pair: pair.clone(),
                        reason: "lookup task failed".into(),
                    });
                }
            }
        }

        Ok(outcome)
    }
}
