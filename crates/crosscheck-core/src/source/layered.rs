//! Layered knowledge source: consult sources in order, first record wins.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use super::{KnowledgeSource, SourceError, SourceResult};
use crate::models::{DrugPair, InteractionRecord};

/// Queries a stack of sources in priority order.
///
/// The first source returning a record answers for the pair. A layer that
/// errors is skipped as long as a later layer finds a record; if every layer
/// misses and any layer errored, the error propagates — a failed layer might
/// have held the record, so the pair must not read as "confirmed safe".
pub struct LayeredSource {
    layers: Vec<Arc<dyn KnowledgeSource>>,
}

impl LayeredSource {
    pub fn new(layers: Vec<Arc<dyn KnowledgeSource>>) -> Self {
        Self { layers }
    }

    pub fn push(&mut self, layer: Arc<dyn KnowledgeSource>) {
        self.layers.push(layer);
    }
}

#[async_trait]
impl KnowledgeSource for LayeredSource {
    async fn lookup(&self, pair: &DrugPair) -> SourceResult<Option<InteractionRecord>> {
        let mut first_error: Option<SourceError> = None;

        for layer in &self.layers {
            match layer.lookup(pair).await {
                Ok(Some(record)) => return Ok(Some(record)),
                Ok(None) => continue,
                Err(e) => {
                    warn!(layer = layer.name(), %pair, error = %e, "knowledge layer failed");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    fn name(&self) -> &str {
        "layered"
    }
}
