//! Knowledge sources: where interaction records come from.
//!
//! The engine queries a [`KnowledgeSource`] once per unordered pair. A source
//! answers with zero or one record; a failed lookup is an error the resolver
//! surfaces as an `unknown` pair, never as "no interaction".

mod layered;
mod memory;
mod sqlite;

pub use layered::*;
pub use memory::*;
pub use sqlite::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{DrugPair, InteractionRecord};

/// Knowledge source errors.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("knowledge base error: {0}")]
    Database(#[from] crate::db::DbError),

    #[error("lookup task failed: {0}")]
    Task(String),

    #[error("remote source error: {0}")]
    Remote(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// A provider of interaction records for unordered drug pairs.
///
/// Identifiers in the pair are already normalized and alias-expanded by the
/// resolver; implementations match on them exactly.
#[async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Zero or one record for the pair, or an error if the lookup failed.
    async fn lookup(&self, pair: &DrugPair) -> SourceResult<Option<InteractionRecord>>;

    /// Short label used in logs and record provenance.
    fn name(&self) -> &str;
}
