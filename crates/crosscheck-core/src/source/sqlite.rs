//! SQLite-backed knowledge source.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{KnowledgeSource, SourceError, SourceResult};
use crate::db::Database;
use crate::models::{DrugPair, InteractionRecord};

/// Knowledge source backed by the local SQLite knowledge base.
///
/// Lookups run on the blocking thread pool; the connection is shared behind a
/// mutex so one source can serve concurrent pair lookups.
#[derive(Clone)]
pub struct SqliteSource {
    db: Arc<Mutex<Database>>,
}

impl SqliteSource {
    pub fn new(db: Database) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
        }
    }

    /// Share an already-wrapped database handle.
    pub fn from_shared(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// Access the underlying handle (e.g., for imports).
    pub fn database(&self) -> Arc<Mutex<Database>> {
        Arc::clone(&self.db)
    }
}

#[async_trait]
impl KnowledgeSource for SqliteSource {
    async fn lookup(&self, pair: &DrugPair) -> SourceResult<Option<InteractionRecord>> {
        let db = Arc::clone(&self.db);
        let pair = pair.clone();

        tokio::task::spawn_blocking(move || {
            let db = db
                .lock()
                .map_err(|e| SourceError::Task(format!("lock poisoned: {e}")))?;
            Ok(db.get_interaction(&pair)?)
        })
        .await
        .map_err(|e| SourceError::Task(e.to_string()))?
    }

    fn name(&self) -> &str {
        "local"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;

    #[tokio::test]
    async fn test_lookup_hit_and_miss() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_interaction(&InteractionRecord {
            pair: DrugPair::new("warfarin", "aspirin").unwrap(),
            severity: Severity::Critical,
            title: "Increased bleeding risk".into(),
            description: String::new(),
            recommended_action: "Monitor INR closely".into(),
            source: "local".into(),
        })
        .unwrap();

        let source = SqliteSource::new(db);

        let hit = source
            .lookup(&DrugPair::new("aspirin", "warfarin").unwrap())
            .await
            .unwrap();
        assert!(hit.is_some());

        let miss = source
            .lookup(&DrugPair::new("metformin", "losartan").unwrap())
            .await
            .unwrap();
        assert!(miss.is_none());
    }
}
