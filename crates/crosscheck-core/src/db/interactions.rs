//! Interaction table operations.

use rusqlite::{params, OptionalExtension};
use serde::Deserialize;
use tracing::{info, warn};

use super::{Database, DbError, DbResult};
use crate::models::{DrugPair, InteractionRecord, Severity};

impl Database {
    /// Insert or update the record for a pair.
    pub fn upsert_interaction(&self, record: &InteractionRecord) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO interactions (
                pair_key, drug_a, drug_b, severity, title,
                description, recommended_action, source, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, datetime('now'))
            ON CONFLICT(pair_key) DO UPDATE SET
                severity = excluded.severity,
                title = excluded.title,
                description = excluded.description,
                recommended_action = excluded.recommended_action,
                source = excluded.source,
                updated_at = datetime('now')
            "#,
            params![
                record.pair.key(),
                record.pair.a,
                record.pair.b,
                record.severity.label(),
                record.title,
                record.description,
                record.recommended_action,
                record.source,
            ],
        )?;
        Ok(())
    }

    /// Get the record for an unordered pair, if one exists.
    pub fn get_interaction(&self, pair: &DrugPair) -> DbResult<Option<InteractionRecord>> {
        let result = self
            .conn
            .query_row(
                r#"
                SELECT drug_a, drug_b, severity, title, description, recommended_action, source
                FROM interactions
                WHERE pair_key = ?
                "#,
                [pair.key()],
                |row| {
                    Ok(InteractionRow {
                        drug_a: row.get(0)?,
                        drug_b: row.get(1)?,
                        severity: row.get(2)?,
                        title: row.get(3)?,
                        description: row.get(4)?,
                        recommended_action: row.get(5)?,
                        source: row.get(6)?,
                    })
                },
            )
            .optional()?;

        result.map(|row| row.try_into()).transpose()
    }

    /// All records involving one drug.
    pub fn list_interactions_for_drug(&self, drug_id: &str) -> DbResult<Vec<InteractionRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT drug_a, drug_b, severity, title, description, recommended_action, source
            FROM interactions
            WHERE drug_a = ?1 OR drug_b = ?1
            ORDER BY pair_key
            "#,
        )?;

        let rows = stmt.query_map([drug_id], |row| {
            Ok(InteractionRow {
                drug_a: row.get(0)?,
                drug_b: row.get(1)?,
                severity: row.get(2)?,
                title: row.get(3)?,
                description: row.get(4)?,
                recommended_action: row.get(5)?,
                source: row.get(6)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.try_into()?);
        }
        Ok(records)
    }

    /// Number of stored pairs.
    pub fn count_interactions(&self) -> DbResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM interactions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Bulk-import interaction rows from a JSON array.
    ///
    /// Rows whose severity label cannot be mapped into the engine's tiers are
    /// skipped with a warning, so the stored tiers stay exact. Self-pairs are
    /// skipped the same way. Returns the number of rows imported.
    pub fn import_interactions_json(&self, json: &str) -> DbResult<usize> {
        let rows: Vec<ImportRow> = serde_json::from_str(json)?;
        let total = rows.len();
        let mut imported = 0;

        for row in rows {
            let Some(severity) = Severity::parse_label(&row.severity) else {
                warn!(drug_a = %row.drug_a, drug_b = %row.drug_b, severity = %row.severity,
                      "skipping interaction row with unrecognized severity");
                continue;
            };
            let Some(pair) = DrugPair::new(&row.drug_a, &row.drug_b) else {
                warn!(drug = %row.drug_a, "skipping self-pair interaction row");
                continue;
            };

            let title = row
                .title
                .unwrap_or_else(|| first_sentence(&row.description));
            self.upsert_interaction(&InteractionRecord {
                pair,
                severity,
                title,
                description: row.description,
                recommended_action: row.recommended_action.unwrap_or_default(),
                source: row.source.unwrap_or_else(|| "local".into()),
            })?;
            imported += 1;
        }

        info!(imported, skipped = total - imported, "interaction import finished");
        Ok(imported)
    }
}

/// One row of the JSON import format (mirrors the cleaned DDI export columns).
#[derive(Debug, Deserialize)]
struct ImportRow {
    drug_a: String,
    drug_b: String,
    severity: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    recommended_action: Option<String>,
    #[serde(default)]
    source: Option<String>,
}

/// Intermediate row struct for database mapping.
struct InteractionRow {
    drug_a: String,
    drug_b: String,
    severity: String,
    title: String,
    description: String,
    recommended_action: String,
    source: String,
}

impl TryFrom<InteractionRow> for InteractionRecord {
    type Error = DbError;

    fn try_from(row: InteractionRow) -> Result<Self, Self::Error> {
        let severity = Severity::parse_label(&row.severity).ok_or_else(|| {
            DbError::Constraint(format!("invalid stored severity: {}", row.severity))
        })?;
        let pair = DrugPair::new(&row.drug_a, &row.drug_b).ok_or_else(|| {
            DbError::Constraint(format!("stored self-pair: {}", row.drug_a))
        })?;
        Ok(InteractionRecord {
            pair,
            severity,
            title: row.title,
            description: row.description,
            recommended_action: row.recommended_action,
            source: row.source,
        })
    }
}

fn first_sentence(text: &str) -> String {
    match text.split_once('.') {
        Some((head, _)) if !head.trim().is_empty() => head.trim().to_string(),
        _ => text.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(a: &str, b: &str, severity: Severity) -> InteractionRecord {
        InteractionRecord {
            pair: DrugPair::new(a, b).unwrap(),
            severity,
            title: "Increased bleeding risk".into(),
            description: "Both agents inhibit clotting.".into(),
            recommended_action: "Monitor INR closely".into(),
            source: "local".into(),
        }
    }

    #[test]
    fn test_upsert_and_get() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_interaction(&record("warfarin", "aspirin", Severity::Critical))
            .unwrap();

        let found = db
            .get_interaction(&DrugPair::new("aspirin", "warfarin").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(found.severity, Severity::Critical);
        assert_eq!(found.pair.a, "aspirin");
        assert_eq!(found.pair.b, "warfarin");
    }

    #[test]
    fn test_get_missing_pair() {
        let db = Database::open_in_memory().unwrap();
        let found = db
            .get_interaction(&DrugPair::new("metformin", "losartan").unwrap())
            .unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_upsert_updates_in_place() {
        let db = Database::open_in_memory().unwrap();
        let mut rec = record("warfarin", "aspirin", Severity::Moderate);
        db.upsert_interaction(&rec).unwrap();

        rec.severity = Severity::Critical;
        db.upsert_interaction(&rec).unwrap();

        assert_eq!(db.count_interactions().unwrap(), 1);
        let found = db.get_interaction(&rec.pair).unwrap().unwrap();
        assert_eq!(found.severity, Severity::Critical);
    }

    #[test]
    fn test_list_for_drug() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_interaction(&record("warfarin", "aspirin", Severity::Critical))
            .unwrap();
        db.upsert_interaction(&record("warfarin", "ibuprofen", Severity::Moderate))
            .unwrap();
        db.upsert_interaction(&record("metformin", "losartan", Severity::Minor))
            .unwrap();

        let for_warfarin = db.list_interactions_for_drug("warfarin").unwrap();
        assert_eq!(for_warfarin.len(), 2);
    }

    #[test]
    fn test_import_skips_bad_rows() {
        let db = Database::open_in_memory().unwrap();
        let json = r#"[
            {"drug_a": "Warfarin", "drug_b": "Aspirin", "severity": "major",
             "description": "Increased bleeding risk. Monitor INR."},
            {"drug_a": "DrugX", "drug_b": "DrugY", "severity": "???", "description": "gibberish"},
            {"drug_a": "Aspirin", "drug_b": "aspirin", "severity": "minor", "description": "self"}
        ]"#;

        let imported = db.import_interactions_json(json).unwrap();
        assert_eq!(imported, 1);
        assert_eq!(db.count_interactions().unwrap(), 1);

        // "major" collapses into the critical tier; title comes from the
        // first sentence of the description.
        let found = db
            .get_interaction(&DrugPair::new("warfarin", "aspirin").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(found.severity, Severity::Critical);
        assert_eq!(found.title, "Increased bleeding risk");
    }
}
