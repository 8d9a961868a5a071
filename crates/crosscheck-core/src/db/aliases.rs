//! Drug alias table operations.

use std::collections::HashMap;

use rusqlite::{params, OptionalExtension};
use serde::Deserialize;
use tracing::info;

use super::{Database, DbResult};
use crate::models::normalize_name;

impl Database {
    /// Insert or update a brand -> generic alias.
    pub fn upsert_alias(&self, alias: &str, generic: &str) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO drug_aliases (alias, generic) VALUES (?1, ?2)
            ON CONFLICT(alias) DO UPDATE SET generic = excluded.generic
            "#,
            params![normalize_name(alias), normalize_name(generic)],
        )?;
        Ok(())
    }

    /// Look up the generic name for an alias.
    pub fn get_alias(&self, alias: &str) -> DbResult<Option<String>> {
        let generic = self
            .conn
            .query_row(
                "SELECT generic FROM drug_aliases WHERE alias = ?",
                [normalize_name(alias)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(generic)
    }

    /// The full alias map, for seeding a normalizer.
    pub fn all_aliases(&self) -> DbResult<HashMap<String, String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT alias, generic FROM drug_aliases")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut map = HashMap::new();
        for row in rows {
            let (alias, generic): (String, String) = row?;
            map.insert(alias, generic);
        }
        Ok(map)
    }

    /// Bulk-import aliases from a JSON object of `{"brand": "generic"}`.
    pub fn import_aliases_json(&self, json: &str) -> DbResult<usize> {
        let map: AliasImport = serde_json::from_str(json)?;
        let count = map.0.len();
        for (alias, generic) in &map.0 {
            self.upsert_alias(alias, generic)?;
        }
        info!(count, "alias import finished");
        Ok(count)
    }
}

#[derive(Debug, Deserialize)]
struct AliasImport(HashMap<String, String>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_and_get_alias() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_alias("Ecosprin", "Aspirin").unwrap();

        assert_eq!(db.get_alias("ecosprin").unwrap(), Some("aspirin".into()));
        assert_eq!(db.get_alias(" ECOSPRIN ").unwrap(), Some("aspirin".into()));
        assert_eq!(db.get_alias("unknownbrand").unwrap(), None);
    }

    #[test]
    fn test_import_aliases() {
        let db = Database::open_in_memory().unwrap();
        let json = r#"{"Crocin": "Paracetamol", "Dolo": "Paracetamol", "Glycomet": "Metformin"}"#;

        let count = db.import_aliases_json(json).unwrap();
        assert_eq!(count, 3);

        let map = db.all_aliases().unwrap();
        assert_eq!(map.get("dolo"), Some(&"paracetamol".to_string()));
        assert_eq!(map.get("glycomet"), Some(&"metformin".to_string()));
    }
}
