//! SQLite schema definition.

/// Complete database schema for the interaction knowledge base.
pub const SCHEMA: &str = r#"
-- Enable foreign keys
PRAGMA foreign_keys = ON;

-- ============================================================================
-- Interactions (one row per unordered drug pair)
-- ============================================================================

CREATE TABLE IF NOT EXISTS interactions (
    pair_key TEXT PRIMARY KEY,                   -- "drug_a|drug_b", lexicographic
    drug_a TEXT NOT NULL,                        -- normalized, drug_a < drug_b
    drug_b TEXT NOT NULL,
    severity TEXT NOT NULL CHECK (severity IN ('minor', 'moderate', 'critical')),
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    recommended_action TEXT NOT NULL DEFAULT '',
    source TEXT NOT NULL DEFAULT 'local',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Per-drug lookups ("everything interacting with warfarin")
CREATE INDEX IF NOT EXISTS idx_interactions_drug_a ON interactions(drug_a);
CREATE INDEX IF NOT EXISTS idx_interactions_drug_b ON interactions(drug_b);
CREATE INDEX IF NOT EXISTS idx_interactions_severity ON interactions(severity);

-- ============================================================================
-- Drug aliases (brand name -> generic)
-- ============================================================================

CREATE TABLE IF NOT EXISTS drug_aliases (
    alias TEXT PRIMARY KEY,                      -- normalized brand name
    generic TEXT NOT NULL,                       -- normalized generic name
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_aliases_generic ON drug_aliases(generic);
"#;
