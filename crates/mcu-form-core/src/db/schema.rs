//! SQLite schema definition.

/// Local draft store schema.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Physique Drafts (one in-progress entry per patient)
-- ============================================================================

CREATE TABLE IF NOT EXISTS physique_drafts (
    draft_id TEXT PRIMARY KEY,
    patient_id TEXT NOT NULL UNIQUE,
    payload TEXT NOT NULL,                       -- JSON PhysiqueRecord
    fingerprint TEXT NOT NULL,                   -- SHA-256 of the submit payload
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_physique_drafts_updated ON physique_drafts(updated_at);
"#;
