//! Local SQLite store for unsubmitted physique drafts.
//!
//! Holds at most one draft per patient. Edits are autosaved here so a form left
//! half-filled survives a restart, and the draft is dropped once the record is
//! submitted or the form is reset.

mod schema;
mod drafts;

pub use schema::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Draft store errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Draft payload could not be (de)serialized: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Draft not found: {0}")]
    NotFound(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Handle on the draft database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the draft file at `path`, creating it and the drafts table if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::with_connection(Connection::open(path)?)
    }

    /// Drafts that live only as long as the handle.
    pub fn open_in_memory() -> DbResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> DbResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Names of the tables and indexes the store has created.
    pub fn schema_objects(&self) -> DbResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master
             WHERE type IN ('table', 'index') AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PhysiqueField, PhysiqueRecord};

    #[test]
    fn test_drafts_table_and_index_created() {
        let db = Database::open_in_memory().unwrap();

        let objects = db.schema_objects().unwrap();
        assert_eq!(
            objects,
            vec![
                "idx_physique_drafts_updated".to_string(),
                "physique_drafts".to_string()
            ]
        );
    }

    #[test]
    fn test_one_draft_row_per_patient() {
        let db = Database::open_in_memory().unwrap();

        let insert = "INSERT INTO physique_drafts (draft_id, patient_id, payload, fingerprint)
                      VALUES (?, 'p-1', '{}', 'x')";
        db.conn.execute(insert, ["d-1"]).unwrap();
        let err = db.conn.execute(insert, ["d-2"]).unwrap_err();
        assert!(err.to_string().contains("UNIQUE"));
    }

    #[test]
    fn test_reopen_keeps_drafts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drafts.db");

        let mut record = PhysiqueRecord::blank();
        record.set(PhysiqueField::Height, "172");
        Database::open(&path)
            .unwrap()
            .save_draft("p-1", &record)
            .unwrap();

        let reopened = Database::open(&path).unwrap();
        let draft = reopened.require_draft("p-1").unwrap();
        assert_eq!(draft.record.get(PhysiqueField::Height), Some("172"));
    }
}
