//! Physique draft database operations.

use rusqlite::{params, OptionalExtension};

use super::{Database, DbError, DbResult};
use crate::models::{PhysiqueDraft, PhysiqueRecord};

impl Database {
    /// Save the in-progress record for a patient.
    ///
    /// Returns `false` (and writes nothing) when the stored draft already has the
    /// same fingerprint.
    pub fn save_draft(&self, patient_id: &str, record: &PhysiqueRecord) -> DbResult<bool> {
        let fingerprint = record.fingerprint();
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT fingerprint FROM physique_drafts WHERE patient_id = ?",
                [patient_id],
                |row| row.get(0),
            )
            .optional()?;
        if stored.as_deref() == Some(fingerprint.as_str()) {
            return Ok(false);
        }

        let draft = PhysiqueDraft::new(patient_id.to_string(), record.clone());
        let payload = serde_json::to_string(&draft.record)?;

        self.conn.execute(
            r#"
            INSERT INTO physique_drafts (
                draft_id, patient_id, payload, fingerprint, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(patient_id) DO UPDATE SET
                payload = excluded.payload,
                fingerprint = excluded.fingerprint,
                updated_at = excluded.updated_at
            "#,
            params![
                draft.draft_id,
                draft.patient_id,
                payload,
                draft.fingerprint,
                draft.created_at,
                draft.updated_at,
            ],
        )?;
        Ok(true)
    }

    /// Get the draft for a patient.
    pub fn get_draft(&self, patient_id: &str) -> DbResult<Option<PhysiqueDraft>> {
        self.conn
            .query_row(
                r#"
                SELECT draft_id, patient_id, payload, fingerprint, created_at, updated_at
                FROM physique_drafts
                WHERE patient_id = ?
                "#,
                [patient_id],
                map_row,
            )
            .optional()?
            .map(|row| row.try_into())
            .transpose()
    }

    /// List all drafts, most recently updated first.
    pub fn list_drafts(&self) -> DbResult<Vec<PhysiqueDraft>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT draft_id, patient_id, payload, fingerprint, created_at, updated_at
            FROM physique_drafts
            ORDER BY updated_at DESC
            "#,
        )?;

        let rows = stmt.query_map([], map_row)?;

        let mut drafts = Vec::new();
        for row in rows {
            drafts.push(row?.try_into()?);
        }
        Ok(drafts)
    }

    /// Delete the draft for a patient.
    pub fn delete_draft(&self, patient_id: &str) -> DbResult<bool> {
        let rows_affected = self
            .conn
            .execute("DELETE FROM physique_drafts WHERE patient_id = ?", [patient_id])?;
        Ok(rows_affected > 0)
    }

    /// Get the draft for a patient, failing if there is none.
    pub fn require_draft(&self, patient_id: &str) -> DbResult<PhysiqueDraft> {
        self.get_draft(patient_id)?
            .ok_or_else(|| DbError::NotFound(format!("draft for patient {}", patient_id)))
    }
}

/// Intermediate row struct for database mapping.
struct DraftRow {
    draft_id: String,
    patient_id: String,
    payload: String,
    fingerprint: String,
    created_at: String,
    updated_at: String,
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DraftRow> {
    Ok(DraftRow {
        draft_id: row.get(0)?,
        patient_id: row.get(1)?,
        payload: row.get(2)?,
        fingerprint: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

impl TryFrom<DraftRow> for PhysiqueDraft {
    type Error = DbError;

    fn try_from(row: DraftRow) -> Result<Self, Self::Error> {
        let record: PhysiqueRecord = serde_json::from_str(&row.payload)?;

        Ok(PhysiqueDraft {
            draft_id: row.draft_id,
            patient_id: row.patient_id,
            record,
            fingerprint: row.fingerprint,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
