//! Locally saved, not yet submitted form state.

use serde::{Deserialize, Serialize};

use super::record::PhysiqueRecord;

/// An in-progress physique entry for one patient.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhysiqueDraft {
    /// Unique draft ID
    pub draft_id: String,
    /// Patient identifier used in the API path
    pub patient_id: String,
    /// Form contents at last save
    pub record: PhysiqueRecord,
    /// Fingerprint of `record`, used to skip no-op saves
    pub fingerprint: String,
    pub created_at: String,
    pub updated_at: String,
}

impl PhysiqueDraft {
    pub fn new(patient_id: String, record: PhysiqueRecord) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            draft_id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            fingerprint: record.fingerprint(),
            record,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_draft() {
        let draft = PhysiqueDraft::new("p-1".into(), PhysiqueRecord::blank());
        assert_eq!(draft.patient_id, "p-1");
        assert_eq!(draft.draft_id.len(), 36);
        assert_eq!(draft.fingerprint, PhysiqueRecord::blank().fingerprint());
    }
}
