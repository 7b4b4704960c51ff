//! Required-field validation before submit.

use crate::models::{PhysiqueField, PhysiqueRecord};

/// Required fields that are absent or blank after trimming, in declaration order.
pub fn missing_required(record: &PhysiqueRecord) -> Vec<PhysiqueField> {
    PhysiqueField::REQUIRED
        .into_iter()
        .filter(|field| record.is_blank(*field))
        .collect()
}

/// Comma-separated wire names, for log lines and error messages.
pub fn describe_fields(fields: &[PhysiqueField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_record() -> PhysiqueRecord {
        let mut record = PhysiqueRecord::blank();
        for field in PhysiqueField::REQUIRED {
            record.set(field, "x");
        }
        record
    }

    #[test]
    fn test_blank_record_misses_all_required() {
        let missing = missing_required(&PhysiqueRecord::blank());
        assert_eq!(missing, PhysiqueField::REQUIRED.to_vec());
    }

    #[test]
    fn test_complete_record_passes() {
        assert!(missing_required(&complete_record()).is_empty());
    }

    #[test]
    fn test_optional_fields_not_checked() {
        let record = complete_record();
        assert!(record.is_blank(PhysiqueField::Temperature));
        assert!(missing_required(&record).is_empty());
    }

    #[test]
    fn test_whitespace_and_unloaded_count_as_missing() {
        let mut record = complete_record();
        record.set(PhysiqueField::HeartRate, "  ");
        record.blood_examination = None;

        let missing = missing_required(&record);
        assert_eq!(
            missing,
            vec![PhysiqueField::HeartRate, PhysiqueField::BloodExamination]
        );
        assert_eq!(describe_fields(&missing), "heartRate, bloodExamination");
    }
}
