//! Field identifiers for the patient physique record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unknown field name received from a caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown physique field: {0}")]
pub struct UnknownField(pub String);

/// One input of the physique form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum PhysiqueField {
    Bmi,
    Weight,
    Height,
    BloodPressure,
    HeartRate,
    Temperature,
    Respiration,
    Complaint,
    DistanceVisionExamination,
    DistanceVisionExaminationWithGlasses,
    NearVisionExamination,
    VisualFieldExamination,
    NightVisionExamination,
    ColorVisionExamination,
    HearingExamination,
    BloodExamination,
}

impl PhysiqueField {
    /// All fields in canonical (wire payload) order.
    pub const ALL: [PhysiqueField; 16] = [
        PhysiqueField::Bmi,
        PhysiqueField::Weight,
        PhysiqueField::Height,
        PhysiqueField::BloodPressure,
        PhysiqueField::HeartRate,
        PhysiqueField::Temperature,
        PhysiqueField::Respiration,
        PhysiqueField::Complaint,
        PhysiqueField::DistanceVisionExamination,
        PhysiqueField::DistanceVisionExaminationWithGlasses,
        PhysiqueField::NearVisionExamination,
        PhysiqueField::VisualFieldExamination,
        PhysiqueField::NightVisionExamination,
        PhysiqueField::ColorVisionExamination,
        PhysiqueField::HearingExamination,
        PhysiqueField::BloodExamination,
    ];

    /// Fields that must be non-blank before a submit is attempted.
    pub const REQUIRED: [PhysiqueField; 10] = [
        PhysiqueField::Bmi,
        PhysiqueField::Weight,
        PhysiqueField::Height,
        PhysiqueField::BloodPressure,
        PhysiqueField::HeartRate,
        PhysiqueField::Complaint,
        PhysiqueField::DistanceVisionExamination,
        PhysiqueField::DistanceVisionExaminationWithGlasses,
        PhysiqueField::NearVisionExamination,
        PhysiqueField::BloodExamination,
    ];

    /// Wire name (camelCase JSON key).
    pub fn as_str(&self) -> &'static str {
        match self {
            PhysiqueField::Bmi => "bmi",
            PhysiqueField::Weight => "weight",
            PhysiqueField::Height => "height",
            PhysiqueField::BloodPressure => "bloodPressure",
            PhysiqueField::HeartRate => "heartRate",
            PhysiqueField::Temperature => "temperature",
            PhysiqueField::Respiration => "respiration",
            PhysiqueField::Complaint => "complaint",
            PhysiqueField::DistanceVisionExamination => "distanceVisionExamination",
            PhysiqueField::DistanceVisionExaminationWithGlasses => {
                "distanceVisionExaminationWithGlasses"
            }
            PhysiqueField::NearVisionExamination => "nearVisionExamination",
            PhysiqueField::VisualFieldExamination => "visualFieldExamination",
            PhysiqueField::NightVisionExamination => "nightVisionExamination",
            PhysiqueField::ColorVisionExamination => "colorVisionExamination",
            PhysiqueField::HearingExamination => "hearingExamination",
            PhysiqueField::BloodExamination => "bloodExamination",
        }
    }

    /// Whether a change to this field triggers BMI recomputation.
    pub fn seeds_bmi(&self) -> bool {
        matches!(self, PhysiqueField::Weight | PhysiqueField::Height)
    }

    pub fn is_required(&self) -> bool {
        Self::REQUIRED.contains(self)
    }
}

impl fmt::Display for PhysiqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhysiqueField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}
