//! Patient physique record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use super::field::PhysiqueField;

/// Physique measurements and examination results for one patient.
///
/// Every value is kept as text, numeric ones included. `None` means the value was
/// never loaded (or absent from the server response); `Some("")` means known-empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PhysiqueRecord {
    pub bmi: Option<String>,
    /// Weight in kg
    pub weight: Option<String>,
    /// Height in cm
    pub height: Option<String>,
    /// e.g. "100/80" (mmHg)
    pub blood_pressure: Option<String>,
    /// Beats per minute
    pub heart_rate: Option<String>,
    /// Celsius
    pub temperature: Option<String>,
    pub respiration: Option<String>,
    pub complaint: Option<String>,
    pub distance_vision_examination: Option<String>,
    pub distance_vision_examination_with_glasses: Option<String>,
    pub near_vision_examination: Option<String>,
    pub visual_field_examination: Option<String>,
    pub night_vision_examination: Option<String>,
    pub color_vision_examination: Option<String>,
    pub hearing_examination: Option<String>,
    pub blood_examination: Option<String>,
}

impl PhysiqueRecord {
    /// A record with every field known-empty.
    pub fn blank() -> Self {
        let mut record = Self::default();
        for field in PhysiqueField::ALL {
            record.set(field, String::new());
        }
        record
    }

    /// Build a record from a server response object.
    ///
    /// String values are taken as-is, other scalars keep their JSON text, `null`
    /// and missing keys become `None`. Keys that are not physique fields are ignored.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let mut record = Self::default();
        for field in PhysiqueField::ALL {
            let value = match object.get(field.as_str()) {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
            };
            *record.slot_mut(field) = value;
        }
        record
    }

    pub fn get(&self, field: PhysiqueField) -> Option<&str> {
        self.slot(field).as_deref()
    }

    /// Value to render in a controlled input; never absent.
    pub fn display_value(&self, field: PhysiqueField) -> &str {
        self.get(field).unwrap_or("")
    }

    pub fn set(&mut self, field: PhysiqueField, value: impl Into<String>) {
        *self.slot_mut(field) = Some(value.into());
    }

    /// True when the field is absent or only whitespace.
    pub fn is_blank(&self, field: PhysiqueField) -> bool {
        self.get(field).map_or(true, |v| v.trim().is_empty())
    }

    /// Copy every populated field of `other` onto this record.
    pub fn overlay(&mut self, other: &PhysiqueRecord) {
        for field in PhysiqueField::ALL {
            if let Some(value) = other.get(field) {
                self.set(field, value);
            }
        }
    }

    /// Fields never populated by a load or a change.
    pub fn unloaded_fields(&self) -> Vec<PhysiqueField> {
        PhysiqueField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_none())
            .collect()
    }

    /// Write payload: all 16 keys, each a string.
    pub fn to_payload(&self) -> Value {
        let object: Map<String, Value> = PhysiqueField::ALL
            .into_iter()
            .map(|f| (f.as_str().to_string(), Value::String(self.display_value(f).to_string())))
            .collect();
        Value::Object(object)
    }

    /// Hex SHA-256 of the serialized payload.
    pub fn fingerprint(&self) -> String {
        let canonical = self.to_payload().to_string();
        hex::encode(Sha256::digest(canonical.as_bytes()))
    }

    fn slot(&self, field: PhysiqueField) -> &Option<String> {
        match field {
            PhysiqueField::Bmi => &self.bmi,
            PhysiqueField::Weight => &self.weight,
            PhysiqueField::Height => &self.height,
            PhysiqueField::BloodPressure => &self.blood_pressure,
            PhysiqueField::HeartRate => &self.heart_rate,
            PhysiqueField::Temperature => &self.temperature,
            PhysiqueField::Respiration => &self.respiration,
            PhysiqueField::Complaint => &self.complaint,
            PhysiqueField::DistanceVisionExamination => &self.distance_vision_examination,
            PhysiqueField::DistanceVisionExaminationWithGlasses => {
                &self.distance_vision_examination_with_glasses
            }
            PhysiqueField::NearVisionExamination => &self.near_vision_examination,
            PhysiqueField::VisualFieldExamination => &self.visual_field_examination,
            PhysiqueField::NightVisionExamination => &self.night_vision_examination,
            PhysiqueField::ColorVisionExamination => &self.color_vision_examination,
            PhysiqueField::HearingExamination => &self.hearing_examination,
            PhysiqueField::BloodExamination => &self.blood_examination,
        }
    }

    fn slot_mut(&mut self, field: PhysiqueField) -> &mut Option<String> {
        match field {
            PhysiqueField::Bmi => &mut self.bmi,
            PhysiqueField::Weight => &mut self.weight,
            PhysiqueField::Height => &mut self.height,
            PhysiqueField::BloodPressure => &mut self.blood_pressure,
            PhysiqueField::HeartRate => &mut self.heart_rate,
            PhysiqueField::Temperature => &mut self.temperature,
            PhysiqueField::Respiration => &mut self.respiration,
            PhysiqueField::Complaint => &mut self.complaint,
            PhysiqueField::DistanceVisionExamination => &mut self.distance_vision_examination,
            PhysiqueField::DistanceVisionExaminationWithGlasses => {
                &mut self.distance_vision_examination_with_glasses
            }
            PhysiqueField::NearVisionExamination => &mut self.near_vision_examination,
            PhysiqueField::VisualFieldExamination => &mut self.visual_field_examination,
            PhysiqueField::NightVisionExamination => &mut self.night_vision_examination,
            PhysiqueField::ColorVisionExamination => &mut self.color_vision_examination,
            PhysiqueField::HearingExamination => &mut self.hearing_examination,
            PhysiqueField::BloodExamination => &mut self.blood_examination,
        }
    }
}
