//! Presentational descriptors for the physique form.
//!
//! These are stateless: each control is derived from the current record every time
//! the layout is requested, and the shell renders it as a plain input, a text area or
//! a radio group.

use serde::Serialize;

use crate::models::{PhysiqueField, PhysiqueRecord};

const NORMAL: &str = "Normal";
const ABNORMAL: &str = "Abnormal";

/// A radio choice bound to a field.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RadioOption {
    pub id: String,
    pub value: String,
    pub label: String,
    pub checked: bool,
}

/// How a control is drawn.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Widget {
    Text { placeholder: Option<String> },
    TextArea { placeholder: Option<String>, rows: u32 },
    Radio { options: Vec<RadioOption> },
}

/// One control with its current value.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ControlDescriptor {
    /// DOM-style element id
    pub id: String,
    pub field: PhysiqueField,
    /// Empty when the control shares a label with the previous one
    pub label: String,
    pub widget: Widget,
    pub value: String,
    pub disabled: bool,
}

/// A visual group of controls.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Section {
    pub title: String,
    pub controls: Vec<ControlDescriptor>,
}

/// Build the four form sections from the current record.
pub fn build_layout(record: &PhysiqueRecord) -> Vec<Section> {
    vec![
        Section {
            title: "Measurements".into(),
            controls: vec![
                // Derived; locked once a value exists
                ControlDescriptor {
                    disabled: !record.display_value(PhysiqueField::Bmi).is_empty(),
                    ..text(record, "bmi", PhysiqueField::Bmi, "BMI", None)
                },
                text(record, "height", PhysiqueField::Height, "Height (cm)", None),
                text(record, "weight", PhysiqueField::Weight, "Weight (kg)", None),
                text(
                    record,
                    "blood_pressure",
                    PhysiqueField::BloodPressure,
                    "Blood Pressure (mmHg)",
                    Some("100/80"),
                ),
                text(
                    record,
                    "heartRate",
                    PhysiqueField::HeartRate,
                    "Heart Rate (bpm)",
                    Some("80"),
                ),
                text(
                    record,
                    "temperature",
                    PhysiqueField::Temperature,
                    "Temperature (Celcius)",
                    Some("36.5"),
                ),
                text(
                    record,
                    "respiration",
                    PhysiqueField::Respiration,
                    "Respiration",
                    Some("20"),
                ),
            ],
        },
        Section {
            title: "Complaint".into(),
            controls: vec![ControlDescriptor {
                id: "complaint".into(),
                field: PhysiqueField::Complaint,
                label: "Complaint".into(),
                widget: Widget::TextArea {
                    placeholder: Some(
                        "Isi keluhan pasien disini/ Write patient's complaint here".into(),
                    ),
                    rows: 8,
                },
                value: record.display_value(PhysiqueField::Complaint).to_string(),
                disabled: false,
            }],
        },
        Section {
            title: "Vision".into(),
            controls: vec![
                text(
                    record,
                    "distanceVisionExamination",
                    PhysiqueField::DistanceVisionExamination,
                    "Distance Vision Examination",
                    Some("20/20"),
                ),
                text(
                    record,
                    "distanceVisionExaminationWithGlasses",
                    PhysiqueField::DistanceVisionExaminationWithGlasses,
                    "Vision Examination With Glasses",
                    Some("20/20"),
                ),
                text(
                    record,
                    "nearVisionExamination",
                    PhysiqueField::NearVisionExamination,
                    "Near Vision Examination",
                    Some("J1"),
                ),
                text(
                    record,
                    "visualFieldExamination",
                    PhysiqueField::VisualFieldExamination,
                    "Visual Field Examination",
                    Some("85"),
                ),
                normal_abnormal(
                    record,
                    "nightVision",
                    PhysiqueField::NightVisionExamination,
                    "Night Vision Examination",
                ),
            ],
        },
        Section {
            title: "Other Examinations".into(),
            controls: vec![
                normal_abnormal(
                    record,
                    "colorVision",
                    PhysiqueField::ColorVisionExamination,
                    "Color Vision Examination",
                ),
                normal_abnormal(
                    record,
                    "hearing",
                    PhysiqueField::HearingExamination,
                    "Hearing Examination",
                ),
                // Free-text description writes to the same field as the radios
                text(
                    record,
                    "hearingExaminationInput",
                    PhysiqueField::HearingExamination,
                    "",
                    Some("Keterangan/ Description"),
                ),
                normal_abnormal(
                    record,
                    "bloodExamination",
                    PhysiqueField::BloodExamination,
                    "Blood Examination",
                ),
            ],
        },
    ]
}

/// Flatten sections into their controls, in display order.
pub fn controls(sections: &[Section]) -> impl Iterator<Item = &ControlDescriptor> {
    sections.iter().flat_map(|s| s.controls.iter())
}

fn text(
    record: &PhysiqueRecord,
    id: &str,
    field: PhysiqueField,
    label: &str,
    placeholder: Option<&str>,
) -> ControlDescriptor {
    ControlDescriptor {
        id: id.into(),
        field,
        label: label.into(),
        widget: Widget::Text {
            placeholder: placeholder.map(Into::into),
        },
        value: record.display_value(field).to_string(),
        disabled: false,
    }
}

fn normal_abnormal(
    record: &PhysiqueRecord,
    id_prefix: &str,
    field: PhysiqueField,
    label: &str,
) -> ControlDescriptor {
    let current = record.display_value(field);
    let option = |suffix: &str, value: &str| RadioOption {
        id: format!("{}{}", id_prefix, suffix),
        value: value.into(),
        label: value.into(),
        checked: current == value,
    };

    ControlDescriptor {
        id: id_prefix.into(),
        field,
        label: label.into(),
        widget: Widget::Radio {
            options: vec![option(NORMAL, NORMAL), option(ABNORMAL, ABNORMAL)],
        },
        value: current.to_string(),
        disabled: false,
    }
}
