//! MCU Form Core Library
//!
//! Headless core of the Medical Check-Up patient physique form. The UI shell renders
//! controls and toasts; this crate owns the state behind them.
//!
//! # Architecture
//!
//! ```text
//!   Shell (web / mobile)
//!        │  change_field / submit / layout
//!        ▼
//!   ┌──────────────────────┐      GET/POST /api/v1/patient-physique/{id}
//!   │    FormController    │ ───────────────────────────────────────────► Backend
//!   │  record · phase · BMI│
//!   └──────────┬───────────┘
//!              │ autosave (optional)
//!              ▼
//!        SQLite drafts
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (PhysiqueField, PhysiqueRecord, PhysiqueDraft)
//! - [`form`]: Controller, BMI derivation, validation and control layout
//! - [`api`]: REST client trait, HTTP implementation and mock
//! - [`db`]: SQLite draft store
//! - [`config`]: Endpoint and behaviour settings
//! - [`logging`]: Tracing subscriber setup

pub mod api;
pub mod config;
pub mod db;
pub mod form;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use api::{ApiError, HttpPhysiqueApi, MockPhysiqueApi, PhysiqueApi};
pub use config::FormConfig;
pub use db::Database;
pub use form::{
    FormController, FormError, FormFailure, FormPhase, Navigation, Notification, SubmitFailure,
    SubmitOutcome,
};
pub use models::{PhysiqueDraft, PhysiqueField, PhysiqueRecord};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum McuFormError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Missing required fields: {0}")]
    MissingFields(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("No response: {0}")]
    NoResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl From<FormError> for McuFormError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::MissingFields(fields) => {
                McuFormError::MissingFields(form::describe_fields(&fields))
            }
            FormError::Fetch(api) => McuFormError::FetchFailed(api.to_string()),
            FormError::Submit(SubmitFailure::NoResponse(msg)) => McuFormError::NoResponse(msg),
            FormError::Submit(SubmitFailure::Request(msg)) => McuFormError::RequestFailed(msg),
            FormError::Submit(failure) => McuFormError::ServerError(failure.to_string()),
            FormError::Draft(db) => McuFormError::DatabaseError(db.to_string()),
            FormError::UnknownField(unknown) => McuFormError::InvalidInput(unknown.to_string()),
        }
    }
}

impl From<db::DbError> for McuFormError {
    fn from(e: db::DbError) -> Self {
        McuFormError::DatabaseError(e.to_string())
    }
}

impl From<config::ConfigError> for McuFormError {
    fn from(e: config::ConfigError) -> Self {
        McuFormError::ConfigError(e.to_string())
    }
}

impl From<ApiError> for McuFormError {
    fn from(e: ApiError) -> Self {
        McuFormError::RequestFailed(e.to_string())
    }
}

impl From<models::UnknownField> for McuFormError {
    fn from(e: models::UnknownField) -> Self {
        McuFormError::InvalidInput(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for McuFormError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        McuFormError::InvalidInput(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open a form session for a patient. `config_json` falls back to defaults when absent.
#[uniffi::export]
pub fn open_session(
    patient_id: String,
    config_json: Option<String>,
) -> Result<Arc<McuFormSession>, McuFormError> {
    let controller = build_controller(patient_id, config_json)?;
    Ok(Arc::new(McuFormSession::new(controller)))
}

/// Open a form session that autosaves drafts to a SQLite file.
#[uniffi::export]
pub fn open_session_with_drafts(
    patient_id: String,
    config_json: Option<String>,
    db_path: String,
) -> Result<Arc<McuFormSession>, McuFormError> {
    let db = Database::open(&db_path)?;
    let controller = build_controller(patient_id, config_json)?.with_drafts(db);
    Ok(Arc::new(McuFormSession::new(controller)))
}

/// BMI from weight (kg) and height (cm) text, two decimals.
#[uniffi::export]
pub fn calculate_bmi(weight: String, height: String) -> Option<String> {
    form::compute_bmi(&weight, &height)
}

/// Wire names of the fields that must be filled before submit.
#[uniffi::export]
pub fn required_fields() -> Vec<String> {
    PhysiqueField::REQUIRED
        .iter()
        .map(|f| f.as_str().to_string())
        .collect()
}

/// Install the default tracing subscriber. Returns false if one was already set.
#[uniffi::export]
pub fn init_logging(filter: Option<String>) -> bool {
    logging::init_logging(filter.as_deref())
}

fn build_controller(
    patient_id: String,
    config_json: Option<String>,
) -> Result<FormController<HttpPhysiqueApi>, McuFormError> {
    if patient_id.trim().is_empty() {
        return Err(McuFormError::InvalidInput("patient id is empty".into()));
    }
    let config = match config_json {
        Some(json) => FormConfig::from_json(&json)?,
        None => FormConfig::default(),
    };
    let api = HttpPhysiqueApi::new(config.clone())?;
    Ok(FormController::new(patient_id, config, api))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe form session for FFI.
///
/// `load` and `submit` block on HTTP while holding the controller, so other calls
/// that read the form wait for them. `phase` does not: it reads a separately locked
/// copy that is published before and after each network call, so a shell polling
/// from another thread sees `Loading` and `Submitting` while they last.
#[derive(uniffi::Object)]
pub struct McuFormSession {
    controller: Mutex<FormController<HttpPhysiqueApi>>,
    phase: Mutex<FfiFormPhase>,
}

impl McuFormSession {
    fn new(controller: FormController<HttpPhysiqueApi>) -> Self {
        let phase = controller.phase().clone().into();
        Self {
            controller: Mutex::new(controller),
            phase: Mutex::new(phase),
        }
    }

    fn publish_phase(&self, phase: FfiFormPhase) -> Result<(), McuFormError> {
        *self.phase.lock()? = phase;
        Ok(())
    }

    fn publish(&self, controller: &FormController<HttpPhysiqueApi>) -> Result<(), McuFormError> {
        self.publish_phase(controller.phase().clone().into())
    }
}

#[uniffi::export]
impl McuFormSession {
    /// Fetch and pre-fill the patient's stored record.
    pub fn load(&self) -> Result<(), McuFormError> {
        let mut controller = self.controller.lock()?;
        self.publish_phase(FfiFormPhase::Loading)?;
        let result = controller.load();
        self.publish(&controller)?;
        result?;
        Ok(())
    }

    /// Apply an input change by wire field name.
    pub fn change_field(&self, name: String, value: String) -> Result<(), McuFormError> {
        let mut controller = self.controller.lock()?;
        controller.change_named(&name, value)?;
        self.publish(&controller)
    }

    /// Current display value of a field.
    pub fn field_value(&self, name: String) -> Result<String, McuFormError> {
        let field: PhysiqueField = name.parse()?;
        let controller = self.controller.lock()?;
        Ok(controller.record().display_value(field).to_string())
    }

    /// All fields with their raw values (`None` when never loaded).
    pub fn fields(&self) -> Result<Vec<FfiFieldValue>, McuFormError> {
        let controller = self.controller.lock()?;
        let record = controller.record();
        Ok(PhysiqueField::ALL
            .iter()
            .map(|f| FfiFieldValue {
                name: f.as_str().to_string(),
                value: record.get(*f).map(str::to_string),
                required: f.is_required(),
            })
            .collect())
    }

    /// Wire names of required fields that are still blank.
    pub fn missing_required(&self) -> Result<Vec<String>, McuFormError> {
        let controller = self.controller.lock()?;
        Ok(controller
            .missing_required()
            .iter()
            .map(|f| f.as_str().to_string())
            .collect())
    }

    /// Validate and write the record.
    pub fn submit(&self) -> Result<FfiSubmitOutcome, McuFormError> {
        let mut controller = self.controller.lock()?;
        if controller.missing_required().is_empty() {
            self.publish_phase(FfiFormPhase::Submitting)?;
        }
        let result = controller.submit();
        self.publish(&controller)?;
        Ok(result?.into())
    }

    pub fn reset(&self) -> Result<(), McuFormError> {
        let mut controller = self.controller.lock()?;
        controller.reset();
        self.publish(&controller)
    }

    /// Current phase. Never waits on an in-flight `load` or `submit`.
    pub fn phase(&self) -> Result<FfiFormPhase, McuFormError> {
        Ok(self.phase.lock()?.clone())
    }

    /// Controls to render, grouped by section.
    pub fn layout(&self) -> Result<Vec<FfiSection>, McuFormError> {
        let controller = self.controller.lock()?;
        Ok(controller.layout().into_iter().map(|s| s.into()).collect())
    }

    /// Unsubmitted drafts in the attached store, most recent first.
    pub fn pending_drafts(&self) -> Result<Vec<FfiDraftSummary>, McuFormError> {
        let controller = self.controller.lock()?;
        let drafts = match controller.drafts() {
            Some(db) => db.list_drafts()?,
            None => Vec::new(),
        };
        Ok(drafts.into_iter().map(|d| d.into()).collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe field value.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFieldValue {
    pub name: String,
    pub value: Option<String>,
    pub required: bool,
}

/// FFI-safe form phase.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum FfiFormPhase {
    Idle,
    Loading,
    Submitting,
    Succeeded,
    Failed { reason: String },
}

impl From<FormPhase> for FfiFormPhase {
    fn from(phase: FormPhase) -> Self {
        match phase {
            FormPhase::Idle => FfiFormPhase::Idle,
            FormPhase::Loading => FfiFormPhase::Loading,
            FormPhase::Submitting => FfiFormPhase::Submitting,
            FormPhase::Succeeded => FfiFormPhase::Succeeded,
            FormPhase::Failed(failure) => FfiFormPhase::Failed {
                reason: match failure {
                    FormFailure::MissingFields(fields) => FormError::MissingFields(fields).to_string(),
                    FormFailure::Fetch(e) => FormError::Fetch(e).to_string(),
                    FormFailure::Submit(f) => f.to_string(),
                },
            },
        }
    }
}

/// FFI-safe submit outcome.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSubmitOutcome {
    pub status: u16,
    pub fingerprint: String,
    pub notification_title: String,
    pub notification_timer_ms: u64,
    pub navigate_to: String,
    pub navigate_delay_ms: u64,
}

impl From<SubmitOutcome> for FfiSubmitOutcome {
    fn from(outcome: SubmitOutcome) -> Self {
        Self {
            status: outcome.status,
            fingerprint: outcome.fingerprint,
            notification_title: outcome.notification.title,
            notification_timer_ms: outcome.notification.timer_ms,
            navigate_to: outcome.navigation.route,
            navigate_delay_ms: outcome.navigation.delay_ms,
        }
    }
}

/// FFI-safe radio option.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRadioOption {
    pub id: String,
    pub value: String,
    pub label: String,
    pub checked: bool,
}

impl From<form::RadioOption> for FfiRadioOption {
    fn from(option: form::RadioOption) -> Self {
        Self {
            id: option.id,
            value: option.value,
            label: option.label,
            checked: option.checked,
        }
    }
}

/// FFI-safe control. `kind` is "text", "text_area" or "radio".
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiControl {
    pub id: String,
    pub field: String,
    pub label: String,
    pub kind: String,
    pub placeholder: Option<String>,
    pub rows: Option<u32>,
    pub options: Vec<FfiRadioOption>,
    pub value: String,
    pub disabled: bool,
}

impl From<form::ControlDescriptor> for FfiControl {
    fn from(control: form::ControlDescriptor) -> Self {
        let (kind, placeholder, rows, options) = match control.widget {
            form::Widget::Text { placeholder } => ("text", placeholder, None, Vec::new()),
            form::Widget::TextArea { placeholder, rows } => {
                ("text_area", placeholder, Some(rows), Vec::new())
            }
            form::Widget::Radio { options } => (
                "radio",
                None,
                None,
                options.into_iter().map(|o| o.into()).collect(),
            ),
        };
        Self {
            id: control.id,
            field: control.field.as_str().to_string(),
            label: control.label,
            kind: kind.to_string(),
            placeholder,
            rows,
            options,
            value: control.value,
            disabled: control.disabled,
        }
    }
}

/// FFI-safe section.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSection {
    pub title: String,
    pub controls: Vec<FfiControl>,
}

impl From<form::Section> for FfiSection {
    fn from(section: form::Section) -> Self {
        Self {
            title: section.title,
            controls: section.controls.into_iter().map(|c| c.into()).collect(),
        }
    }
}

/// FFI-safe draft summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDraftSummary {
    pub draft_id: String,
    pub patient_id: String,
    pub fingerprint: String,
    pub updated_at: String,
}

impl From<PhysiqueDraft> for FfiDraftSummary {
    fn from(draft: PhysiqueDraft) -> Self {
        Self {
            draft_id: draft.draft_id,
            patient_id: draft.patient_id,
            fingerprint: draft.fingerprint,
            updated_at: draft.updated_at,
        }
    }
}
