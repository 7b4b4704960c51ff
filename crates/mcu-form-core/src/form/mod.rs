//! Physique form state container.
//!
//! Lifecycle driven by the shell:
//!
//! ```text
//! load() ──► Loading ──► Idle ◄──── change(field, value)
//!                          │            (height/weight → BMI)
//!                       submit()
//!                          │
//!            missing fields?──yes──► Failed(MissingFields)
//!                          │no
//!                      Submitting ──► POST ──► Succeeded  (reset, notify, navigate)
//!                                        └───► Failed(Submit)
//! ```

pub mod bmi;
pub mod layout;
pub mod validation;

pub use bmi::{compute_bmi, parse_leading_float};
pub use layout::{build_layout, ControlDescriptor, RadioOption, Section, Widget};
pub use validation::{describe_fields, missing_required};

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::api::{is_write_success, ApiError, PhysiqueApi};
use crate::config::FormConfig;
use crate::db::{Database, DbError};
use crate::models::{PhysiqueField, PhysiqueRecord, UnknownField};

/// Why a submit did not go through, after validation passed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitFailure {
    /// The server answered with something other than 200/201
    #[error("Failed to submit data: status {status}: {body}")]
    ServerStatus { status: u16, body: String },

    /// The request went out but nothing came back
    #[error("No response received: {0}")]
    NoResponse(String),

    /// The request could not be built or sent
    #[error("Error submitting data: {0}")]
    Request(String),
}

impl From<ApiError> for SubmitFailure {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Status { status, body } => SubmitFailure::ServerStatus { status, body },
            ApiError::NotFound(id) => SubmitFailure::ServerStatus {
                status: 404,
                body: format!("no physique resource for {}", id),
            },
            ApiError::NoResponse(msg) => SubmitFailure::NoResponse(msg),
            ApiError::Request(msg) | ApiError::Decode(msg) => SubmitFailure::Request(msg),
        }
    }
}

/// Form errors returned to the caller.
#[derive(Error, Debug)]
pub enum FormError {
    #[error("Please fill in the following required fields: {}", describe_fields(.0))]
    MissingFields(Vec<PhysiqueField>),

    #[error("Error fetching patient data: {0}")]
    Fetch(ApiError),

    #[error(transparent)]
    Submit(SubmitFailure),

    #[error("Draft store error: {0}")]
    Draft(#[from] DbError),

    #[error(transparent)]
    UnknownField(#[from] UnknownField),
}

pub type FormResult<T> = Result<T, FormError>;

/// Failure kept in [`FormPhase::Failed`] for the UI to display.
#[derive(Debug, Clone, PartialEq)]
pub enum FormFailure {
    MissingFields(Vec<PhysiqueField>),
    Fetch(ApiError),
    Submit(SubmitFailure),
}

/// Where the form is in its load/edit/submit cycle.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Loading,
    Submitting,
    Succeeded,
    Failed(FormFailure),
}

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
}

/// Timed notification for the shell to display.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    /// How long the toast stays up
    pub timer_ms: u64,
    pub show_confirm_button: bool,
}

/// Delayed route change for the shell to perform.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    pub route: String,
    pub delay_ms: u64,
}

impl Navigation {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Effects of a successful submit.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    /// HTTP status acknowledged by the server (200 or 201)
    pub status: u16,
    /// Fingerprint of the payload that was written
    pub fingerprint: String,
    pub notification: Notification,
    pub navigation: Navigation,
}

/// Owns the form state for one patient.
pub struct FormController<A: PhysiqueApi> {
    patient_id: String,
    config: FormConfig,
    api: A,
    drafts: Option<Database>,
    record: PhysiqueRecord,
    phase: FormPhase,
}

impl<A: PhysiqueApi> FormController<A> {
    /// Create a controller with a blank record.
    pub fn new(patient_id: impl Into<String>, config: FormConfig, api: A) -> Self {
        Self {
            patient_id: patient_id.into(),
            config,
            api,
            drafts: None,
            record: PhysiqueRecord::blank(),
            phase: FormPhase::Idle,
        }
    }

    /// Attach a local draft store; edits are autosaved to it.
    pub fn with_drafts(mut self, db: Database) -> Self {
        self.drafts = Some(db);
        self
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn record(&self) -> &PhysiqueRecord {
        &self.record
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn drafts(&self) -> Option<&Database> {
        self.drafts.as_ref()
    }

    /// Controls bound to the current record.
    pub fn layout(&self) -> Vec<Section> {
        build_layout(&self.record)
    }

    /// Fetch the stored record and pre-fill the form.
    ///
    /// A missing record (404) starts a blank form. A saved local draft is applied on
    /// top of whatever was fetched.
    pub fn load(&mut self) -> FormResult<()> {
        self.phase = FormPhase::Loading;
        debug!(patient_id = %self.patient_id, "Loading physique record");

        let fetched = match self.api.fetch(&self.patient_id) {
            Ok(record) => {
                let unloaded = record.unloaded_fields();
                info!(
                    patient_id = %self.patient_id,
                    unloaded = %describe_fields(&unloaded),
                    "Physique record loaded"
                );
                record
            }
            Err(ApiError::NotFound(_)) => {
                info!(patient_id = %self.patient_id, "No stored physique record, starting blank");
                PhysiqueRecord::blank()
            }
            Err(e) => {
                error!(patient_id = %self.patient_id, error = %e, "Error fetching patient data");
                self.phase = FormPhase::Failed(FormFailure::Fetch(e.clone()));
                return Err(FormError::Fetch(e));
            }
        };
        self.record = fetched;

        if let Some(db) = &self.drafts {
            match db.get_draft(&self.patient_id) {
                Ok(Some(draft)) => {
                    info!(
                        patient_id = %self.patient_id,
                        updated_at = %draft.updated_at,
                        "Restoring local draft"
                    );
                    self.record.overlay(&draft.record);
                }
                Ok(None) => {}
                Err(e) => warn!(patient_id = %self.patient_id, error = %e, "Could not read local draft"),
            }
        }

        self.phase = FormPhase::Idle;
        Ok(())
    }

    /// Apply one input change. Height and weight changes recompute BMI when both parse.
    pub fn change(&mut self, field: PhysiqueField, value: impl Into<String>) {
        self.record.set(field, value);

        if field.seeds_bmi() {
            let bmi = compute_bmi(
                self.record.display_value(PhysiqueField::Weight),
                self.record.display_value(PhysiqueField::Height),
            );
            match bmi {
                Some(bmi) => {
                    debug!(%bmi, "BMI recomputed");
                    self.record.set(PhysiqueField::Bmi, bmi);
                }
                None => debug!("BMI left unchanged"),
            }
        }

        if matches!(self.phase, FormPhase::Failed(_) | FormPhase::Succeeded) {
            self.phase = FormPhase::Idle;
        }

        self.autosave();
    }

    /// Like [`FormController::change`], addressing the field by its wire name.
    pub fn change_named(&mut self, name: &str, value: impl Into<String>) -> FormResult<()> {
        let field: PhysiqueField = name.parse()?;
        self.change(field, value);
        Ok(())
    }

    /// Required fields still blank.
    pub fn missing_required(&self) -> Vec<PhysiqueField> {
        missing_required(&self.record)
    }

    /// Validate and write the record.
    ///
    /// On success the form resets to blank, the local draft is dropped and the
    /// notification and navigation for the shell are returned. On failure the
    /// record is kept so the user can retry.
    pub fn submit(&mut self) -> FormResult<SubmitOutcome> {
        let missing = self.missing_required();
        if !missing.is_empty() {
            warn!(
                patient_id = %self.patient_id,
                missing = %describe_fields(&missing),
                "Please fill in the following required fields"
            );
            self.phase = FormPhase::Failed(FormFailure::MissingFields(missing.clone()));
            return Err(FormError::MissingFields(missing));
        }

        self.phase = FormPhase::Submitting;
        let payload = self.record.to_payload();
        let fingerprint = self.record.fingerprint();

        let result = self
            .api
            .submit(&self.patient_id, &payload)
            .and_then(|status| {
                if is_write_success(status) {
                    Ok(status)
                } else {
                    Err(ApiError::Status {
                        status,
                        body: String::new(),
                    })
                }
            });

        match result {
            Ok(status) => {
                info!(
                    patient_id = %self.patient_id,
                    status,
                    %fingerprint,
                    "Data submitted successfully"
                );
                self.record = PhysiqueRecord::blank();
                self.discard_draft();
                self.phase = FormPhase::Succeeded;
                Ok(self.success_outcome(status, fingerprint))
            }
            Err(e) => {
                let failure = SubmitFailure::from(e);
                match &failure {
                    SubmitFailure::ServerStatus { status, body } => {
                        error!(patient_id = %self.patient_id, status, %body, "Failed to submit data")
                    }
                    SubmitFailure::NoResponse(msg) => {
                        error!(patient_id = %self.patient_id, error = %msg, "No response received")
                    }
                    SubmitFailure::Request(msg) => {
                        error!(patient_id = %self.patient_id, error = %msg, "Error submitting data")
                    }
                }
                self.phase = FormPhase::Failed(FormFailure::Submit(failure.clone()));
                Err(FormError::Submit(failure))
            }
        }
    }

    /// Clear the form back to blank without touching the server.
    ///
    /// Any autosaved draft is dropped too, so the next `load` does not bring the
    /// cleared values back.
    pub fn reset(&mut self) {
        self.record = PhysiqueRecord::blank();
        self.phase = FormPhase::Idle;
        self.discard_draft();
    }

    fn success_outcome(&self, status: u16, fingerprint: String) -> SubmitOutcome {
        SubmitOutcome {
            status,
            fingerprint,
            notification: Notification {
                kind: NotificationKind::Success,
                title: self.config.success_title.clone(),
                timer_ms: self.config.notification_timer_ms,
                show_confirm_button: false,
            },
            navigation: Navigation {
                route: self.config.follow_up_route_for(&self.patient_id),
                delay_ms: self.config.redirect_delay_ms,
            },
        }
    }

    fn autosave(&self) {
        if let Some(db) = &self.drafts {
            match db.save_draft(&self.patient_id, &self.record) {
                Ok(true) => debug!(patient_id = %self.patient_id, "Draft saved"),
                Ok(false) => {}
                Err(e) => warn!(patient_id = %self.patient_id, error = %e, "Could not save draft"),
            }
        }
    }

    fn discard_draft(&self) {
        if let Some(db) = &self.drafts {
            if let Err(e) = db.delete_draft(&self.patient_id) {
                warn!(patient_id = %self.patient_id, error = %e, "Could not delete draft");
            }
        }
    }
}
