//! Patient physique REST API client.
//!
//! Both calls target `{base_url}/api/v1/patient-physique/{id}`:
//! - `GET` returns the stored record as a JSON object
//! - `POST` overwrites it with the full form payload; 200 or 201 means success

mod http;
mod mock;

pub use http::*;
pub use mock::*;

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::models::PhysiqueRecord;

/// API errors, split by where the exchange broke down.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    #[error("No physique record for patient: {0}")]
    NotFound(String),

    #[error("Server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("No response received: {0}")]
    NoResponse(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid response body: {0}")]
    Decode(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Backend seam for reading and writing physique records.
pub trait PhysiqueApi: Send + Sync {
    /// Read the stored record for a patient.
    fn fetch(&self, patient_id: &str) -> ApiResult<PhysiqueRecord>;

    /// Write the payload for a patient; returns the success status code.
    fn submit(&self, patient_id: &str, payload: &Value) -> ApiResult<u16>;
}

impl<T: PhysiqueApi + ?Sized> PhysiqueApi for Arc<T> {
    fn fetch(&self, patient_id: &str) -> ApiResult<PhysiqueRecord> {
        (**self).fetch(patient_id)
    }

    fn submit(&self, patient_id: &str, payload: &Value) -> ApiResult<u16> {
        (**self).submit(patient_id, payload)
    }
}

impl<T: PhysiqueApi + ?Sized> PhysiqueApi for Box<T> {
    fn fetch(&self, patient_id: &str) -> ApiResult<PhysiqueRecord> {
        (**self).fetch(patient_id)
    }

    fn submit(&self, patient_id: &str, payload: &Value) -> ApiResult<u16> {
        (**self).submit(patient_id, payload)
    }
}

/// Status codes the backend uses to acknowledge a write.
pub fn is_write_success(status: u16) -> bool {
    status == 200 || status == 201
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_success_codes() {
        assert!(is_write_success(200));
        assert!(is_write_success(201));
        assert!(!is_write_success(202));
        assert!(!is_write_success(204));
        assert!(!is_write_success(500));
    }

    #[test]
    fn test_error_messages() {
        let err = ApiError::Status {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "Server responded with status 500: boom");
    }
}
