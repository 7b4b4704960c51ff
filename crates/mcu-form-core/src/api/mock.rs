//! In-memory [`PhysiqueApi`] for tests and offline demos.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use serde_json::Value;

use super::{ApiError, ApiResult, PhysiqueApi};
use crate::models::PhysiqueRecord;

/// HTTP verb of a recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiMethod {
    Get,
    Post,
}

/// One call made against the mock.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiCall {
    pub method: ApiMethod,
    pub patient_id: String,
    /// Request body (POST only)
    pub body: Option<Value>,
}

/// Mock backend: stores submitted records and logs every call.
///
/// Scripted results queued with [`MockPhysiqueApi::push_fetch_result`] and
/// [`MockPhysiqueApi::push_submit_result`] are consumed first, in order.
#[derive(Default)]
pub struct MockPhysiqueApi {
    records: Mutex<HashMap<String, PhysiqueRecord>>,
    calls: Mutex<Vec<ApiCall>>,
    fetch_results: Mutex<VecDeque<ApiResult<PhysiqueRecord>>>,
    submit_results: Mutex<VecDeque<ApiResult<u16>>>,
}

impl MockPhysiqueApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored record for a patient.
    pub fn with_record(self, patient_id: &str, record: PhysiqueRecord) -> Self {
        if let Ok(mut records) = self.records.lock() {
            records.insert(patient_id.to_string(), record);
        }
        self
    }

    pub fn push_fetch_result(&self, result: ApiResult<PhysiqueRecord>) {
        if let Ok(mut queue) = self.fetch_results.lock() {
            queue.push_back(result);
        }
    }

    pub fn push_submit_result(&self, result: ApiResult<u16>) {
        if let Ok(mut queue) = self.submit_results.lock() {
            queue.push_back(result);
        }
    }

    /// All calls so far, oldest first.
    pub fn calls(&self) -> Vec<ApiCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Bodies of all POST calls, oldest first.
    pub fn submitted_bodies(&self) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == ApiMethod::Post)
            .filter_map(|c| c.body)
            .collect()
    }

    pub fn stored(&self, patient_id: &str) -> Option<PhysiqueRecord> {
        self.records
            .lock()
            .ok()
            .and_then(|r| r.get(patient_id).cloned())
    }

    fn record_call(&self, call: ApiCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

impl PhysiqueApi for MockPhysiqueApi {
    fn fetch(&self, patient_id: &str) -> ApiResult<PhysiqueRecord> {
        self.record_call(ApiCall {
            method: ApiMethod::Get,
            patient_id: patient_id.to_string(),
            body: None,
        });

        let scripted = self
            .fetch_results
            .lock()
            .map_err(|e| ApiError::Request(e.to_string()))?
            .pop_front();
        if let Some(result) = scripted {
            return result;
        }

        self.stored(patient_id)
            .ok_or_else(|| ApiError::NotFound(patient_id.to_string()))
    }

    fn submit(&self, patient_id: &str, payload: &Value) -> ApiResult<u16> {
        self.record_call(ApiCall {
            method: ApiMethod::Post,
            patient_id: patient_id.to_string(),
            body: Some(payload.clone()),
        });

        let scripted = self
            .submit_results
            .lock()
            .map_err(|e| ApiError::Request(e.to_string()))?
            .pop_front();
        if let Some(result) = scripted {
            return result;
        }

        let object = payload
            .as_object()
            .ok_or_else(|| ApiError::Status {
                status: 400,
                body: "payload must be a JSON object".into(),
            })?;
        let mut records = self
            .records
            .lock()
            .map_err(|e| ApiError::Request(e.to_string()))?;
        let created = !records.contains_key(patient_id);
        records.insert(
            patient_id.to_string(),
            PhysiqueRecord::from_json_object(object),
        );

        Ok(if created { 201 } else { 200 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PhysiqueField;

    #[test]
    fn test_fetch_missing_is_not_found() {
        let api = MockPhysiqueApi::new();
        assert_eq!(
            api.fetch("p-1").unwrap_err(),
            ApiError::NotFound("p-1".into())
        );
        assert_eq!(api.calls().len(), 1);
        assert_eq!(api.calls()[0].method, ApiMethod::Get);
    }

    #[test]
    fn test_submit_then_fetch() {
        let api = MockPhysiqueApi::new();
        let mut record = PhysiqueRecord::blank();
        record.set(PhysiqueField::Weight, "70");

        assert_eq!(api.submit("p-1", &record.to_payload()).unwrap(), 201);
        assert_eq!(api.submit("p-1", &record.to_payload()).unwrap(), 200);

        let fetched = api.fetch("p-1").unwrap();
        assert_eq!(fetched, record);
        assert_eq!(api.submitted_bodies().len(), 2);
    }

    #[test]
    fn test_scripted_results_first() {
        let api = MockPhysiqueApi::new();
        api.push_submit_result(Err(ApiError::NoResponse("offline".into())));

        let payload = PhysiqueRecord::blank().to_payload();
        assert!(matches!(
            api.submit("p-1", &payload),
            Err(ApiError::NoResponse(_))
        ));
        assert_eq!(api.submit("p-1", &payload).unwrap(), 201);
    }
}
