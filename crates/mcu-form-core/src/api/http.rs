//! Blocking HTTP implementation of [`PhysiqueApi`].

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use super::{is_write_success, ApiError, ApiResult, PhysiqueApi};
use crate::config::FormConfig;
use crate::models::PhysiqueRecord;

/// HTTP client for the physique endpoint.
pub struct HttpPhysiqueApi {
    client: Client,
    config: FormConfig,
}

impl HttpPhysiqueApi {
    /// Create a client from config. The timeout applies to whole requests.
    pub fn new(config: FormConfig) -> ApiResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(classify)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }
}

impl PhysiqueApi for HttpPhysiqueApi {
    fn fetch(&self, patient_id: &str) -> ApiResult<PhysiqueRecord> {
        let url = self.config.physique_url(patient_id);
        debug!(%url, "GET physique record");

        let response = self.client.get(&url).send().map_err(classify)?;
        // 404 means no record yet; any other failure status is an error, not a record
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(patient_id.to_string()));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }

        let text = response.text().map_err(classify)?;
        let body: Value =
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?;
        match body {
            Value::Object(object) => Ok(PhysiqueRecord::from_json_object(&object)),
            other => Err(ApiError::Decode(format!(
                "expected a JSON object, got: {}",
                other
            ))),
        }
    }

    fn submit(&self, patient_id: &str, payload: &Value) -> ApiResult<u16> {
        let url = self.config.physique_url(patient_id);
        debug!(%url, "POST physique record");

        let response = self
            .client
            .post(&url)
            .json(payload)
            .send()
            .map_err(classify)?;

        let status = response.status().as_u16();
        if is_write_success(status) {
            Ok(status)
        } else {
            Err(ApiError::Status {
                status,
                body: response.text().unwrap_or_default(),
            })
        }
    }
}

/// Split transport errors into "nothing came back" and "could not send".
fn classify(e: reqwest::Error) -> ApiError {
    if e.is_connect() || e.is_timeout() || e.is_request() {
        ApiError::NoResponse(e.to_string())
    } else {
        ApiError::Request(e.to_string())
    }
}
