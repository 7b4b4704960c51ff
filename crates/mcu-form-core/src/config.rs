//! Runtime configuration supplied by the host shell.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder substituted with the patient id in route templates.
pub const ID_PLACEHOLDER: &str = "{id}";

/// Path of the physique resource, relative to the API base URL.
pub const PHYSIQUE_PATH: &str = "/api/v1/patient-physique";

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Form behaviour and endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FormConfig {
    /// Scheme and host of the backend, without trailing path
    pub base_url: String,
    /// Route opened after a successful submit; `{id}` is the patient id
    pub follow_up_route: String,
    pub redirect_delay_ms: u64,
    pub notification_timer_ms: u64,
    pub success_title: String,
    /// No timeout when unset
    pub request_timeout_ms: Option<u64>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".into(),
            follow_up_route: "/dashboard/form-mcu2/{id}".into(),
            redirect_delay_ms: 1500,
            notification_timer_ms: 1500,
            success_title: "Patient physique form submitted successfully!".into(),
            request_timeout_ms: None,
        }
    }
}

impl FormConfig {
    /// Parse and validate a JSON config. Missing keys take their defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: FormConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let base = self.base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::Invalid("base_url is empty".into()));
        }
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must use http or https: {}",
                base
            )));
        }
        if !self.follow_up_route.contains(ID_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "follow_up_route must contain {}",
                ID_PLACEHOLDER
            )));
        }
        Ok(())
    }

    /// Full URL of the physique resource for a patient.
    pub fn physique_url(&self, patient_id: &str) -> String {
        format!(
            "{}{}/{}",
            self.base_url.trim().trim_end_matches('/'),
            PHYSIQUE_PATH,
            patient_id
        )
    }

    pub fn follow_up_route_for(&self, patient_id: &str) -> String {
        self.follow_up_route.replace(ID_PLACEHOLDER, patient_id)
    }

    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FormConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.physique_url("42"),
            "http://localhost:5000/api/v1/patient-physique/42"
        );
        assert_eq!(config.follow_up_route_for("42"), "/dashboard/form-mcu2/42");
        assert_eq!(config.redirect_delay(), Duration::from_millis(1500));
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            FormConfig::from_json(r#"{"base_url": "https://mcu.example.org/", "request_timeout_ms": 5000}"#)
                .unwrap();
        assert_eq!(
            config.physique_url("p-1"),
            "https://mcu.example.org/api/v1/patient-physique/p-1"
        );
        assert_eq!(config.redirect_delay_ms, 1500);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_rejects_bad_scheme() {
        let err = FormConfig::from_json(r#"{"base_url": "ftp://host"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_route_without_id() {
        let err = FormConfig::from_json(r#"{"follow_up_route": "/dashboard"}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = FormConfig::from_json("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
