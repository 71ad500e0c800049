//! REST client for the SewerVision backend.
//!
//! Every endpoint answers with a `{ok, data, error}` envelope; any non-`ok`
//! response is surfaced as a failure regardless of HTTP status code.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::payload::{DevicePayload, ObservationPayload, ReportPayload};
use super::traits::BackendClient;
use crate::state::{Device, Observation, PacpCode, Project, QcReport, UploadRecord};

/// Default backend address
const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure taxonomy for backend calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a usable response
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend answered, but refused the request
    #[error("{0}")]
    Backend(String),
    /// The backend answered with something that is not a valid envelope
    #[error("malformed response: {0}")]
    Decode(String),
    /// The submission machinery itself failed (task panic or abort)
    #[error("internal error: {0}")]
    Internal(String),
}

/// The `{ok, data, error}` envelope every backend endpoint wraps its
/// responses in
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub ok: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        if self.ok {
            self.data
                .ok_or_else(|| ApiError::Decode("envelope marked ok but carried no data".into()))
        } else {
            Err(ApiError::Backend(
                self.error.unwrap_or_else(|| "request rejected".into()),
            ))
        }
    }
}

/// Client for the SewerVision REST backend
#[derive(Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: String,
}

impl RestClient {
    /// Create a client. The base URL comes from `SEWERVISION_API_URL`, then
    /// the passed config value, then the compiled-in default.
    pub fn new(configured_url: Option<String>) -> Result<Self, ApiError> {
        let base_url = std::env::var("SEWERVISION_API_URL")
            .ok()
            .or(configured_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        tracing::debug!(base_url, "backend client created");
        Ok(Self { http, base_url })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.http.get(self.url(path)).send().await?;
        let envelope: Envelope<T> = response.json().await?;
        envelope.into_result()
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        let envelope: Envelope<T> = response.json().await?;
        envelope.into_result()
    }
}

#[async_trait]
impl BackendClient for RestClient {
    async fn check_connection(&self) -> bool {
        match self.get_json::<serde_json::Value>("/health").await {
            Ok(_) => true,
            Err(err) => {
                tracing::debug!(error = %err, "backend health check failed");
                false
            }
        }
    }

    async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        self.get_json("/devices").await
    }

    async fn create_device(&self, payload: DevicePayload) -> Result<Device, ApiError> {
        tracing::info!(name = %payload.name, "registering device");
        self.post_json("/devices", &payload).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>, ApiError> {
        self.get_json("/projects").await
    }

    async fn list_observations(&self) -> Result<Vec<Observation>, ApiError> {
        self.get_json("/observations").await
    }

    async fn create_observation(
        &self,
        payload: ObservationPayload,
    ) -> Result<Observation, ApiError> {
        tracing::info!(code = %payload.code, project = %payload.project_id, "recording observation");
        self.post_json("/observations", &payload).await
    }

    async fn list_reports(&self) -> Result<Vec<QcReport>, ApiError> {
        self.get_json("/reports").await
    }

    async fn create_report(&self, payload: ReportPayload) -> Result<QcReport, ApiError> {
        tracing::info!(title = %payload.title, "requesting QC report");
        self.post_json("/reports", &payload).await
    }

    async fn list_uploads(&self) -> Result<Vec<UploadRecord>, ApiError> {
        self.get_json("/uploads").await
    }

    async fn list_pacp_codes(&self) -> Result<Vec<PacpCode>, ApiError> {
        self.get_json("/reference/pacp-codes").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_ok_with_data() {
        let envelope: Envelope<Vec<String>> =
            serde_json::from_str(r#"{"ok": true, "data": ["a", "b"]}"#).unwrap();
        assert_eq!(envelope.into_result().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_envelope_not_ok_carries_message() {
        let envelope: Envelope<Vec<String>> =
            serde_json::from_str(r#"{"ok": false, "error": "device name taken"}"#).unwrap();
        match envelope.into_result() {
            Err(ApiError::Backend(message)) => assert_eq!(message, "device name taken"),
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_not_ok_without_message() {
        let envelope: Envelope<()> = serde_json::from_str(r#"{"ok": false}"#).unwrap();
        match envelope.into_result() {
            Err(ApiError::Backend(message)) => assert_eq!(message, "request rejected"),
            other => panic!("expected backend error, got {other:?}"),
        }
    }

    #[test]
    fn test_envelope_ok_without_data_is_decode_error() {
        let envelope: Envelope<Vec<String>> =
            serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(matches!(
            envelope.into_result(),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = RestClient::new(Some("http://localhost:9999/api/".into())).unwrap();
        assert_eq!(client.url("/devices"), "http://localhost:9999/api/devices");
    }
}
