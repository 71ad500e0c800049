//! Trait abstraction for the backend client to enable mocking in tests

use async_trait::async_trait;

use super::client::ApiError;
use super::payload::{DevicePayload, ObservationPayload, ReportPayload};
use crate::state::{Device, Observation, PacpCode, Project, QcReport, UploadRecord};

/// Backend operations consumed by the console, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Check if the backend is reachable
    async fn check_connection(&self) -> bool;

    /// List registered devices
    async fn list_devices(&self) -> Result<Vec<Device>, ApiError>;

    /// Register a new device; returns the created record
    async fn create_device(&self, payload: DevicePayload) -> Result<Device, ApiError>;

    /// List inspection projects
    async fn list_projects(&self) -> Result<Vec<Project>, ApiError>;

    /// List observations across projects
    async fn list_observations(&self) -> Result<Vec<Observation>, ApiError>;

    /// Record a new observation; returns the created record
    async fn create_observation(
        &self,
        payload: ObservationPayload,
    ) -> Result<Observation, ApiError>;

    /// List QC reports
    async fn list_reports(&self) -> Result<Vec<QcReport>, ApiError>;

    /// Request a new QC report; returns the created record
    async fn create_report(&self, payload: ReportPayload) -> Result<QcReport, ApiError>;

    /// List tracked file uploads
    async fn list_uploads(&self) -> Result<Vec<UploadRecord>, ApiError>;

    /// Fetch the PACP defect-code reference list
    async fn list_pacp_codes(&self) -> Result<Vec<PacpCode>, ApiError>;
}
