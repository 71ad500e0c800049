//! Application state definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::wizard::WizardState;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Devices,
    DeviceWizard,
    Projects,
    Observations,
    ObservationWizard,
    Reports,
    ReportWizard,
    Uploads,
    Config,
}

impl View {
    pub fn is_wizard(&self) -> bool {
        matches!(
            self,
            View::DeviceWizard | View::ObservationWizard | View::ReportWizard
        )
    }

    /// The list screen a wizard returns to when it closes
    pub fn parent(&self) -> View {
        match self {
            View::DeviceWizard => View::Devices,
            View::ObservationWizard => View::Observations,
            View::ReportWizard => View::Reports,
            other => *other,
        }
    }
}

/// Sort field for the device list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceSortField {
    #[default]
    Name,
    Status,
    Category,
    RegisteredAt,
}

impl DeviceSortField {
    pub fn next(&self) -> Self {
        match self {
            Self::Name => Self::Status,
            Self::Status => Self::Category,
            Self::Category => Self::RegisteredAt,
            Self::RegisteredAt => Self::Name,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Status => "Status",
            Self::Category => "Category",
            Self::RegisteredAt => "Registered",
        }
    }

    /// Stable identifier used in the config file
    pub fn key(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Status => "status",
            Self::Category => "category",
            Self::RegisteredAt => "registered",
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }

    /// Stable identifier used in the config file
    pub fn key(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A fire-and-forget status-bar notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }
}

/// An inspection device (crawler, push camera, gateway, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub category: String,
    pub location: String,
    pub status: String,
    #[serde(default)]
    pub operator: Option<String>,
    #[serde(default)]
    pub ip_address: Option<String>,
    pub registered_at: DateTime<Utc>,
}

/// An inspection project (one pipeline section under review)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub site: String,
    #[serde(default)]
    pub pipe_material: Option<String>,
    pub observation_count: u32,
    pub report_count: u32,
    pub created_at: DateTime<Utc>,
}

/// A coded defect observation inside a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub id: String,
    pub project_id: String,
    pub device_id: String,
    pub code: String,
    #[serde(default)]
    pub code_label: Option<String>,
    pub severity: u8,
    pub distance: f64,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub snapshot: Option<SnapshotMeta>,
    pub observed_at: DateTime<Utc>,
}

/// Metadata for a captured still attached to an observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub label: String,
    pub timestamp: String,
}

/// A quality-control report requested for a project
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QcReport {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub inspector: String,
    pub format: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A video/file upload tracked by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRecord {
    pub id: String,
    pub project_id: String,
    pub file_name: String,
    pub size_bytes: u64,
    pub status: String,
    pub uploaded_at: DateTime<Utc>,
}

impl UploadRecord {
    pub fn human_size(&self) -> String {
        let bytes = self.size_bytes as f64;
        if bytes >= 1_073_741_824.0 {
            format!("{:.1} GiB", bytes / 1_073_741_824.0)
        } else if bytes >= 1_048_576.0 {
            format!("{:.1} MiB", bytes / 1_048_576.0)
        } else if bytes >= 1024.0 {
            format!("{:.1} KiB", bytes / 1024.0)
        } else {
            format!("{} B", self.size_bytes)
        }
    }
}

/// One PACP defect code as served by the backend reference endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PacpCode {
    pub code: String,
    pub label: String,
    #[serde(default)]
    pub group: Option<String>,
}

/// Main application state
#[derive(Default)]
pub struct AppState {
    // Navigation
    pub current_view: View,

    // Data owned by the list screens
    pub devices: Vec<Device>,
    pub projects: Vec<Project>,
    pub observations: Vec<Observation>,
    pub reports: Vec<QcReport>,
    pub uploads: Vec<UploadRecord>,
    pub pacp_codes: Vec<PacpCode>,

    // Selection
    pub selected_index: usize,

    // Sorting and filters
    pub device_sort_field: DeviceSortField,
    pub device_sort_direction: SortDirection,
    pub show_offline_devices: bool,

    // UI state
    pub api_connected: bool,
    pub notice: Option<Notice>,
    pub show_tour_hint: bool,

    // The open wizard, if any; owned exclusively by this screen
    pub wizard: Option<WizardState>,
}

impl AppState {
    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
    }

    /// Number of rows in the list backing the current view
    pub fn list_len(&self) -> usize {
        match self.current_view {
            View::Devices => self.sorted_devices().len(),
            View::Projects => self.projects.len(),
            View::Observations => self.observations.len(),
            View::Reports => self.reports.len(),
            View::Uploads => self.uploads.len(),
            _ => 0,
        }
    }

    /// Devices filtered and sorted for display
    pub fn sorted_devices(&self) -> Vec<&Device> {
        let mut devices: Vec<_> = self
            .devices
            .iter()
            .filter(|d| self.show_offline_devices || d.status != "offline")
            .collect();

        devices.sort_by(|a, b| {
            let cmp = match self.device_sort_field {
                DeviceSortField::Name => a.name.cmp(&b.name),
                DeviceSortField::Status => a.status.cmp(&b.status),
                DeviceSortField::Category => a.category.cmp(&b.category),
                DeviceSortField::RegisteredAt => a.registered_at.cmp(&b.registered_at),
            };

            match self.device_sort_direction {
                SortDirection::Asc => cmp,
                SortDirection::Desc => cmp.reverse(),
            }
        });

        devices
    }

    pub fn cycle_device_sort_field(&mut self) {
        self.device_sort_field = self.device_sort_field.next();
        self.reset_selection();
    }

    pub fn toggle_device_sort_direction(&mut self) {
        self.device_sort_direction = self.device_sort_direction.toggle();
        self.reset_selection();
    }

    pub fn notify(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }
}
