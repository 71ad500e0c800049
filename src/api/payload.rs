//! Wire payloads for wizard submissions.
//!
//! This is the submission adapter's serialization half: a validated,
//! complete draft is flattened into the camelCase shape the backend expects,
//! with client-generated fields (timestamps, an initial device status, a
//! client reference for idempotent retries) attached here rather than in the
//! wizard engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::state::wizard::FormDraft;
use crate::state::SnapshotMeta;

/// Initial status every newly registered device starts in
pub const INITIAL_DEVICE_STATUS: &str = "offline";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSpecifications {
    pub resolution: String,
    pub frame_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cable_length: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSettings {
    /// Scalar percentage; the slider widget's range never reaches the wire
    pub quality_threshold: u32,
    pub auto_upload: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePayload {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub category: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    pub specifications: DeviceSpecifications,
    pub settings: DeviceSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: String,
    pub registered_at: DateTime<Utc>,
    pub client_ref: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationPayload {
    pub project_id: String,
    pub device_id: String,
    pub code: String,
    pub severity: u32,
    pub distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotMeta>,
    pub observed_at: DateTime<Utc>,
    pub client_ref: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPayload {
    pub project_id: String,
    pub title: String,
    pub inspector: String,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub format: String,
    pub include_media: bool,
    pub requested_at: DateTime<Utc>,
    pub client_ref: Uuid,
}

fn optional(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_number(text: &str) -> f64 {
    text.trim().parse().unwrap_or(0.0)
}

fn parse_date(text: &str) -> NaiveDate {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").unwrap_or_default()
}

/// Build the device-registration wire shape from a validated draft
pub fn device_payload(draft: &FormDraft) -> DevicePayload {
    let category = draft.choice("category").to_string();
    let operator = if category == "field" {
        optional(draft.text("operator"))
    } else {
        None
    };
    let ip_address = if category == "cloud" {
        optional(draft.text("ipAddress"))
    } else {
        None
    };

    DevicePayload {
        name: draft.text("name").trim().to_string(),
        device_type: draft.choice("type").to_string(),
        category,
        location: draft.text("location").trim().to_string(),
        operator,
        ip_address,
        specifications: DeviceSpecifications {
            resolution: draft.choice("specifications.resolution").to_string(),
            frame_rate: parse_number(draft.text("specifications.frameRate")),
            cable_length: optional(draft.text("specifications.cableLength"))
                .map(|raw| parse_number(&raw)),
        },
        settings: DeviceSettings {
            quality_threshold: draft.slider("settings.qualityThreshold"),
            auto_upload: draft.toggle("settings.autoUpload"),
        },
        notes: optional(draft.text("notes")),
        status: INITIAL_DEVICE_STATUS.to_string(),
        registered_at: Utc::now(),
        client_ref: Uuid::new_v4(),
    }
}

/// Build the observation wire shape from a validated draft
pub fn observation_payload(draft: &FormDraft) -> ObservationPayload {
    let snapshot = if draft.toggle("snapshot") {
        Some(SnapshotMeta {
            label: draft.text("snapshotLabel").to_string(),
            timestamp: draft.text("snapshotTimestamp").to_string(),
        })
    } else {
        None
    };

    ObservationPayload {
        project_id: draft.choice("projectId").to_string(),
        device_id: draft.choice("deviceId").to_string(),
        code: draft.choice("code").to_string(),
        severity: draft.slider("severity"),
        distance: parse_number(draft.text("distance")),
        remarks: optional(draft.text("remarks")),
        snapshot,
        observed_at: Utc::now(),
        client_ref: Uuid::new_v4(),
    }
}

/// Build the report wire shape from a validated draft
pub fn report_payload(draft: &FormDraft) -> ReportPayload {
    ReportPayload {
        project_id: draft.choice("projectId").to_string(),
        title: draft.text("title").trim().to_string(),
        inspector: draft.text("inspector").trim().to_string(),
        from_date: parse_date(draft.text("fromDate")),
        to_date: parse_date(draft.text("toDate")),
        format: draft.choice("format").to_string(),
        include_media: draft.toggle("includeMedia"),
        requested_at: Utc::now(),
        client_ref: Uuid::new_v4(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::wizard::registry::{
        device_registration, observation_capture, report_creation,
    };
    use crate::state::wizard::FieldValue;

    fn device_draft() -> FormDraft {
        let mut draft = FormDraft::from_spec(device_registration());
        draft.set("name", FieldValue::text("Cam1"));
        draft.set(
            "type",
            FieldValue::choice("inspection-camera", "Inspection camera"),
        );
        draft.set("location", FieldValue::text("Main St"));
        draft.set("operator", FieldValue::text("J. Smith"));
        draft.set(
            "specifications.resolution",
            FieldValue::choice("1080p", "1080p"),
        );
        draft.set("specifications.frameRate", FieldValue::text("30"));
        draft
    }

    #[test]
    fn test_device_payload_wire_shape() {
        let value = serde_json::to_value(device_payload(&device_draft())).unwrap();
        assert_eq!(value["type"], "inspection-camera");
        assert_eq!(value["status"], "offline");
        // Slider flattened to a scalar, not a range or array
        assert_eq!(value["settings"]["qualityThreshold"], 80);
        assert_eq!(value["settings"]["autoUpload"], true);
        assert_eq!(value["specifications"]["frameRate"], 30.0);
        assert!(value["specifications"].get("cableLength").is_none());
        assert!(value.get("registeredAt").is_some());
        assert!(value.get("clientRef").is_some());
    }

    #[test]
    fn test_device_payload_drops_operator_for_cloud() {
        let mut draft = device_draft();
        draft.set("category", FieldValue::choice("cloud", "Cloud unit"));
        draft.set("ipAddress", FieldValue::text("10.0.0.4"));
        let value = serde_json::to_value(device_payload(&draft)).unwrap();
        assert!(value.get("operator").is_none());
        assert_eq!(value["ipAddress"], "10.0.0.4");
    }

    #[test]
    fn test_device_payload_drops_ip_for_field_units() {
        let mut draft = device_draft();
        draft.set("ipAddress", FieldValue::text("10.0.0.4"));
        let value = serde_json::to_value(device_payload(&draft)).unwrap();
        assert!(value.get("ipAddress").is_none());
        assert_eq!(value["operator"], "J. Smith");
    }

    #[test]
    fn test_observation_payload_snapshot_omitted_when_off() {
        let draft = FormDraft::from_spec(observation_capture());
        let value = serde_json::to_value(observation_payload(&draft)).unwrap();
        assert!(value.get("snapshot").is_none());
    }

    #[test]
    fn test_observation_payload_nests_snapshot_when_on() {
        let mut draft = FormDraft::from_spec(observation_capture());
        draft.set("snapshot", FieldValue::Toggle(true));
        draft.set("snapshotLabel", FieldValue::text("Crack Circumferential"));
        draft.set(
            "snapshotTimestamp",
            FieldValue::text("2026-08-25T10:00:00+00:00"),
        );
        let value = serde_json::to_value(observation_payload(&draft)).unwrap();
        assert_eq!(value["snapshot"]["label"], "Crack Circumferential");
        assert_eq!(value["snapshot"]["timestamp"], "2026-08-25T10:00:00+00:00");
    }

    #[test]
    fn test_report_payload_dates_and_format() {
        let mut draft = FormDraft::from_spec(report_creation());
        draft.set("projectId", FieldValue::choice("p1", "Elm St"));
        draft.set("title", FieldValue::text("August QC"));
        draft.set("inspector", FieldValue::text("R. Patel"));
        draft.set("fromDate", FieldValue::text("2026-08-01"));
        draft.set("toDate", FieldValue::text("2026-08-25"));
        let value = serde_json::to_value(report_payload(&draft)).unwrap();
        assert_eq!(value["fromDate"], "2026-08-01");
        assert_eq!(value["toDate"], "2026-08-25");
        assert_eq!(value["format"], "pdf");
        assert_eq!(value["includeMedia"], true);
    }
}
