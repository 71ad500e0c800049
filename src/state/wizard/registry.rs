//! Field registry: allowed device category/type combinations, fixed option
//! lists, and the three static wizard configurations used by the console.

use chrono::Utc;

use super::draft::FormDraft;
use super::field::FieldValue;
use super::spec::{
    Check, ChoiceOption, FieldControl, FieldSpec, OptionsSource, Requirement, StepDescriptor,
    Visibility, WizardKind, WizardSpec,
};

/// Keys into the engine's runtime option table for API-backed reference data
pub mod remote {
    pub const PROJECTS: &str = "projects";
    pub const DEVICES: &str = "devices";
    pub const PACP_CODES: &str = "pacpCodes";
}

pub const DEVICE_CATEGORIES: &[ChoiceOption] = &[
    ChoiceOption {
        key: "field",
        label: "Field unit",
    },
    ChoiceOption {
        key: "cloud",
        label: "Cloud unit",
    },
];

pub const FIELD_DEVICE_TYPES: &[ChoiceOption] = &[
    ChoiceOption {
        key: "inspection-camera",
        label: "Inspection camera",
    },
    ChoiceOption {
        key: "crawler",
        label: "Pipe crawler",
    },
    ChoiceOption {
        key: "push-camera",
        label: "Push camera",
    },
];

pub const CLOUD_DEVICE_TYPES: &[ChoiceOption] = &[
    ChoiceOption {
        key: "edge-gateway",
        label: "Edge gateway",
    },
    ChoiceOption {
        key: "ai-analyzer",
        label: "AI analyzer",
    },
];

pub const RESOLUTIONS: &[ChoiceOption] = &[
    ChoiceOption {
        key: "720p",
        label: "720p",
    },
    ChoiceOption {
        key: "1080p",
        label: "1080p",
    },
    ChoiceOption {
        key: "4k",
        label: "4K UHD",
    },
];

pub const REPORT_FORMATS: &[ChoiceOption] = &[
    ChoiceOption {
        key: "pdf",
        label: "PDF",
    },
    ChoiceOption {
        key: "csv",
        label: "CSV",
    },
];

/// Device types allowed for the currently selected category
pub fn device_types_for(category: &str) -> &'static [ChoiceOption] {
    match category {
        "cloud" => CLOUD_DEVICE_TYPES,
        _ => FIELD_DEVICE_TYPES,
    }
}

fn derived_device_types(draft: &FormDraft) -> &'static [ChoiceOption] {
    device_types_for(draft.choice("category"))
}

fn category_is_field(draft: &FormDraft) -> bool {
    draft.choice("category") == "field"
}

fn category_is_cloud(draft: &FormDraft) -> bool {
    draft.choice("category") == "cloud"
}

fn snapshot_on(draft: &FormDraft) -> bool {
    draft.toggle("snapshot")
}

fn type_matches_category(draft: &FormDraft) -> Option<&'static str> {
    let selected = draft.choice("type");
    if selected.is_empty() {
        return None;
    }
    let allowed = device_types_for(draft.choice("category"));
    if allowed.iter().any(|opt| opt.key == selected) {
        None
    } else {
        Some("Type is not available for the selected category")
    }
}

fn date_range_ordered(draft: &FormDraft) -> Option<&'static str> {
    let from = chrono::NaiveDate::parse_from_str(draft.text("fromDate").trim(), "%Y-%m-%d");
    let to = chrono::NaiveDate::parse_from_str(draft.text("toDate").trim(), "%Y-%m-%d");
    match (from, to) {
        (Ok(from), Ok(to)) if to < from => Some("To date must not precede from date"),
        _ => None,
    }
}

/// Snapshot metadata filled in the moment the toggle goes on: a fresh
/// client-side timestamp and a label derived from the selected PACP code
/// (empty when none is selected yet).
fn fill_snapshot_fields(draft: &FormDraft) -> Vec<(&'static str, FieldValue)> {
    vec![
        (
            "snapshotTimestamp",
            FieldValue::text(Utc::now().to_rfc3339()),
        ),
        (
            "snapshotLabel",
            FieldValue::text(draft.choice_label("code").to_string()),
        ),
    ]
}

static DEVICE_STEPS: [StepDescriptor; 4] = [
    StepDescriptor {
        index: 1,
        title: "Identity",
        fields: &[
            FieldSpec {
                name: "name",
                label: "Name",
                control: FieldControl::Text { multiline: false },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "category",
                label: "Category",
                control: FieldControl::Choice {
                    source: OptionsSource::Static(DEVICE_CATEGORIES),
                    default: Some(ChoiceOption {
                        key: "field",
                        label: "Field unit",
                    }),
                },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "type",
                label: "Type",
                control: FieldControl::Choice {
                    source: OptionsSource::Derived(derived_device_types),
                    default: None,
                },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[Check::Custom(type_matches_category)],
            },
            FieldSpec {
                name: "location",
                label: "Location",
                control: FieldControl::Text { multiline: false },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "operator",
                label: "Operator",
                control: FieldControl::Text { multiline: false },
                requirement: Requirement::RequiredWhen(category_is_field),
                visibility: Visibility::When(category_is_field),
                checks: &[],
            },
        ],
    },
    StepDescriptor {
        index: 2,
        title: "Specifications",
        fields: &[
            FieldSpec {
                name: "specifications.resolution",
                label: "Resolution",
                control: FieldControl::Choice {
                    source: OptionsSource::Static(RESOLUTIONS),
                    default: None,
                },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "specifications.frameRate",
                label: "Frame rate (fps)",
                control: FieldControl::Text { multiline: false },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[Check::Numeric],
            },
            FieldSpec {
                name: "specifications.cableLength",
                label: "Cable length (m)",
                control: FieldControl::Text { multiline: false },
                requirement: Requirement::Optional,
                visibility: Visibility::Always,
                checks: &[Check::Numeric],
            },
        ],
    },
    StepDescriptor {
        index: 3,
        title: "Connectivity",
        fields: &[
            FieldSpec {
                name: "ipAddress",
                label: "IP address",
                control: FieldControl::Text { multiline: false },
                requirement: Requirement::RequiredWhen(category_is_cloud),
                visibility: Visibility::When(category_is_cloud),
                checks: &[Check::Ipv4],
            },
            FieldSpec {
                name: "settings.qualityThreshold",
                label: "Quality threshold (%)",
                control: FieldControl::Slider {
                    min: 0,
                    max: 100,
                    default: 80,
                },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "settings.autoUpload",
                label: "Auto upload footage",
                control: FieldControl::Toggle {
                    default: true,
                    dependents: &[],
                    on_enable: None,
                },
                requirement: Requirement::Optional,
                visibility: Visibility::Always,
                checks: &[],
            },
        ],
    },
    StepDescriptor {
        index: 4,
        title: "Review",
        fields: &[FieldSpec {
            name: "notes",
            label: "Notes",
            control: FieldControl::Text { multiline: true },
            requirement: Requirement::Optional,
            visibility: Visibility::Always,
            checks: &[],
        }],
    },
];

static DEVICE_WIZARD: WizardSpec = WizardSpec {
    kind: WizardKind::DeviceRegistration,
    steps: &DEVICE_STEPS,
};

static OBSERVATION_STEPS: [StepDescriptor; 3] = [
    StepDescriptor {
        index: 1,
        title: "Context",
        fields: &[
            FieldSpec {
                name: "projectId",
                label: "Project",
                control: FieldControl::Choice {
                    source: OptionsSource::Remote(remote::PROJECTS),
                    default: None,
                },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "deviceId",
                label: "Device",
                control: FieldControl::Choice {
                    source: OptionsSource::Remote(remote::DEVICES),
                    default: None,
                },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "distance",
                label: "Distance (m)",
                control: FieldControl::Text { multiline: false },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[Check::Numeric],
            },
        ],
    },
    StepDescriptor {
        index: 2,
        title: "Defect",
        fields: &[
            FieldSpec {
                name: "code",
                label: "PACP code",
                control: FieldControl::Choice {
                    source: OptionsSource::Remote(remote::PACP_CODES),
                    default: None,
                },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "severity",
                label: "Severity (1-5)",
                control: FieldControl::Slider {
                    min: 1,
                    max: 5,
                    default: 3,
                },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "remarks",
                label: "Remarks",
                control: FieldControl::Text { multiline: true },
                requirement: Requirement::Optional,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "snapshot",
                label: "Attach snapshot",
                control: FieldControl::Toggle {
                    default: false,
                    dependents: &["snapshotLabel", "snapshotTimestamp"],
                    on_enable: Some(fill_snapshot_fields),
                },
                requirement: Requirement::Optional,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "snapshotLabel",
                label: "Snapshot label",
                control: FieldControl::Text { multiline: false },
                requirement: Requirement::Optional,
                visibility: Visibility::When(snapshot_on),
                checks: &[],
            },
            FieldSpec {
                name: "snapshotTimestamp",
                label: "Snapshot timestamp",
                control: FieldControl::Text { multiline: false },
                requirement: Requirement::Optional,
                visibility: Visibility::When(snapshot_on),
                checks: &[],
            },
        ],
    },
    StepDescriptor {
        index: 3,
        title: "Review",
        fields: &[],
    },
];

static OBSERVATION_WIZARD: WizardSpec = WizardSpec {
    kind: WizardKind::ObservationCapture,
    steps: &OBSERVATION_STEPS,
};

static REPORT_STEPS: [StepDescriptor; 3] = [
    StepDescriptor {
        index: 1,
        title: "Scope",
        fields: &[
            FieldSpec {
                name: "projectId",
                label: "Project",
                control: FieldControl::Choice {
                    source: OptionsSource::Remote(remote::PROJECTS),
                    default: None,
                },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "title",
                label: "Title",
                control: FieldControl::Text { multiline: false },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "inspector",
                label: "Inspector",
                control: FieldControl::Text { multiline: false },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[],
            },
        ],
    },
    StepDescriptor {
        index: 2,
        title: "Output",
        fields: &[
            FieldSpec {
                name: "fromDate",
                label: "From date",
                control: FieldControl::Text { multiline: false },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[Check::IsoDate],
            },
            FieldSpec {
                name: "toDate",
                label: "To date",
                control: FieldControl::Text { multiline: false },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[Check::IsoDate, Check::Custom(date_range_ordered)],
            },
            FieldSpec {
                name: "format",
                label: "Format",
                control: FieldControl::Choice {
                    source: OptionsSource::Static(REPORT_FORMATS),
                    default: Some(ChoiceOption {
                        key: "pdf",
                        label: "PDF",
                    }),
                },
                requirement: Requirement::Required,
                visibility: Visibility::Always,
                checks: &[],
            },
            FieldSpec {
                name: "includeMedia",
                label: "Include media",
                control: FieldControl::Toggle {
                    default: true,
                    dependents: &[],
                    on_enable: None,
                },
                requirement: Requirement::Optional,
                visibility: Visibility::Always,
                checks: &[],
            },
        ],
    },
    StepDescriptor {
        index: 3,
        title: "Review",
        fields: &[],
    },
];

static REPORT_WIZARD: WizardSpec = WizardSpec {
    kind: WizardKind::ReportCreation,
    steps: &REPORT_STEPS,
};

pub fn device_registration() -> &'static WizardSpec {
    &DEVICE_WIZARD
}

pub fn observation_capture() -> &'static WizardSpec {
    &OBSERVATION_WIZARD
}

pub fn report_creation() -> &'static WizardSpec {
    &REPORT_WIZARD
}
