//! Static wizard configuration: step descriptors, field specs, and the
//! pure per-step validator.
//!
//! A `WizardSpec` is immutable data defined at module load and shared
//! read-only across every open wizard instance. Conditional requiredness and
//! visibility are declarative predicates over the current draft, never
//! imperative show/hide calls.

use chrono::NaiveDate;
use std::net::Ipv4Addr;

use super::draft::{ErrorSet, FormDraft};
use super::field::FieldValue;

/// Which of the three console wizards a spec describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardKind {
    DeviceRegistration,
    ObservationCapture,
    ReportCreation,
}

impl WizardKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DeviceRegistration => "Register Device",
            Self::ObservationCapture => "Capture Observation",
            Self::ReportCreation => "Create Report",
        }
    }
}

/// One selectable option of a choice field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    pub key: &'static str,
    pub label: &'static str,
}

/// Where a choice field's options come from
#[derive(Clone, Copy)]
pub enum OptionsSource {
    /// Fixed list known at compile time
    Static(&'static [ChoiceOption]),
    /// List derived from other draft fields (e.g. device types per category)
    Derived(fn(&FormDraft) -> &'static [ChoiceOption]),
    /// Reference data fetched from the backend, keyed into the engine's
    /// runtime option table (projects, devices, PACP codes)
    Remote(&'static str),
}

/// Values applied to other fields when a toggle is switched on
pub type EnableFill = fn(&FormDraft) -> Vec<(&'static str, FieldValue)>;

/// Input control backing a field, including its declared default
#[derive(Clone, Copy)]
pub enum FieldControl {
    Text {
        multiline: bool,
    },
    Choice {
        source: OptionsSource,
        default: Option<ChoiceOption>,
    },
    Toggle {
        default: bool,
        /// Fields cleared back to defaults when this toggle goes off
        dependents: &'static [&'static str],
        /// Fill applied when this toggle goes on
        on_enable: Option<EnableFill>,
    },
    Slider {
        min: u32,
        max: u32,
        default: u32,
    },
}

impl FieldControl {
    pub fn default_value(&self) -> FieldValue {
        match self {
            Self::Text { .. } => FieldValue::Text(String::new()),
            Self::Choice { default, .. } => match default {
                Some(opt) => FieldValue::choice(opt.key, opt.label),
                None => FieldValue::choice("", ""),
            },
            Self::Toggle { default, .. } => FieldValue::Toggle(*default),
            Self::Slider { default, .. } => FieldValue::Slider(*default),
        }
    }
}

/// When a field must be filled in
#[derive(Clone, Copy)]
pub enum Requirement {
    Optional,
    Required,
    RequiredWhen(fn(&FormDraft) -> bool),
}

/// When a field is shown (and validated)
#[derive(Clone, Copy)]
pub enum Visibility {
    Always,
    When(fn(&FormDraft) -> bool),
}

/// Extra validation applied to non-empty values
#[derive(Clone, Copy)]
pub enum Check {
    /// Must parse as a number
    Numeric,
    /// Must parse as a dotted-quad IPv4 address
    Ipv4,
    /// Must parse as an ISO calendar date (YYYY-MM-DD)
    IsoDate,
    /// Arbitrary predicate returning an error message on failure
    Custom(fn(&FormDraft) -> Option<&'static str>),
}

/// Declarative description of one wizard field
#[derive(Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub control: FieldControl,
    pub requirement: Requirement,
    pub visibility: Visibility,
    pub checks: &'static [Check],
}

impl FieldSpec {
    pub fn is_visible(&self, draft: &FormDraft) -> bool {
        match self.visibility {
            Visibility::Always => true,
            Visibility::When(pred) => pred(draft),
        }
    }

    pub fn is_required(&self, draft: &FormDraft) -> bool {
        match self.requirement {
            Requirement::Optional => false,
            Requirement::Required => true,
            Requirement::RequiredWhen(pred) => pred(draft),
        }
    }
}

/// One step of a wizard: 1-based index, title, and the fields it edits
pub struct StepDescriptor {
    pub index: usize,
    pub title: &'static str,
    pub fields: &'static [FieldSpec],
}

/// A complete wizard configuration
pub struct WizardSpec {
    pub kind: WizardKind,
    pub steps: &'static [StepDescriptor],
}

impl WizardSpec {
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, index: usize) -> Option<&StepDescriptor> {
        self.steps.get(index.wrapping_sub(1))
    }

    /// Look up a field declaration anywhere in the wizard
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.steps
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.name == name)
    }
}

/// Validate one step of a draft.
///
/// Pure and deterministic: no I/O, no side effects. Every rule for the step
/// is evaluated in declaration order without short-circuiting so the caller
/// gets the full error set in one pass. Hidden fields are skipped.
pub fn validate_step(spec: &WizardSpec, step: usize, draft: &FormDraft) -> ErrorSet {
    let mut errors = ErrorSet::new();
    let Some(descriptor) = spec.step(step) else {
        return errors;
    };

    for field in descriptor.fields {
        if !field.is_visible(draft) {
            continue;
        }

        let value = draft.get(field.name);
        let empty = value.map(FieldValue::is_empty).unwrap_or(true);

        if empty {
            if field.is_required(draft) {
                errors.insert(field.name, format!("{} is required", field.label));
            }
            continue;
        }

        for check in field.checks {
            if errors.contains(field.name) {
                break;
            }
            match check {
                Check::Numeric => {
                    let raw = draft.text(field.name);
                    if raw.trim().parse::<f64>().is_err() {
                        errors.insert(field.name, format!("{} must be a number", field.label));
                    }
                }
                Check::Ipv4 => {
                    let raw = draft.text(field.name);
                    if raw.trim().parse::<Ipv4Addr>().is_err() {
                        errors.insert(
                            field.name,
                            format!("{} must be a valid IPv4 address", field.label),
                        );
                    }
                }
                Check::IsoDate => {
                    let raw = draft.text(field.name);
                    if NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").is_err() {
                        errors.insert(field.name, format!("{} must be YYYY-MM-DD", field.label));
                    }
                }
                Check::Custom(pred) => {
                    if let Some(message) = pred(draft) {
                        errors.insert(field.name, message);
                    }
                }
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::wizard::registry::{device_registration, report_creation};

    #[test]
    fn test_step_lookup_is_one_based() {
        let spec = device_registration();
        assert_eq!(spec.step(1).map(|s| s.index), Some(1));
        assert!(spec.step(0).is_none());
        assert!(spec.step(spec.step_count() + 1).is_none());
    }

    #[test]
    fn test_field_lookup_spans_steps() {
        let spec = device_registration();
        assert!(spec.field("name").is_some());
        assert!(spec.field("ipAddress").is_some());
        assert!(spec.field("nope").is_none());
    }

    #[test]
    fn test_numeric_check_rejects_garbage() {
        let spec = device_registration();
        let mut draft = FormDraft::from_spec(spec);
        draft.set("specifications.frameRate", FieldValue::text("thirty"));
        let errors = validate_step(spec, 2, &draft);
        assert!(errors.contains("specifications.frameRate"));
    }

    #[test]
    fn test_numeric_check_accepts_numbers() {
        let spec = device_registration();
        let mut draft = FormDraft::from_spec(spec);
        draft.set("specifications.frameRate", FieldValue::text("30"));
        draft.set(
            "specifications.resolution",
            FieldValue::choice("1080p", "1080p"),
        );
        let errors = validate_step(spec, 2, &draft);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_iso_date_check() {
        let spec = report_creation();
        let mut draft = FormDraft::from_spec(spec);
        draft.set("fromDate", FieldValue::text("2026-13-40"));
        draft.set("toDate", FieldValue::text("2026-08-25"));
        let errors = validate_step(spec, 2, &draft);
        assert!(errors.contains("fromDate"));
        assert!(!errors.contains("toDate"));
    }

    #[test]
    fn test_ipv4_check_on_cloud_device() {
        let spec = device_registration();
        let mut draft = FormDraft::from_spec(spec);
        draft.set("category", FieldValue::choice("cloud", "Cloud unit"));
        draft.set("ipAddress", FieldValue::text("999.1.2.3"));
        let errors = validate_step(spec, 3, &draft);
        assert!(errors.contains("ipAddress"));

        draft.set("ipAddress", FieldValue::text("10.0.4.17"));
        let errors = validate_step(spec, 3, &draft);
        assert!(!errors.contains("ipAddress"));
    }
}
