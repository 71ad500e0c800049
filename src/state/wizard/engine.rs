//! Wizard state container: one instance per open wizard, owning the draft,
//! the error set, and the step/field cursors.

use std::collections::HashMap;

use super::draft::{ErrorSet, FormDraft};
use super::field::FieldValue;
use super::spec::{validate_step, FieldControl, FieldSpec, OptionsSource, WizardKind, WizardSpec};

/// A runtime choice option, either mirrored from the static registry or
/// loaded from backend reference data (projects, devices, PACP codes)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteOption {
    pub key: String,
    pub label: String,
}

impl RemoteOption {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Multi-step form state for one wizard instance.
///
/// Owned exclusively by the screen that opened it; never shared across
/// instances. Steps are 1-based, transitions only via `next_step` /
/// `prev_step`, and submission is only reachable from the last step.
pub struct WizardState {
    spec: &'static WizardSpec,
    step: usize,
    draft: FormDraft,
    errors: ErrorSet,
    /// Cursor over the visible fields of the current step; an index equal to
    /// the visible-field count means the button row is active
    pub active_field: usize,
    pub selected_button: usize,
    submitting: bool,
    options: HashMap<&'static str, Vec<RemoteOption>>,
}

impl WizardState {
    pub fn new(spec: &'static WizardSpec) -> Self {
        Self {
            spec,
            step: 1,
            draft: FormDraft::from_spec(spec),
            errors: ErrorSet::new(),
            active_field: 0,
            selected_button: 0,
            submitting: false,
            options: HashMap::new(),
        }
    }

    pub fn kind(&self) -> WizardKind {
        self.spec.kind
    }

    pub fn spec(&self) -> &'static WizardSpec {
        self.spec
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn step_count(&self) -> usize {
        self.spec.step_count()
    }

    pub fn is_last_step(&self) -> bool {
        self.step == self.step_count()
    }

    pub fn draft(&self) -> &FormDraft {
        &self.draft
    }

    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }

    pub fn step_title(&self) -> &'static str {
        self.spec.step(self.step).map(|s| s.title).unwrap_or("")
    }

    /// Fields of the current step that are visible given the current draft
    pub fn visible_fields(&self) -> Vec<&'static FieldSpec> {
        self.spec
            .step(self.step)
            .map(|s| {
                s.fields
                    .iter()
                    .filter(|f| f.is_visible(&self.draft))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn on_button_row(&self) -> bool {
        self.active_field >= self.visible_fields().len()
    }

    pub fn active_spec(&self) -> Option<&'static FieldSpec> {
        self.visible_fields().get(self.active_field).copied()
    }

    /// Button labels for the current step: Back, Cancel, then Next or Submit
    pub fn buttons(&self) -> [&'static str; 3] {
        if self.is_last_step() {
            ["Back", "Cancel", "Submit"]
        } else {
            ["Back", "Cancel", "Next"]
        }
    }

    pub fn next_field(&mut self) {
        let count = self.visible_fields().len() + 1;
        self.active_field = (self.active_field + 1) % count;
    }

    pub fn prev_field(&mut self) {
        let count = self.visible_fields().len() + 1;
        if self.active_field == 0 {
            self.active_field = count - 1;
        } else {
            self.active_field -= 1;
        }
    }

    pub fn next_button(&mut self) {
        self.selected_button = (self.selected_button + 1) % 3;
    }

    pub fn prev_button(&mut self) {
        self.selected_button = if self.selected_button == 0 {
            2
        } else {
            self.selected_button - 1
        };
    }

    /// Merge a single field value into the draft. Pure state update, no
    /// validation; a stale error entry for that field is cleared. Turning a
    /// toggle off resets its declared dependents to their defaults; turning
    /// it on applies the declared fill.
    pub fn set_field(&mut self, name: &str, value: FieldValue) {
        let Some(field) = self.spec.field(name) else {
            tracing::warn!(field = name, "set_field on undeclared field");
            return;
        };
        let name = field.name;
        self.errors.clear_field(name);

        if let FieldControl::Toggle {
            dependents,
            on_enable,
            ..
        } = field.control
        {
            let was_on = self.draft.toggle(name);
            let now_on = value.as_toggle();
            self.draft.set(name, value);

            if was_on && !now_on {
                for dep in dependents {
                    if let Some(dep_spec) = self.spec.field(dep) {
                        self.draft.set(dep, dep_spec.control.default_value());
                        self.errors.clear_field(dep);
                    }
                }
            } else if !was_on && now_on {
                if let Some(fill) = on_enable {
                    for (dep, dep_value) in fill(&self.draft) {
                        self.draft.set(dep, dep_value);
                        self.errors.clear_field(dep);
                    }
                }
            }
        } else {
            self.draft.set(name, value);
        }

        self.clamp_cursor();
    }

    /// Type a character into the active field
    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.active_spec() else {
            return;
        };
        if let FieldControl::Text { .. } = field.control {
            let name = field.name;
            self.errors.clear_field(name);
            if let Some(value) = self.draft.get_mut(name) {
                value.push_char(c);
            }
        }
    }

    /// Backspace in the active field
    pub fn backspace(&mut self) {
        let Some(field) = self.active_spec() else {
            return;
        };
        if let FieldControl::Text { .. } = field.control {
            let name = field.name;
            self.errors.clear_field(name);
            if let Some(value) = self.draft.get_mut(name) {
                value.pop_char();
            }
        }
    }

    /// Flip the active toggle field
    pub fn toggle_active(&mut self) {
        let Some(field) = self.active_spec() else {
            return;
        };
        if matches!(field.control, FieldControl::Toggle { .. }) {
            let next = !self.draft.toggle(field.name);
            self.set_field(field.name, FieldValue::Toggle(next));
        }
    }

    /// Cycle the active choice field forward or backward through its options
    pub fn cycle_choice(&mut self, forward: bool) {
        let Some(field) = self.active_spec() else {
            return;
        };
        if !matches!(field.control, FieldControl::Choice { .. }) {
            return;
        }
        let options = self.options_for(field);
        if options.is_empty() {
            return;
        }
        let current = self.draft.choice(field.name);
        let position = options.iter().position(|o| o.key == current);
        let next = match (position, forward) {
            (None, _) => 0,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(0), false) => options.len() - 1,
            (Some(i), false) => i - 1,
        };
        let option = &options[next];
        let value = FieldValue::choice(option.key.clone(), option.label.clone());
        self.set_field(field.name, value);
    }

    /// Nudge the active slider field, clamped to its declared range
    pub fn adjust_slider(&mut self, delta: i64) {
        let Some(field) = self.active_spec() else {
            return;
        };
        if let FieldControl::Slider { min, max, .. } = field.control {
            let current = self.draft.slider(field.name) as i64;
            let next = (current + delta).clamp(min as i64, max as i64) as u32;
            self.set_field(field.name, FieldValue::Slider(next));
        }
    }

    /// Resolve the option list for a choice field
    pub fn options_for(&self, field: &FieldSpec) -> Vec<RemoteOption> {
        match field.control {
            FieldControl::Choice { source, .. } => match source {
                OptionsSource::Static(options) => options
                    .iter()
                    .map(|o| RemoteOption::new(o.key, o.label))
                    .collect(),
                OptionsSource::Derived(resolve) => resolve(&self.draft)
                    .iter()
                    .map(|o| RemoteOption::new(o.key, o.label))
                    .collect(),
                OptionsSource::Remote(key) => self.options.get(key).cloned().unwrap_or_default(),
            },
            _ => Vec::new(),
        }
    }

    /// Install backend reference data for `OptionsSource::Remote` fields
    pub fn set_remote_options(&mut self, key: &'static str, options: Vec<RemoteOption>) {
        self.options.insert(key, options);
    }

    /// Validate the current step, storing the resulting error set.
    /// Returns true when the step is clean.
    pub fn validate_current(&mut self) -> bool {
        self.errors = validate_step(self.spec, self.step, &self.draft);
        self.errors.is_empty()
    }

    /// Advance to the next step if the current one validates; otherwise the
    /// error set is stored and the step does not change.
    pub fn next_step(&mut self) -> bool {
        if !self.validate_current() {
            return false;
        }
        if self.step < self.step_count() {
            self.step += 1;
            self.active_field = 0;
            self.selected_button = 0;
        }
        true
    }

    /// Go back one step, capped at 1. Errors are neither cleared nor
    /// recomputed.
    pub fn prev_step(&mut self) {
        if self.step > 1 {
            self.step -= 1;
            self.active_field = 0;
            self.selected_button = 0;
        }
    }

    /// Restore the declared defaults and clear all errors
    pub fn reset(&mut self) {
        self.step = 1;
        self.draft = FormDraft::from_spec(self.spec);
        self.errors.clear();
        self.active_field = 0;
        self.selected_button = 0;
        self.submitting = false;
    }

    /// Mark a submission as started. Refuses while one is already
    /// outstanding so a wizard can never have two in flight.
    pub fn begin_submission(&mut self) -> bool {
        if self.submitting {
            return false;
        }
        self.submitting = true;
        true
    }

    pub fn finish_submission(&mut self) {
        self.submitting = false;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    fn clamp_cursor(&mut self) {
        let count = self.visible_fields().len() + 1;
        if self.active_field >= count {
            self.active_field = count - 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::wizard::registry::{
        device_registration, observation_capture, remote, report_creation,
    };
    use pretty_assertions::assert_eq;

    fn device_wizard() -> WizardState {
        WizardState::new(device_registration())
    }

    fn filled_identity_step(wizard: &mut WizardState) {
        wizard.set_field("name", FieldValue::text("Cam1"));
        wizard.set_field(
            "type",
            FieldValue::choice("inspection-camera", "Inspection camera"),
        );
        wizard.set_field("location", FieldValue::text("Main St"));
        wizard.set_field("operator", FieldValue::text("J. Smith"));
    }

    mod validator_totality {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_missing_required_fields_all_reported() {
            let mut wizard = device_wizard();
            // category defaults to "field", everything else untouched
            assert!(!wizard.next_step());
            let errors = wizard.errors();
            assert!(errors.contains("name"));
            assert!(errors.contains("type"));
            assert!(errors.contains("location"));
            assert!(errors.contains("operator"));
            assert_eq!(errors.len(), 4);
        }

        #[test]
        fn test_complete_step_validates_clean() {
            let mut wizard = device_wizard();
            filled_identity_step(&mut wizard);
            assert!(wizard.next_step());
            assert!(wizard.errors().is_empty());
            assert_eq!(wizard.step(), 2);
        }
    }

    mod conditional_requirement {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_operator_not_required_for_cloud() {
            let mut wizard = device_wizard();
            wizard.set_field("name", FieldValue::text("Gateway-1"));
            wizard.set_field("category", FieldValue::choice("cloud", "Cloud unit"));
            wizard.set_field("type", FieldValue::choice("edge-gateway", "Edge gateway"));
            wizard.set_field("location", FieldValue::text("Plant 4"));
            assert!(wizard.next_step());
            assert!(!wizard.errors().contains("operator"));
        }

        #[test]
        fn test_ip_address_required_on_connectivity_step_for_cloud() {
            let mut wizard = device_wizard();
            wizard.set_field("category", FieldValue::choice("cloud", "Cloud unit"));
            let errors =
                validate_step(device_registration(), 3, wizard.draft());
            assert!(errors.contains("ipAddress"));
        }

        #[test]
        fn test_ip_address_not_required_for_field_units() {
            let wizard = device_wizard();
            let errors = validate_step(device_registration(), 3, wizard.draft());
            assert!(!errors.contains("ipAddress"));
        }
    }

    mod step_containment {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_advance_blocked_exactly_when_invalid() {
            let mut wizard = device_wizard();
            assert!(!wizard.next_step());
            assert_eq!(wizard.step(), 1);

            filled_identity_step(&mut wizard);
            assert!(wizard.next_step());
            assert_eq!(wizard.step(), 2);
        }

        #[test]
        fn test_next_step_caps_at_last() {
            let mut wizard = WizardState::new(report_creation());
            wizard.set_remote_options(
                remote::PROJECTS,
                vec![RemoteOption::new("p1", "Elm St trunk")],
            );
            wizard.set_field("projectId", FieldValue::choice("p1", "Elm St trunk"));
            wizard.set_field("title", FieldValue::text("August QC"));
            wizard.set_field("inspector", FieldValue::text("R. Patel"));
            assert!(wizard.next_step());
            wizard.set_field("fromDate", FieldValue::text("2026-08-01"));
            wizard.set_field("toDate", FieldValue::text("2026-08-25"));
            assert!(wizard.next_step());
            assert!(wizard.is_last_step());
            assert!(wizard.next_step());
            assert_eq!(wizard.step(), 3);
        }

        #[test]
        fn test_prev_step_caps_at_one_and_keeps_errors() {
            let mut wizard = device_wizard();
            assert!(!wizard.next_step());
            let before = wizard.errors().clone();
            wizard.prev_step();
            assert_eq!(wizard.step(), 1);
            assert_eq!(wizard.errors(), &before);
        }
    }

    mod field_clearing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_set_field_clears_exactly_its_error() {
            let mut wizard = device_wizard();
            assert!(!wizard.next_step());
            let before = wizard.errors().len();
            wizard.set_field("name", FieldValue::text("X"));
            assert!(!wizard.errors().contains("name"));
            assert_eq!(wizard.errors().len(), before - 1);
            assert!(wizard.errors().contains("location"));
        }

        #[test]
        fn test_typing_clears_the_active_field_error() {
            let mut wizard = device_wizard();
            assert!(!wizard.next_step());
            wizard.active_field = 0; // name
            wizard.input_char('X');
            assert!(!wizard.errors().contains("name"));
            assert_eq!(wizard.draft().text("name"), "X");
        }
    }

    mod reset_completeness {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_reset_restores_declared_defaults() {
            let mut wizard = device_wizard();
            filled_identity_step(&mut wizard);
            assert!(wizard.next_step());
            wizard.set_field("specifications.frameRate", FieldValue::text("30"));
            assert!(!wizard.next_step()); // resolution missing

            wizard.reset();
            assert_eq!(wizard.draft(), &FormDraft::from_spec(device_registration()));
            assert!(wizard.errors().is_empty());
            assert_eq!(wizard.step(), 1);
            assert!(!wizard.is_submitting());
        }
    }

    mod snapshot_toggle {
        use super::*;
        use pretty_assertions::assert_eq;

        fn observation_wizard_with_code() -> WizardState {
            let mut wizard = WizardState::new(observation_capture());
            wizard.set_remote_options(
                remote::PACP_CODES,
                vec![RemoteOption::new("CC", "Crack Circumferential")],
            );
            wizard.set_field("code", FieldValue::choice("CC", "Crack Circumferential"));
            wizard
        }

        #[test]
        fn test_toggle_on_stamps_timestamp_and_label() {
            let mut wizard = observation_wizard_with_code();
            wizard.set_field("snapshot", FieldValue::Toggle(true));
            assert!(!wizard.draft().text("snapshotTimestamp").is_empty());
            assert_eq!(wizard.draft().text("snapshotLabel"), "Crack Circumferential");
        }

        #[test]
        fn test_toggle_on_without_code_leaves_label_empty() {
            let mut wizard = WizardState::new(observation_capture());
            wizard.set_field("snapshot", FieldValue::Toggle(true));
            assert!(!wizard.draft().text("snapshotTimestamp").is_empty());
            assert_eq!(wizard.draft().text("snapshotLabel"), "");
        }

        #[test]
        fn test_toggle_off_clears_dependents() {
            let mut wizard = observation_wizard_with_code();
            wizard.set_field("snapshot", FieldValue::Toggle(true));
            wizard.set_field("snapshot", FieldValue::Toggle(false));
            assert_eq!(wizard.draft().text("snapshotTimestamp"), "");
            assert_eq!(wizard.draft().text("snapshotLabel"), "");
        }

        #[test]
        fn test_hidden_field_retains_value_without_toggle_change() {
            // Switching category hides the operator field but keeps its value
            let mut wizard = device_wizard();
            wizard.set_field("operator", FieldValue::text("J. Smith"));
            wizard.set_field("category", FieldValue::choice("cloud", "Cloud unit"));
            assert_eq!(wizard.draft().text("operator"), "J. Smith");
        }
    }

    mod cursors_and_options {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_field_cursor_wraps_over_button_row() {
            let mut wizard = device_wizard();
            let visible = wizard.visible_fields().len();
            for _ in 0..visible {
                wizard.next_field();
            }
            assert!(wizard.on_button_row());
            wizard.next_field();
            assert_eq!(wizard.active_field, 0);
            wizard.prev_field();
            assert!(wizard.on_button_row());
        }

        #[test]
        fn test_operator_field_hidden_for_cloud_category() {
            let mut wizard = device_wizard();
            assert_eq!(wizard.visible_fields().len(), 5);
            wizard.set_field("category", FieldValue::choice("cloud", "Cloud unit"));
            assert_eq!(wizard.visible_fields().len(), 4);
        }

        #[test]
        fn test_cycle_choice_follows_derived_options() {
            let mut wizard = device_wizard();
            wizard.active_field = 2; // type
            wizard.cycle_choice(true);
            assert_eq!(wizard.draft().choice("type"), "inspection-camera");
            wizard.cycle_choice(true);
            assert_eq!(wizard.draft().choice("type"), "crawler");
            wizard.cycle_choice(false);
            assert_eq!(wizard.draft().choice("type"), "inspection-camera");
        }

        #[test]
        fn test_cycle_choice_empty_remote_options_is_noop() {
            let mut wizard = WizardState::new(observation_capture());
            wizard.active_field = 0; // projectId, no reference data installed
            wizard.cycle_choice(true);
            assert_eq!(wizard.draft().choice("projectId"), "");
        }

        #[test]
        fn test_adjust_slider_clamps_to_range() {
            let mut wizard = WizardState::new(observation_capture());
            wizard.set_remote_options(remote::PROJECTS, vec![RemoteOption::new("p1", "Elm St")]);
            wizard.set_remote_options(remote::DEVICES, vec![RemoteOption::new("d1", "Cam1")]);
            wizard.set_field("projectId", FieldValue::choice("p1", "Elm St"));
            wizard.set_field("deviceId", FieldValue::choice("d1", "Cam1"));
            wizard.set_field("distance", FieldValue::text("12.5"));
            assert!(wizard.next_step());

            wizard.active_field = 1; // severity
            assert_eq!(wizard.draft().slider("severity"), 3);
            wizard.adjust_slider(10);
            assert_eq!(wizard.draft().slider("severity"), 5);
            wizard.adjust_slider(-10);
            assert_eq!(wizard.draft().slider("severity"), 1);
        }
    }

    mod submission_gate {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_begin_submission_refuses_while_outstanding() {
            let mut wizard = device_wizard();
            assert!(wizard.begin_submission());
            assert!(!wizard.begin_submission());
            wizard.finish_submission();
            assert!(wizard.begin_submission());
        }
    }
}
