//! Draft and error-set containers for an open wizard instance

use std::collections::BTreeMap;

use super::field::FieldValue;
use super::spec::WizardSpec;

/// In-progress form data for one wizard instance.
///
/// Holds exactly the fields declared by the wizard's step descriptors;
/// attempts to write anything else are rejected so a draft can never grow
/// orphan fields that would be silently submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    values: BTreeMap<&'static str, FieldValue>,
}

impl FormDraft {
    /// Build a draft holding the declared default value of every field.
    pub fn from_spec(spec: &WizardSpec) -> Self {
        let mut values = BTreeMap::new();
        for step in spec.steps {
            for field in step.fields {
                values.insert(field.name, field.control.default_value());
            }
        }
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut FieldValue> {
        self.values.get_mut(name)
    }

    /// Merge a single field value. Returns false (and logs) for fields the
    /// wizard never declared.
    pub fn set(&mut self, name: &str, value: FieldValue) -> bool {
        match self.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => {
                tracing::warn!(field = name, "ignoring write to undeclared draft field");
                false
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn text(&self, name: &str) -> &str {
        self.get(name).map(FieldValue::as_text).unwrap_or("")
    }

    pub fn choice(&self, name: &str) -> &str {
        self.get(name).map(FieldValue::as_choice).unwrap_or("")
    }

    pub fn choice_label(&self, name: &str) -> &str {
        self.get(name).map(FieldValue::choice_label).unwrap_or("")
    }

    pub fn toggle(&self, name: &str) -> bool {
        self.get(name).map(FieldValue::as_toggle).unwrap_or(false)
    }

    pub fn slider(&self, name: &str) -> u32 {
        self.get(name).map(FieldValue::as_slider).unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Field-level validation messages for the open wizard instance.
///
/// Recomputed wholesale on step advancement; individual entries cleared as
/// soon as the corresponding field changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorSet {
    entries: BTreeMap<&'static str, String>,
}

impl ErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.entries.insert(field, message.into());
    }

    /// Remove the entry for one field, leaving all others untouched.
    pub fn clear_field(&mut self, field: &str) {
        self.entries.remove(field);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.entries.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::wizard::registry::device_registration;

    #[test]
    fn test_draft_holds_only_declared_fields() {
        let spec = device_registration();
        let draft = FormDraft::from_spec(spec);
        assert!(draft.contains("name"));
        assert!(draft.contains("ipAddress"));
        assert!(!draft.contains("bogus"));
    }

    #[test]
    fn test_set_undeclared_field_is_rejected() {
        let spec = device_registration();
        let mut draft = FormDraft::from_spec(spec);
        let before = draft.clone();
        assert!(!draft.set("bogus", FieldValue::text("x")));
        assert_eq!(draft, before);
    }

    #[test]
    fn test_set_declared_field_merges() {
        let spec = device_registration();
        let mut draft = FormDraft::from_spec(spec);
        assert!(draft.set("name", FieldValue::text("Cam1")));
        assert_eq!(draft.text("name"), "Cam1");
    }

    #[test]
    fn test_error_set_clear_field_is_surgical() {
        let mut errors = ErrorSet::new();
        errors.insert("name", "Name is required");
        errors.insert("location", "Location is required");
        errors.clear_field("name");
        assert!(!errors.contains("name"));
        assert!(errors.contains("location"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_error_set_clear_missing_field_is_noop() {
        let mut errors = ErrorSet::new();
        errors.insert("name", "Name is required");
        errors.clear_field("operator");
        assert_eq!(errors.len(), 1);
    }
}
