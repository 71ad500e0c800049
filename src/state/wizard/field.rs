//! Field value objects for wizard drafts

/// Type-safe field values
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    /// A selected option: wire key plus the human label it was picked under
    Choice { key: String, label: String },
    Toggle(bool),
    Slider(u32),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn choice(key: impl Into<String>, label: impl Into<String>) -> Self {
        FieldValue::Choice {
            key: key.into(),
            label: label.into(),
        }
    }

    /// Get the text value (empty for non-text fields)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    /// Get the selected option key (empty when nothing is selected)
    pub fn as_choice(&self) -> &str {
        match self {
            FieldValue::Choice { key, .. } => key,
            _ => "",
        }
    }

    /// Get the selected option label (empty when nothing is selected)
    pub fn choice_label(&self) -> &str {
        match self {
            FieldValue::Choice { label, .. } => label,
            _ => "",
        }
    }

    pub fn as_toggle(&self) -> bool {
        matches!(self, FieldValue::Toggle(true))
    }

    pub fn as_slider(&self) -> u32 {
        match self {
            FieldValue::Slider(v) => *v,
            _ => 0,
        }
    }

    /// Whether the field holds no user-provided value.
    /// Toggles and sliders always hold a value.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Choice { key, .. } => key.is_empty(),
            FieldValue::Toggle(_) | FieldValue::Slider(_) => false,
        }
    }

    /// Append a character (text fields only)
    pub fn push_char(&mut self, c: char) {
        if let FieldValue::Text(s) = self {
            s.push(c);
        }
    }

    /// Remove the last character (text fields only)
    pub fn pop_char(&mut self) {
        if let FieldValue::Text(s) = self {
            s.pop();
        }
    }

    /// Display value for rendering
    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Choice { key, label } => {
                if key.is_empty() {
                    String::new()
                } else if label.is_empty() {
                    key.clone()
                } else {
                    label.clone()
                }
            }
            FieldValue::Toggle(on) => if *on { "on" } else { "off" }.to_string(),
            FieldValue::Slider(v) => v.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty_text() {
        let value = FieldValue::default();
        assert_eq!(value.as_text(), "");
        assert!(value.is_empty());
    }

    #[test]
    fn test_text_push_pop() {
        let mut value = FieldValue::text("Cam");
        value.push_char('1');
        assert_eq!(value.as_text(), "Cam1");
        value.pop_char();
        assert_eq!(value.as_text(), "Cam");
    }

    #[test]
    fn test_push_char_noop_on_choice() {
        let mut value = FieldValue::choice("field", "Field unit");
        value.push_char('x');
        assert_eq!(value.as_choice(), "field");
    }

    #[test]
    fn test_whitespace_only_text_is_empty() {
        assert!(FieldValue::text("   ").is_empty());
    }

    #[test]
    fn test_unselected_choice_is_empty() {
        assert!(FieldValue::choice("", "").is_empty());
        assert!(!FieldValue::choice("cloud", "Cloud unit").is_empty());
    }

    #[test]
    fn test_toggle_and_slider_never_empty() {
        assert!(!FieldValue::Toggle(false).is_empty());
        assert!(!FieldValue::Slider(0).is_empty());
    }

    #[test]
    fn test_choice_display_prefers_label() {
        assert_eq!(FieldValue::choice("1080p", "1080p HD").display(), "1080p HD");
        assert_eq!(FieldValue::choice("csv", "").display(), "csv");
        assert_eq!(FieldValue::choice("", "").display(), "");
    }
}
