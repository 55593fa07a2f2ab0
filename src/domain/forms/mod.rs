//! Typed application forms.
//!
//! Each form is a plain record per step plus a field enum addressing every
//! editable value. The [`WizardForm`] trait is what the wizard engine needs
//! from a form: its steps, which fields live on which step, typed access to
//! field slots, per-step validation and the API payload.

pub mod accreditation;
pub mod partnership;
pub mod recognition;

pub use accreditation::*;
pub use partnership::*;
pub use recognition::*;

use std::collections::BTreeSet;
use std::fmt;

use super::models::{choice_label, FieldKind, FieldValue, FormKind, StepInfo, UploadedDocument};
use super::validation::{FieldErrors, ValidationContext};

pub trait FormField: Copy + Eq + fmt::Debug + 'static {
    fn label(&self) -> &'static str;

    /// Key under which this field's validation error is stored.
    fn error_key(&self) -> &'static str;

    fn kind(&self) -> FieldKind;

    fn required(&self) -> bool;
}

/// One line of the review summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    pub section: &'static str,
    pub label: &'static str,
    pub value: String,
}

pub trait WizardForm: Default + fmt::Debug + Send + 'static {
    type Field: FormField;

    const KIND: FormKind;

    fn steps() -> &'static [StepInfo];

    fn total_steps() -> usize {
        Self::steps().len()
    }

    /// Fields shown on a 1-indexed step, in display order.
    fn fields(step: usize) -> &'static [Self::Field];

    fn text(&self, field: Self::Field) -> Option<&str>;

    fn text_mut(&mut self, field: Self::Field) -> Option<&mut String>;

    fn flag(&self, _field: Self::Field) -> Option<bool> {
        None
    }

    fn flag_mut(&mut self, _field: Self::Field) -> Option<&mut bool> {
        None
    }

    fn members(&self, _field: Self::Field) -> Option<&BTreeSet<String>> {
        None
    }

    fn members_mut(&mut self, _field: Self::Field) -> Option<&mut BTreeSet<String>> {
        None
    }

    fn documents(&self) -> Option<&[UploadedDocument]> {
        None
    }

    fn documents_mut(&mut self) -> Option<&mut Vec<UploadedDocument>> {
        None
    }

    fn validate_step(&self, step: usize, context: &ValidationContext) -> FieldErrors;

    /// Serializes the form into the flat shape the forms API expects.
    fn payload(&self) -> serde_json::Value;

    /// Whether a step takes part in navigation given the current answers.
    fn is_step_active(&self, _step: usize) -> bool {
        true
    }

    fn next_step(&self, step: usize) -> usize {
        let total = Self::total_steps();
        (step + 1..=total)
            .find(|s| self.is_step_active(*s))
            .unwrap_or(total)
    }

    fn prev_step(&self, step: usize) -> usize {
        (1..step).rev().find(|s| self.is_step_active(*s)).unwrap_or(1)
    }

    /// Current value of a field, shaped by its kind.
    fn value(&self, field: Self::Field) -> Option<FieldValue> {
        match field.kind() {
            FieldKind::Checkbox => self.flag(field).map(FieldValue::Flag),
            FieldKind::MultiSelect(_) => self.members(field).cloned().map(FieldValue::Members),
            FieldKind::Documents => self.documents().map(|docs| {
                FieldValue::Members(docs.iter().map(|d| d.id.clone()).collect())
            }),
            _ => self.text(field).map(|s| FieldValue::Text(s.to_string())),
        }
    }

    /// Writes `value` into the field's slot.
    ///
    /// Returns `false` without touching the form when the value's kind does
    /// not fit the field.
    fn apply(&mut self, field: Self::Field, value: FieldValue) -> bool {
        match value {
            FieldValue::Text(text) => match self.text_mut(field) {
                Some(slot) => {
                    *slot = text;
                    true
                }
                None => false,
            },
            FieldValue::Flag(flag) => match self.flag_mut(field) {
                Some(slot) => {
                    *slot = flag;
                    true
                }
                None => false,
            },
            FieldValue::Members(members) => match self.members_mut(field) {
                Some(slot) => {
                    *slot = members;
                    true
                }
                None => false,
            },
        }
    }

    /// Adds `member` to a multi-select field, or removes it when present.
    fn toggle_member(&mut self, field: Self::Field, member: &str) -> bool {
        match self.members_mut(field) {
            Some(set) => {
                if !set.remove(member) {
                    set.insert(member.to_string());
                }
                true
            }
            None => false,
        }
    }

    /// Everything the applicant entered, for the review step and exports.
    ///
    /// Inactive steps, empty optional values and checkboxes are left out.
    fn summary(&self) -> Vec<SummaryEntry> {
        let mut entries = Vec::new();
        for (index, step) in Self::steps().iter().enumerate() {
            let number = index + 1;
            if !self.is_step_active(number) {
                continue;
            }
            for field in Self::fields(number) {
                if let Some(value) = self.display_value(*field) {
                    if value.is_empty() && !field.required() {
                        continue;
                    }
                    entries.push(SummaryEntry {
                        section: step.title,
                        label: field.label(),
                        value,
                    });
                }
            }
        }
        entries
    }

    /// Human-readable rendering of a field's value. `None` for checkboxes.
    fn display_value(&self, field: Self::Field) -> Option<String> {
        match field.kind() {
            FieldKind::Checkbox => None,
            FieldKind::Select(choices) => self.text(field).map(|v| {
                choice_label(choices, v).map(str::to_string).unwrap_or_else(|| v.to_string())
            }),
            FieldKind::MultiSelect(choices) => self.members(field).map(|set| {
                set.iter()
                    .map(|v| choice_label(choices, v).unwrap_or(v.as_str()))
                    .collect::<Vec<_>>()
                    .join(", ")
            }),
            FieldKind::Documents => self.documents().map(|docs| {
                docs.iter()
                    .map(|d| format!("{} ({})", d.file_name(), d.size_label()))
                    .collect::<Vec<_>>()
                    .join(", ")
            }),
            _ => self.text(field).map(|v| v.trim().to_string()),
        }
    }
}

/// Splits a free-form address into `(city, country)`: first and last
/// comma-separated parts.
pub(crate) fn split_address(address: &str) -> (String, String) {
    let parts: Vec<&str> = address.split(',').collect();
    let city = parts.first().map(|p| p.trim()).unwrap_or_default();
    let country = parts.last().map(|p| p.trim()).unwrap_or_default();
    (city.to_string(), country.to_string())
}

pub(crate) fn parse_optional_int(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_address() {
        assert_eq!(
            split_address("Almaty, Abay Ave 10, Kazakhstan"),
            ("Almaty".to_string(), "Kazakhstan".to_string())
        );
        assert_eq!(split_address(""), (String::new(), String::new()));
        assert_eq!(split_address("Astana"), ("Astana".to_string(), "Astana".to_string()));
    }

    #[test]
    fn test_parse_optional_int() {
        assert_eq!(parse_optional_int("2001"), Some(2001));
        assert_eq!(parse_optional_int(" 42 "), Some(42));
        assert_eq!(parse_optional_int(""), None);
        assert_eq!(parse_optional_int("abc"), None);
    }
}
