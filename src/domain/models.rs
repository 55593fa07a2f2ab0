use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::errors::{DomainError, DomainResult, SubmissionError};

/// The three application flows served by the forms API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Partnership,
    Recognition,
    Accreditation,
}

impl FormKind {
    pub const ALL: [FormKind; 3] = [FormKind::Partnership, FormKind::Recognition, FormKind::Accreditation];

    /// Path segment under `/api/forms/`.
    pub fn endpoint(&self) -> &'static str {
        match self {
            FormKind::Partnership => "partnerships",
            FormKind::Recognition => "recognition",
            FormKind::Accreditation => "accreditation",
        }
    }

    pub fn success_path(&self) -> &'static str {
        match self {
            FormKind::Partnership => "/partnership/application/success",
            FormKind::Recognition => "/recognition/application/success",
            FormKind::Accreditation => "/accreditation/application/success",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormKind::Partnership => "Partnership Application",
            FormKind::Recognition => "Document Recognition Application",
            FormKind::Accreditation => "Accreditation Application",
        }
    }

    /// Location the applicant is sent to after a successful submission.
    pub fn success_location(&self, id: &str) -> String {
        format!("{}?id={}", self.success_path(), urlencoding::encode(id))
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormKind::Partnership => "partnership",
            FormKind::Recognition => "recognition",
            FormKind::Accreditation => "accreditation",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for FormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "partnership" | "partnerships" => Ok(FormKind::Partnership),
            "recognition" => Ok(FormKind::Recognition),
            "accreditation" => Ok(FormKind::Accreditation),
            other => Err(format!("unknown form '{}'", other)),
        }
    }
}

/// One option of a select or multi-select field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

impl Choice {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// Looks up the display label for a stored choice value.
pub fn choice_label(choices: &[Choice], value: &str) -> Option<&'static str> {
    choices.iter().find(|c| c.value == value).map(|c| c.label)
}

/// How a field is edited and which values it accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    /// Digits only; enforced by the input layer.
    Number,
    Year,
    Select(&'static [Choice]),
    MultiSelect(&'static [Choice]),
    Checkbox,
    Documents,
}

impl FieldKind {
    pub fn accepts_digits_only(&self) -> bool {
        matches!(self, FieldKind::Number | FieldKind::Year)
    }
}

/// A value written into a form field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Members(BTreeSet<String>),
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Flag(value)
    }
}

/// Static description of one wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    pub key: &'static str,
    pub title: &'static str,
}

impl StepInfo {
    pub const fn new(key: &'static str, title: &'static str) -> Self {
        Self { key, title }
    }
}

pub const ACCEPTED_DOCUMENT_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

/// A supporting document attached to an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub id: String,
    pub path: PathBuf,
    pub size_bytes: u64,
    pub kind: String,
}

impl UploadedDocument {
    /// Builds a document entry after checking the file type.
    pub fn new(id: impl Into<String>, path: impl Into<PathBuf>, size_bytes: u64) -> DomainResult<Self> {
        let path = path.into();
        if !has_accepted_extension(&path) {
            return Err(DomainError::UnsupportedDocument(path.display().to_string()));
        }
        Ok(Self {
            id: id.into(),
            path,
            size_bytes,
            kind: "document".to_string(),
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Size in megabytes with two decimals, as shown next to each upload.
    pub fn size_label(&self) -> String {
        format!("{:.2} MB", self.size_bytes as f64 / 1024.0 / 1024.0)
    }
}

fn has_accepted_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ACCEPTED_DOCUMENT_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// The validated, serialized form handed to the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionRequest {
    pub kind: FormKind,
    pub payload: serde_json::Value,
}

/// What the forms API returns on an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub id: String,
    pub message: Option<String>,
}

/// Delivers a validated form to the forms API. One call, one attempt.
pub trait SubmissionGateway: Send + Sync + fmt::Debug {
    fn submit(&self, request: &SubmissionRequest) -> Result<Receipt, SubmissionError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A transient message surfaced to the user after an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Success, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NotificationLevel::Error, message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_kind_endpoints() {
        assert_eq!(FormKind::Partnership.endpoint(), "partnerships");
        assert_eq!(FormKind::Recognition.endpoint(), "recognition");
        assert_eq!(FormKind::Accreditation.endpoint(), "accreditation");
    }

    #[test]
    fn test_form_kind_parsing() {
        assert_eq!("Partnership".parse::<FormKind>(), Ok(FormKind::Partnership));
        assert_eq!("partnerships".parse::<FormKind>(), Ok(FormKind::Partnership));
        assert_eq!(" recognition ".parse::<FormKind>(), Ok(FormKind::Recognition));
        assert!("contact".parse::<FormKind>().is_err());
    }

    #[test]
    fn test_success_location_carries_id() {
        let url = FormKind::Recognition.success_location("X");
        assert_eq!(url, "/recognition/application/success?id=X");

        let encoded = FormKind::Partnership.success_location("a b&c");
        assert_eq!(encoded, "/partnership/application/success?id=a%20b%26c");
    }

    #[test]
    fn test_document_extension_check() {
        assert!(UploadedDocument::new("1", "diploma.PDF", 10).is_ok());
        assert!(UploadedDocument::new("2", "scan.jpeg", 10).is_ok());
        assert_eq!(
            UploadedDocument::new("3", "notes.docx", 10),
            Err(DomainError::UnsupportedDocument("notes.docx".to_string()))
        );
        assert!(UploadedDocument::new("4", "no_extension", 10).is_err());
    }

    #[test]
    fn test_document_labels() {
        let doc = UploadedDocument::new("1", "/tmp/files/diploma.pdf", 3 * 1024 * 1024 / 2).unwrap();
        assert_eq!(doc.file_name(), "diploma.pdf");
        assert_eq!(doc.size_label(), "1.50 MB");
    }

    #[test]
    fn test_choice_label_lookup() {
        const CHOICES: &[Choice] = &[Choice::new("ngo", "Non-Governmental Organization")];
        assert_eq!(choice_label(CHOICES, "ngo"), Some("Non-Governmental Organization"));
        assert_eq!(choice_label(CHOICES, "other"), None);
    }
}
