use thiserror::Error;

/// Fallback shown when a submission fails without a server-provided message.
pub const SUBMISSION_FALLBACK_MESSAGE: &str = "Failed to submit application. Please try again.";

#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("Document not found: {0}")]
    DocumentNotFound(String),
    #[error("Unsupported document format: {0} (expected .pdf, .jpg, .jpeg or .png)")]
    UnsupportedDocument(String),
    #[error("This form has no document upload step")]
    NoUploadStep,
    #[error("Settings storage error: {0}")]
    SettingsStorage(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

/// Every way a submission attempt can fail.
///
/// The variants are kept apart for logging, but the user only ever sees
/// [`SubmissionError::user_message`], and every variant leaves the wizard
/// ready for another attempt.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("submission rejected (status {status}): {}", message.as_deref().unwrap_or("no message"))]
    Rejected { status: u16, message: Option<String> },
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl SubmissionError {
    pub fn user_message(&self) -> String {
        match self {
            SubmissionError::Rejected { message: Some(message), .. } if !message.trim().is_empty() => {
                message.clone()
            }
            _ => SUBMISSION_FALLBACK_MESSAGE.to_string(),
        }
    }
}
