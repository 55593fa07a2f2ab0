//! The wizard engine.
//!
//! A [`Wizard`] owns one application form for the lifetime of a session:
//! the typed field values, the error map of the last failed validation, the
//! 1-indexed step cursor and the in-flight submission flag. Editing never
//! validates; validation runs only when moving forward.

use std::fmt;
use std::path::PathBuf;

use tracing::{debug, info, warn};

use crate::domain::{
    DomainError, DomainResult, FieldErrors, FieldKind, FieldValue, FormField, FormKind,
    Notification, Receipt, StepInfo, SubmissionError, SubmissionRequest,
    SummaryEntry, UploadedDocument, ValidationContext, WizardForm,
};
use crate::domain::{AccreditationApplication, PartnershipApplication, RecognitionApplication};
#[cfg(test)]
use crate::domain::SubmissionGateway;

const SUBMITTED_MESSAGE: &str = "Application submitted successfully";

/// Result of trying to move forward one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced { from: usize, to: usize },
    /// The step has errors; they are stored on the wizard.
    Invalid { errors: usize },
    /// The last step validated; the form can be submitted.
    ReadyToSubmit,
    /// A submission is already in flight.
    Busy,
}

/// Result of a completed submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Accepted {
        receipt: Receipt,
        notification: Notification,
        redirect: String,
    },
    /// The form stays on its last step with every value intact.
    Failed { notification: Notification },
}

impl SubmissionOutcome {
    pub fn notification(&self) -> &Notification {
        match self {
            SubmissionOutcome::Accepted { notification, .. } => notification,
            SubmissionOutcome::Failed { notification } => notification,
        }
    }
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Progress {
    Step(StepOutcome),
    Submitted(SubmissionOutcome),
}

#[derive(Debug)]
pub struct Wizard<F: WizardForm> {
    form: F,
    current_step: usize,
    errors: FieldErrors,
    is_submitting: bool,
    context: ValidationContext,
    documents_added: usize,
}

impl<F: WizardForm> Default for Wizard<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: WizardForm> Wizard<F> {
    pub fn new() -> Self {
        Self::with_context(ValidationContext::now())
    }

    pub fn with_context(context: ValidationContext) -> Self {
        Self {
            form: F::default(),
            current_step: 1,
            errors: FieldErrors::new(),
            is_submitting: false,
            context,
            documents_added: 0,
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        F::total_steps()
    }

    pub fn is_last_step(&self) -> bool {
        self.current_step == F::total_steps()
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Sets a field and drops its error entry, whatever the new value.
    ///
    /// Returns `false` (and changes nothing) if the value's kind does not
    /// match the field.
    pub fn update_field(&mut self, field: F::Field, value: impl Into<FieldValue>) -> bool {
        if !self.form.apply(field, value.into()) {
            warn!(form = %F::KIND, field = ?field, "ignored value of the wrong kind");
            return false;
        }
        self.errors.remove(field.error_key());
        true
    }

    pub fn toggle_set_member(&mut self, field: F::Field, member: &str) -> bool {
        if !self.form.toggle_member(field, member) {
            warn!(form = %F::KIND, field = ?field, "field is not a multi-select");
            return false;
        }
        self.errors.remove(field.error_key());
        true
    }

    /// Attaches a document and returns its id.
    pub fn add_document(&mut self, path: impl Into<PathBuf>, size_bytes: u64) -> DomainResult<String> {
        let id = format!("doc-{}", self.documents_added + 1);
        let document = UploadedDocument::new(id.clone(), path, size_bytes)?;
        let documents = self.form.documents_mut().ok_or(DomainError::NoUploadStep)?;
        documents.push(document);
        self.documents_added += 1;
        if let Some(field) = Self::documents_field() {
            self.errors.remove(field.error_key());
        }
        debug!(form = %F::KIND, id = %id, "document attached");
        Ok(id)
    }

    pub fn remove_document(&mut self, id: &str) -> bool {
        match self.form.documents_mut() {
            Some(documents) => {
                let before = documents.len();
                documents.retain(|d| d.id != id);
                documents.len() != before
            }
            None => false,
        }
    }

    pub fn validate_current_step(&self) -> FieldErrors {
        self.form.validate_step(self.current_step, &self.context)
    }

    pub fn go_next(&mut self) -> StepOutcome {
        if self.is_submitting {
            return StepOutcome::Busy;
        }

        let errors = self.validate_current_step();
        if !errors.is_empty() {
            let count = errors.len();
            debug!(form = %F::KIND, step = self.current_step, errors = count, "step rejected");
            self.errors = errors;
            return StepOutcome::Invalid { errors: count };
        }

        self.errors.clear();
        if self.is_last_step() {
            return StepOutcome::ReadyToSubmit;
        }

        let from = self.current_step;
        self.current_step = self.form.next_step(from);
        debug!(form = %F::KIND, from, to = self.current_step, "step advanced");
        StepOutcome::Advanced { from, to: self.current_step }
    }

    /// Moves back without re-validating. No-op on the first step.
    pub fn go_prev(&mut self) -> bool {
        if self.current_step <= 1 {
            return false;
        }
        self.current_step = self.form.prev_step(self.current_step);
        self.errors.clear();
        true
    }

    /// Marks a submission as in flight and serializes the form.
    ///
    /// Refused while another submission is in flight or before the last
    /// step is reached.
    pub fn begin_submission(&mut self) -> Option<SubmissionRequest> {
        if self.is_submitting {
            warn!(form = %F::KIND, "submission already in flight");
            return None;
        }
        if !self.is_last_step() {
            return None;
        }
        self.is_submitting = true;
        info!(form = %F::KIND, endpoint = F::KIND.endpoint(), "submitting application");
        Some(SubmissionRequest {
            kind: F::KIND,
            payload: self.form.payload(),
        })
    }

    /// Completes the in-flight submission. The only place `is_submitting`
    /// is cleared, for every outcome.
    pub fn finish_submission(&mut self, result: Result<Receipt, SubmissionError>) -> SubmissionOutcome {
        self.is_submitting = false;
        match result {
            Ok(receipt) => {
                info!(form = %F::KIND, id = %receipt.id, "application accepted");
                let message = receipt
                    .message
                    .clone()
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| SUBMITTED_MESSAGE.to_string());
                SubmissionOutcome::Accepted {
                    redirect: F::KIND.success_location(&receipt.id),
                    notification: Notification::success(message),
                    receipt,
                }
            }
            Err(err) => {
                warn!(form = %F::KIND, error = %err, "application submission failed");
                SubmissionOutcome::Failed {
                    notification: Notification::error(err.user_message()),
                }
            }
        }
    }

    /// Runs one blocking submission through `gateway`.
    #[cfg(test)]
    pub(crate) fn submit(&mut self, gateway: &dyn SubmissionGateway) -> Option<SubmissionOutcome> {
        let request = self.begin_submission()?;
        let result = gateway.submit(&request);
        Some(self.finish_submission(result))
    }

    /// `go_next`, submitting through `gateway` when the last step passes.
    #[cfg(test)]
    pub(crate) fn advance(&mut self, gateway: &dyn SubmissionGateway) -> Progress {
        match self.go_next() {
            StepOutcome::ReadyToSubmit => match self.submit(gateway) {
                Some(outcome) => Progress::Submitted(outcome),
                None => Progress::Step(StepOutcome::Busy),
            },
            other => Progress::Step(other),
        }
    }

    fn documents_field() -> Option<F::Field> {
        (1..=F::total_steps())
            .flat_map(|step| F::fields(step).iter().copied())
            .find(|field| field.kind() == FieldKind::Documents)
    }

    fn field_at(&self, index: usize) -> Option<F::Field> {
        F::fields(self.current_step).get(index).copied()
    }
}

/// Snapshot of one field for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldView {
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub value: Option<FieldValue>,
    pub display: String,
    pub error: Option<String>,
}

/// Form-agnostic view of a wizard, addressed by field position on the
/// current step. Lets the terminal front end drive any form.
pub trait FormSession: Send + fmt::Debug {
    fn kind(&self) -> FormKind;
    fn steps(&self) -> &'static [StepInfo];
    fn current_step(&self) -> usize;
    fn total_steps(&self) -> usize;
    fn is_step_active(&self, step: usize) -> bool;
    fn is_submitting(&self) -> bool;
    fn errors(&self) -> &FieldErrors;
    fn field_count(&self) -> usize;
    fn field_view(&self, index: usize) -> Option<FieldView>;
    fn update_field_at(&mut self, index: usize, value: FieldValue) -> bool;
    fn toggle_member_at(&mut self, index: usize, member: &str) -> bool;
    fn add_document(&mut self, path: PathBuf, size_bytes: u64) -> DomainResult<String>;
    fn remove_document(&mut self, id: &str) -> bool;
    fn documents(&self) -> Vec<UploadedDocument>;
    fn go_next(&mut self) -> StepOutcome;
    fn go_prev(&mut self) -> bool;
    fn begin_submission(&mut self) -> Option<SubmissionRequest>;
    fn finish_submission(&mut self, result: Result<Receipt, SubmissionError>) -> SubmissionOutcome;
    fn summary(&self) -> Vec<SummaryEntry>;
}

impl<F: WizardForm> FormSession for Wizard<F> {
    fn kind(&self) -> FormKind {
        F::KIND
    }

    fn steps(&self) -> &'static [StepInfo] {
        F::steps()
    }

    fn current_step(&self) -> usize {
        self.current_step
    }

    fn total_steps(&self) -> usize {
        F::total_steps()
    }

    fn is_step_active(&self, step: usize) -> bool {
        self.form.is_step_active(step)
    }

    fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn field_count(&self) -> usize {
        F::fields(self.current_step).len()
    }

    fn field_view(&self, index: usize) -> Option<FieldView> {
        let field = self.field_at(index)?;
        Some(FieldView {
            label: field.label(),
            kind: field.kind(),
            required: field.required(),
            value: self.form.value(field),
            display: self.form.display_value(field).unwrap_or_default(),
            error: self.errors.get(field.error_key()).map(str::to_string),
        })
    }

    fn update_field_at(&mut self, index: usize, value: FieldValue) -> bool {
        match self.field_at(index) {
            Some(field) => self.update_field(field, value),
            None => false,
        }
    }

    fn toggle_member_at(&mut self, index: usize, member: &str) -> bool {
        match self.field_at(index) {
            Some(field) => self.toggle_set_member(field, member),
            None => false,
        }
    }

    fn add_document(&mut self, path: PathBuf, size_bytes: u64) -> DomainResult<String> {
        Wizard::add_document(self, path, size_bytes)
    }

    fn remove_document(&mut self, id: &str) -> bool {
        Wizard::remove_document(self, id)
    }

    fn documents(&self) -> Vec<UploadedDocument> {
        self.form.documents().map(<[_]>::to_vec).unwrap_or_default()
    }

    fn go_next(&mut self) -> StepOutcome {
        Wizard::go_next(self)
    }

    fn go_prev(&mut self) -> bool {
        Wizard::go_prev(self)
    }

    fn begin_submission(&mut self) -> Option<SubmissionRequest> {
        Wizard::begin_submission(self)
    }

    fn finish_submission(&mut self, result: Result<Receipt, SubmissionError>) -> SubmissionOutcome {
        Wizard::finish_submission(self, result)
    }

    fn summary(&self) -> Vec<SummaryEntry> {
        self.form.summary()
    }
}

/// Starts a fresh session for `kind`.
pub fn new_session(kind: FormKind, context: ValidationContext) -> Box<dyn FormSession> {
    match kind {
        FormKind::Partnership => Box::new(Wizard::<PartnershipApplication>::with_context(context)),
        FormKind::Recognition => Box::new(Wizard::<RecognitionApplication>::with_context(context)),
        FormKind::Accreditation => Box::new(Wizard::<AccreditationApplication>::with_context(context)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        NotificationLevel, PartnershipField, RecognitionField, DECLARATION_MESSAGE,
        EMAIL_MESSAGE, FILES_MESSAGE, REQUIRED_MESSAGE, SUBMISSION_FALLBACK_MESSAGE,
    };
    use std::sync::Mutex;

    /// Gateway returning a canned result and remembering what it was sent.
    #[derive(Debug)]
    struct StubGateway {
        result: Mutex<Option<Result<Receipt, SubmissionError>>>,
        requests: Mutex<Vec<SubmissionRequest>>,
    }

    impl StubGateway {
        fn returning(result: Result<Receipt, SubmissionError>) -> Self {
            Self {
                result: Mutex::new(Some(result)),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl SubmissionGateway for StubGateway {
        fn submit(&self, request: &SubmissionRequest) -> Result<Receipt, SubmissionError> {
            self.requests.lock().unwrap().push(request.clone());
            self.result
                .lock()
                .unwrap()
                .take()
                .unwrap_or_else(|| Err(SubmissionError::Network("stub exhausted".to_string())))
        }
    }

    fn partnership() -> Wizard<PartnershipApplication> {
        Wizard::with_context(ValidationContext::for_year(2025))
    }

    fn fill_partnership(wizard: &mut Wizard<PartnershipApplication>) {
        use PartnershipField::*;
        wizard.update_field(OrgName, "Eurasian National University");
        wizard.update_field(OrgType, "university");
        wizard.update_field(OrgDescription, "Public research university");
        wizard.update_field(ContactPerson, "Yerlan Nurlanov");
        wizard.update_field(ContactEmail, "intl@enu.kz");
        wizard.update_field(ContactPhone, "+7 7172 709500");
        wizard.update_field(ContactAddress, "Astana, Satpayev 2, Kazakhstan");
        wizard.update_field(PartnershipType, "training");
        wizard.toggle_set_member(Interests, "capacity_building");
        wizard.update_field(Proposal, "Staff training on ESG standards");
        wizard.update_field(Declaration, true);
    }

    fn walk_to_last_step(wizard: &mut Wizard<PartnershipApplication>) {
        while !wizard.is_last_step() {
            assert!(matches!(wizard.go_next(), StepOutcome::Advanced { .. }));
        }
    }

    #[test]
    fn test_new_wizard_starts_at_step_one() {
        let wizard = partnership();
        assert_eq!(wizard.current_step(), 1);
        assert_eq!(wizard.total_steps(), 4);
        assert!(wizard.errors().is_empty());
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn test_empty_required_field_blocks_advance() {
        let mut wizard = partnership();
        let outcome = wizard.go_next();
        assert_eq!(outcome, StepOutcome::Invalid { errors: 3 });
        assert_eq!(wizard.current_step(), 1);
        assert_eq!(wizard.errors().get("orgName"), Some(REQUIRED_MESSAGE));
    }

    #[test]
    fn test_valid_step_advances_by_one_and_clears_errors() {
        let mut wizard = partnership();
        wizard.go_next();
        assert!(!wizard.errors().is_empty());

        fill_partnership(&mut wizard);
        assert_eq!(wizard.go_next(), StepOutcome::Advanced { from: 1, to: 2 });
        assert_eq!(wizard.current_step(), 2);
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn test_update_field_clears_error_even_when_still_invalid() {
        let mut wizard = partnership();
        wizard.update_field(PartnershipField::OrgName, "KBTU");
        wizard.update_field(PartnershipField::OrgType, "private");
        wizard.update_field(PartnershipField::OrgDescription, "Technical university");
        wizard.go_next();
        wizard.update_field(PartnershipField::ContactEmail, "bad");
        assert_eq!(wizard.go_next(), StepOutcome::Invalid { errors: 3 });
        assert_eq!(wizard.errors().get("contactEmail"), Some(EMAIL_MESSAGE));

        wizard.update_field(PartnershipField::ContactEmail, "still-bad");
        assert!(!wizard.errors().contains("contactEmail"));
        assert!(wizard.errors().contains("contactPerson"));
    }

    #[test]
    fn test_email_scenario() {
        let mut wizard = partnership();
        wizard.update_field(PartnershipField::ContactEmail, "not-an-email");
        let errors = wizard.form().validate_step(2, &ValidationContext::for_year(2025));
        assert_eq!(errors.get("contactEmail"), Some(EMAIL_MESSAGE));

        wizard.update_field(PartnershipField::ContactEmail, "a@b.com");
        let errors = wizard.form().validate_step(2, &ValidationContext::for_year(2025));
        assert!(!errors.contains("contactEmail"));
    }

    #[test]
    fn test_go_prev() {
        let mut wizard = partnership();
        assert!(!wizard.go_prev());
        assert_eq!(wizard.current_step(), 1);

        fill_partnership(&mut wizard);
        wizard.go_next();
        wizard.go_next();
        assert_eq!(wizard.current_step(), 3);
        assert!(wizard.go_prev());
        assert_eq!(wizard.current_step(), 2);
    }

    #[test]
    fn test_go_prev_clears_errors_without_validating() {
        let mut wizard = partnership();
        fill_partnership(&mut wizard);
        wizard.go_next();
        wizard.update_field(PartnershipField::ContactPhone, "");
        wizard.go_next();
        assert!(wizard.errors().contains("contactPhone"));

        wizard.go_prev();
        assert_eq!(wizard.current_step(), 1);
        assert!(wizard.errors().is_empty());
    }

    #[test]
    fn test_toggle_twice_restores_interests() {
        let mut wizard = partnership();
        let before = wizard.form().details.interests.clone();
        wizard.toggle_set_member(PartnershipField::Interests, "bologna_process");
        wizard.toggle_set_member(PartnershipField::Interests, "bologna_process");
        assert_eq!(wizard.form().details.interests, before);
    }

    #[test]
    fn test_toggle_on_non_set_field_is_ignored() {
        let mut wizard = partnership();
        assert!(!wizard.toggle_set_member(PartnershipField::OrgName, "x"));
        assert!(wizard.form().organization.name.is_empty());
    }

    #[test]
    fn test_last_step_reports_ready() {
        let mut wizard = partnership();
        fill_partnership(&mut wizard);
        walk_to_last_step(&mut wizard);
        assert_eq!(wizard.go_next(), StepOutcome::ReadyToSubmit);
        assert_eq!(wizard.current_step(), 4);
    }

    #[test]
    fn test_declaration_must_be_checked() {
        let mut wizard = partnership();
        fill_partnership(&mut wizard);
        wizard.update_field(PartnershipField::Declaration, false);
        walk_to_last_step(&mut wizard);
        assert_eq!(wizard.go_next(), StepOutcome::Invalid { errors: 1 });
        assert_eq!(wizard.errors().get("declaration"), Some(DECLARATION_MESSAGE));
    }

    #[test]
    fn test_successful_submission_redirects_with_id() {
        let mut wizard = partnership();
        fill_partnership(&mut wizard);
        walk_to_last_step(&mut wizard);

        let gateway = StubGateway::returning(Ok(Receipt {
            id: "X".to_string(),
            message: Some("Application received".to_string()),
        }));
        let progress = wizard.advance(&gateway);

        match progress {
            Progress::Submitted(SubmissionOutcome::Accepted { redirect, notification, receipt }) => {
                assert!(redirect.contains("id=X"));
                assert_eq!(redirect, "/partnership/application/success?id=X");
                assert_eq!(notification.level, NotificationLevel::Success);
                assert_eq!(notification.message, "Application received");
                assert_eq!(receipt.id, "X");
            }
            other => panic!("unexpected progress: {:?}", other),
        }
        assert!(!wizard.is_submitting());
        assert_eq!(gateway.request_count(), 1);
    }

    #[test]
    fn test_submission_payload_reaches_gateway() {
        let mut wizard = partnership();
        fill_partnership(&mut wizard);
        walk_to_last_step(&mut wizard);

        let gateway = StubGateway::returning(Ok(Receipt { id: "7".to_string(), message: None }));
        wizard.advance(&gateway);

        let requests = gateway.requests.lock().unwrap();
        assert_eq!(requests[0].kind, FormKind::Partnership);
        assert_eq!(requests[0].payload["organization_name"], "Eurasian National University");
        assert_eq!(requests[0].payload["proposed_activities"], "capacity_building");
    }

    #[test]
    fn test_network_failure_keeps_step_and_data() {
        let mut wizard = partnership();
        fill_partnership(&mut wizard);
        walk_to_last_step(&mut wizard);

        let gateway = StubGateway::returning(Err(SubmissionError::Network("connection refused".to_string())));
        let progress = wizard.advance(&gateway);

        match progress {
            Progress::Submitted(SubmissionOutcome::Failed { notification }) => {
                assert_eq!(notification.level, NotificationLevel::Error);
                assert_eq!(notification.message, SUBMISSION_FALLBACK_MESSAGE);
            }
            other => panic!("unexpected progress: {:?}", other),
        }
        assert_eq!(wizard.current_step(), 4);
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.form().organization.name, "Eurasian National University");
    }

    #[test]
    fn test_rejected_submission_shows_server_message() {
        let mut wizard = partnership();
        fill_partnership(&mut wizard);
        walk_to_last_step(&mut wizard);

        let gateway = StubGateway::returning(Err(SubmissionError::Rejected {
            status: 200,
            message: Some("Duplicate application".to_string()),
        }));
        let progress = wizard.advance(&gateway);
        assert_eq!(
            progress,
            Progress::Submitted(SubmissionOutcome::Failed {
                notification: Notification::error("Duplicate application"),
            })
        );
        assert_eq!(wizard.current_step(), 4);
    }

    #[test]
    fn test_retry_after_failure() {
        let mut wizard = partnership();
        fill_partnership(&mut wizard);
        walk_to_last_step(&mut wizard);

        let failing = StubGateway::returning(Err(SubmissionError::MalformedResponse("eof".to_string())));
        assert!(matches!(wizard.advance(&failing), Progress::Submitted(SubmissionOutcome::Failed { .. })));

        let working = StubGateway::returning(Ok(Receipt { id: "42".to_string(), message: None }));
        match wizard.advance(&working) {
            Progress::Submitted(SubmissionOutcome::Accepted { notification, .. }) => {
                assert_eq!(notification.message, SUBMITTED_MESSAGE);
            }
            other => panic!("unexpected progress: {:?}", other),
        }
    }

    #[test]
    fn test_only_one_submission_in_flight() {
        let mut wizard = partnership();
        fill_partnership(&mut wizard);
        walk_to_last_step(&mut wizard);
        assert_eq!(wizard.go_next(), StepOutcome::ReadyToSubmit);

        let request = wizard.begin_submission();
        assert!(request.is_some());
        assert!(wizard.is_submitting());
        assert!(wizard.begin_submission().is_none());
        assert_eq!(wizard.go_next(), StepOutcome::Busy);

        let outcome = wizard.finish_submission(Ok(Receipt { id: "1".to_string(), message: None }));
        assert!(matches!(outcome, SubmissionOutcome::Accepted { .. }));
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn test_begin_submission_refused_before_last_step() {
        let mut wizard = partnership();
        assert!(wizard.begin_submission().is_none());
        assert!(!wizard.is_submitting());
    }

    #[test]
    fn test_documents_clear_files_error() {
        let mut wizard: Wizard<RecognitionApplication> =
            Wizard::with_context(ValidationContext::for_year(2025));
        let personal = [
            (RecognitionField::FirstName, "Aruzhan"),
            (RecognitionField::LastName, "Bekova"),
            (RecognitionField::Email, "aruzhan@example.kz"),
            (RecognitionField::Phone, "+7 705 111 2233"),
            (RecognitionField::Address, "Tole bi 59"),
            (RecognitionField::City, "Almaty"),
            (RecognitionField::Country, "Kazakhstan"),
            (RecognitionField::DocumentType, "diploma"),
            (RecognitionField::IssuingInstitution, "Charles University"),
            (RecognitionField::IssuingCountry, "Czech Republic"),
            (RecognitionField::GraduationYear, "2021"),
            (RecognitionField::FieldOfStudy, "Economics"),
            (RecognitionField::DegreeLevel, "master"),
        ];
        for (field, value) in personal {
            wizard.update_field(field, value);
        }
        wizard.go_next();
        wizard.go_next();
        assert_eq!(wizard.current_step(), 3);
        assert_eq!(wizard.go_next(), StepOutcome::Invalid { errors: 1 });
        assert_eq!(wizard.errors().get("files"), Some(FILES_MESSAGE));

        let id = wizard.add_document("diploma.pdf", 1024).unwrap();
        assert_eq!(id, "doc-1");
        assert!(wizard.errors().is_empty());
        assert_eq!(wizard.go_next(), StepOutcome::Advanced { from: 3, to: 4 });

        assert!(wizard.remove_document("doc-1"));
        assert!(!wizard.remove_document("doc-1"));
    }

    #[test]
    fn test_add_document_rejects_unsupported_format() {
        let mut wizard: Wizard<RecognitionApplication> = Wizard::new();
        let err = wizard.add_document("cv.docx", 10).unwrap_err();
        assert_eq!(err, DomainError::UnsupportedDocument("cv.docx".to_string()));
        assert!(wizard.form().uploads.is_empty());
    }

    #[test]
    fn test_partnership_has_no_upload_step() {
        let mut wizard = partnership();
        assert_eq!(wizard.add_document("a.pdf", 1), Err(DomainError::NoUploadStep));
    }

    #[test]
    fn test_session_drives_accreditation_skip() {
        let mut session = new_session(FormKind::Accreditation, ValidationContext::for_year(2025));
        assert_eq!(session.total_steps(), 5);
        assert!(session.update_field_at(0, "institutional".into()));
        assert_eq!(session.go_next(), StepOutcome::Advanced { from: 1, to: 2 });

        assert!(session.update_field_at(0, "Astana IT University".into()));
        assert!(session.update_field_at(1, "university".into()));
        assert!(session.update_field_at(6, "info@astanait.edu.kz".into()));
        assert_eq!(session.go_next(), StepOutcome::Advanced { from: 2, to: 4 });
        assert!(!session.is_step_active(3));

        assert!(session.go_prev());
        assert_eq!(session.current_step(), 2);
    }

    #[test]
    fn test_session_field_view_reports_errors() {
        let mut session = new_session(FormKind::Recognition, ValidationContext::for_year(2025));
        session.go_next();
        let view = session.field_view(0).unwrap();
        assert_eq!(view.label, "First name");
        assert!(view.required);
        assert_eq!(view.error.as_deref(), Some(REQUIRED_MESSAGE));
        assert!(session.field_view(99).is_none());
        assert!(!session.update_field_at(99, "x".into()));
    }
}
