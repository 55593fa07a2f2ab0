use serde::Serialize;

use super::{FormField, WizardForm};
use crate::domain::models::{Choice, FieldKind, FormKind, StepInfo, UploadedDocument};
use crate::domain::validation::{
    FieldErrors, StepCheck, ValidationContext, DECLARATION_MESSAGE, FILES_MESSAGE,
};

pub const DOCUMENT_TYPES: &[Choice] = &[
    Choice::new("diploma", "Diploma"),
    Choice::new("certificate", "Certificate"),
    Choice::new("transcript", "Academic Transcript"),
];

pub const DEGREE_LEVELS: &[Choice] = &[
    Choice::new("bachelor", "Bachelor's Degree"),
    Choice::new("master", "Master's Degree"),
    Choice::new("doctorate", "Doctorate/PhD"),
    Choice::new("diploma", "Diploma"),
];

const STEPS: &[StepInfo] = &[
    StepInfo::new("personal", "Personal Information"),
    StepInfo::new("documents", "Document Information"),
    StepInfo::new("upload", "Upload"),
    StepInfo::new("review", "Review"),
];

const GRADUATION_YEAR_MIN: i32 = 1950;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub document_type: String,
    pub issuing_institution: String,
    pub issuing_country: String,
    pub graduation_year: String,
    pub field_of_study: String,
    pub degree_level: String,
    pub language_of_instruction: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecognitionApplication {
    pub personal: PersonalInfo,
    pub document: DocumentInfo,
    pub uploads: Vec<UploadedDocument>,
    pub declaration: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecognitionField {
    FirstName,
    LastName,
    Email,
    Phone,
    Address,
    City,
    Country,
    PostalCode,
    DocumentType,
    IssuingInstitution,
    IssuingCountry,
    GraduationYear,
    FieldOfStudy,
    DegreeLevel,
    LanguageOfInstruction,
    Files,
    Declaration,
}

impl FormField for RecognitionField {
    fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Phone => "Phone",
            Self::Address => "Address",
            Self::City => "City",
            Self::Country => "Country",
            Self::PostalCode => "Postal code",
            Self::DocumentType => "Document type",
            Self::IssuingInstitution => "Issuing institution",
            Self::IssuingCountry => "Issuing country",
            Self::GraduationYear => "Graduation year",
            Self::FieldOfStudy => "Field of study",
            Self::DegreeLevel => "Degree level",
            Self::LanguageOfInstruction => "Language of instruction",
            Self::Files => "Documents",
            Self::Declaration => "I declare that the submitted documents are authentic",
        }
    }

    fn error_key(&self) -> &'static str {
        match self {
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
            Self::City => "city",
            Self::Country => "country",
            Self::PostalCode => "postalCode",
            Self::DocumentType => "documentType",
            Self::IssuingInstitution => "issuingInstitution",
            Self::IssuingCountry => "issuingCountry",
            Self::GraduationYear => "graduationYear",
            Self::FieldOfStudy => "fieldOfStudy",
            Self::DegreeLevel => "degreeLevel",
            Self::LanguageOfInstruction => "languageOfInstruction",
            Self::Files => "files",
            Self::Declaration => "declaration",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::Email => FieldKind::Email,
            Self::DocumentType => FieldKind::Select(DOCUMENT_TYPES),
            Self::DegreeLevel => FieldKind::Select(DEGREE_LEVELS),
            Self::GraduationYear => FieldKind::Year,
            Self::Files => FieldKind::Documents,
            Self::Declaration => FieldKind::Checkbox,
            _ => FieldKind::Text,
        }
    }

    fn required(&self) -> bool {
        !matches!(self, Self::PostalCode | Self::LanguageOfInstruction)
    }
}

/// Request body for `POST /api/forms/recognition`.
#[derive(Debug, Serialize)]
struct RecognitionPayload<'a> {
    applicant_name: String,
    email: &'a str,
    phone: &'a str,
    nationality: &'a str,
    passport_number: &'a str,
    document_type: &'a str,
    recognition_purpose: &'a str,
    issuing_institution: &'a str,
    issuing_country: &'a str,
    graduation_year: Option<i64>,
    field_of_study: &'a str,
    qualification_level: &'a str,
    study_duration: &'a str,
    language_of_instruction: &'a str,
    additional_qualifications: &'a str,
    work_experience: &'a str,
    additional_info: String,
}

impl WizardForm for RecognitionApplication {
    type Field = RecognitionField;

    const KIND: FormKind = FormKind::Recognition;

    fn steps() -> &'static [StepInfo] {
        STEPS
    }

    fn fields(step: usize) -> &'static [RecognitionField] {
        use RecognitionField::*;
        match step {
            1 => &[FirstName, LastName, Email, Phone, Address, City, Country, PostalCode],
            2 => &[
                DocumentType,
                IssuingInstitution,
                IssuingCountry,
                GraduationYear,
                FieldOfStudy,
                DegreeLevel,
                LanguageOfInstruction,
            ],
            3 => &[Files],
            4 => &[Declaration],
            _ => &[],
        }
    }

    fn text(&self, field: RecognitionField) -> Option<&str> {
        use RecognitionField::*;
        let value = match field {
            FirstName => &self.personal.first_name,
            LastName => &self.personal.last_name,
            Email => &self.personal.email,
            Phone => &self.personal.phone,
            Address => &self.personal.address,
            City => &self.personal.city,
            Country => &self.personal.country,
            PostalCode => &self.personal.postal_code,
            DocumentType => &self.document.document_type,
            IssuingInstitution => &self.document.issuing_institution,
            IssuingCountry => &self.document.issuing_country,
            GraduationYear => &self.document.graduation_year,
            FieldOfStudy => &self.document.field_of_study,
            DegreeLevel => &self.document.degree_level,
            LanguageOfInstruction => &self.document.language_of_instruction,
            Files | Declaration => return None,
        };
        Some(value.as_str())
    }

    fn text_mut(&mut self, field: RecognitionField) -> Option<&mut String> {
        use RecognitionField::*;
        let slot = match field {
            FirstName => &mut self.personal.first_name,
            LastName => &mut self.personal.last_name,
            Email => &mut self.personal.email,
            Phone => &mut self.personal.phone,
            Address => &mut self.personal.address,
            City => &mut self.personal.city,
            Country => &mut self.personal.country,
            PostalCode => &mut self.personal.postal_code,
            DocumentType => &mut self.document.document_type,
            IssuingInstitution => &mut self.document.issuing_institution,
            IssuingCountry => &mut self.document.issuing_country,
            GraduationYear => &mut self.document.graduation_year,
            FieldOfStudy => &mut self.document.field_of_study,
            DegreeLevel => &mut self.document.degree_level,
            LanguageOfInstruction => &mut self.document.language_of_instruction,
            Files | Declaration => return None,
        };
        Some(slot)
    }

    fn flag(&self, field: RecognitionField) -> Option<bool> {
        (field == RecognitionField::Declaration).then_some(self.declaration)
    }

    fn flag_mut(&mut self, field: RecognitionField) -> Option<&mut bool> {
        (field == RecognitionField::Declaration).then_some(&mut self.declaration)
    }

    fn documents(&self) -> Option<&[UploadedDocument]> {
        Some(&self.uploads)
    }

    fn documents_mut(&mut self) -> Option<&mut Vec<UploadedDocument>> {
        Some(&mut self.uploads)
    }

    fn validate_step(&self, step: usize, context: &ValidationContext) -> FieldErrors {
        use RecognitionField::*;
        let personal = &self.personal;
        let document = &self.document;
        let check = StepCheck::new(context);
        let check = match step {
            1 => check
                .required(FirstName.error_key(), &personal.first_name)
                .required(LastName.error_key(), &personal.last_name)
                .email(Email.error_key(), &personal.email)
                .required(Phone.error_key(), &personal.phone)
                .required(Address.error_key(), &personal.address)
                .required(City.error_key(), &personal.city)
                .required(Country.error_key(), &personal.country),
            2 => check
                .required(DocumentType.error_key(), &document.document_type)
                .required(IssuingInstitution.error_key(), &document.issuing_institution)
                .required(IssuingCountry.error_key(), &document.issuing_country)
                .year(GraduationYear.error_key(), &document.graduation_year, GRADUATION_YEAR_MIN, true)
                .required(FieldOfStudy.error_key(), &document.field_of_study)
                .required(DegreeLevel.error_key(), &document.degree_level),
            3 => check.at_least_one(Files.error_key(), self.uploads.len(), FILES_MESSAGE),
            4 => check.checked(Declaration.error_key(), self.declaration, DECLARATION_MESSAGE),
            _ => check,
        };
        check.finish()
    }

    fn payload(&self) -> serde_json::Value {
        let personal = &self.personal;
        let document = &self.document;
        let payload = RecognitionPayload {
            applicant_name: format!("{} {}", personal.first_name, personal.last_name),
            email: &personal.email,
            phone: &personal.phone,
            nationality: &personal.country,
            passport_number: "",
            document_type: &document.document_type,
            recognition_purpose: "employment",
            issuing_institution: &document.issuing_institution,
            issuing_country: &document.issuing_country,
            graduation_year: super::parse_optional_int(&document.graduation_year),
            field_of_study: &document.field_of_study,
            qualification_level: &document.degree_level,
            study_duration: "4 years",
            language_of_instruction: &document.language_of_instruction,
            additional_qualifications: "",
            work_experience: "",
            additional_info: format!(
                "Address: {}, {}, {} {}",
                personal.address, personal.city, personal.country, personal.postal_code
            ),
        };
        serde_json::to_value(payload).unwrap_or(serde_json::Value::Null)
    }
}
