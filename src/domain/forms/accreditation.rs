use serde::Serialize;

use super::{parse_optional_int, FormField, WizardForm};
use crate::domain::models::{Choice, FieldKind, FormKind, StepInfo, UploadedDocument};
use crate::domain::validation::{
    FieldErrors, StepCheck, ValidationContext, DECLARATION_MESSAGE, FILES_MESSAGE,
};

pub const ACCREDITATION_TYPES: &[Choice] = &[
    Choice::new("institutional", "Institutional accreditation"),
    Choice::new("program", "Program accreditation"),
];

pub const INSTITUTION_TYPES: &[Choice] = &[
    Choice::new("university", "University"),
    Choice::new("college", "College"),
    Choice::new("institute", "Institute"),
    Choice::new("academy", "Academy"),
];

pub const PROGRAM_LEVELS: &[Choice] = &[
    Choice::new("bachelor", "Bachelor's Degree"),
    Choice::new("master", "Master's Degree"),
    Choice::new("doctorate", "Doctorate/PhD"),
    Choice::new("diploma", "Diploma Program"),
];

const STEPS: &[StepInfo] = &[
    StepInfo::new("type", "Accreditation Type"),
    StepInfo::new("institution", "Institution"),
    StepInfo::new("program", "Program"),
    StepInfo::new("documents", "Documents"),
    StepInfo::new("review", "Review"),
];

const PROGRAM_STEP: usize = 3;
const ESTABLISHED_YEAR_MIN: i32 = 1800;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstitutionInfo {
    pub name: String,
    pub institution_type: String,
    pub address: String,
    pub website: String,
    pub contact_person: String,
    pub position: String,
    pub email: String,
    pub phone: String,
    pub established_year: String,
    pub student_count: String,
    pub faculty_count: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramInfo {
    pub name: String,
    pub level: String,
    pub duration: String,
    pub credits: String,
    pub language: String,
    pub department: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccreditationApplication {
    pub accreditation_type: String,
    pub institution: InstitutionInfo,
    pub program: ProgramInfo,
    pub uploads: Vec<UploadedDocument>,
    pub declaration: bool,
}

impl AccreditationApplication {
    pub fn is_program(&self) -> bool {
        self.accreditation_type == "program"
    }

    fn is_institutional(&self) -> bool {
        self.accreditation_type == "institutional"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccreditationField {
    AccreditationType,
    InstitutionName,
    InstitutionType,
    InstitutionAddress,
    InstitutionWebsite,
    InstitutionContactPerson,
    InstitutionPosition,
    InstitutionEmail,
    InstitutionPhone,
    InstitutionEstablishedYear,
    InstitutionStudentCount,
    InstitutionFacultyCount,
    ProgramName,
    ProgramLevel,
    ProgramDuration,
    ProgramCredits,
    ProgramLanguage,
    ProgramDepartment,
    ProgramDescription,
    Files,
    Declaration,
}

impl FormField for AccreditationField {
    fn label(&self) -> &'static str {
        match self {
            Self::AccreditationType => "Accreditation type",
            Self::InstitutionName => "Institution name",
            Self::InstitutionType => "Institution type",
            Self::InstitutionAddress => "Address",
            Self::InstitutionWebsite => "Website",
            Self::InstitutionContactPerson => "Contact person",
            Self::InstitutionPosition => "Position",
            Self::InstitutionEmail => "Email",
            Self::InstitutionPhone => "Phone",
            Self::InstitutionEstablishedYear => "Established year",
            Self::InstitutionStudentCount => "Number of students",
            Self::InstitutionFacultyCount => "Number of faculty",
            Self::ProgramName => "Program name",
            Self::ProgramLevel => "Program level",
            Self::ProgramDuration => "Duration",
            Self::ProgramCredits => "Credits",
            Self::ProgramLanguage => "Language of instruction",
            Self::ProgramDepartment => "Department",
            Self::ProgramDescription => "Program description",
            Self::Files => "Documents",
            Self::Declaration => "I confirm the information provided is accurate",
        }
    }

    fn error_key(&self) -> &'static str {
        match self {
            Self::AccreditationType => "type",
            Self::InstitutionName => "institutionName",
            Self::InstitutionType => "institutionType",
            Self::InstitutionAddress => "institutionAddress",
            Self::InstitutionWebsite => "institutionWebsite",
            Self::InstitutionContactPerson => "institutionContactPerson",
            Self::InstitutionPosition => "institutionPosition",
            Self::InstitutionEmail => "institutionEmail",
            Self::InstitutionPhone => "institutionPhone",
            Self::InstitutionEstablishedYear => "institutionEstablishedYear",
            Self::InstitutionStudentCount => "institutionStudentCount",
            Self::InstitutionFacultyCount => "institutionFacultyCount",
            Self::ProgramName => "programName",
            Self::ProgramLevel => "programLevel",
            Self::ProgramDuration => "programDuration",
            Self::ProgramCredits => "programCredits",
            Self::ProgramLanguage => "programLanguage",
            Self::ProgramDepartment => "programDepartment",
            Self::ProgramDescription => "programDescription",
            Self::Files => "files",
            Self::Declaration => "declaration",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::AccreditationType => FieldKind::Select(ACCREDITATION_TYPES),
            Self::InstitutionType => FieldKind::Select(INSTITUTION_TYPES),
            Self::ProgramLevel => FieldKind::Select(PROGRAM_LEVELS),
            Self::InstitutionEmail => FieldKind::Email,
            Self::InstitutionEstablishedYear => FieldKind::Year,
            Self::InstitutionStudentCount | Self::InstitutionFacultyCount | Self::ProgramCredits => {
                FieldKind::Number
            }
            Self::Files => FieldKind::Documents,
            Self::Declaration => FieldKind::Checkbox,
            _ => FieldKind::Text,
        }
    }

    fn required(&self) -> bool {
        matches!(
            self,
            Self::AccreditationType
                | Self::InstitutionName
                | Self::InstitutionType
                | Self::InstitutionEmail
                | Self::ProgramName
                | Self::ProgramLevel
                | Self::Files
                | Self::Declaration
        )
    }
}

/// Request body for `POST /api/forms/accreditation`.
#[derive(Debug, Serialize)]
struct AccreditationPayload<'a> {
    accreditation_type: &'a str,
    institution_name: &'a str,
    contact_person: &'a str,
    email: &'a str,
    phone: &'a str,
    website: &'a str,
    address: &'a str,
    program_name: Option<&'a str>,
    program_level: Option<&'a str>,
    student_count: Option<i64>,
    faculty_count: Option<i64>,
    establishment_year: Option<i64>,
    license_number: &'a str,
    previous_accreditation: &'a str,
    quality_assurance_system: &'a str,
    educational_goals: &'a str,
    curriculum_description: &'a str,
    assessment_methods: &'a str,
    faculty_qualifications: &'a str,
    infrastructure_description: &'a str,
    student_services: &'a str,
    additional_info: String,
}

impl WizardForm for AccreditationApplication {
    type Field = AccreditationField;

    const KIND: FormKind = FormKind::Accreditation;

    fn steps() -> &'static [StepInfo] {
        STEPS
    }

    fn fields(step: usize) -> &'static [AccreditationField] {
        use AccreditationField::*;
        match step {
            1 => &[AccreditationType],
            2 => &[
                InstitutionName,
                InstitutionType,
                InstitutionAddress,
                InstitutionWebsite,
                InstitutionContactPerson,
                InstitutionPosition,
                InstitutionEmail,
                InstitutionPhone,
                InstitutionEstablishedYear,
                InstitutionStudentCount,
                InstitutionFacultyCount,
            ],
            3 => &[
                ProgramName,
                ProgramLevel,
                ProgramDuration,
                ProgramCredits,
                ProgramLanguage,
                ProgramDepartment,
                ProgramDescription,
            ],
            4 => &[Files],
            5 => &[Declaration],
            _ => &[],
        }
    }

    fn text(&self, field: AccreditationField) -> Option<&str> {
        use AccreditationField::*;
        let value = match field {
            AccreditationType => &self.accreditation_type,
            InstitutionName => &self.institution.name,
            InstitutionType => &self.institution.institution_type,
            InstitutionAddress => &self.institution.address,
            InstitutionWebsite => &self.institution.website,
            InstitutionContactPerson => &self.institution.contact_person,
            InstitutionPosition => &self.institution.position,
            InstitutionEmail => &self.institution.email,
            InstitutionPhone => &self.institution.phone,
            InstitutionEstablishedYear => &self.institution.established_year,
            InstitutionStudentCount => &self.institution.student_count,
            InstitutionFacultyCount => &self.institution.faculty_count,
            ProgramName => &self.program.name,
            ProgramLevel => &self.program.level,
            ProgramDuration => &self.program.duration,
            ProgramCredits => &self.program.credits,
            ProgramLanguage => &self.program.language,
            ProgramDepartment => &self.program.department,
            ProgramDescription => &self.program.description,
            Files | Declaration => return None,
        };
        Some(value.as_str())
    }

    fn text_mut(&mut self, field: AccreditationField) -> Option<&mut String> {
        use AccreditationField::*;
        let slot = match field {
            AccreditationType => &mut self.accreditation_type,
            InstitutionName => &mut self.institution.name,
            InstitutionType => &mut self.institution.institution_type,
            InstitutionAddress => &mut self.institution.address,
            InstitutionWebsite => &mut self.institution.website,
            InstitutionContactPerson => &mut self.institution.contact_person,
            InstitutionPosition => &mut self.institution.position,
            InstitutionEmail => &mut self.institution.email,
            InstitutionPhone => &mut self.institution.phone,
            InstitutionEstablishedYear => &mut self.institution.established_year,
            InstitutionStudentCount => &mut self.institution.student_count,
            InstitutionFacultyCount => &mut self.institution.faculty_count,
            ProgramName => &mut self.program.name,
            ProgramLevel => &mut self.program.level,
            ProgramDuration => &mut self.program.duration,
            ProgramCredits => &mut self.program.credits,
            ProgramLanguage => &mut self.program.language,
            ProgramDepartment => &mut self.program.department,
            ProgramDescription => &mut self.program.description,
            Files | Declaration => return None,
        };
        Some(slot)
    }

    fn flag(&self, field: AccreditationField) -> Option<bool> {
        (field == AccreditationField::Declaration).then_some(self.declaration)
    }

    fn flag_mut(&mut self, field: AccreditationField) -> Option<&mut bool> {
        (field == AccreditationField::Declaration).then_some(&mut self.declaration)
    }

    fn documents(&self) -> Option<&[UploadedDocument]> {
        Some(&self.uploads)
    }

    fn documents_mut(&mut self) -> Option<&mut Vec<UploadedDocument>> {
        Some(&mut self.uploads)
    }

    /// Institutional accreditation has no program step.
    fn is_step_active(&self, step: usize) -> bool {
        step != PROGRAM_STEP || !self.is_institutional()
    }

    fn validate_step(&self, step: usize, context: &ValidationContext) -> FieldErrors {
        use AccreditationField::*;
        let institution = &self.institution;
        let check = StepCheck::new(context);
        let check = match step {
            1 => check.required(AccreditationType.error_key(), &self.accreditation_type),
            2 => check
                .required(InstitutionName.error_key(), &institution.name)
                .required(InstitutionType.error_key(), &institution.institution_type)
                .email(InstitutionEmail.error_key(), &institution.email)
                .year(
                    InstitutionEstablishedYear.error_key(),
                    &institution.established_year,
                    ESTABLISHED_YEAR_MIN,
                    false,
                ),
            PROGRAM_STEP if self.is_program() => check
                .required(ProgramName.error_key(), &self.program.name)
                .required(ProgramLevel.error_key(), &self.program.level),
            4 => check.at_least_one(Files.error_key(), self.uploads.len(), FILES_MESSAGE),
            5 => check.checked(Declaration.error_key(), self.declaration, DECLARATION_MESSAGE),
            _ => check,
        };
        check.finish()
    }

    fn payload(&self) -> serde_json::Value {
        let institution = &self.institution;
        let program = &self.program;
        let is_program = self.is_program();
        let payload = AccreditationPayload {
            accreditation_type: &self.accreditation_type,
            institution_name: &institution.name,
            contact_person: &institution.contact_person,
            email: &institution.email,
            phone: &institution.phone,
            website: &institution.website,
            address: &institution.address,
            program_name: is_program.then_some(program.name.as_str()),
            program_level: is_program.then_some(program.level.as_str()),
            student_count: parse_optional_int(&institution.student_count),
            faculty_count: parse_optional_int(&institution.faculty_count),
            establishment_year: parse_optional_int(&institution.established_year),
            license_number: "",
            previous_accreditation: "",
            quality_assurance_system: "Standard quality assurance system",
            educational_goals: if is_program {
                program.description.as_str()
            } else {
                "Institutional educational goals"
            },
            curriculum_description: if is_program {
                program.description.as_str()
            } else {
                "Institutional curriculum"
            },
            assessment_methods: "Standard assessment methods",
            faculty_qualifications: "Qualified faculty members",
            infrastructure_description: "Modern infrastructure and facilities",
            student_services: "Comprehensive student services",
            additional_info: format!(
                "Institution Type: {}, Program Duration: {}, Credits: {}, Language: {}, Department: {}",
                institution.institution_type,
                program.duration,
                program.credits,
                program.language,
                program.department
            ),
        };
        serde_json::to_value(payload).unwrap_or(serde_json::Value::Null)
    }
}
