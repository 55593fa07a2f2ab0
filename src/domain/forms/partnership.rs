use std::collections::BTreeSet;

use serde::Serialize;

use super::{split_address, FormField, WizardForm};
use crate::domain::models::{Choice, FieldKind, FormKind, StepInfo};
use crate::domain::validation::{
    FieldErrors, StepCheck, ValidationContext, DECLARATION_MESSAGE, INTERESTS_MESSAGE,
};

pub const ORGANIZATION_TYPES: &[Choice] = &[
    Choice::new("university", "University/Educational Institution"),
    Choice::new("government", "Government Agency"),
    Choice::new("ngo", "Non-Governmental Organization"),
    Choice::new("private", "Private Company"),
    Choice::new("international", "International Organization"),
];

pub const PARTNERSHIP_TYPES: &[Choice] = &[
    Choice::new("accreditation", "Accreditation Services"),
    Choice::new("recognition", "Document Recognition"),
    Choice::new("training", "Training and Capacity Building"),
    Choice::new("research", "Research Collaboration"),
    Choice::new("technology", "Technology Partnership"),
    Choice::new("other", "Other"),
];

pub const INTEREST_AREAS: &[Choice] = &[
    Choice::new("quality_assurance", "Quality Assurance"),
    Choice::new("accreditation", "Accreditation"),
    Choice::new("recognition", "Document Recognition"),
    Choice::new("bologna_process", "Bologna Process"),
    Choice::new("capacity_building", "Capacity Building"),
    Choice::new("technology", "Technology Solutions"),
    Choice::new("research", "Research and Development"),
    Choice::new("international_cooperation", "International Cooperation"),
];

const STEPS: &[StepInfo] = &[
    StepInfo::new("organization", "Organization"),
    StepInfo::new("contact", "Contact"),
    StepInfo::new("partnership", "Partnership"),
    StepInfo::new("review", "Review"),
];

const ORGANIZATION_YEAR_MIN: i32 = 1800;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrganizationInfo {
    pub name: String,
    pub org_type: String,
    pub website: String,
    pub description: String,
    pub established_year: String,
    pub employee_count: String,
    pub annual_revenue: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactInfo {
    pub contact_person: String,
    pub position: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartnershipDetails {
    pub partnership_type: String,
    pub interests: BTreeSet<String>,
    pub experience: String,
    pub proposal: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartnershipApplication {
    pub organization: OrganizationInfo,
    pub contact: ContactInfo,
    pub details: PartnershipDetails,
    pub declaration: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartnershipField {
    OrgName,
    OrgType,
    OrgWebsite,
    OrgDescription,
    OrgEstablishedYear,
    OrgEmployeeCount,
    OrgAnnualRevenue,
    ContactPerson,
    ContactPosition,
    ContactEmail,
    ContactPhone,
    ContactAddress,
    PartnershipType,
    Interests,
    Experience,
    Proposal,
    Declaration,
}

impl FormField for PartnershipField {
    fn label(&self) -> &'static str {
        match self {
            Self::OrgName => "Organization name",
            Self::OrgType => "Organization type",
            Self::OrgWebsite => "Website",
            Self::OrgDescription => "Description",
            Self::OrgEstablishedYear => "Established year",
            Self::OrgEmployeeCount => "Employee count",
            Self::OrgAnnualRevenue => "Annual revenue",
            Self::ContactPerson => "Contact person",
            Self::ContactPosition => "Position",
            Self::ContactEmail => "Email",
            Self::ContactPhone => "Phone",
            Self::ContactAddress => "Address",
            Self::PartnershipType => "Partnership type",
            Self::Interests => "Areas of interest",
            Self::Experience => "Previous experience",
            Self::Proposal => "Partnership proposal",
            Self::Declaration => "I confirm the information provided is accurate",
        }
    }

    fn error_key(&self) -> &'static str {
        match self {
            Self::OrgName => "orgName",
            Self::OrgType => "orgType",
            Self::OrgWebsite => "orgWebsite",
            Self::OrgDescription => "orgDescription",
            Self::OrgEstablishedYear => "orgEstablishedYear",
            Self::OrgEmployeeCount => "orgEmployeeCount",
            Self::OrgAnnualRevenue => "orgAnnualRevenue",
            Self::ContactPerson => "contactPerson",
            Self::ContactPosition => "contactPosition",
            Self::ContactEmail => "contactEmail",
            Self::ContactPhone => "contactPhone",
            Self::ContactAddress => "contactAddress",
            Self::PartnershipType => "partnershipType",
            Self::Interests => "interests",
            Self::Experience => "experience",
            Self::Proposal => "proposal",
            Self::Declaration => "declaration",
        }
    }

    fn kind(&self) -> FieldKind {
        match self {
            Self::OrgType => FieldKind::Select(ORGANIZATION_TYPES),
            Self::PartnershipType => FieldKind::Select(PARTNERSHIP_TYPES),
            Self::Interests => FieldKind::MultiSelect(INTEREST_AREAS),
            Self::OrgEstablishedYear => FieldKind::Year,
            Self::OrgEmployeeCount => FieldKind::Number,
            Self::ContactEmail => FieldKind::Email,
            Self::Declaration => FieldKind::Checkbox,
            _ => FieldKind::Text,
        }
    }

    fn required(&self) -> bool {
        matches!(
            self,
            Self::OrgName
                | Self::OrgType
                | Self::OrgDescription
                | Self::ContactPerson
                | Self::ContactEmail
                | Self::ContactPhone
                | Self::PartnershipType
                | Self::Interests
                | Self::Proposal
                | Self::Declaration
        )
    }
}

/// Request body for `POST /api/forms/partnerships`.
#[derive(Debug, Serialize)]
struct PartnershipPayload<'a> {
    partnership_type: &'a str,
    organization_name: &'a str,
    contact_person: &'a str,
    email: &'a str,
    phone: &'a str,
    website: &'a str,
    country: String,
    city: String,
    address: &'a str,
    partnership_goals: &'a str,
    proposed_activities: String,
    expected_outcomes: &'a str,
    resources_offered: &'a str,
    previous_partnerships: &'a str,
    additional_info: String,
}

impl WizardForm for PartnershipApplication {
    type Field = PartnershipField;

    const KIND: FormKind = FormKind::Partnership;

    fn steps() -> &'static [StepInfo] {
        STEPS
    }

    fn fields(step: usize) -> &'static [PartnershipField] {
        use PartnershipField::*;
        match step {
            1 => &[
                OrgName,
                OrgType,
                OrgWebsite,
                OrgDescription,
                OrgEstablishedYear,
                OrgEmployeeCount,
                OrgAnnualRevenue,
            ],
            2 => &[ContactPerson, ContactPosition, ContactEmail, ContactPhone, ContactAddress],
            3 => &[PartnershipType, Interests, Experience, Proposal],
            4 => &[Declaration],
            _ => &[],
        }
    }

    fn text(&self, field: PartnershipField) -> Option<&str> {
        use PartnershipField::*;
        let value = match field {
            OrgName => &self.organization.name,
            OrgType => &self.organization.org_type,
            OrgWebsite => &self.organization.website,
            OrgDescription => &self.organization.description,
            OrgEstablishedYear => &self.organization.established_year,
            OrgEmployeeCount => &self.organization.employee_count,
            OrgAnnualRevenue => &self.organization.annual_revenue,
            ContactPerson => &self.contact.contact_person,
            ContactPosition => &self.contact.position,
            ContactEmail => &self.contact.email,
            ContactPhone => &self.contact.phone,
            ContactAddress => &self.contact.address,
            PartnershipType => &self.details.partnership_type,
            Experience => &self.details.experience,
            Proposal => &self.details.proposal,
            Interests | Declaration => return None,
        };
        Some(value.as_str())
    }

    fn text_mut(&mut self, field: PartnershipField) -> Option<&mut String> {
        use PartnershipField::*;
        let slot = match field {
            OrgName => &mut self.organization.name,
            OrgType => &mut self.organization.org_type,
            OrgWebsite => &mut self.organization.website,
            OrgDescription => &mut self.organization.description,
            OrgEstablishedYear => &mut self.organization.established_year,
            OrgEmployeeCount => &mut self.organization.employee_count,
            OrgAnnualRevenue => &mut self.organization.annual_revenue,
            ContactPerson => &mut self.contact.contact_person,
            ContactPosition => &mut self.contact.position,
            ContactEmail => &mut self.contact.email,
            ContactPhone => &mut self.contact.phone,
            ContactAddress => &mut self.contact.address,
            PartnershipType => &mut self.details.partnership_type,
            Experience => &mut self.details.experience,
            Proposal => &mut self.details.proposal,
            Interests | Declaration => return None,
        };
        Some(slot)
    }

    fn flag(&self, field: PartnershipField) -> Option<bool> {
        (field == PartnershipField::Declaration).then_some(self.declaration)
    }

    fn flag_mut(&mut self, field: PartnershipField) -> Option<&mut bool> {
        (field == PartnershipField::Declaration).then_some(&mut self.declaration)
    }

    fn members(&self, field: PartnershipField) -> Option<&BTreeSet<String>> {
        (field == PartnershipField::Interests).then_some(&self.details.interests)
    }

    fn members_mut(&mut self, field: PartnershipField) -> Option<&mut BTreeSet<String>> {
        (field == PartnershipField::Interests).then_some(&mut self.details.interests)
    }

    fn validate_step(&self, step: usize, context: &ValidationContext) -> FieldErrors {
        use PartnershipField::*;
        let check = StepCheck::new(context);
        let check = match step {
            1 => check
                .required(OrgName.error_key(), &self.organization.name)
                .required(OrgType.error_key(), &self.organization.org_type)
                .required(OrgDescription.error_key(), &self.organization.description)
                .year(
                    OrgEstablishedYear.error_key(),
                    &self.organization.established_year,
                    ORGANIZATION_YEAR_MIN,
                    false,
                ),
            2 => check
                .required(ContactPerson.error_key(), &self.contact.contact_person)
                .email(ContactEmail.error_key(), &self.contact.email)
                .required(ContactPhone.error_key(), &self.contact.phone),
            3 => check
                .required(PartnershipType.error_key(), &self.details.partnership_type)
                .at_least_one(Interests.error_key(), self.details.interests.len(), INTERESTS_MESSAGE)
                .required(Proposal.error_key(), &self.details.proposal),
            4 => check.checked(Declaration.error_key(), self.declaration, DECLARATION_MESSAGE),
            _ => check,
        };
        check.finish()
    }

    fn payload(&self) -> serde_json::Value {
        let (city, country) = split_address(&self.contact.address);
        let payload = PartnershipPayload {
            partnership_type: &self.organization.org_type,
            organization_name: &self.organization.name,
            contact_person: &self.contact.contact_person,
            email: &self.contact.email,
            phone: &self.contact.phone,
            website: &self.organization.website,
            country,
            city,
            address: &self.contact.address,
            partnership_goals: &self.details.proposal,
            proposed_activities: self
                .details
                .interests
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
            expected_outcomes: &self.details.experience,
            resources_offered: &self.organization.description,
            previous_partnerships: &self.details.experience,
            additional_info: format!(
                "Employee Count: {}, Established: {}",
                self.organization.employee_count, self.organization.established_year
            ),
        };
        serde_json::to_value(payload).unwrap_or(serde_json::Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::{EMAIL_MESSAGE, REQUIRED_MESSAGE};

    fn ctx() -> ValidationContext {
        ValidationContext::for_year(2025)
    }

    fn complete_application() -> PartnershipApplication {
        let mut app = PartnershipApplication::default();
        app.organization.name = "Nazarbayev University".to_string();
        app.organization.org_type = "university".to_string();
        app.organization.description = "Research university".to_string();
        app.organization.established_year = "2010".to_string();
        app.organization.employee_count = "1200".to_string();
        app.contact.contact_person = "Aigerim Sadykova".to_string();
        app.contact.email = "partners@nu.edu.kz".to_string();
        app.contact.phone = "+7 7172 706000".to_string();
        app.contact.address = "Astana, Kabanbay Batyr 53, Kazakhstan".to_string();
        app.details.partnership_type = "research".to_string();
        app.details.interests.insert("bologna_process".to_string());
        app.details.interests.insert("accreditation".to_string());
        app.details.experience = "Joint programs with EHEA members".to_string();
        app.details.proposal = "Joint quality assurance workshops".to_string();
        app.declaration = true;
        app
    }

    #[test]
    fn test_empty_organization_step() {
        let errors = PartnershipApplication::default().validate_step(1, &ctx());
        assert_eq!(errors.get("orgName"), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.get("orgType"), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.get("orgDescription"), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_contact_email_format() {
        let mut app = complete_application();
        app.contact.email = "not-an-email".to_string();
        let errors = app.validate_step(2, &ctx());
        assert_eq!(errors.get("contactEmail"), Some(EMAIL_MESSAGE));
        assert_eq!(errors.len(), 1);

        app.contact.email = "a@b.com".to_string();
        assert!(app.validate_step(2, &ctx()).is_empty());
    }

    #[test]
    fn test_interests_required() {
        let mut app = complete_application();
        app.details.interests.clear();
        let errors = app.validate_step(3, &ctx());
        assert_eq!(errors.get("interests"), Some(INTERESTS_MESSAGE));
    }

    #[test]
    fn test_established_year_range() {
        let mut app = complete_application();
        app.organization.established_year = "1799".to_string();
        assert!(app.validate_step(1, &ctx()).contains("orgEstablishedYear"));
        app.organization.established_year = "1800".to_string();
        assert!(app.validate_step(1, &ctx()).is_empty());
    }

    #[test]
    fn test_declaration_is_independent_of_proposal() {
        let mut app = complete_application();
        app.declaration = false;
        let errors = app.validate_step(4, &ctx());
        assert_eq!(errors.get("declaration"), Some(DECLARATION_MESSAGE));
    }

    #[test]
    fn test_complete_application_passes_every_step() {
        let app = complete_application();
        for step in 1..=PartnershipApplication::total_steps() {
            assert!(app.validate_step(step, &ctx()).is_empty(), "step {} failed", step);
        }
    }

    #[test]
    fn test_payload_shape() {
        let payload = complete_application().payload();
        assert_eq!(payload["partnership_type"], "university");
        assert_eq!(payload["organization_name"], "Nazarbayev University");
        assert_eq!(payload["city"], "Astana");
        assert_eq!(payload["country"], "Kazakhstan");
        assert_eq!(payload["proposed_activities"], "accreditation, bologna_process");
        assert_eq!(payload["partnership_goals"], "Joint quality assurance workshops");
        assert_eq!(payload["previous_partnerships"], payload["expected_outcomes"]);
        assert_eq!(payload["additional_info"], "Employee Count: 1200, Established: 2010");
    }

    #[test]
    fn test_toggle_member_twice_restores_set() {
        let mut app = complete_application();
        let before = app.details.interests.clone();
        assert!(app.toggle_member(PartnershipField::Interests, "research"));
        assert!(app.details.interests.contains("research"));
        assert!(app.toggle_member(PartnershipField::Interests, "research"));
        assert_eq!(app.details.interests, before);

        assert!(app.toggle_member(PartnershipField::Interests, "accreditation"));
        assert!(app.toggle_member(PartnershipField::Interests, "accreditation"));
        assert_eq!(app.details.interests, before);
    }

    #[test]
    fn test_apply_rejects_mismatched_kind() {
        let mut app = PartnershipApplication::default();
        assert!(!app.apply(PartnershipField::Declaration, "yes".into()));
        assert!(!app.declaration);
        assert!(!app.apply(PartnershipField::OrgName, true.into()));
        assert!(app.apply(PartnershipField::OrgName, "KazNU".into()));
        assert_eq!(app.organization.name, "KazNU");
    }

    #[test]
    fn test_summary_uses_labels_and_skips_empty_optionals() {
        let summary = complete_application().summary();
        let find = |label: &str| summary.iter().find(|e| e.label == label).map(|e| e.value.clone());
        assert_eq!(find("Organization type"), Some("University/Educational Institution".to_string()));
        assert_eq!(find("Areas of interest"), Some("Accreditation, Bologna Process".to_string()));
        assert_eq!(find("Website"), None);
        assert!(summary.iter().all(|e| e.section != "Review"));
    }
}
