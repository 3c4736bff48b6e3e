//! Validation rules

use std::str::FromStr;

use tracing::debug;

use super::{FieldPath, Step, ValidationError, Violation};
use crate::domain::{EmployeeCount, Industry, OnboardingData, OnboardingForm, SecurityLead, SecurityLeadKind};

/// Minimum company name length, in characters
pub const MIN_COMPANY_NAME_LEN: usize = 2;

pub const COMPANY_NAME_MESSAGE: &str = "Company name must be at least 2 characters";
pub const EMPLOYEE_COUNT_MESSAGE: &str = "Please select an employee count range";
pub const INDUSTRY_MESSAGE: &str = "Please select an industry";
pub const CONCERNS_MESSAGE: &str = "Please select at least one security concern";
pub const SECURITY_LEAD_MESSAGE: &str = "Please select who handles security";

fn check_company_name(form: &OnboardingForm, violations: &mut Vec<Violation>) {
    if form.company_name.chars().count() < MIN_COMPANY_NAME_LEN {
        violations.push(Violation::new(FieldPath::CompanyName, COMPANY_NAME_MESSAGE));
    }
}

fn check_concerns(form: &OnboardingForm, violations: &mut Vec<Violation>) {
    if form.main_concerns.is_empty() {
        violations.push(Violation::new(FieldPath::MainConcerns, CONCERNS_MESSAGE));
    }
}

/// Parse an enumerated choice, recording a violation when it is not one of the literals
fn parse_choice<T: FromStr>(
    value: &str,
    field: FieldPath,
    message: &str,
    violations: &mut Vec<Violation>,
) -> Option<T> {
    match value.parse::<T>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            debug!(%field, %value, "parse_choice: not a valid literal");
            violations.push(Violation::new(field, message));
            None
        }
    }
}

/// Validate only the fields owned by `step`
pub fn validate_step(step: Step, form: &OnboardingForm) -> Result<(), ValidationError> {
    debug!(?step, "validate_step: called");
    let mut violations = Vec::new();

    match step {
        Step::Company => {
            check_company_name(form, &mut violations);
            parse_choice::<EmployeeCount>(
                &form.employee_count,
                FieldPath::EmployeeCount,
                EMPLOYEE_COUNT_MESSAGE,
                &mut violations,
            );
        }
        Step::Industry => {
            parse_choice::<Industry>(&form.industry, FieldPath::Industry, INDUSTRY_MESSAGE, &mut violations);
        }
        // Tool lists and security measures only need to be lists, which the form type guarantees
        Step::Tools | Step::CurrentSecurity => {}
        Step::Concerns => check_concerns(form, &mut violations),
        Step::SecurityLead => {
            parse_choice::<SecurityLeadKind>(
                &form.security_lead.kind,
                FieldPath::SecurityLeadType,
                SECURITY_LEAD_MESSAGE,
                &mut violations,
            );
        }
    }

    debug!(?step, violations = violations.len(), "validate_step: done");
    ValidationError::check(violations)
}

/// Validate the whole form and freeze it into a document
pub fn validate_document(form: &OnboardingForm) -> Result<OnboardingData, ValidationError> {
    debug!("validate_document: called");
    let mut violations = Vec::new();

    check_company_name(form, &mut violations);
    let employee_count = parse_choice::<EmployeeCount>(
        &form.employee_count,
        FieldPath::EmployeeCount,
        EMPLOYEE_COUNT_MESSAGE,
        &mut violations,
    );
    let industry = parse_choice::<Industry>(&form.industry, FieldPath::Industry, INDUSTRY_MESSAGE, &mut violations);
    check_concerns(form, &mut violations);
    let lead_kind = parse_choice::<SecurityLeadKind>(
        &form.security_lead.kind,
        FieldPath::SecurityLeadType,
        SECURITY_LEAD_MESSAGE,
        &mut violations,
    );

    let (Some(employee_count), Some(industry), Some(lead_kind)) = (employee_count, industry, lead_kind) else {
        debug!(violations = violations.len(), "validate_document: missing choices");
        return Err(ValidationError { violations });
    };
    ValidationError::check(violations)?;

    Ok(OnboardingData::from_validated(
        form.company_name.clone(),
        employee_count,
        industry,
        form.tools.clone(),
        form.current_security.clone(),
        form.main_concerns.clone(),
        SecurityLead::from_kind(lead_kind, &form.security_lead.name),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_form() -> OnboardingForm {
        let mut form = OnboardingForm {
            company_name: "Acme Corp".to_string(),
            employee_count: "51-200".to_string(),
            industry: "finance".to_string(),
            ..Default::default()
        };
        form.main_concerns.push("Ransomware".to_string());
        form.security_lead.kind = "none".to_string();
        form
    }

    #[test]
    fn test_company_name_length_boundary() {
        let mut form = valid_form();
        form.company_name = "Ac".to_string();
        assert!(validate_step(Step::Company, &form).is_ok());

        form.company_name = "A".to_string();
        let err = validate_step(Step::Company, &form).unwrap_err();
        assert_eq!(err.message(), COMPANY_NAME_MESSAGE);
        assert_eq!(err.fields(), vec![FieldPath::CompanyName]);
    }

    #[test]
    fn test_step_one_reports_every_field() {
        let form = OnboardingForm::default();
        let err = validate_step(Step::Company, &form).unwrap_err();

        assert_eq!(err.fields(), vec![FieldPath::CompanyName, FieldPath::EmployeeCount]);
        assert_eq!(err.to_string(), COMPANY_NAME_MESSAGE);
    }

    #[test]
    fn test_step_validation_ignores_other_steps() {
        // Only the company fields are filled in, later steps are still blank
        let form = OnboardingForm {
            company_name: "Acme".to_string(),
            employee_count: "10-50".to_string(),
            ..Default::default()
        };
        assert!(validate_step(Step::Company, &form).is_ok());
        assert!(validate_step(Step::Industry, &form).is_err());
        assert!(validate_step(Step::Tools, &form).is_ok());
        assert!(validate_step(Step::CurrentSecurity, &form).is_ok());
    }

    #[test]
    fn test_unknown_literals_rejected() {
        let mut form = valid_form();
        form.industry = "aerospace".to_string();
        assert_eq!(validate_step(Step::Industry, &form).unwrap_err().message(), INDUSTRY_MESSAGE);

        form.employee_count = "1-9".to_string();
        assert_eq!(
            validate_step(Step::Company, &form).unwrap_err().message(),
            EMPLOYEE_COUNT_MESSAGE
        );

        form.security_lead.kind = "intern".to_string();
        assert_eq!(
            validate_step(Step::SecurityLead, &form).unwrap_err().message(),
            SECURITY_LEAD_MESSAGE
        );
    }

    #[test]
    fn test_empty_concerns_rejected() {
        let mut form = valid_form();
        form.main_concerns.clear();
        let err = validate_step(Step::Concerns, &form).unwrap_err();
        assert_eq!(err.message(), "Please select at least one security concern");
        assert_eq!(err.fields(), vec![FieldPath::MainConcerns]);
    }

    #[test]
    fn test_lead_name_optional_for_every_type() {
        for kind in SecurityLeadKind::ALL {
            let mut form = valid_form();
            form.security_lead.kind = kind.as_str().to_string();
            form.security_lead.name.clear();
            assert!(validate_step(Step::SecurityLead, &form).is_ok(), "{:?}", kind);
        }
    }

    #[test]
    fn test_validate_document_builds_tagged_lead() {
        let mut form = valid_form();
        form.security_lead.kind = "dedicated".to_string();
        form.security_lead.name = "Jane Smith".to_string();

        let doc = validate_document(&form).unwrap();
        assert_eq!(doc.company_name(), "Acme Corp");
        assert_eq!(doc.employee_count(), EmployeeCount::Range51To200);
        assert_eq!(doc.industry(), Industry::Finance);
        assert_eq!(doc.security_lead().name(), Some("Jane Smith"));

        form.security_lead.kind = "owner".to_string();
        let doc = validate_document(&form).unwrap();
        assert_eq!(doc.security_lead(), &SecurityLead::Owner);
    }

    #[test]
    fn test_validate_document_collects_in_step_order() {
        let err = validate_document(&OnboardingForm::default()).unwrap_err();
        let fields: Vec<FieldPath> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(
            fields,
            vec![
                FieldPath::CompanyName,
                FieldPath::EmployeeCount,
                FieldPath::Industry,
                FieldPath::MainConcerns,
                FieldPath::SecurityLeadType,
            ]
        );
    }

    #[test]
    fn test_validate_document_rejects_missing_concerns_only() {
        let mut form = valid_form();
        form.main_concerns.clear();
        let err = validate_document(&form).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.message(), CONCERNS_MESSAGE);
    }

    proptest! {
        #[test]
        fn prop_company_name_rule_matches_char_count(name in "\\PC{0,12}") {
            let mut form = valid_form();
            form.company_name = name.clone();
            let ok = validate_step(Step::Company, &form).is_ok();
            prop_assert_eq!(ok, name.chars().count() >= MIN_COMPANY_NAME_LEN);
        }

        #[test]
        fn prop_tool_selections_never_block(labels in proptest::collection::vec("[A-Za-z ]{0,10}", 0..6)) {
            let mut form = OnboardingForm::default();
            form.tools.email = labels.clone();
            form.current_security = labels;
            prop_assert!(validate_step(Step::Tools, &form).is_ok());
            prop_assert!(validate_step(Step::CurrentSecurity, &form).is_ok());
        }
    }
}
