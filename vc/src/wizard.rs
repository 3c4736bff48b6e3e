//! Onboarding wizard state machine
//!
//! Holds the step pointer, the draft form, inline field errors, the banner
//! error and the in-flight flag. Every forward transition goes through the
//! validator; submission goes through the plan service.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{ApiError, PlanResponse, PlanService};
use crate::domain::{OnboardingData, OnboardingForm, Plan, toggle_label};
use crate::validation::{FieldPath, Step, ValidationError, validate_document, validate_step};

/// Reasons a wizard transition was refused
#[derive(Debug, Error)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Already at the final step, submit the questionnaire instead")]
    AtFinalStep,

    #[error("Submission is only available on the final step")]
    NotAtFinalStep,

    #[error("A plan request is already in progress")]
    Submitting,

    #[error("No plan request is in progress")]
    NotSubmitting,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Six-step onboarding questionnaire
#[derive(Debug, Clone)]
pub struct Wizard {
    step: Step,
    form: OnboardingForm,
    field_errors: BTreeMap<FieldPath, String>,
    banner: Option<String>,
    submitting: bool,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// Empty questionnaire at step 1
    pub fn new() -> Self {
        debug!("Wizard::new: called");
        Self::from_form(OnboardingForm::default())
    }

    /// Questionnaire pre-filled with answers, still at step 1
    pub fn from_form(form: OnboardingForm) -> Self {
        Self {
            step: Step::FIRST,
            form,
            field_errors: BTreeMap::new(),
            banner: None,
            submitting: false,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn form(&self) -> &OnboardingForm {
        &self.form
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn field_error(&self, field: FieldPath) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    pub fn field_errors(&self) -> &BTreeMap<FieldPath, String> {
        &self.field_errors
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn percent_complete(&self) -> u8 {
        self.step.percent_complete()
    }

    /// Start over with an empty questionnaire
    pub fn reset(&mut self) {
        info!("Wizard::reset: starting a new questionnaire");
        *self = Self::new();
    }

    fn mark(&mut self, err: &ValidationError) {
        debug!(violations = err.violations().len(), "Wizard::mark: called");
        self.banner = Some(err.message().to_string());
        for violation in err.violations() {
            self.field_errors
                .entry(violation.field)
                .or_insert_with(|| violation.message.clone());
        }
    }

    fn clear_step_errors(&mut self, step: Step) {
        for field in step.fields() {
            self.field_errors.remove(field);
        }
    }

    fn clear_error(&mut self, field: FieldPath) {
        self.field_errors.remove(&field);
    }

    /// Validate the current step and move forward
    pub fn advance(&mut self) -> Result<Step, WizardError> {
        debug!(step = ?self.step, "Wizard::advance: called");
        let Some(next) = self.step.next() else {
            debug!("Wizard::advance: at final step");
            return Err(WizardError::AtFinalStep);
        };

        self.clear_step_errors(self.step);
        if let Err(err) = validate_step(self.step, &self.form) {
            debug!(message = %err, "Wizard::advance: step rejected");
            self.mark(&err);
            return Err(err.into());
        }

        self.banner = None;
        self.step = next;
        debug!(step = ?self.step, "Wizard::advance: moved forward");
        Ok(next)
    }

    /// Move back one step without validating; returns false at step 1
    pub fn retreat(&mut self) -> bool {
        debug!(step = ?self.step, "Wizard::retreat: called");
        match self.step.prev() {
            Some(prev) => {
                self.step = prev;
                self.banner = None;
                true
            }
            None => false,
        }
    }

    /// Validate the whole document and mark the request in flight
    ///
    /// The caller sends the returned document and hands the outcome to
    /// [`Wizard::finish_submit`].
    pub fn begin_submit(&mut self) -> Result<OnboardingData, WizardError> {
        debug!(step = ?self.step, submitting = self.submitting, "Wizard::begin_submit: called");
        if !self.step.is_last() {
            return Err(WizardError::NotAtFinalStep);
        }
        if self.submitting {
            return Err(WizardError::Submitting);
        }

        let data = match validate_document(&self.form) {
            Ok(data) => data,
            Err(err) => {
                debug!(message = %err, "Wizard::begin_submit: document rejected");
                self.mark(&err);
                return Err(err.into());
            }
        };

        self.banner = None;
        self.submitting = true;
        Ok(data)
    }

    /// Record the plan service's answer; form values are kept on failure
    pub fn finish_submit(&mut self, result: Result<PlanResponse, ApiError>) -> Result<Plan, WizardError> {
        debug!(ok = result.is_ok(), "Wizard::finish_submit: called");
        if !self.submitting {
            debug!("Wizard::finish_submit: no request in flight, dropping result");
            return Err(WizardError::NotSubmitting);
        }
        self.submitting = false;

        match result {
            Ok(resp) => {
                info!(company = %self.form.company_name, "Wizard::finish_submit: plan received");
                Ok(Plan::new(resp.plan, resp.metadata, self.form.company_name.clone()))
            }
            Err(err) => {
                warn!(error = %err, "Wizard::finish_submit: plan request failed");
                self.banner = Some(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Validate, call the plan service and wait for the plan
    pub async fn submit(&mut self, service: &dyn PlanService) -> Result<Plan, WizardError> {
        let data = self.begin_submit()?;
        let result = service.generate_plan(&data).await;
        self.finish_submit(result)
    }

    /// Current value of a text field
    pub fn text(&self, field: FieldPath) -> &str {
        match field {
            FieldPath::CompanyName => &self.form.company_name,
            FieldPath::SecurityLeadName => &self.form.security_lead.name,
            _ => "",
        }
    }

    fn text_mut(&mut self, field: FieldPath) -> Option<&mut String> {
        match field {
            FieldPath::CompanyName => Some(&mut self.form.company_name),
            FieldPath::SecurityLeadName => Some(&mut self.form.security_lead.name),
            _ => {
                warn!(%field, "Wizard::text_mut: not a text field");
                None
            }
        }
    }

    /// Replace a text field's value
    pub fn set_text(&mut self, field: FieldPath, value: &str) {
        if let Some(text) = self.text_mut(field) {
            *text = value.to_string();
            self.clear_error(field);
        }
    }

    pub fn push_char(&mut self, field: FieldPath, c: char) {
        if let Some(text) = self.text_mut(field) {
            text.push(c);
            self.clear_error(field);
        }
    }

    pub fn pop_char(&mut self, field: FieldPath) {
        if let Some(text) = self.text_mut(field) {
            text.pop();
            self.clear_error(field);
        }
    }

    /// Currently selected literal of a radio field
    pub fn selected(&self, field: FieldPath) -> &str {
        match field {
            FieldPath::EmployeeCount => &self.form.employee_count,
            FieldPath::Industry => &self.form.industry,
            FieldPath::SecurityLeadType => &self.form.security_lead.kind,
            _ => "",
        }
    }

    /// Pick a radio option
    pub fn select(&mut self, field: FieldPath, literal: &str) {
        debug!(%field, %literal, "Wizard::select: called");
        let slot = match field {
            FieldPath::EmployeeCount => &mut self.form.employee_count,
            FieldPath::Industry => &mut self.form.industry,
            FieldPath::SecurityLeadType => &mut self.form.security_lead.kind,
            _ => {
                warn!(%field, "Wizard::select: not a radio field");
                return;
            }
        };
        *slot = literal.to_string();
        self.clear_error(field);
    }

    /// Labels checked in a checkbox field
    pub fn checked(&self, field: FieldPath) -> &[String] {
        match field {
            FieldPath::Tools(category) => self.form.tools.get(category),
            FieldPath::CurrentSecurity => &self.form.current_security,
            FieldPath::MainConcerns => &self.form.main_concerns,
            _ => &[],
        }
    }

    /// Toggle a checkbox option
    pub fn toggle(&mut self, field: FieldPath, label: &str) {
        let labels = match field {
            FieldPath::Tools(category) => self.form.tools.get_mut(category),
            FieldPath::CurrentSecurity => &mut self.form.current_security,
            FieldPath::MainConcerns => &mut self.form.main_concerns,
            _ => {
                warn!(%field, "Wizard::toggle: not a checkbox field");
                return;
            }
        };
        toggle_label(labels, label);
        self.clear_error(field);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Operation;
    use crate::api::client::mock::MockPlanService;
    use crate::domain::{PlanMetadata, SecurityLeadKind, ToolCategory};
    use crate::validation::{CONCERNS_MESSAGE, COMPANY_NAME_MESSAGE, EMPLOYEE_COUNT_MESSAGE, INDUSTRY_MESSAGE};

    const PLAN_MD: &str = "# Incident Response Plan\n\n## 1. Roles\n\n- **Lead**: CEO\n";

    fn plan_response() -> PlanResponse {
        PlanResponse {
            success: true,
            plan: PLAN_MD.to_string(),
            metadata: PlanMetadata {
                company: "Acme Corp".to_string(),
                industry: "finance".to_string(),
                employee_count: "51-200".to_string(),
                generated_at: "2024-05-01T10:00:00".to_string(),
            },
        }
    }

    /// Fill steps 1-5 and stop at step 6
    fn wizard_at_final_step() -> Wizard {
        let mut wizard = Wizard::new();
        wizard.set_text(FieldPath::CompanyName, "Acme Corp");
        wizard.select(FieldPath::EmployeeCount, "51-200");
        wizard.advance().unwrap();
        wizard.select(FieldPath::Industry, "finance");
        wizard.advance().unwrap();
        wizard.toggle(FieldPath::Tools(ToolCategory::Email), "Gmail");
        wizard.advance().unwrap();
        wizard.toggle(FieldPath::CurrentSecurity, "Data backups");
        wizard.advance().unwrap();
        wizard.toggle(FieldPath::MainConcerns, "Ransomware");
        wizard.advance().unwrap();
        assert_eq!(wizard.step(), Step::SecurityLead);
        wizard
    }

    #[test]
    fn test_new_wizard_is_empty_at_step_one() {
        let wizard = Wizard::new();
        assert_eq!(wizard.step(), Step::Company);
        assert_eq!(wizard.form(), &OnboardingForm::default());
        assert!(wizard.banner().is_none());
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.percent_complete(), 17);
    }

    #[test]
    fn test_advance_rejects_short_company_name() {
        let mut wizard = Wizard::new();
        wizard.set_text(FieldPath::CompanyName, "A");
        wizard.select(FieldPath::EmployeeCount, "10-50");

        let err = wizard.advance().unwrap_err();
        assert!(matches!(err, WizardError::Validation(_)));
        assert_eq!(wizard.step(), Step::Company);
        assert_eq!(wizard.banner(), Some(COMPANY_NAME_MESSAGE));
        assert_eq!(wizard.field_error(FieldPath::CompanyName), Some(COMPANY_NAME_MESSAGE));
        assert_eq!(wizard.field_error(FieldPath::EmployeeCount), None);

        wizard.push_char(FieldPath::CompanyName, 'c');
        assert_eq!(wizard.field_error(FieldPath::CompanyName), None);
        assert_eq!(wizard.advance().unwrap(), Step::Industry);
        assert!(wizard.banner().is_none());
    }

    #[test]
    fn test_advance_marks_every_violated_field() {
        let mut wizard = Wizard::new();
        assert!(wizard.advance().is_err());

        assert_eq!(wizard.banner(), Some(COMPANY_NAME_MESSAGE));
        assert_eq!(wizard.field_error(FieldPath::EmployeeCount), Some(EMPLOYEE_COUNT_MESSAGE));
        assert_eq!(wizard.field_errors().len(), 2);
    }

    #[test]
    fn test_advance_succeeds_even_when_later_steps_blank() {
        let mut wizard = Wizard::new();
        wizard.set_text(FieldPath::CompanyName, "Ac");
        wizard.select(FieldPath::EmployeeCount, "51-200");
        assert_eq!(wizard.advance().unwrap(), Step::Industry);

        wizard.select(FieldPath::Industry, "finance");
        assert_eq!(wizard.advance().unwrap(), Step::Tools);

        // Tools and security measures have no requirements
        assert_eq!(wizard.advance().unwrap(), Step::CurrentSecurity);
        assert_eq!(wizard.advance().unwrap(), Step::Concerns);
    }

    #[test]
    fn test_missing_industry_blocks_step_two() {
        let mut wizard = Wizard::new();
        wizard.set_text(FieldPath::CompanyName, "Acme Corp");
        wizard.select(FieldPath::EmployeeCount, "201-500");
        assert_eq!(wizard.advance().unwrap(), Step::Industry);

        assert!(matches!(wizard.advance(), Err(WizardError::Validation(_))));
        assert_eq!(wizard.step(), Step::Industry);
        assert_eq!(wizard.banner(), Some(INDUSTRY_MESSAGE));
        assert_eq!(wizard.field_error(FieldPath::Industry), Some(INDUSTRY_MESSAGE));
        assert_eq!(wizard.field_errors().len(), 1);

        wizard.select(FieldPath::Industry, "manufacturing");
        assert_eq!(wizard.field_error(FieldPath::Industry), None);
        assert_eq!(wizard.advance().unwrap(), Step::Tools);
        assert!(wizard.banner().is_none());
    }

    #[test]
    fn test_empty_concerns_block_step_five() {
        let mut wizard = wizard_at_final_step();
        wizard.retreat();
        wizard.toggle(FieldPath::MainConcerns, "Ransomware");
        assert!(wizard.checked(FieldPath::MainConcerns).is_empty());

        assert!(wizard.advance().is_err());
        assert_eq!(wizard.step(), Step::Concerns);
        assert_eq!(wizard.banner(), Some(CONCERNS_MESSAGE));
    }

    #[test]
    fn test_advance_at_final_step_refused() {
        let mut wizard = wizard_at_final_step();
        assert!(matches!(wizard.advance(), Err(WizardError::AtFinalStep)));
        assert_eq!(wizard.step(), Step::SecurityLead);
    }

    #[test]
    fn test_retreat() {
        let mut wizard = Wizard::new();
        assert!(!wizard.retreat());
        assert_eq!(wizard.step(), Step::Company);

        let mut wizard = wizard_at_final_step();
        wizard.select(FieldPath::SecurityLeadType, "bogus");
        assert!(wizard.begin_submit().is_err());
        assert!(wizard.banner().is_some());

        assert!(wizard.retreat());
        assert_eq!(wizard.step(), Step::Concerns);
        assert!(wizard.banner().is_none());
        // Values survive navigation
        assert_eq!(wizard.form().company_name, "Acme Corp");
    }

    #[test]
    fn test_begin_submit_guards() {
        let mut wizard = Wizard::new();
        assert!(matches!(wizard.begin_submit(), Err(WizardError::NotAtFinalStep)));

        let mut wizard = wizard_at_final_step();
        wizard.select(FieldPath::SecurityLeadType, SecurityLeadKind::Owner.as_str());
        wizard.begin_submit().unwrap();
        assert!(wizard.is_submitting());
        assert!(matches!(wizard.begin_submit(), Err(WizardError::Submitting)));
    }

    #[test]
    fn test_result_without_request_dropped() {
        let mut wizard = wizard_at_final_step();
        assert!(!wizard.is_submitting());

        let late = wizard.finish_submit(Ok(plan_response()));
        assert!(matches!(late, Err(WizardError::NotSubmitting)));
        assert!(wizard.banner().is_none());

        // After a reset a result from the earlier questionnaire is ignored too
        wizard.select(FieldPath::SecurityLeadType, "none");
        wizard.begin_submit().unwrap();
        wizard.reset();
        assert!(matches!(
            wizard.finish_submit(Ok(plan_response())),
            Err(WizardError::NotSubmitting)
        ));
        assert_eq!(wizard.step(), Step::Company);
    }

    #[tokio::test]
    async fn test_submit_without_lead_makes_no_request() {
        let service = MockPlanService::new().with_plan(Ok(plan_response()));
        let mut wizard = wizard_at_final_step();

        assert!(wizard.submit(&service).await.is_err());
        assert_eq!(service.generate_calls(), 0);
        assert!(wizard.field_error(FieldPath::SecurityLeadType).is_some());
        assert!(!wizard.is_submitting());
    }

    #[tokio::test]
    async fn test_submit_returns_plan_verbatim() {
        let service = MockPlanService::new().with_plan(Ok(plan_response()));
        let mut wizard = wizard_at_final_step();
        wizard.select(FieldPath::SecurityLeadType, "none");

        let plan = wizard.submit(&service).await.unwrap();
        assert_eq!(plan.markdown(), PLAN_MD);
        assert_eq!(plan.company_name(), "Acme Corp");
        assert_eq!(plan.metadata().employee_count, "51-200");
        assert!(!wizard.is_submitting());
        assert_eq!(service.generate_calls(), 1);

        let sent = service.last_document().unwrap();
        assert_eq!(sent["securityLead"], serde_json::json!({"type": "none"}));
        assert_eq!(sent["tools"]["email"], serde_json::json!(["Gmail"]));
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_form() {
        let service = MockPlanService::new()
            .with_plan(Err(ApiError::Server {
                status: 400,
                message: "Invalid industry".to_string(),
            }))
            .with_plan(Err(ApiError::Unsuccessful {
                operation: Operation::GeneratePlan,
            }));
        let mut wizard = wizard_at_final_step();
        wizard.select(FieldPath::SecurityLeadType, "dedicated");
        wizard.set_text(FieldPath::SecurityLeadName, "Jane Smith");
        let before = wizard.form().clone();

        assert!(matches!(wizard.submit(&service).await, Err(WizardError::Api(_))));
        assert_eq!(wizard.banner(), Some("Invalid industry"));
        assert_eq!(wizard.form(), &before);
        assert!(!wizard.is_submitting());

        // Resubmission is manual and allowed
        assert!(wizard.submit(&service).await.is_err());
        assert_eq!(wizard.banner(), Some("Failed to generate plan. Please try again."));
        assert_eq!(service.generate_calls(), 2);
    }

    #[test]
    fn test_toggle_and_select_semantics() {
        let mut wizard = Wizard::new();
        let field = FieldPath::Tools(ToolCategory::Crm);
        wizard.toggle(field, "HubSpot");
        wizard.toggle(field, "None");
        assert_eq!(wizard.checked(field), ["HubSpot".to_string(), "None".to_string()]);
        wizard.toggle(field, "HubSpot");
        assert_eq!(wizard.checked(field), ["None".to_string()]);

        wizard.select(FieldPath::Industry, "retail");
        wizard.select(FieldPath::Industry, "tech");
        assert_eq!(wizard.selected(FieldPath::Industry), "tech");

        // Mismatched field kinds are ignored
        wizard.toggle(FieldPath::CompanyName, "x");
        wizard.select(FieldPath::MainConcerns, "x");
        assert!(wizard.form().main_concerns.is_empty());
    }

    #[test]
    fn test_reset() {
        let mut wizard = wizard_at_final_step();
        wizard.reset();
        assert_eq!(wizard.step(), Step::Company);
        assert!(wizard.form().company_name.is_empty());
    }
}
