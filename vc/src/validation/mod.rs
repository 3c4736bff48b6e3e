//! Schema validation for the onboarding questionnaire
//!
//! Per-step rules gate wizard advancement; the whole-document rules gate
//! submission and are the only way to obtain an [`OnboardingData`].
//!
//! [`OnboardingData`]: crate::domain::OnboardingData

mod rules;
mod step;

use thiserror::Error;

pub use rules::{
    COMPANY_NAME_MESSAGE, CONCERNS_MESSAGE, EMPLOYEE_COUNT_MESSAGE, INDUSTRY_MESSAGE, MIN_COMPANY_NAME_LEN,
    SECURITY_LEAD_MESSAGE, validate_document, validate_step,
};
pub use step::{FieldPath, Step};

/// Fallback banner text when no violation message is available
pub const GENERIC_MESSAGE: &str = "Please complete all required fields";

/// A single rule violation on one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: FieldPath,
    pub message: String,
}

impl Violation {
    pub fn new(field: FieldPath, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// One or more violations, in rule order
///
/// Displays as the first violation's message, which is what the wizard
/// shows in its banner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", banner_message(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

fn banner_message(violations: &[Violation]) -> &str {
    violations.first().map(|v| v.message.as_str()).unwrap_or(GENERIC_MESSAGE)
}

impl ValidationError {
    /// `Ok(())` when there is nothing to report
    pub fn check(violations: Vec<Violation>) -> Result<(), Self> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(Self { violations })
        }
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn first(&self) -> Option<&Violation> {
        self.violations.first()
    }

    /// Banner text: the first violation's message
    pub fn message(&self) -> &str {
        banner_message(&self.violations)
    }

    /// Every field with at least one violation
    pub fn fields(&self) -> Vec<FieldPath> {
        let mut fields: Vec<FieldPath> = self.violations.iter().map(|v| v.field).collect();
        fields.dedup();
        fields
    }
}
