//! Wizard form controls
//!
//! Maps each questionnaire step to the focusable controls drawn for it.

use crate::domain::{
    CONCERN_OPTIONS, EmployeeCount, Industry, OnboardingForm, SECURITY_OPTIONS, SecurityLeadKind, ToolCategory,
};
use crate::validation::{FieldPath, Step};

/// How a control reacts to input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    /// Free text, edited by typing
    Text,
    /// One of several literals, Space selects
    Radio,
    /// Label in a list, Space toggles
    Checkbox,
}

/// One focusable line in the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Control {
    pub field: FieldPath,
    pub kind: ControlKind,
    /// Literal stored in the form (radio) or label toggled (checkbox)
    pub value: &'static str,
    /// Text shown next to the control
    pub label: &'static str,
}

impl Control {
    fn text(field: FieldPath, label: &'static str) -> Self {
        Self {
            field,
            kind: ControlKind::Text,
            value: "",
            label,
        }
    }

    fn radio(field: FieldPath, value: &'static str, label: &'static str) -> Self {
        Self {
            field,
            kind: ControlKind::Radio,
            value,
            label,
        }
    }

    fn checkbox(field: FieldPath, label: &'static str) -> Self {
        Self {
            field,
            kind: ControlKind::Checkbox,
            value: label,
            label,
        }
    }
}

/// Controls for `step`, in focus order
///
/// The lead name box only exists while the dedicated lead type is selected.
pub fn controls(step: Step, form: &OnboardingForm) -> Vec<Control> {
    match step {
        Step::Company => {
            let mut controls = vec![Control::text(FieldPath::CompanyName, "Acme Corporation")];
            controls.extend(
                EmployeeCount::ALL
                    .iter()
                    .map(|count| Control::radio(FieldPath::EmployeeCount, count.as_str(), count.as_str())),
            );
            controls
        }
        Step::Industry => Industry::ALL
            .iter()
            .map(|industry| Control::radio(FieldPath::Industry, industry.as_str(), industry.label()))
            .collect(),
        Step::Tools => ToolCategory::ALL
            .iter()
            .flat_map(|category| {
                category
                    .options()
                    .iter()
                    .map(move |tool| Control::checkbox(FieldPath::Tools(*category), tool))
            })
            .collect(),
        Step::CurrentSecurity => SECURITY_OPTIONS
            .iter()
            .map(|option| Control::checkbox(FieldPath::CurrentSecurity, option))
            .collect(),
        Step::Concerns => CONCERN_OPTIONS
            .iter()
            .map(|option| Control::checkbox(FieldPath::MainConcerns, option))
            .collect(),
        Step::SecurityLead => {
            let mut controls = Vec::new();
            for kind in SecurityLeadKind::ALL {
                controls.push(Control::radio(FieldPath::SecurityLeadType, kind.as_str(), kind.label()));
                if kind == SecurityLeadKind::Dedicated && form.security_lead.kind == kind.as_str() {
                    controls.push(Control::text(FieldPath::SecurityLeadName, "Name (e.g., Jane Smith)"));
                }
            }
            controls
        }
    }
}

/// Question shown above a group of controls
pub fn heading(field: FieldPath) -> Option<&'static str> {
    match field {
        FieldPath::CompanyName => Some("What's your company name?"),
        FieldPath::EmployeeCount => Some("How many employees do you have?"),
        FieldPath::Tools(category) => Some(category.label()),
        _ => None,
    }
}
