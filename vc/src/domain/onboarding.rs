//! Onboarding questionnaire types
//!
//! `OnboardingForm` is the editable draft the wizard mutates field by field.
//! `OnboardingData` is the frozen document sent to the plan service; it can
//! only be produced by whole-document validation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Email tools offered on the tools step
pub const EMAIL_TOOLS: &[&str] = &["Gmail", "Outlook", "Other"];

/// File storage tools offered on the tools step
pub const STORAGE_TOOLS: &[&str] = &["Google Drive", "Dropbox", "OneDrive"];

/// Communication tools offered on the tools step
pub const COMMUNICATION_TOOLS: &[&str] = &["Slack", "Teams", "Zoom"];

/// CRM tools offered on the tools step
pub const CRM_TOOLS: &[&str] = &["Salesforce", "HubSpot", "None"];

/// Security measures offered on the current-security step
pub const SECURITY_OPTIONS: &[&str] = &[
    "Multi-factor authentication (MFA)",
    "Antivirus software",
    "Data backups",
    "Security training",
    "None of the above",
];

/// Concerns offered on the main-concerns step
pub const CONCERN_OPTIONS: &[&str] = &[
    "Ransomware",
    "Phishing attacks",
    "Data breaches",
    "Insider threats",
    "Downtime",
];

/// A string that is not one of an enumeration's literals
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct UnknownLiteral {
    pub kind: &'static str,
    pub value: String,
}

/// Employee-count bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmployeeCount {
    #[serde(rename = "10-50")]
    Range10To50,
    #[serde(rename = "51-200")]
    Range51To200,
    #[serde(rename = "201-500")]
    Range201To500,
    #[serde(rename = "500+")]
    Over500,
}

impl EmployeeCount {
    pub const ALL: [Self; 4] = [
        Self::Range10To50,
        Self::Range51To200,
        Self::Range201To500,
        Self::Over500,
    ];

    /// Wire literal
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Range10To50 => "10-50",
            Self::Range51To200 => "51-200",
            Self::Range201To500 => "201-500",
            Self::Over500 => "500+",
        }
    }
}

impl fmt::Display for EmployeeCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EmployeeCount {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownLiteral {
                kind: "employee count",
                value: s.to_string(),
            })
    }
}

/// Industry the company operates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Industry {
    Healthcare,
    Finance,
    Retail,
    Manufacturing,
    Tech,
    Services,
    Other,
}

impl Industry {
    pub const ALL: [Self; 7] = [
        Self::Healthcare,
        Self::Finance,
        Self::Retail,
        Self::Manufacturing,
        Self::Tech,
        Self::Services,
        Self::Other,
    ];

    /// Wire literal
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthcare => "healthcare",
            Self::Finance => "finance",
            Self::Retail => "retail",
            Self::Manufacturing => "manufacturing",
            Self::Tech => "tech",
            Self::Services => "services",
            Self::Other => "other",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Healthcare => "Healthcare",
            Self::Finance => "Finance",
            Self::Retail => "Retail",
            Self::Manufacturing => "Manufacturing",
            Self::Tech => "Technology",
            Self::Services => "Professional Services",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Industry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Industry {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownLiteral {
                kind: "industry",
                value: s.to_string(),
            })
    }
}

/// Who handles IT/security issues (the tag of [`SecurityLead`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecurityLeadKind {
    Dedicated,
    Consultant,
    Owner,
    Unassigned,
}

impl SecurityLeadKind {
    pub const ALL: [Self; 4] = [Self::Dedicated, Self::Consultant, Self::Owner, Self::Unassigned];

    /// Wire literal
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dedicated => "dedicated",
            Self::Consultant => "consultant",
            Self::Owner => "owner",
            Self::Unassigned => "none",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Dedicated => "Dedicated IT person",
            Self::Consultant => "External consultant",
            Self::Owner => "CEO/Owner",
            Self::Unassigned => "No one specifically",
        }
    }
}

impl fmt::Display for SecurityLeadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecurityLeadKind {
    type Err = UnknownLiteral;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| UnknownLiteral {
                kind: "security lead type",
                value: s.to_string(),
            })
    }
}

/// Security lead, as sent to the plan service
///
/// Only the dedicated variant carries a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SecurityLead {
    Dedicated {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    Consultant,
    Owner,
    #[serde(rename = "none")]
    Unassigned,
}

impl SecurityLead {
    /// Build from a selected kind and the name field
    ///
    /// The name is sent as typed; an empty field is omitted.
    pub fn from_kind(kind: SecurityLeadKind, name: &str) -> Self {
        debug!(?kind, "SecurityLead::from_kind: called");
        match kind {
            SecurityLeadKind::Dedicated => Self::Dedicated {
                name: (!name.is_empty()).then(|| name.to_string()),
            },
            SecurityLeadKind::Consultant => Self::Consultant,
            SecurityLeadKind::Owner => Self::Owner,
            SecurityLeadKind::Unassigned => Self::Unassigned,
        }
    }

    pub fn kind(&self) -> SecurityLeadKind {
        match self {
            Self::Dedicated { .. } => SecurityLeadKind::Dedicated,
            Self::Consultant => SecurityLeadKind::Consultant,
            Self::Owner => SecurityLeadKind::Owner,
            Self::Unassigned => SecurityLeadKind::Unassigned,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Dedicated { name } => name.as_deref(),
            _ => None,
        }
    }
}

/// Tool category on the tools step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ToolCategory {
    Email,
    Storage,
    Communication,
    Crm,
}

impl ToolCategory {
    pub const ALL: [Self; 4] = [Self::Email, Self::Storage, Self::Communication, Self::Crm];

    /// Key used in field paths and on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Storage => "storage",
            Self::Communication => "communication",
            Self::Crm => "crm",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Storage => "File Storage",
            Self::Communication => "Communication",
            Self::Crm => "CRM",
        }
    }

    /// Checkbox options for this category
    pub fn options(self) -> &'static [&'static str] {
        match self {
            Self::Email => EMAIL_TOOLS,
            Self::Storage => STORAGE_TOOLS,
            Self::Communication => COMMUNICATION_TOOLS,
            Self::Crm => CRM_TOOLS,
        }
    }
}

/// Tool selections, one label list per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSelections {
    pub email: Vec<String>,
    pub storage: Vec<String>,
    pub communication: Vec<String>,
    pub crm: Vec<String>,
}

impl ToolSelections {
    pub fn get(&self, category: ToolCategory) -> &Vec<String> {
        match category {
            ToolCategory::Email => &self.email,
            ToolCategory::Storage => &self.storage,
            ToolCategory::Communication => &self.communication,
            ToolCategory::Crm => &self.crm,
        }
    }

    pub fn get_mut(&mut self, category: ToolCategory) -> &mut Vec<String> {
        match category {
            ToolCategory::Email => &mut self.email,
            ToolCategory::Storage => &mut self.storage,
            ToolCategory::Communication => &mut self.communication,
            ToolCategory::Crm => &mut self.crm,
        }
    }
}

/// Checkbox semantics: remove the label if present, append it otherwise
pub fn toggle_label(labels: &mut Vec<String>, label: &str) {
    debug!(%label, current = labels.len(), "toggle_label: called");
    if let Some(pos) = labels.iter().position(|l| l == label) {
        labels.remove(pos);
    } else {
        labels.push(label.to_string());
    }
}

/// Security lead as entered on the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadForm {
    /// Selected literal, empty when nothing is selected
    #[serde(rename = "type")]
    pub kind: String,
    /// Name field, shown only for the dedicated type
    pub name: String,
}

/// Editable questionnaire answers
///
/// Enumerated choices are kept as the raw literal the user picked (empty
/// string = nothing selected); the validator turns them into typed values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OnboardingForm {
    pub company_name: String,
    pub employee_count: String,
    pub industry: String,
    pub tools: ToolSelections,
    pub current_security: Vec<String>,
    pub main_concerns: Vec<String>,
    pub security_lead: LeadForm,
}

/// Validated onboarding document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingData {
    company_name: String,
    employee_count: EmployeeCount,
    industry: Industry,
    tools: ToolSelections,
    current_security: Vec<String>,
    main_concerns: Vec<String>,
    security_lead: SecurityLead,
}

impl OnboardingData {
    /// Assemble a document from already-validated parts
    pub(crate) fn from_validated(
        company_name: String,
        employee_count: EmployeeCount,
        industry: Industry,
        tools: ToolSelections,
        current_security: Vec<String>,
        main_concerns: Vec<String>,
        security_lead: SecurityLead,
    ) -> Self {
        Self {
            company_name,
            employee_count,
            industry,
            tools,
            current_security,
            main_concerns,
            security_lead,
        }
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn employee_count(&self) -> EmployeeCount {
        self.employee_count
    }

    pub fn industry(&self) -> Industry {
        self.industry
    }

    pub fn tools(&self) -> &ToolSelections {
        &self.tools
    }

    pub fn current_security(&self) -> &[String] {
        &self.current_security
    }

    pub fn main_concerns(&self) -> &[String] {
        &self.main_concerns
    }

    pub fn security_lead(&self) -> &SecurityLead {
        &self.security_lead
    }
}
