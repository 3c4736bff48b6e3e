//! Wizard steps and the form fields each one owns

use std::fmt;

use crate::domain::ToolCategory;

/// Questionnaire step, numbered 1 through 6
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Step {
    Company = 1,
    Industry = 2,
    Tools = 3,
    CurrentSecurity = 4,
    Concerns = 5,
    SecurityLead = 6,
}

impl Step {
    pub const COUNT: u8 = 6;

    pub const ALL: [Self; 6] = [
        Self::Company,
        Self::Industry,
        Self::Tools,
        Self::CurrentSecurity,
        Self::Concerns,
        Self::SecurityLead,
    ];

    pub const FIRST: Self = Self::Company;
    pub const LAST: Self = Self::SecurityLead;

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Self> {
        Self::ALL.get(usize::from(n).checked_sub(1)?).copied()
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn prev(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }

    /// Percent complete shown in the progress bar
    pub fn percent_complete(self) -> u8 {
        ((u32::from(self.number()) * 100 + u32::from(Self::COUNT) / 2) / u32::from(Self::COUNT)) as u8
    }

    /// Fields validated when leaving this step
    pub fn fields(self) -> &'static [FieldPath] {
        match self {
            Self::Company => &[FieldPath::CompanyName, FieldPath::EmployeeCount],
            Self::Industry => &[FieldPath::Industry],
            Self::Tools => &[
                FieldPath::Tools(ToolCategory::Email),
                FieldPath::Tools(ToolCategory::Storage),
                FieldPath::Tools(ToolCategory::Communication),
                FieldPath::Tools(ToolCategory::Crm),
            ],
            Self::CurrentSecurity => &[FieldPath::CurrentSecurity],
            Self::Concerns => &[FieldPath::MainConcerns],
            Self::SecurityLead => &[FieldPath::SecurityLeadType, FieldPath::SecurityLeadName],
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Company => "Great! Let's start with the basics",
            Self::Industry => "What industry are you in?",
            Self::Tools => "What tools does your team use?",
            Self::CurrentSecurity => "Do you have any of these security measures?",
            Self::Concerns => "What keeps you up at night?",
            Self::SecurityLead => "Who handles IT/security issues?",
        }
    }

    pub fn subtitle(self) -> &'static str {
        match self {
            Self::Company => "Tell us about your company",
            Self::Industry => "This helps us tailor compliance requirements",
            Self::Tools | Self::CurrentSecurity => "Select all that apply",
            Self::Concerns => "Select at least one security concern",
            Self::SecurityLead => "This helps us define the incident response lead",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {} of {}", self.number(), Self::COUNT)
    }
}

/// Path of a form field, as used for inline error marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    CompanyName,
    EmployeeCount,
    Industry,
    Tools(ToolCategory),
    CurrentSecurity,
    MainConcerns,
    SecurityLeadType,
    SecurityLeadName,
}

impl FieldPath {
    /// Step that owns this field
    pub fn step(self) -> Step {
        match self {
            Self::CompanyName | Self::EmployeeCount => Step::Company,
            Self::Industry => Step::Industry,
            Self::Tools(_) => Step::Tools,
            Self::CurrentSecurity => Step::CurrentSecurity,
            Self::MainConcerns => Step::Concerns,
            Self::SecurityLeadType | Self::SecurityLeadName => Step::SecurityLead,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompanyName => f.write_str("companyName"),
            Self::EmployeeCount => f.write_str("employeeCount"),
            Self::Industry => f.write_str("industry"),
            Self::Tools(category) => write!(f, "tools.{}", category.as_str()),
            Self::CurrentSecurity => f.write_str("currentSecurity"),
            Self::MainConcerns => f.write_str("mainConcerns"),
            Self::SecurityLeadType => f.write_str("securityLead.type"),
            Self::SecurityLeadName => f.write_str("securityLead.name"),
        }
    }
}
